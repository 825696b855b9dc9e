//! Common utilities and shared types for the classifieds site.
//!
//! This crate provides foundational components used across all classifieds crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Humanize**: Relative timestamps and byte sizes for display
//!
//! # Example
//!
//! ```no_run
//! use classifieds_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {} for {}", id, config.server.site_name);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod humanize;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use humanize::{naturalsize, naturaltime};
pub use id::IdGenerator;
