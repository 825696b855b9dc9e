//! Core business logic for the classifieds site.
//!
//! - [`forms`]: submitted form values and their validation
//! - [`services`]: ads, comments, favorites, users and the cat catalog

pub mod forms;
pub mod services;

pub use services::*;
