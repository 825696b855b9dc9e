//! HTTP layer for the classifieds site.
//!
//! - **Endpoints**: ads, comments, favorites, accounts and the cats catalog
//! - **Extractors**: the authenticated user, or a redirect to login
//! - **Middleware**: session/bearer authentication and CSRF verification
//!
//! Views answer with JSON documents; successful form submissions answer
//! with `302 Found` redirects.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
