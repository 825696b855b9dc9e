//! Business logic services.

pub mod ad;
pub mod cat;
pub mod comment;
pub mod favorite;
pub mod user;

pub use ad::{AdDetail, AdListing, AdService, CommentEntry, Picture};
pub use cat::CatService;
pub use comment::CommentService;
pub use favorite::FavoriteService;
pub use user::UserService;
