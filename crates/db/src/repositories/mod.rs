//! Database repositories.

mod ad;
mod breed;
mod cat;
mod comment;
mod fav;
pub mod owned;
mod tag;
mod user;

pub use ad::{AdRepository, AdSummary, LISTING_LIMIT, search_select};
pub use breed::BreedRepository;
pub use cat::CatRepository;
pub use comment::CommentRepository;
pub use fav::FavRepository;
pub use owned::OwnedEntity;
pub use tag::TagRepository;
pub use user::{USERNAME_TAKEN, UserRepository};
