//! Database entities.

pub mod ad;
pub mod ad_tag;
pub mod breed;
pub mod cat;
pub mod comment;
pub mod fav;
pub mod tag;
pub mod user;

pub use ad::Entity as Ad;
pub use ad_tag::Entity as AdTag;
pub use breed::Entity as Breed;
pub use cat::Entity as Cat;
pub use comment::Entity as Comment;
pub use fav::Entity as Fav;
pub use tag::Entity as Tag;
pub use user::Entity as User;
