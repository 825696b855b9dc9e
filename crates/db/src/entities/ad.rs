//! Ad entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ad")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID, fixed at creation.
    #[sea_orm(indexed)]
    pub user_id: String,

    pub title: String,

    /// Asking price, `NUMERIC(7,2)`.
    #[sea_orm(column_type = "Decimal(Some((7, 2)))", nullable)]
    pub price: Option<Decimal>,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// Raw picture bytes, stored inline.
    #[sea_orm(nullable)]
    #[serde(skip)]
    pub picture: Option<Vec<u8>>,

    /// MIME type of `picture`; set whenever `picture` is.
    #[sea_orm(nullable)]
    pub content_type: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(indexed)]
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether a picture is stored for this ad.
    #[must_use]
    pub const fn has_picture(&self) -> bool {
        self.picture.is_some()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::fav::Entity")]
    Favs,

    #[sea_orm(has_many = "super::ad_tag::Entity")]
    AdTags,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::fav::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favs.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::ad_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::ad_tag::Relation::Ad.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
