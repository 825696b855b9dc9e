//! Favorite entity: one user marking one ad.

use sea_orm::entity::prelude::*;

/// Favorite entity. Unique per `(ad_id, user_id)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fav")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Ad that was favorited.
    pub ad_id: String,

    /// User who favorited the ad.
    pub user_id: String,

    /// When the favorite was created.
    pub created_at: DateTimeWithTimeZone,
}

/// Short description of a favorite: "<username> likes <first 10 chars of title>".
#[must_use]
pub fn summary(username: &str, ad_title: &str) -> String {
    let title: String = ad_title.chars().take(10).collect();
    format!("{username} likes {title}")
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ad::Entity",
        from = "Column::AdId",
        to = "super::ad::Column::Id",
        on_delete = "Cascade"
    )]
    Ad,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::ad::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ad.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_truncates_title() {
        assert_eq!(summary("alice", "Mountain bike, barely used"), "alice likes Mountain b");
        assert_eq!(summary("bob", "Sofa"), "bob likes Sofa");
    }
}
