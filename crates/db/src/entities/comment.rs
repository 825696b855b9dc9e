//! Comment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Parent ad.
    #[sea_orm(indexed)]
    pub ad_id: String,

    /// Author user ID.
    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Short form of the comment text for listings and log lines.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.text.chars().count() < 15 {
            return self.text.clone();
        }
        let head: String = self.text.chars().take(11).collect();
        format!("{head} ...")
    }
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
    use chrono::Utc;

    fn comment(text: &str) -> Model {
        Model {
            id: "c1".to_string(),
            ad_id: "ad1".to_string(),
            user_id: "user1".to_string(),
            text: text.to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_summary_short_text_is_whole() {
        assert_eq!(comment("a comment").summary(), "a comment");
    }

    #[test]
    fn test_summary_long_text_is_truncated() {
        assert_eq!(
            comment("this is a rather long comment").summary(),
            "this is a r ..."
        );
    }
}
