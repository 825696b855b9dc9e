//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use crate::repositories::owned;
use classifieds_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment written by `user_id`.
    pub async fn find_owned(&self, id: &str, user_id: &str) -> AppResult<Option<comment::Model>> {
        owned::find_owned::<Comment, _>(self.db.as_ref(), id, user_id).await
    }

    /// Find a comment written by `user_id`, returning `NotFound` otherwise.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> AppResult<comment::Model> {
        self.find_owned(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {id}")))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment written by `user_id`.
    pub async fn delete_owned(&self, id: &str, user_id: &str) -> AppResult<bool> {
        owned::delete_owned::<Comment, _>(self.db.as_ref(), id, user_id).await
    }

    /// Comments on an ad, most recently updated first.
    pub async fn find_by_ad(&self, ad_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::AdId.eq(ad_id))
            .order_by_desc(comment::Column::UpdatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count comments on an ad.
    pub async fn count_by_ad(&self, ad_id: &str) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::AdId.eq(ad_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn create_test_comment(id: &str, ad_id: &str, user_id: &str, text: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            ad_id: ad_id.to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_ad() {
        let c1 = create_test_comment("c2", "ad1", "user2", "second thoughts");
        let c2 = create_test_comment("c1", "ad1", "user1", "first!");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_ad("ad1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "c2");
    }

    #[tokio::test]
    async fn test_get_owned_by_non_author_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_owned("c1", "user2").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_owned() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        assert!(repo.delete_owned("c1", "user1").await.unwrap());
    }

    #[tokio::test]
    async fn test_count_by_ad() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! {
                    "num_items" => Into::<Value>::into(3i64),
                }]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        assert_eq!(repo.count_by_ad("ad1").await.unwrap(), 3);
    }
}
