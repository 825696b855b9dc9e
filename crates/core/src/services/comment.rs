//! Comment service.

use chrono::Utc;
use classifieds_common::{AppError, AppResult, IdGenerator};
use classifieds_db::{
    entities::{comment, user},
    repositories::{AdRepository, CommentRepository},
};
use sea_orm::Set;
use tracing::info;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    ad_repo: AdRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, ad_repo: AdRepository) -> Self {
        Self {
            comment_repo,
            ad_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a comment on an ad. The text is stored as submitted.
    pub async fn create(
        &self,
        ad_id: &str,
        author: &user::Model,
        text: String,
    ) -> AppResult<comment::Model> {
        let ad = self.ad_repo.get_by_id(ad_id).await?;

        let now = Utc::now();
        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            ad_id: Set(ad.id),
            user_id: Set(author.id.clone()),
            text: Set(text),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let comment = self.comment_repo.create(model).await?;
        info!(
            comment_id = %comment.id,
            ad_id = %comment.ad_id,
            author = %author.username,
            summary = %comment.summary(),
            "Comment created"
        );
        Ok(comment)
    }

    /// Load a comment written by `author_id`, for delete confirmation.
    pub async fn get_owned(&self, id: &str, author_id: &str) -> AppResult<comment::Model> {
        self.comment_repo.get_owned(id, author_id).await
    }

    /// Delete a comment written by `author_id`, returning the parent ad ID.
    pub async fn delete(&self, id: &str, author_id: &str) -> AppResult<String> {
        let comment = self.comment_repo.get_owned(id, author_id).await?;

        if !self.comment_repo.delete_owned(id, author_id).await? {
            return Err(AppError::NotFound(format!("comment {id}")));
        }

        info!(comment_id = %id, ad_id = %comment.ad_id, "Comment deleted");
        Ok(comment.ad_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use classifieds_db::entities::ad;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> CommentService {
        let db = Arc::new(db.into_connection());
        CommentService::new(CommentRepository::new(db.clone()), AdRepository::new(db))
    }

    fn create_test_comment(id: &str, ad_id: &str, user_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            ad_id: ad_id.to_string(),
            user_id: user_id.to_string(),
            text: "is it still available?".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_on_missing_ad_is_not_found() {
        let author = user::Model {
            id: "user1".to_string(),
            username: "alice".to_string(),
            username_lower: "alice".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<ad::Model>::new()]),
        );

        let result = service.create("missing", &author, "hello".to_string()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_returns_parent_ad() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment("c1", "ad1", "user1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );

        assert_eq!(service.delete("c1", "user1").await.unwrap(), "ad1");
    }

    #[tokio::test]
    async fn test_delete_by_non_author_is_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()]),
        );

        let result = service.delete("c1", "intruder").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
