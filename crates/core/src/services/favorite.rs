//! Favorite service.
//!
//! Adding and removing favorites are idempotent: the outcome is the same
//! whether or not the favorite existed before.

use chrono::Utc;
use classifieds_common::{AppResult, IdGenerator};
use classifieds_db::{
    entities::{fav, user},
    repositories::{AdRepository, FavRepository},
};
use sea_orm::Set;
use tracing::{debug, info};

/// Favorite service for business logic.
#[derive(Clone)]
pub struct FavoriteService {
    fav_repo: FavRepository,
    ad_repo: AdRepository,
    id_gen: IdGenerator,
}

impl FavoriteService {
    /// Create a new favorite service.
    #[must_use]
    pub const fn new(fav_repo: FavRepository, ad_repo: AdRepository) -> Self {
        Self {
            fav_repo,
            ad_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Mark an ad as a favorite of `user`.
    pub async fn add(&self, ad_id: &str, user: &user::Model) -> AppResult<()> {
        let ad = self.ad_repo.get_by_id(ad_id).await?;

        let model = fav::ActiveModel {
            id: Set(self.id_gen.generate()),
            ad_id: Set(ad.id.clone()),
            user_id: Set(user.id.clone()),
            created_at: Set(Utc::now().into()),
        };

        let summary = fav::summary(&user.username, &ad.title);
        if self.fav_repo.add(model).await? {
            info!(ad_id = %ad.id, favorite = %summary, "Favorite added");
        } else {
            debug!(ad_id = %ad.id, favorite = %summary, "Favorite already present");
        }
        Ok(())
    }

    /// Remove an ad from the favorites of `user`.
    pub async fn remove(&self, ad_id: &str, user: &user::Model) -> AppResult<()> {
        let ad = self.ad_repo.get_by_id(ad_id).await?;

        if self.fav_repo.remove(&ad.id, &user.id).await? {
            info!(ad_id = %ad.id, user_id = %user.id, "Favorite removed");
        } else {
            debug!(ad_id = %ad.id, user_id = %user.id, "Favorite already absent");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use classifieds_common::AppError;
    use classifieds_db::entities::ad;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> FavoriteService {
        let db = Arc::new(db.into_connection());
        FavoriteService::new(FavRepository::new(db.clone()), AdRepository::new(db))
    }

    fn create_test_user() -> user::Model {
        user::Model {
            id: "user2".to_string(),
            username: "bob".to_string(),
            username_lower: "bob".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_ad() -> ad::Model {
        ad::Model {
            id: "ad1".to_string(),
            user_id: "user1".to_string(),
            title: "just a test".to_string(),
            price: None,
            text: "Ehy".to_string(),
            picture: None,
            content_type: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_adding_twice_succeeds_both_times() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ad()], [create_test_ad()]])
                .append_exec_results([exec(1), exec(0)]),
        );
        let user = create_test_user();

        assert!(service.add("ad1", &user).await.is_ok());
        assert!(service.add("ad1", &user).await.is_ok());
    }

    #[tokio::test]
    async fn test_removing_missing_favorite_succeeds() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ad()]])
                .append_exec_results([exec(0)]),
        );

        assert!(service.remove("ad1", &create_test_user()).await.is_ok());
    }

    #[tokio::test]
    async fn test_favorite_of_missing_ad_is_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<ad::Model>::new()]),
        );

        let result = service.add("missing", &create_test_user()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
