//! Favorite repository.
//!
//! Both writes are idempotent: adding an existing favorite and removing a
//! missing one succeed without touching any row.

use std::sync::Arc;

use crate::entities::{Fav, fav};
use classifieds_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    sea_query::OnConflict,
};

/// Favorite repository for database operations.
#[derive(Clone)]
pub struct FavRepository {
    db: Arc<DatabaseConnection>,
}

impl FavRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a favorite unless the `(ad_id, user_id)` pair already exists.
    ///
    /// Returns whether a row was inserted. Concurrent adds of the same pair
    /// are settled by the unique index; the loser inserts nothing.
    pub async fn add(&self, model: fav::ActiveModel) -> AppResult<bool> {
        let inserted = Fav::insert(model)
            .on_conflict(
                OnConflict::columns([fav::Column::AdId, fav::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Delete the favorite for `(ad_id, user_id)`, if any.
    ///
    /// Returns whether a row was deleted.
    pub async fn remove(&self, ad_id: &str, user_id: &str) -> AppResult<bool> {
        let result = Fav::delete_many()
            .filter(fav::Column::AdId.eq(ad_id))
            .filter(fav::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Check if an ad is favorited by a user.
    pub async fn is_favorited(&self, ad_id: &str, user_id: &str) -> AppResult<bool> {
        let count = Fav::find()
            .filter(fav::Column::AdId.eq(ad_id))
            .filter(fav::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// IDs of all ads a user has favorited.
    pub async fn favorite_ad_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        Fav::find()
            .filter(fav::Column::UserId.eq(user_id))
            .select_only()
            .column(fav::Column::AdId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count favorites of an ad.
    pub async fn count_by_ad(&self, ad_id: &str) -> AppResult<u64> {
        Fav::find()
            .filter(fav::Column::AdId.eq(ad_id))
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
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set, Value};

    fn active_fav(ad_id: &str, user_id: &str) -> fav::ActiveModel {
        fav::ActiveModel {
            id: Set("fav1".to_string()),
            ad_id: Set(ad_id.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_add_new_pair_inserts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .into_connection(),
        );

        let repo = FavRepository::new(db);
        assert!(repo.add(active_fav("ad1", "user1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_existing_pair_is_a_no_op() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0)])
                .into_connection(),
        );

        let repo = FavRepository::new(db);
        assert!(!repo.add(active_fav("ad1", "user1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_missing_pair_is_a_no_op() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0)])
                .into_connection(),
        );

        let repo = FavRepository::new(db);
        assert!(!repo.remove("ad1", "user1").await.unwrap());
    }

    #[tokio::test]
    async fn test_favorite_ad_ids() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    btreemap! { "ad_id" => Into::<Value>::into("ad1") },
                    btreemap! { "ad_id" => Into::<Value>::into("ad3") },
                ]])
                .into_connection(),
        );

        let repo = FavRepository::new(db);
        let ids = repo.favorite_ad_ids("user1").await.unwrap();

        assert_eq!(ids, vec!["ad1".to_string(), "ad3".to_string()]);
    }

    #[tokio::test]
    async fn test_is_favorited() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! {
                    "num_items" => Into::<Value>::into(1i64),
                }]])
                .into_connection(),
        );

        let repo = FavRepository::new(db);
        assert!(repo.is_favorited("ad1", "user1").await.unwrap());
    }
}
