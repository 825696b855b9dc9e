//! Cat repository.

use std::sync::Arc;

use crate::entities::{Breed, Cat, breed, cat};
use classifieds_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

/// Cat repository for database operations.
#[derive(Clone)]
pub struct CatRepository {
    db: Arc<DatabaseConnection>,
}

impl CatRepository {
    /// Create a new cat repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a cat by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<cat::Model>> {
        Cat::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a cat by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<cat::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cat {id}")))
    }

    /// All cats with their breed, ordered by nickname.
    pub async fn find_all_with_breed(&self) -> AppResult<Vec<(cat::Model, Option<breed::Model>)>> {
        Cat::find()
            .find_also_related(Breed)
            .order_by_asc(cat::Column::Nickname)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new cat.
    pub async fn create(&self, model: cat::ActiveModel) -> AppResult<cat::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a cat.
    pub async fn update(&self, model: cat::ActiveModel) -> AppResult<cat::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a cat.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Cat::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_id() {
        let cat = cat::Model {
            id: "cat1".to_string(),
            nickname: "Tom".to_string(),
            weight: 4,
            foods: "fish".to_string(),
            breed_id: "breed1".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[cat]])
                .into_connection(),
        );

        let repo = CatRepository::new(db);
        assert_eq!(repo.get_by_id("cat1").await.unwrap().nickname, "Tom");
    }

    #[tokio::test]
    async fn test_delete_missing_reports_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = CatRepository::new(db);
        assert!(!repo.delete("missing").await.unwrap());
    }
}
