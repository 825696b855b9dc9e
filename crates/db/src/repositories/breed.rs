//! Breed repository.

use std::sync::Arc;

use crate::entities::{Breed, breed};
use classifieds_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};

/// Breed repository for database operations.
#[derive(Clone)]
pub struct BreedRepository {
    db: Arc<DatabaseConnection>,
}

impl BreedRepository {
    /// Create a new breed repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a breed by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<breed::Model>> {
        Breed::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a breed by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<breed::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("breed {id}")))
    }

    /// All breeds, ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<breed::Model>> {
        Breed::find()
            .order_by_asc(breed::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all breeds.
    pub async fn count(&self) -> AppResult<u64> {
        Breed::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new breed.
    pub async fn create(&self, model: breed::ActiveModel) -> AppResult<breed::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a breed.
    pub async fn update(&self, model: breed::ActiveModel) -> AppResult<breed::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a breed and, through the foreign key, its cats.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Breed::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}
