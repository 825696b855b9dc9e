//! Cat and breed catalog service.
//!
//! Any authenticated user may change any row; there is no ownership here.

use classifieds_common::{AppError, AppResult, IdGenerator};
use classifieds_db::{
    entities::{breed, cat},
    repositories::{BreedRepository, CatRepository},
};
use sea_orm::Set;
use tracing::info;

use crate::forms::CatDraft;

/// Cat and breed service for business logic.
#[derive(Clone)]
pub struct CatService {
    cat_repo: CatRepository,
    breed_repo: BreedRepository,
    id_gen: IdGenerator,
}

impl CatService {
    /// Create a new cat service.
    #[must_use]
    pub const fn new(cat_repo: CatRepository, breed_repo: BreedRepository) -> Self {
        Self {
            cat_repo,
            breed_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// All cats with their breed, and the number of breeds.
    pub async fn list_cats(&self) -> AppResult<(Vec<(cat::Model, Option<breed::Model>)>, u64)> {
        let cats = self.cat_repo.find_all_with_breed().await?;
        let breed_count = self.breed_repo.count().await?;
        Ok((cats, breed_count))
    }

    /// All breeds, ordered by name.
    pub async fn list_breeds(&self) -> AppResult<Vec<breed::Model>> {
        self.breed_repo.find_all().await
    }

    pub async fn get_cat(&self, id: &str) -> AppResult<cat::Model> {
        self.cat_repo.get_by_id(id).await
    }

    pub async fn create_cat(&self, draft: CatDraft) -> AppResult<cat::Model> {
        let model = cat::ActiveModel {
            id: Set(self.id_gen.generate()),
            nickname: Set(draft.nickname),
            weight: Set(draft.weight),
            foods: Set(draft.foods),
            breed_id: Set(draft.breed_id),
        };

        let cat = self.cat_repo.create(model).await?;
        info!(cat_id = %cat.id, nickname = %cat.nickname, "Cat created");
        Ok(cat)
    }

    pub async fn update_cat(&self, id: &str, draft: CatDraft) -> AppResult<cat::Model> {
        let mut model: cat::ActiveModel = self.cat_repo.get_by_id(id).await?.into();
        model.nickname = Set(draft.nickname);
        model.weight = Set(draft.weight);
        model.foods = Set(draft.foods);
        model.breed_id = Set(draft.breed_id);

        let cat = self.cat_repo.update(model).await?;
        info!(cat_id = %cat.id, "Cat updated");
        Ok(cat)
    }

    pub async fn delete_cat(&self, id: &str) -> AppResult<()> {
        if !self.cat_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("cat {id}")));
        }
        info!(cat_id = %id, "Cat deleted");
        Ok(())
    }

    pub async fn get_breed(&self, id: &str) -> AppResult<breed::Model> {
        self.breed_repo.get_by_id(id).await
    }

    pub async fn create_breed(&self, name: String) -> AppResult<breed::Model> {
        let model = breed::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name),
        };

        let breed = self.breed_repo.create(model).await?;
        info!(breed_id = %breed.id, name = %breed.name, "Breed created");
        Ok(breed)
    }

    pub async fn update_breed(&self, id: &str, name: String) -> AppResult<breed::Model> {
        let mut model: breed::ActiveModel = self.breed_repo.get_by_id(id).await?.into();
        model.name = Set(name);

        let breed = self.breed_repo.update(model).await?;
        info!(breed_id = %breed.id, "Breed updated");
        Ok(breed)
    }

    /// Delete a breed together with its cats.
    pub async fn delete_breed(&self, id: &str) -> AppResult<()> {
        if !self.breed_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("breed {id}")));
        }
        info!(breed_id = %id, "Breed deleted");
        Ok(())
    }
}
