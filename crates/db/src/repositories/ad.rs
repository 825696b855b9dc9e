//! Ad repository.

use std::sync::Arc;

use crate::entities::{Ad, ad};
use crate::repositories::owned;
use classifieds_common::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, Func},
};

/// Number of ads shown by the listing.
pub const LISTING_LIMIT: u64 = 10;

/// An ad without its picture bytes, for listings.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct AdSummary {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub price: Option<Decimal>,
    pub text: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Ad repository for database operations.
#[derive(Clone)]
pub struct AdRepository {
    db: Arc<DatabaseConnection>,
}

impl AdRepository {
    /// Create a new ad repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an ad by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<ad::Model>> {
        Ad::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an ad by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<ad::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("ad {id}")))
    }

    /// Find an ad by ID if `user_id` owns it.
    pub async fn find_owned(&self, id: &str, user_id: &str) -> AppResult<Option<ad::Model>> {
        owned::find_owned::<Ad, _>(self.db.as_ref(), id, user_id).await
    }

    /// Find an ad owned by `user_id`, returning `NotFound` otherwise.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> AppResult<ad::Model> {
        self.find_owned(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("ad {id}")))
    }

    /// Start a transaction for writes that span an ad and its tags.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new ad on `conn`.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: ad::ActiveModel,
    ) -> AppResult<ad::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an ad on `conn`.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: ad::ActiveModel,
    ) -> AppResult<ad::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an ad owned by `user_id`. Comments, favorites and tag links
    /// go with it through the foreign keys.
    pub async fn delete_owned(&self, id: &str, user_id: &str) -> AppResult<bool> {
        owned::delete_owned::<Ad, _>(self.db.as_ref(), id, user_id).await
    }

    /// The most recently updated ads, newest first.
    pub async fn find_recent(&self, limit: u64) -> AppResult<Vec<AdSummary>> {
        Self::summaries(Ad::find())
            .order_by_desc(ad::Column::UpdatedAt)
            .limit(limit)
            .into_model::<AdSummary>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Ads whose title or text contains `query`, ignoring case, newest first.
    pub async fn search(&self, query: &str, limit: u64) -> AppResult<Vec<AdSummary>> {
        Self::summaries(search_select(query))
            .order_by_desc(ad::Column::UpdatedAt)
            .limit(limit)
            .into_model::<AdSummary>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn summaries(select: Select<Ad>) -> Select<Ad> {
        select.select_only().columns([
            ad::Column::Id,
            ad::Column::UserId,
            ad::Column::Title,
            ad::Column::Price,
            ad::Column::Text,
            ad::Column::CreatedAt,
            ad::Column::UpdatedAt,
        ])
    }
}

/// Case-insensitive substring match on title or text.
#[must_use]
pub fn search_select(query: &str) -> Select<Ad> {
    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

    let title = Expr::expr(Func::lower(Expr::col((Ad, ad::Column::Title))));
    let text = Expr::expr(Func::lower(Expr::col((Ad, ad::Column::Text))));

    Ad::find().filter(
        Condition::any()
            .add(title.like(pattern.clone()))
            .add(text.like(pattern)),
    )
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
