//! Ownership-scoped row access.
//!
//! Update and delete of user-owned rows go through these helpers, which look
//! a row up by its primary key and its owner at once. A row owned by someone
//! else is indistinguishable from a missing one.

use classifieds_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Select};

use crate::entities::{ad, comment};

/// An entity whose rows belong to exactly one user.
pub trait OwnedEntity: EntityTrait {
    /// Primary key column.
    fn id_column() -> Self::Column;

    /// Column holding the owning user's ID.
    fn owner_column() -> Self::Column;
}

impl OwnedEntity for ad::Entity {
    fn id_column() -> Self::Column {
        ad::Column::Id
    }

    fn owner_column() -> Self::Column {
        ad::Column::UserId
    }
}

impl OwnedEntity for comment::Entity {
    fn id_column() -> Self::Column {
        comment::Column::Id
    }

    fn owner_column() -> Self::Column {
        comment::Column::UserId
    }
}

/// Select the row `id` restricted to rows owned by `owner_id`.
#[must_use]
pub fn owned_select<E: OwnedEntity>(id: &str, owner_id: &str) -> Select<E> {
    E::find()
        .filter(E::id_column().eq(id))
        .filter(E::owner_column().eq(owner_id))
}

/// Find the row `id` if `owner_id` owns it.
pub async fn find_owned<E, C>(db: &C, id: &str, owner_id: &str) -> AppResult<Option<E::Model>>
where
    E: OwnedEntity,
    C: ConnectionTrait,
{
    owned_select::<E>(id, owner_id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Delete the row `id` if `owner_id` owns it. Returns whether a row was removed.
pub async fn delete_owned<E, C>(db: &C, id: &str, owner_id: &str) -> AppResult<bool>
where
    E: OwnedEntity,
    C: ConnectionTrait,
{
    let result = E::delete_many()
        .filter(E::id_column().eq(id))
        .filter(E::owner_column().eq(owner_id))
        .exec(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(result.rows_affected > 0)
}
