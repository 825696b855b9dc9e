//! Ad service.

use std::collections::HashMap;

use chrono::Utc;
use classifieds_common::{AppError, AppResult, IdGenerator};
use classifieds_db::{
    entities::{ad, comment, user},
    repositories::{
        AdRepository, AdSummary, CommentRepository, FavRepository, LISTING_LIMIT, TagRepository,
        UserRepository,
    },
};
use sea_orm::{DatabaseTransaction, Set};
use tracing::info;

use crate::forms::{AdDraft, PictureUpload};

/// An ad in the listing.
#[derive(Debug, Clone)]
pub struct AdListing {
    pub ad: AdSummary,
    pub owner: String,
    pub tags: Vec<String>,
}

/// A comment with its author's username.
#[derive(Debug, Clone)]
pub struct CommentEntry {
    pub comment: comment::Model,
    pub author: String,
}

/// Everything the detail page shows.
#[derive(Debug, Clone)]
pub struct AdDetail {
    pub ad: ad::Model,
    pub owner: String,
    pub tags: Vec<String>,
    /// Most recently updated first.
    pub comments: Vec<CommentEntry>,
    pub is_owner: bool,
    pub is_favorite: bool,
}

/// A stored picture ready to be streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Ad service for business logic.
#[derive(Clone)]
pub struct AdService {
    ad_repo: AdRepository,
    comment_repo: CommentRepository,
    fav_repo: FavRepository,
    tag_repo: TagRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl AdService {
    /// Create a new ad service.
    #[must_use]
    pub const fn new(
        ad_repo: AdRepository,
        comment_repo: CommentRepository,
        fav_repo: FavRepository,
        tag_repo: TagRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            ad_repo,
            comment_repo,
            fav_repo,
            tag_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// The ten most recently updated ads, or, with a non-empty `search`,
    /// up to ten ads whose title or text contains it.
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<AdListing>> {
        let ads = match search.filter(|query| !query.is_empty()) {
            Some(query) => self.ad_repo.search(query, LISTING_LIMIT).await?,
            None => self.ad_repo.find_recent(LISTING_LIMIT).await?,
        };

        let ad_ids: Vec<String> = ads.iter().map(|ad| ad.id.clone()).collect();
        let owners = self.usernames(ads.iter().map(|ad| ad.user_id.clone())).await?;
        let mut tags = self.tag_repo.names_by_ads(&ad_ids).await?;

        Ok(ads
            .into_iter()
            .map(|ad| AdListing {
                owner: owners.get(&ad.user_id).cloned().unwrap_or_default(),
                tags: tags.remove(&ad.id).unwrap_or_default(),
                ad,
            })
            .collect())
    }

    /// IDs of the ads `user_id` has favorited.
    pub async fn favorites(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.fav_repo.favorite_ad_ids(user_id).await
    }

    /// Load an ad with its tags and comments.
    pub async fn detail(&self, id: &str, viewer: Option<&user::Model>) -> AppResult<AdDetail> {
        let ad = self.ad_repo.get_by_id(id).await?;
        let comments = self.comment_repo.find_by_ad(id).await?;
        let tags = self.tag_names(id).await?;

        let names = self
            .usernames(
                std::iter::once(ad.user_id.clone())
                    .chain(comments.iter().map(|c| c.user_id.clone())),
            )
            .await?;

        let (is_owner, is_favorite) = match viewer {
            Some(viewer) => (
                viewer.id == ad.user_id,
                self.fav_repo.is_favorited(id, &viewer.id).await?,
            ),
            None => (false, false),
        };

        Ok(AdDetail {
            owner: names.get(&ad.user_id).cloned().unwrap_or_default(),
            tags,
            comments: comments
                .into_iter()
                .map(|comment| CommentEntry {
                    author: names.get(&comment.user_id).cloned().unwrap_or_default(),
                    comment,
                })
                .collect(),
            is_owner,
            is_favorite,
            ad,
        })
    }

    /// Load an ad owned by `owner_id` with its tag names, for editing or
    /// delete confirmation.
    pub async fn get_owned(&self, id: &str, owner_id: &str) -> AppResult<(ad::Model, Vec<String>)> {
        let ad = self.ad_repo.get_owned(id, owner_id).await?;
        let tags = self.tag_names(id).await?;
        Ok((ad, tags))
    }

    /// Create an ad owned by `owner`.
    pub async fn create(&self, owner: &user::Model, draft: AdDraft) -> AppResult<ad::Model> {
        let now = Utc::now();
        let (picture, content_type) = match draft.picture {
            PictureUpload::Fresh {
                bytes,
                content_type,
            } => (Some(bytes), Some(content_type)),
            PictureUpload::Unchanged => (None, None),
        };

        let model = ad::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner.id.clone()),
            title: Set(draft.title),
            price: Set(draft.price),
            text: Set(draft.text),
            picture: Set(picture),
            content_type: Set(content_type),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let txn = self.ad_repo.begin().await?;
        let ad = self.ad_repo.create(&txn, model).await?;
        self.tag_repo.set_for_ad(&txn, &ad.id, &draft.tags).await?;
        commit(txn).await?;

        info!(ad_id = %ad.id, owner = %owner.username, title = %ad, "Ad created");
        Ok(ad)
    }

    /// Update an ad owned by `owner_id`. A stored picture is replaced only by
    /// a fresh upload.
    pub async fn update(&self, id: &str, owner_id: &str, draft: AdDraft) -> AppResult<ad::Model> {
        let existing = self.ad_repo.get_owned(id, owner_id).await?;

        let mut model: ad::ActiveModel = existing.into();
        model.title = Set(draft.title);
        model.price = Set(draft.price);
        model.text = Set(draft.text);
        if let PictureUpload::Fresh {
            bytes,
            content_type,
        } = draft.picture
        {
            model.picture = Set(Some(bytes));
            model.content_type = Set(Some(content_type));
        }
        model.updated_at = Set(Utc::now().into());

        let txn = self.ad_repo.begin().await?;
        let ad = self.ad_repo.update(&txn, model).await?;
        self.tag_repo.set_for_ad(&txn, &ad.id, &draft.tags).await?;
        commit(txn).await?;

        info!(ad_id = %ad.id, title = %ad, "Ad updated");
        Ok(ad)
    }

    /// Delete an ad owned by `owner_id`.
    pub async fn delete(&self, id: &str, owner_id: &str) -> AppResult<()> {
        if !self.ad_repo.delete_owned(id, owner_id).await? {
            return Err(AppError::NotFound(format!("ad {id}")));
        }

        info!(ad_id = %id, "Ad deleted");
        Ok(())
    }

    /// The stored picture of an ad. An ad without a picture is `NotFound`.
    pub async fn picture(&self, id: &str) -> AppResult<Picture> {
        let ad = self.ad_repo.get_by_id(id).await?;
        match ad.picture {
            Some(bytes) => Ok(Picture {
                bytes,
                content_type: ad
                    .content_type
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            }),
            None => Err(AppError::NotFound(format!("picture of ad {id}"))),
        }
    }

    async fn tag_names(&self, ad_id: &str) -> AppResult<Vec<String>> {
        let tags = self.tag_repo.find_by_ad(ad_id).await?;
        Ok(tags.into_iter().map(|tag| tag.name).collect())
    }

    async fn usernames(
        &self,
        ids: impl Iterator<Item = String>,
    ) -> AppResult<HashMap<String, String>> {
        let mut ids: Vec<String> = ids.collect();
        ids.sort();
        ids.dedup();

        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }
}

/// Commit an ad write. Dropping the transaction on an earlier error rolls
/// back the ad together with its tags.
async fn commit(txn: DatabaseTransaction) -> AppResult<()> {
    txn.commit()
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use classifieds_db::entities::tag;
    use maplit::btreemap;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> AdService {
        let db = Arc::new(db.into_connection());
        AdService::new(
            AdRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            FavRepository::new(db.clone()),
            TagRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            password_hash: "hash".to_string(),
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_ad(picture: Option<Vec<u8>>, content_type: Option<&str>) -> ad::Model {
        ad::Model {
            id: "ad1".to_string(),
            user_id: "user1".to_string(),
            title: "just a test".to_string(),
            price: Some(Decimal::new(4, 0)),
            text: "Ehy".to_string(),
            picture,
            content_type: content_type.map(ToString::to_string),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn draft(picture: PictureUpload) -> AdDraft {
        AdDraft {
            title: "just a test".to_string(),
            text: "Ehy".to_string(),
            price: Some(Decimal::new(4, 0)),
            tags: vec![],
            picture,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_detail_for_anonymous_viewer() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ad(None, None)]])
                .append_query_results([Vec::<comment::Model>::new()])
                .append_query_results([Vec::<tag::Model>::new()])
                .append_query_results([[create_test_user("user1", "alice")]]),
        );

        let detail = service.detail("ad1", None).await.unwrap();

        assert_eq!(detail.ad.title, "just a test");
        assert_eq!(detail.owner, "alice");
        assert!(detail.comments.is_empty());
        assert!(!detail.is_owner);
        assert!(!detail.is_favorite);
    }

    #[tokio::test]
    async fn test_detail_flags_owner_and_favorite() {
        let owner = create_test_user("user1", "alice");
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ad(None, None)]])
                .append_query_results([Vec::<comment::Model>::new()])
                .append_query_results([Vec::<tag::Model>::new()])
                .append_query_results([[owner.clone()]])
                .append_query_results([[btreemap! {
                    "num_items" => Into::<Value>::into(1i64),
                }]]),
        );

        let detail = service.detail("ad1", Some(&owner)).await.unwrap();

        assert!(detail.is_owner);
        assert!(detail.is_favorite);
    }

    #[tokio::test]
    async fn test_detail_missing_ad_is_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<ad::Model>::new()]),
        );

        let result = service.detail("missing", None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_with_fresh_picture_stores_bytes_and_type() {
        let owner = create_test_user("user1", "alice");
        let stored = create_test_ad(Some(vec![1, 2, 3]), Some("image/png"));
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_exec_results([exec(1), exec(0)]),
        );

        let ad = service
            .create(
                &owner,
                draft(PictureUpload::Fresh {
                    bytes: vec![1, 2, 3],
                    content_type: "image/png".to_string(),
                }),
            )
            .await
            .unwrap();

        assert_eq!(ad.picture.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(ad.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_failed_tag_write_rolls_back_the_ad() {
        let owner = create_test_user("user1", "alice");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ad(None, None)]])
                .append_exec_errors([DbErr::Custom("tag write failed".to_string())])
                .into_connection(),
        );
        let service = AdService::new(
            AdRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            FavRepository::new(db.clone()),
            TagRepository::new(db.clone()),
            UserRepository::new(db.clone()),
        );

        let mut tagged = draft(PictureUpload::Unchanged);
        tagged.tags = vec!["bikes".to_string()];
        let result = service.create(&owner, tagged).await;
        assert!(matches!(result, Err(AppError::Database(_))));

        drop(service);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let statements: Vec<&str> = log
            .iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.as_str()))
            .collect();
        assert!(statements.iter().any(|sql| sql.starts_with(r#"INSERT INTO "ad""#)));
        assert_eq!(statements.last(), Some(&"ROLLBACK"));
        assert!(!statements.contains(&"COMMIT"));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<ad::Model>::new()]),
        );

        let result = service
            .update("ad1", "intruder", draft(PictureUpload::Unchanged))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_not_found() {
        let service =
            service(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec(0)]));

        let result = service.delete("ad1", "intruder").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_picture_is_streamed_with_its_type() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ad(Some(vec![9; 4]), Some("image/jpeg"))]]),
        );

        let picture = service.picture("ad1").await.unwrap();
        assert_eq!(picture.bytes.len(), 4);
        assert_eq!(picture.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_picture_is_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ad(None, None)]]),
        );

        let result = service.picture("ad1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_without_search_uses_recent() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ad(None, None)]])
                .append_query_results([[create_test_user("user1", "alice")]])
                .append_query_results([Vec::<tag::Model>::new()]),
        );

        let listing = service.list(Some("")).await.unwrap();

        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].owner, "alice");
        assert!(listing[0].tags.is_empty());
    }
}
