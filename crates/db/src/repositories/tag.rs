//! Tag repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{AdTag, Tag, ad_tag, tag};
use classifieds_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, sea_query::OnConflict,
};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Tags of an ad, ordered by name.
    pub async fn find_by_ad(&self, ad_id: &str) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .join(JoinType::InnerJoin, tag::Relation::AdTags.def())
            .filter(ad_tag::Column::AdId.eq(ad_id))
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Tag names for each of the given ads, keyed by ad ID.
    pub async fn names_by_ads(&self, ad_ids: &[String]) -> AppResult<HashMap<String, Vec<String>>> {
        if ad_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = AdTag::find()
            .filter(ad_tag::Column::AdId.is_in(ad_ids.to_vec()))
            .find_also_related(Tag)
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut names: HashMap<String, Vec<String>> = HashMap::new();
        for (link, tag) in rows {
            if let Some(tag) = tag {
                names.entry(link.ad_id).or_default().push(tag.name);
            }
        }
        Ok(names)
    }

    /// Replace the tags of an ad with `names`, creating missing tags.
    ///
    /// Tags are identified by slug: a name whose slug already exists links
    /// the stored tag, and names sharing a slug collapse into the first.
    /// Runs on `conn` so the caller can include it in a transaction.
    pub async fn set_for_ad<C: ConnectionTrait>(
        &self,
        conn: &C,
        ad_id: &str,
        names: &[String],
    ) -> AppResult<Vec<tag::Model>> {
        AdTag::delete_many()
            .filter(ad_tag::Column::AdId.eq(ad_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut wanted: Vec<(String, &String)> = Vec::new();
        for name in names {
            let slug = tag::slugify(name);
            if !wanted.iter().any(|(existing, _)| *existing == slug) {
                wanted.push((slug, name));
            }
        }
        if wanted.is_empty() {
            return Ok(vec![]);
        }

        let slugs: Vec<String> = wanted.iter().map(|(slug, _)| slug.clone()).collect();
        let mut tags = Self::find_by_slugs(conn, &slugs).await?;

        let missing: Vec<tag::ActiveModel> = wanted
            .iter()
            .filter(|(slug, _)| !tags.iter().any(|tag| tag.slug == *slug))
            .map(|(slug, name)| tag::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set((*name).clone()),
                slug: Set(slug.clone()),
            })
            .collect();
        if !missing.is_empty() {
            // A concurrent writer may have stored the same slug meanwhile
            Tag::insert_many(missing)
                .on_conflict(OnConflict::column(tag::Column::Slug).do_nothing().to_owned())
                .exec_without_returning(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            tags = Self::find_by_slugs(conn, &slugs).await?;
        }

        let links = tags.iter().map(|tag| ad_tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            ad_id: Set(ad_id.to_string()),
            tag_id: Set(tag.id.clone()),
        });
        AdTag::insert_many(links)
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(tags)
    }

    async fn find_by_slugs<C: ConnectionTrait>(
        conn: &C,
        slugs: &[String],
    ) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Slug.is_in(slugs.to_vec()))
            .order_by_asc(tag::Column::Name)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_tag(id: &str, name: &str) -> tag::Model {
        tag::Model {
            id: id.to_string(),
            name: name.to_string(),
            slug: tag::slugify(name),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_by_ad() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_tag("t1", "bikes")]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let tags = repo.find_by_ad("ad1").await.unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].slug, "bikes");
    }

    #[tokio::test]
    async fn test_set_for_ad_with_no_names_clears_links() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(2)])
                .into_connection(),
        );

        let repo = TagRepository::new(db.clone());
        let tags = repo.set_for_ad(db.as_ref(), "ad1", &[]).await.unwrap();

        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_set_for_ad_links_existing_and_new_tags() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0), exec(1), exec(2)])
                .append_query_results([vec![create_test_tag("t1", "bikes")]])
                .append_query_results([vec![
                    create_test_tag("t1", "bikes"),
                    create_test_tag("t2", "vintage"),
                ]])
                .into_connection(),
        );

        let repo = TagRepository::new(db.clone());
        let names = vec!["bikes".to_string(), "vintage".to_string()];
        let tags = repo.set_for_ad(db.as_ref(), "ad1", &names).await.unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].name, "vintage");
    }

    #[tokio::test]
    async fn test_set_for_ad_collapses_names_sharing_a_slug() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0), exec(1)])
                .append_query_results([[create_test_tag("t1", "Garden Tools")]])
                .into_connection(),
        );

        let repo = TagRepository::new(db.clone());
        let names = vec!["garden-tools".to_string(), "Garden tools".to_string()];
        let tags = repo.set_for_ad(db.as_ref(), "ad1", &names).await.unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Garden Tools");

        // Only the slug lookup runs: the stored tag is reused, nothing inserted
        drop(repo);
        let statements: Vec<String> = Arc::try_unwrap(db)
            .unwrap()
            .into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
            .collect();
        assert!(!statements.iter().any(|sql| sql.starts_with(r#"INSERT INTO "tag""#)));
        assert_eq!(
            statements
                .iter()
                .filter(|sql| sql.starts_with(r#"INSERT INTO "ad_tag""#))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_names_by_ads_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = TagRepository::new(db);
        assert!(repo.names_by_ads(&[]).await.unwrap().is_empty());
    }
}
