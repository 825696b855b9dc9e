//! Create tag and ad_tag tables migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_ad_table::Ad;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create tag table
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tag::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Tag::Name).string_len(100).not_null().unique_key())
                    .col(ColumnDef::new(Tag::Slug).string_len(100).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // Create ad_tag table
        manager
            .create_table(
                Table::create()
                    .table(AdTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdTag::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(AdTag::AdId).string_len(32).not_null())
                    .col(ColumnDef::new(AdTag::TagId).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_tag_ad")
                            .from(AdTag::Table, AdTag::AdId)
                            .to(Ad::Table, Ad::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_tag_tag")
                            .from(AdTag::Table, AdTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (ad_id, tag_id) - a tag is attached to an ad once
        manager
            .create_index(
                Index::create()
                    .name("idx_ad_tag_unique")
                    .table(AdTag::Table)
                    .col(AdTag::AdId)
                    .col(AdTag::TagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdTag::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(Iden)]
enum AdTag {
    Table,
    Id,
    AdId,
    TagId,
}
