//! Create ad table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ad::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ad::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Ad::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Ad::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Ad::Price).decimal_len(7, 2))
                    .col(ColumnDef::new(Ad::Text).text().not_null())
                    .col(ColumnDef::new(Ad::Picture).binary())
                    .col(ColumnDef::new(Ad::ContentType).string_len(256))
                    .col(
                        ColumnDef::new(Ad::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Ad::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_user")
                            .from(Ad::Table, Ad::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (ownership-scoped lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_ad_user_id")
                    .table(Ad::Table)
                    .col(Ad::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: updated_at (recency ordering of the listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_ad_updated_at")
                    .table(Ad::Table)
                    .col(Ad::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ad::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Ad {
    Table,
    Id,
    UserId,
    Title,
    Price,
    Text,
    Picture,
    ContentType,
    CreatedAt,
    UpdatedAt,
}
