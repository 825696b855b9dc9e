//! Create fav table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;
use super::m20250101_000002_create_ad_table::Ad;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fav::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Fav::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Fav::AdId).string_len(32).not_null())
                    .col(ColumnDef::new(Fav::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Fav::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fav_ad")
                            .from(Fav::Table, Fav::AdId)
                            .to(Ad::Table, Ad::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fav_user")
                            .from(Fav::Table, Fav::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (ad_id, user_id) - a user can favorite an ad only once
        manager
            .create_index(
                Index::create()
                    .name("idx_fav_ad_user_unique")
                    .table(Fav::Table)
                    .col(Fav::AdId)
                    .col(Fav::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: user_id (favorites of a user)
        manager
            .create_index(
                Index::create()
                    .name("idx_fav_user_id")
                    .table(Fav::Table)
                    .col(Fav::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Fav::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Fav {
    Table,
    Id,
    AdId,
    UserId,
    CreatedAt,
}
