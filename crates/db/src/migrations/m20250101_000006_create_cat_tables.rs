//! Create breed and cat tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create breed table
        manager
            .create_table(
                Table::create()
                    .table(Breed::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Breed::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Breed::Name).string_len(200).not_null())
                    .to_owned(),
            )
            .await?;

        // Create cat table
        manager
            .create_table(
                Table::create()
                    .table(Cat::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cat::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Cat::Nickname).string_len(200).not_null())
                    .col(ColumnDef::new(Cat::Weight).integer().not_null())
                    .col(ColumnDef::new(Cat::Foods).string_len(300).not_null())
                    .col(ColumnDef::new(Cat::BreedId).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cat_breed")
                            .from(Cat::Table, Cat::BreedId)
                            .to(Breed::Table, Breed::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: breed_id
        manager
            .create_index(
                Index::create()
                    .name("idx_cat_breed_id")
                    .table(Cat::Table)
                    .col(Cat::BreedId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cat::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Breed::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Breed {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Cat {
    Table,
    Id,
    Nickname,
    Weight,
    Foods,
    BreedId,
}
