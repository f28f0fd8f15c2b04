//! Create deal table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deal::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deal::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Deal::Title).string_len(128).not_null())
                    .col(ColumnDef::new(Deal::Description).text().not_null())
                    .col(ColumnDef::new(Deal::Price).double().not_null())
                    .col(ColumnDef::new(Deal::OriginalPrice).double())
                    .col(ColumnDef::new(Deal::Url).string_len(1024))
                    .col(
                        ColumnDef::new(Deal::Category)
                            .string_len(16)
                            .not_null()
                            .default("Autre"),
                    )
                    .col(
                        ColumnDef::new(Deal::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Deal::Temperature).integer().not_null().default(0))
                    .col(ColumnDef::new(Deal::AuthorId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Deal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Deal::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deal_author")
                            .from(Deal::Table, Deal::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (listing filters on approved, moderation on pending)
        manager
            .create_index(
                Index::create()
                    .name("idx_deal_status")
                    .table(Deal::Table)
                    .col(Deal::Status)
                    .to_owned(),
            )
            .await?;

        // Index: author_id
        manager
            .create_index(
                Index::create()
                    .name("idx_deal_author_id")
                    .table(Deal::Table)
                    .col(Deal::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_deal_created_at")
                    .table(Deal::Table)
                    .col(Deal::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deal::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Deal {
    Table,
    Id,
    Title,
    Description,
    Price,
    OriginalPrice,
    Url,
    Category,
    Status,
    Temperature,
    AuthorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
