//! Create report table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Report::PhoneKey).string_len(64).not_null())
                    .col(ColumnDef::new(Report::Reason).string_len(128).not_null())
                    .col(ColumnDef::new(Report::CustomReason).string_len(500))
                    .col(ColumnDef::new(Report::ReporterIp).string_len(45))
                    .col(ColumnDef::new(Report::ReporterUserAgent).text())
                    .col(ColumnDef::new(Report::ReporterCountry).string_len(8))
                    .col(ColumnDef::new(Report::ReporterCity).string_len(128))
                    .col(ColumnDef::new(Report::ReporterTimezone).string_len(64))
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: phone_key (the lookup path for /check)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_phone_key")
                    .table(Report::Table)
                    .col(Report::PhoneKey)
                    .to_owned(),
            )
            .await?;

        // Index: (phone_key, created_at) for the 24h dedup probe
        manager
            .create_index(
                Index::create()
                    .name("idx_report_phone_key_created_at")
                    .table(Report::Table)
                    .col(Report::PhoneKey)
                    .col(Report::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
    PhoneKey,
    Reason,
    CustomReason,
    ReporterIp,
    ReporterUserAgent,
    ReporterCountry,
    ReporterCity,
    ReporterTimezone,
    CreatedAt,
}
