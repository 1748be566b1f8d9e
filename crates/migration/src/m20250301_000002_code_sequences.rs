use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One counter per tenant, code prefix and year (0 for yearless codes)
        manager
            .create_table(
                Table::create()
                    .table(CodeSequences::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CodeSequences::TenantId).string().not_null())
                    .col(ColumnDef::new(CodeSequences::Prefix).string().not_null())
                    .col(ColumnDef::new(CodeSequences::Year).integer().not_null())
                    .col(
                        ColumnDef::new(CodeSequences::LastValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(CodeSequences::TenantId)
                            .col(CodeSequences::Prefix)
                            .col(CodeSequences::Year),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CodeSequences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CodeSequences {
    Table,
    TenantId,
    Prefix,
    Year,
    LastValue,
}
