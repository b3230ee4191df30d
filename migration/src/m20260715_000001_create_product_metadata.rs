use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create product_metadata table
        manager
            .create_table(
                Table::create()
                    .table(ProductMetadata::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductMetadata::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductMetadata::TransactionHash)
                            .string_len(66)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductMetadata::Manufacturer)
                            .string_len(42)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductMetadata::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductMetadata::BatchId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductMetadata::Wholesaler)
                            .string_len(42)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductMetadata::Retailer)
                            .string_len(42)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductMetadata::Description).text().null())
                    .col(
                        ColumnDef::new(ProductMetadata::CreatedAt)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductMetadata::QrCode).text().not_null())
                    .col(
                        ColumnDef::new(ProductMetadata::ProductId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProductMetadata::StoredAt)
                            .timestamp_with_time_zone()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // Resolution looks records up by creation transaction hash
        manager
            .create_index(
                Index::create()
                    .name("idx_product_metadata_transaction_hash")
                    .table(ProductMetadata::Table)
                    .col(ProductMetadata::TransactionHash)
                    .to_owned(),
            )
            .await?;

        // Reconciliation bulk-fetches by manufacturer
        manager
            .create_index(
                Index::create()
                    .name("idx_product_metadata_manufacturer")
                    .table(ProductMetadata::Table)
                    .col(ProductMetadata::Manufacturer)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_metadata_batch_id")
                    .table(ProductMetadata::Table)
                    .col(ProductMetadata::BatchId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductMetadata::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductMetadata {
    Table,
    Id,
    TransactionHash,
    Manufacturer,
    Name,
    BatchId,
    Wholesaler,
    Retailer,
    Description,
    CreatedAt,
    QrCode,
    ProductId,
    StoredAt,
}
