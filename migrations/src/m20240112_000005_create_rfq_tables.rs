use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // request_for_quotations
        manager
            .create_table(
                Table::create()
                    .table(RequestForQuotations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestForQuotations::Id)
                            .string_len(16)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequestForQuotations::VendorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestForQuotations::Status)
                            .string_len(32)
                            .not_null()
                            .default("awaiting"),
                    )
                    .col(ColumnDef::new(RequestForQuotations::ExpiryDate).date())
                    .col(
                        ColumnDef::new(RequestForQuotations::IsHidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RequestForQuotations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestForQuotations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfqs_vendor")
                            .from(RequestForQuotations::Table, RequestForQuotations::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rfqs_status")
                    .table(RequestForQuotations::Table)
                    .col(RequestForQuotations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rfqs_vendor_id")
                    .table(RequestForQuotations::Table)
                    .col(RequestForQuotations::VendorId)
                    .to_owned(),
            )
            .await?;

        // rfq_items
        manager
            .create_table(
                Table::create()
                    .table(RfqItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RfqItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(RfqItems::RfqId).string_len(16).not_null())
                    .col(ColumnDef::new(RfqItems::ProductId).uuid().not_null())
                    .col(ColumnDef::new(RfqItems::Description).text())
                    .col(ColumnDef::new(RfqItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(RfqItems::EstimatedUnitPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RfqItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_items_rfq")
                            .from(RfqItems::Table, RfqItems::RfqId)
                            .to(RequestForQuotations::Table, RequestForQuotations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_items_product")
                            .from(RfqItems::Table, RfqItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rfq_items_rfq_id")
                    .table(RfqItems::Table)
                    .col(RfqItems::RfqId)
                    .to_owned(),
            )
            .await?;

        // rfq_vendor_quotes
        manager
            .create_table(
                Table::create()
                    .table(RfqVendorQuotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RfqVendorQuotes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RfqVendorQuotes::RfqId)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RfqVendorQuotes::VendorId).uuid().not_null())
                    .col(
                        ColumnDef::new(RfqVendorQuotes::IsHidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RfqVendorQuotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RfqVendorQuotes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_vendor_quotes_rfq")
                            .from(RfqVendorQuotes::Table, RfqVendorQuotes::RfqId)
                            .to(RequestForQuotations::Table, RequestForQuotations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_vendor_quotes_vendor")
                            .from(RfqVendorQuotes::Table, RfqVendorQuotes::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rfq_vendor_quotes_rfq_id")
                    .table(RfqVendorQuotes::Table)
                    .col(RfqVendorQuotes::RfqId)
                    .to_owned(),
            )
            .await?;

        // rfq_vendor_quote_items
        manager
            .create_table(
                Table::create()
                    .table(RfqVendorQuoteItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RfqVendorQuoteItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RfqVendorQuoteItems::QuoteId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RfqVendorQuoteItems::ProductId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RfqVendorQuoteItems::Description).text())
                    .col(
                        ColumnDef::new(RfqVendorQuoteItems::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RfqVendorQuoteItems::EstimatedUnitPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RfqVendorQuoteItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_vendor_quote_items_quote")
                            .from(RfqVendorQuoteItems::Table, RfqVendorQuoteItems::QuoteId)
                            .to(RfqVendorQuotes::Table, RfqVendorQuotes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_vendor_quote_items_product")
                            .from(RfqVendorQuoteItems::Table, RfqVendorQuoteItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rfq_vendor_quote_items_quote_id")
                    .table(RfqVendorQuoteItems::Table)
                    .col(RfqVendorQuoteItems::QuoteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RfqVendorQuoteItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RfqVendorQuotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RfqItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RequestForQuotations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RequestForQuotations {
    Table,
    Id,
    VendorId,
    Status,
    ExpiryDate,
    IsHidden,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RfqItems {
    Table,
    Id,
    RfqId,
    ProductId,
    Description,
    Quantity,
    EstimatedUnitPrice,
    CreatedAt,
}

#[derive(Iden)]
enum RfqVendorQuotes {
    Table,
    Id,
    RfqId,
    VendorId,
    IsHidden,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RfqVendorQuoteItems {
    Table,
    Id,
    QuoteId,
    ProductId,
    Description,
    Quantity,
    EstimatedUnitPrice,
    CreatedAt,
}

#[derive(Iden)]
enum Vendors {
    Table,
    Id,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}
