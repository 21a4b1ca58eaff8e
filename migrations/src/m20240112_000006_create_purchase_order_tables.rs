use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // purchase_orders
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .string_len(16)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::VendorId).uuid().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::Status)
                            .string_len(32)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::IsHidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_orders_vendor")
                            .from(PurchaseOrders::Table, PurchaseOrders::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_status")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_vendor_id")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::VendorId)
                    .to_owned(),
            )
            .await?;

        // purchase_order_items
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrderItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrderItems::PurchaseOrderId)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrderItems::ProductId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrderItems::Description).text())
                    .col(
                        ColumnDef::new(PurchaseOrderItems::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrderItems::EstimatedUnitPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrderItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_items_order")
                            .from(
                                PurchaseOrderItems::Table,
                                PurchaseOrderItems::PurchaseOrderId,
                            )
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_items_product")
                            .from(PurchaseOrderItems::Table, PurchaseOrderItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_order_items_order_id")
                    .table(PurchaseOrderItems::Table)
                    .col(PurchaseOrderItems::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        // po_vendor_quotes
        manager
            .create_table(
                Table::create()
                    .table(PoVendorQuotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PoVendorQuotes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PoVendorQuotes::PurchaseOrderId)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PoVendorQuotes::VendorId).uuid().not_null())
                    .col(
                        ColumnDef::new(PoVendorQuotes::IsHidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PoVendorQuotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PoVendorQuotes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_po_vendor_quotes_order")
                            .from(PoVendorQuotes::Table, PoVendorQuotes::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_po_vendor_quotes_vendor")
                            .from(PoVendorQuotes::Table, PoVendorQuotes::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_po_vendor_quotes_order_id")
                    .table(PoVendorQuotes::Table)
                    .col(PoVendorQuotes::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        // po_vendor_quote_items
        manager
            .create_table(
                Table::create()
                    .table(PoVendorQuoteItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PoVendorQuoteItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PoVendorQuoteItems::QuoteId).uuid().not_null())
                    .col(
                        ColumnDef::new(PoVendorQuoteItems::ProductId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PoVendorQuoteItems::Description).text())
                    .col(
                        ColumnDef::new(PoVendorQuoteItems::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PoVendorQuoteItems::EstimatedUnitPrice)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PoVendorQuoteItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_po_vendor_quote_items_quote")
                            .from(PoVendorQuoteItems::Table, PoVendorQuoteItems::QuoteId)
                            .to(PoVendorQuotes::Table, PoVendorQuotes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_po_vendor_quote_items_product")
                            .from(PoVendorQuoteItems::Table, PoVendorQuoteItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_po_vendor_quote_items_quote_id")
                    .table(PoVendorQuoteItems::Table)
                    .col(PoVendorQuoteItems::QuoteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PoVendorQuoteItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PoVendorQuotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PurchaseOrders {
    Table,
    Id,
    VendorId,
    Status,
    IsHidden,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PurchaseOrderItems {
    Table,
    Id,
    PurchaseOrderId,
    ProductId,
    Description,
    Quantity,
    EstimatedUnitPrice,
    CreatedAt,
}

#[derive(Iden)]
enum PoVendorQuotes {
    Table,
    Id,
    PurchaseOrderId,
    VendorId,
    IsHidden,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PoVendorQuoteItems {
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
