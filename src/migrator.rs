use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240105_000001_create_catalog_tables::Migration),
            Box::new(m20240105_000002_create_vendors_table::Migration),
            Box::new(m20240105_000003_create_products_table::Migration),
            Box::new(m20240112_000004_create_purchase_request_tables::Migration),
            Box::new(m20240112_000005_create_rfq_tables::Migration),
            Box::new(m20240112_000006_create_purchase_order_tables::Migration),
            Box::new(m20240119_000007_create_document_sequences_table::Migration),
            Box::new(m20240126_000008_create_tenant_auth_tables::Migration),
        ]
    }
}

// Migration implementations mirror the standalone `migrations` crate so
// auto-migrate on startup and the CLI runner produce the same schema.

mod m20240105_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240105_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(UnitsOfMeasure::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UnitsOfMeasure::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(UnitsOfMeasure::Name)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(ColumnDef::new(UnitsOfMeasure::Description).text())
                        .col(
                            ColumnDef::new(UnitsOfMeasure::IsHidden)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(UnitsOfMeasure::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Departments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Departments::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Departments::Name).string_len(255).not_null())
                        .col(
                            ColumnDef::new(Departments::IsHidden)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Departments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductCategories::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductCategories::Name)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductCategories::Description).text())
                        .col(
                            ColumnDef::new(ProductCategories::IsHidden)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ProductCategories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductCategories::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(VendorCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VendorCategories::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(VendorCategories::Name)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(ColumnDef::new(VendorCategories::Description).text())
                        .col(
                            ColumnDef::new(VendorCategories::IsHidden)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(VendorCategories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorCategories::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VendorCategories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductCategories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Departments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(UnitsOfMeasure::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum UnitsOfMeasure {
        Table,
        Id,
        Name,
        Description,
        IsHidden,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Departments {
        Table,
        Id,
        Name,
        IsHidden,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductCategories {
        Table,
        Id,
        Name,
        Description,
        IsHidden,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum VendorCategories {
        Table,
        Id,
        Name,
        Description,
        IsHidden,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240105_000002_create_vendors_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240105_000002_create_vendors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vendors::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Vendors::Id).uuid().not_null().primary_key())
                        .col(
                            ColumnDef::new(Vendors::CompanyName)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Vendors::CategoryId).uuid())
                        .col(ColumnDef::new(Vendors::Email).string_len(255).not_null())
                        .col(ColumnDef::new(Vendors::Address).text())
                        .col(ColumnDef::new(Vendors::Phone).string_len(64))
                        .col(
                            ColumnDef::new(Vendors::IsHidden)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Vendors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vendors::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vendors_category")
                                .from(Vendors::Table, Vendors::CategoryId)
                                .to(VendorCategories::Table, VendorCategories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vendors_category_id")
                        .table(Vendors::Table)
                        .col(Vendors::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vendors_is_hidden")
                        .table(Vendors::Table)
                        .col(Vendors::IsHidden)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vendors::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Vendors {
        Table,
        Id,
        CompanyName,
        CategoryId,
        Email,
        Address,
        Phone,
        IsHidden,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum VendorCategories {
        Table,
        Id,
    }
}

mod m20240105_000003_create_products_table {
    use super::m20240105_000002_create_vendors_table::Vendors;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240105_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Products::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Products::UnitId).uuid())
                        .col(
                            ColumnDef::new(Products::ProductType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::CategoryId).uuid())
                        .col(ColumnDef::new(Products::VendorId).uuid().not_null())
                        .col(ColumnDef::new(Products::CostPrice).decimal().not_null())
                        .col(ColumnDef::new(Products::SellingPrice).decimal().not_null())
                        .col(
                            ColumnDef::new(Products::IsHidden)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_unit")
                                .from(Products::Table, Products::UnitId)
                                .to(UnitsOfMeasure::Table, UnitsOfMeasure::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(ProductCategories::Table, ProductCategories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_vendor")
                                .from(Products::Table, Products::VendorId)
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_vendor_id")
                        .table(Products::Table)
                        .col(Products::VendorId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category_id")
                        .table(Products::Table)
                        .col(Products::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_is_hidden")
                        .table(Products::Table)
                        .col(Products::IsHidden)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Name,
        UnitId,
        ProductType,
        CategoryId,
        VendorId,
        CostPrice,
        SellingPrice,
        IsHidden,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum UnitsOfMeasure {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum ProductCategories {
        Table,
        Id,
    }
}

mod m20240112_000004_create_purchase_request_tables {
    use super::m20240105_000002_create_vendors_table::Vendors;
    use super::m20240105_000003_create_products_table::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240112_000004_create_purchase_request_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseRequests::Id)
                                .string_len(16)
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequests::RequesterId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseRequests::DepartmentId).uuid())
                        .col(
                            ColumnDef::new(PurchaseRequests::Status)
                                .string_len(32)
                                .not_null()
                                .default("draft"),
                        )
                        .col(ColumnDef::new(PurchaseRequests::Purpose).text())
                        .col(ColumnDef::new(PurchaseRequests::SuggestedVendorId).uuid())
                        .col(
                            ColumnDef::new(PurchaseRequests::IsHidden)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequests::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_requests_department")
                                .from(PurchaseRequests::Table, PurchaseRequests::DepartmentId)
                                .to(Departments::Table, Departments::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_requests_suggested_vendor")
                                .from(
                                    PurchaseRequests::Table,
                                    PurchaseRequests::SuggestedVendorId,
                                )
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_requests_status")
                        .table(PurchaseRequests::Table)
                        .col(PurchaseRequests::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseRequestItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseRequestItems::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequestItems::PurchaseRequestId)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequestItems::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseRequestItems::Description).text())
                        .col(
                            ColumnDef::new(PurchaseRequestItems::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequestItems::EstimatedUnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseRequestItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_request_items_request")
                                .from(
                                    PurchaseRequestItems::Table,
                                    PurchaseRequestItems::PurchaseRequestId,
                                )
                                .to(PurchaseRequests::Table, PurchaseRequests::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_request_items_product")
                                .from(
                                    PurchaseRequestItems::Table,
                                    PurchaseRequestItems::ProductId,
                                )
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_request_items_request_id")
                        .table(PurchaseRequestItems::Table)
                        .col(PurchaseRequestItems::PurchaseRequestId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseRequestItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseRequests::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseRequests {
        Table,
        Id,
        RequesterId,
        DepartmentId,
        Status,
        Purpose,
        SuggestedVendorId,
        IsHidden,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseRequestItems {
        Table,
        Id,
        PurchaseRequestId,
        ProductId,
        Description,
        Quantity,
        EstimatedUnitPrice,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Departments {
        Table,
        Id,
    }
}

mod m20240112_000005_create_rfq_tables {
    use super::m20240105_000002_create_vendors_table::Vendors;
    use super::m20240105_000003_create_products_table::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240112_000005_create_rfq_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
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
                                .from(
                                    RequestForQuotations::Table,
                                    RequestForQuotations::VendorId,
                                )
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rfqs_status")
                        .table(RequestForQuotations::Table)
                        .col(RequestForQuotations::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rfqs_vendor_id")
                        .table(RequestForQuotations::Table)
                        .col(RequestForQuotations::VendorId)
                        .to_owned(),
                )
                .await?;

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
                        .if_not_exists()
                        .name("idx_rfq_items_rfq_id")
                        .table(RfqItems::Table)
                        .col(RfqItems::RfqId)
                        .to_owned(),
                )
                .await?;

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
                        .if_not_exists()
                        .name("idx_rfq_vendor_quotes_rfq_id")
                        .table(RfqVendorQuotes::Table)
                        .col(RfqVendorQuotes::RfqId)
                        .to_owned(),
                )
                .await?;

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
                                .from(
                                    RfqVendorQuoteItems::Table,
                                    RfqVendorQuoteItems::ProductId,
                                )
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
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

    #[derive(DeriveIden)]
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

    #[derive(DeriveIden)]
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

    #[derive(DeriveIden)]
    enum RfqVendorQuotes {
        Table,
        Id,
        RfqId,
        VendorId,
        IsHidden,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
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
}

mod m20240112_000006_create_purchase_order_tables {
    use super::m20240105_000002_create_vendors_table::Vendors;
    use super::m20240105_000003_create_products_table::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240112_000006_create_purchase_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
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
                        .if_not_exists()
                        .name("idx_purchase_orders_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_vendor_id")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::VendorId)
                        .to_owned(),
                )
                .await?;

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
                                .from(
                                    PurchaseOrderItems::Table,
                                    PurchaseOrderItems::ProductId,
                                )
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_order_items_order_id")
                        .table(PurchaseOrderItems::Table)
                        .col(PurchaseOrderItems::PurchaseOrderId)
                        .to_owned(),
                )
                .await?;

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
                        .if_not_exists()
                        .name("idx_po_vendor_quotes_order_id")
                        .table(PoVendorQuotes::Table)
                        .col(PoVendorQuotes::PurchaseOrderId)
                        .to_owned(),
                )
                .await?;

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
                        .col(
                            ColumnDef::new(PoVendorQuoteItems::QuoteId)
                                .uuid()
                                .not_null(),
                        )
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
                                .from(
                                    PoVendorQuoteItems::Table,
                                    PoVendorQuoteItems::ProductId,
                                )
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
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

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        Id,
        VendorId,
        Status,
        IsHidden,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
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

    #[derive(DeriveIden)]
    enum PoVendorQuotes {
        Table,
        Id,
        PurchaseOrderId,
        VendorId,
        IsHidden,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
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
}

mod m20240119_000007_create_document_sequences_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240119_000007_create_document_sequences_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // One row per document type; claimed inside the same transaction that
            // inserts the document so numbering stays gapless.
            manager
                .create_table(
                    Table::create()
                        .table(DocumentSequences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DocumentSequences::DocType)
                                .string_len(8)
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DocumentSequences::NextValue)
                                .big_integer()
                                .not_null()
                                .default(1),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DocumentSequences::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DocumentSequences {
        Table,
        DocType,
        NextValue,
    }
}

mod m20240126_000008_create_tenant_auth_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240126_000008_create_tenant_auth_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Users::Name).string_len(255).not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string_len(255)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(
                            ColumnDef::new(Users::EmailVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Tenants::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Tenants::Id).uuid().not_null().primary_key())
                        .col(
                            ColumnDef::new(Tenants::CompanyName)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Tenants::SchemaName)
                                .string_len(63)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Tenants::OwnerUserId).uuid().not_null())
                        .col(
                            ColumnDef::new(Tenants::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tenants_owner_user")
                                .from(Tenants::Table, Tenants::OwnerUserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TenantDomains::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TenantDomains::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TenantDomains::TenantId).uuid().not_null())
                        .col(
                            ColumnDef::new(TenantDomains::Domain)
                                .string_len(255)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(TenantDomains::IsPrimary)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(TenantDomains::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tenant_domains_tenant")
                                .from(TenantDomains::Table, TenantDomains::TenantId)
                                .to(Tenants::Table, Tenants::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tenant_domains_tenant_id")
                        .table(TenantDomains::Table)
                        .col(TenantDomains::TenantId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RefreshTokens::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RefreshTokens::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RefreshTokens::UserId).uuid().not_null())
                        .col(
                            ColumnDef::new(RefreshTokens::TokenId)
                                .string_len(255)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(RefreshTokens::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RefreshTokens::ExpiresAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RefreshTokens::Revoked)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_refresh_tokens_user")
                                .from(RefreshTokens::Table, RefreshTokens::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_refresh_tokens_user_id")
                        .table(RefreshTokens::Table)
                        .col(RefreshTokens::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PasswordResetTokens::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PasswordResetTokens::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PasswordResetTokens::UserId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PasswordResetTokens::TokenHash)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PasswordResetTokens::ExpiresAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PasswordResetTokens::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PasswordResetTokens::UsedAt)
                                .timestamp_with_time_zone(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_password_reset_tokens_user")
                                .from(PasswordResetTokens::Table, PasswordResetTokens::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_password_reset_tokens_user_id")
                        .table(PasswordResetTokens::Table)
                        .col(PasswordResetTokens::UserId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PasswordResetTokens::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RefreshTokens::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TenantDomains::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Tenants::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        EmailVerified,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Tenants {
        Table,
        Id,
        CompanyName,
        SchemaName,
        OwnerUserId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum TenantDomains {
        Table,
        Id,
        TenantId,
        Domain,
        IsPrimary,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum RefreshTokens {
        Table,
        Id,
        UserId,
        TokenId,
        CreatedAt,
        ExpiresAt,
        Revoked,
    }

    #[derive(DeriveIden)]
    enum PasswordResetTokens {
        Table,
        Id,
        UserId,
        TokenHash,
        ExpiresAt,
        CreatedAt,
        UsedAt,
    }
}
