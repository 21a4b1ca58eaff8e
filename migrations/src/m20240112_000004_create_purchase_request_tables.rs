use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

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
                    .col(ColumnDef::new(PurchaseRequests::RequesterId).uuid().not_null())
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
                            .from(PurchaseRequests::Table, PurchaseRequests::SuggestedVendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
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
                            .from(PurchaseRequestItems::Table, PurchaseRequestItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
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

#[derive(Iden)]
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

#[derive(Iden)]
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

#[derive(Iden)]
enum Departments {
    Table,
    Id,
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
