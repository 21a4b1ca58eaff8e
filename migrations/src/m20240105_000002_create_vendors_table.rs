use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

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
                    .name("idx_vendors_category_id")
                    .table(Vendors::Table)
                    .col(Vendors::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
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

#[derive(Iden)]
enum Vendors {
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

#[derive(Iden)]
enum VendorCategories {
    Table,
    Id,
}
