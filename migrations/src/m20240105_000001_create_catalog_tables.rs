use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // units_of_measure
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

        // departments
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

        // product_categories
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

        // vendor_categories
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

#[derive(Iden)]
enum UnitsOfMeasure {
    Table,
    Id,
    Name,
    Description,
    IsHidden,
    CreatedAt,
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    Name,
    IsHidden,
    CreatedAt,
}

#[derive(Iden)]
enum ProductCategories {
    Table,
    Id,
    Name,
    Description,
    IsHidden,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum VendorCategories {
    Table,
    Id,
    Name,
    Description,
    IsHidden,
    CreatedAt,
    UpdatedAt,
}
