pub use sea_orm_migration::prelude::*;

mod m20240105_000001_create_catalog_tables;
mod m20240105_000002_create_vendors_table;
mod m20240105_000003_create_products_table;
mod m20240112_000004_create_purchase_request_tables;
mod m20240112_000005_create_rfq_tables;
mod m20240112_000006_create_purchase_order_tables;
mod m20240119_000007_create_document_sequences_table;
mod m20240126_000008_create_tenant_auth_tables;

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
