pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_user_table;
mod m20261019_000002_create_role_table;
mod m20261019_000003_create_cart_table;
mod m20261019_000004_create_location_table;
mod m20261019_000005_create_customer_table;
mod m20261019_000006_create_participant_table;
mod m20261019_000007_create_note_table;
mod m20261019_000008_create_contact_table;
mod m20261019_000009_create_post_table;
mod m20261019_000010_create_block_table;
mod m20261019_000011_create_voucher_table;
mod m20261019_000012_create_alternate_email_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_user_table::Migration),
            Box::new(m20261019_000002_create_role_table::Migration),
            Box::new(m20261019_000003_create_cart_table::Migration),
            Box::new(m20261019_000004_create_location_table::Migration),
            Box::new(m20261019_000005_create_customer_table::Migration),
            Box::new(m20261019_000006_create_participant_table::Migration),
            Box::new(m20261019_000007_create_note_table::Migration),
            Box::new(m20261019_000008_create_contact_table::Migration),
            Box::new(m20261019_000009_create_post_table::Migration),
            Box::new(m20261019_000010_create_block_table::Migration),
            Box::new(m20261019_000011_create_voucher_table::Migration),
            Box::new(m20261019_000012_create_alternate_email_table::Migration),
        ]
    }
}
