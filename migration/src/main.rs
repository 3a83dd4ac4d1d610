use migration::Migrator;
use sea_orm_migration::prelude::*;

/// Standalone migration CLI (`cargo run -p migration -- up`).
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
