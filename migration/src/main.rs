use sea_orm_migration::prelude::*;

/// Standalone migration runner (`cargo run -p migration -- up`).
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(migration::Migrator).await;
}
