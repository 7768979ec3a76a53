use anyhow::Result;
use sns_clients::PostgresClient;
use sns_common::ModuleClient;

/// Creates the schema. Pass `--drop` to drop every table first.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let drop_first = std::env::args().any(|arg| arg == "--drop");
    let db = PostgresClient::setup_connection().await?;

    if drop_first {
        db.drop_schema().await?;
        println!("Dropped all tables");
    }

    db.create_schema().await?;
    println!("Database initialized successfully");
    Ok(())
}
