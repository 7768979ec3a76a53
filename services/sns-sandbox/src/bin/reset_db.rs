use anyhow::Result;
use sns_clients::PostgresClient;
use sns_common::ModuleClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let db = PostgresClient::setup_connection().await?;
    db.drop_schema().await?;

    println!("Database reset successfully");
    Ok(())
}
