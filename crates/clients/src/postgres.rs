use sns_common::{define_module_client, ModuleClient};
use sns_core::{Like, Post, User};
use sns_database::init_databases;
use sqlx::PgPool;

init_databases!(
    default: [User, Post, Like]
);

define_module_client! {
    (struct PostgresClient, "postgres")
    client_type: &'static PgPool,
    env: ["DATABASE_URL"],
    setup: async {
        connect(false, true).await
    }
}

impl PostgresClient {
    /// Creates any missing table or index. Safe to run repeatedly.
    pub async fn create_schema(&self) -> anyhow::Result<()> {
        create_tables(self.get_client()).await
    }

    /// Drops every table (`CASCADE`).
    pub async fn drop_schema(&self) -> anyhow::Result<()> {
        drop_tables(self.get_client()).await
    }
}
