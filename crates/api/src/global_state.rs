use std::sync::Arc;

use anyhow::Result;
use sns_clients::{IconBucketClient, PostgresClient};
use sns_common::{EnvVars, ModuleClient};
use sns_core::IconStore;

use crate::env::IdentityEnv;
use crate::identity::IdentityVerifier;

#[derive(Clone)]
pub struct GlobalState {
    pub db: PostgresClient,
    pub icons: Arc<dyn IconStore>,
    pub verifier: Arc<IdentityVerifier>,
}

impl GlobalState {
    pub async fn new() -> Result<Self> {
        let db = PostgresClient::setup_connection().await?;
        let icons = IconBucketClient::setup_connection().await?;
        tracing::info!(bucket = icons.bucket_name(), "icon bucket ready");

        let http_client = reqwest::Client::new();
        let verifier = IdentityVerifier::from_env(&IdentityEnv::load()?, &http_client).await?;

        Ok(Self::from_parts(db, Arc::new(icons), verifier))
    }

    pub fn from_parts(db: PostgresClient, icons: Arc<dyn IconStore>, verifier: IdentityVerifier) -> Self {
        Self {
            db,
            icons,
            verifier: Arc::new(verifier),
        }
    }
}
