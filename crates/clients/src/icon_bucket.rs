use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Builder as S3ConfigBuilder, Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    Client as S3Client,
};
use sns_common::{define_module_client, icon_object_key, optional_env_var, required_env_var, ModuleClient};
use sns_core::{IconStore, SnsError};

/// S3 client bound to the icon bucket.
#[derive(Debug, Clone)]
pub struct IconBucket {
    pub s3: S3Client,
    pub bucket: String,
}

impl IconBucket {
    /// With `S3_ENDPOINT` set, talks to that endpoint with static credentials and
    /// path-style addressing (local emulators). Otherwise uses the default AWS chain.
    pub async fn from_env() -> Result<Self> {
        let region = Region::new(required_env_var("AWS_REGION")?);
        let bucket = required_env_var("S3_BUCKET_ICONS")?;

        let s3 = match optional_env_var("S3_ENDPOINT") {
            Some(endpoint_url) => {
                let credentials = Credentials::new(
                    required_env_var("S3_ACCESS_KEY_ID")?,
                    required_env_var("S3_SECRET_ACCESS_KEY")?,
                    None,
                    None,
                    "sns-icon-bucket",
                );

                let s3_config = S3ConfigBuilder::new()
                    .endpoint_url(endpoint_url)
                    .credentials_provider(credentials)
                    .region(region)
                    .force_path_style(true)
                    .behavior_version(BehaviorVersion::latest())
                    .build();

                S3Client::from_conf(s3_config)
            }
            None => {
                let shared_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await;
                S3Client::new(&shared_config)
            }
        };

        Ok(Self { s3, bucket })
    }
}

define_module_client! {
    (struct IconBucketClient, "icon_bucket")
    client_type: IconBucket,
    env: ["AWS_REGION", "S3_BUCKET_ICONS"],
    setup: async {
        IconBucket::from_env().await
    }
}

impl IconBucketClient {
    pub fn bucket_name(&self) -> &str {
        &self.get_client().bucket
    }
}

#[async_trait]
impl IconStore for IconBucketClient {
    async fn get_icon(&self, username: &str) -> Result<String, SnsError> {
        let key = icon_object_key(username);
        let bucket = self.get_client();

        let output = match bucket.s3.get_object().bucket(&bucket.bucket).key(&key).send().await {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Ok(String::new());
            }
            Err(err) => {
                return Err(SnsError::Storage(format!(
                    "Failed to get icon {}/{}: {}",
                    bucket.bucket, key, DisplayErrorContext(&err)
                )));
            }
        };

        let bytes = output.body.collect().await
            .map_err(|e| SnsError::Storage(format!("Failed to read icon {}/{}: {}", bucket.bucket, key, e)))?
            .into_bytes();

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn put_icon(&self, username: &str, icon_image: &str) -> Result<(), SnsError> {
        let key = icon_object_key(username);
        let bucket = self.get_client();

        bucket.s3
            .put_object()
            .bucket(&bucket.bucket)
            .key(&key)
            .body(ByteStream::from(icon_image.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| SnsError::Storage(format!(
                "Failed to put icon {}/{}: {}",
                bucket.bucket, key, DisplayErrorContext(&e)
            )))?;

        tracing::debug!(username, key = %key, "stored icon");
        Ok(())
    }
}
