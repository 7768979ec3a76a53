use reqwest::Method;
use sns_core::ProfileBody;

use crate::cache::PROFILE;
use crate::{ApiClient, CacheKey, ClientError};

impl ApiClient {
    /// Profile text of `username`, `""` when never set.
    pub async fn get_profile(&self, username: &str) -> Result<String, ClientError> {
        let body: ProfileBody = self.cache().get_or_fetch(CacheKey::new(PROFILE, username), async {
            let request = self.request(Method::GET, &["api", "profiles", username])?;
            self.send_json(request, "get profile").await
        }).await?;
        Ok(body.profile)
    }

    pub async fn update_profile(&self, profile: &str) -> Result<String, ClientError> {
        self.update_profile_with(profile, |_| {}).await
    }

    pub async fn update_profile_with(
        &self,
        profile: &str,
        on_success: impl FnOnce(&str),
    ) -> Result<String, ClientError> {
        let username = self.require_session()?.username.clone();
        let request = self.request(Method::PUT, &["api", "profiles"])?.json(&ProfileBody { profile: profile.to_string() });
        let body: ProfileBody = self.send_json(request, "update profile").await?;

        self.cache().insert(CacheKey::new(PROFILE, username), &body).await?;
        on_success(&body.profile);
        Ok(body.profile)
    }
}
