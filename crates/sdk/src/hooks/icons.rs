use reqwest::Method;
use sns_core::IconBody;

use crate::cache::{ICON, OWNER_POSTS, POSTS};
use crate::{ApiClient, CacheKey, ClientError};

impl ApiClient {
    pub async fn get_icon(&self, username: &str) -> Result<String, ClientError> {
        let body: IconBody = self.cache().get_or_fetch(CacheKey::new(ICON, username), async {
            let request = self.request(Method::GET, &["api", "icons", username])?;
            self.send_json(request, "get icon").await
        }).await?;
        Ok(body.icon_image)
    }

    pub async fn update_icon(&self, icon_image: &str) -> Result<String, ClientError> {
        self.update_icon_with(icon_image, |_| {}).await
    }

    pub async fn update_icon_with(
        &self,
        icon_image: &str,
        on_success: impl FnOnce(&str),
    ) -> Result<String, ClientError> {
        let username = self.require_session()?.username.clone();
        let request = self.request(Method::PUT, &["api", "icons"])?.json(&IconBody { icon_image: icon_image.to_string() });
        let body: IconBody = self.send_json(request, "update icon").await?;

        self.cache().insert(CacheKey::new(ICON, username), &body).await?;
        // Listed posts embed the author's icon.
        self.cache().invalidate_entity(POSTS).await;
        self.cache().invalidate_entity(OWNER_POSTS).await;

        on_success(&body.icon_image);
        Ok(body.icon_image)
    }
}
