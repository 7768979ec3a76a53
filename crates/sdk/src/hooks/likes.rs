use reqwest::Method;
use serde_json::json;
use sns_core::LikeResult;

use crate::{ApiClient, ClientError};

impl ApiClient {
    pub async fn like(&self, post_id: i32) -> Result<LikeResult, ClientError> {
        self.like_with(post_id, |_| {}).await
    }

    /// A second like of the same post is rejected by the server (422).
    pub async fn like_with(
        &self,
        post_id: i32,
        on_success: impl FnOnce(&LikeResult),
    ) -> Result<LikeResult, ClientError> {
        let request = self.request(Method::POST, &["api", "likes"])?.json(&json!({ "postid": post_id }));
        let result: LikeResult = self.send_json(request, "like").await?;
        self.after_post_mutation().await;
        on_success(&result);
        Ok(result)
    }

    pub async fn unlike(&self, post_id: i32) -> Result<LikeResult, ClientError> {
        self.unlike_with(post_id, |_| {}).await
    }

    pub async fn unlike_with(
        &self,
        post_id: i32,
        on_success: impl FnOnce(&LikeResult),
    ) -> Result<LikeResult, ClientError> {
        let request = self.request(Method::DELETE, &["api", "likes", &post_id.to_string()])?;
        let result: LikeResult = self.send_json(request, "unlike").await?;
        self.after_post_mutation().await;
        on_success(&result);
        Ok(result)
    }
}
