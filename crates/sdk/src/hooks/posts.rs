use reqwest::Method;
use serde_json::json;
use sns_core::{ListQuery, PostDto, PostList};

use crate::cache::{OWNER_POSTS, POSTS};
use crate::{ApiClient, CacheKey, ClientError};

impl ApiClient {
    /// Newest posts first.
    pub async fn list_posts(&self, query: ListQuery) -> Result<Vec<PostDto>, ClientError> {
        let key = CacheKey::new(POSTS, format!("{}:{}", query.offset(), query.limit()));
        let list: PostList = self.cache().get_or_fetch(key, async {
            let request = self.request(Method::GET, &["api", "posts"])?
                .query(&[("offset", query.offset()), ("limit", query.limit())]);
            self.send_json(request, "list posts").await
        }).await?;
        Ok(list.items)
    }

    pub async fn list_owner_posts(&self, owner: &str, query: ListQuery) -> Result<Vec<PostDto>, ClientError> {
        let key = CacheKey::new(OWNER_POSTS, format!("{}:{}:{}", owner, query.offset(), query.limit()));
        let list: PostList = self.cache().get_or_fetch(key, async {
            let request = self.request(Method::GET, &["api", "posts", owner])?
                .query(&[("offset", query.offset()), ("limit", query.limit())]);
            self.send_json(request, "list owner posts").await
        }).await?;
        Ok(list.items)
    }

    pub async fn create_post(&self, content: &str) -> Result<PostDto, ClientError> {
        self.create_post_with(content, |_| {}).await
    }

    pub async fn create_post_with(
        &self,
        content: &str,
        on_success: impl FnOnce(&PostDto),
    ) -> Result<PostDto, ClientError> {
        let request = self.request(Method::POST, &["api", "posts"])?.json(&json!({ "content": content }));
        let post: PostDto = self.send_json(request, "create post").await?;
        self.after_post_mutation().await;
        on_success(&post);
        Ok(post)
    }

    pub async fn update_post(&self, post_id: i32, content: &str) -> Result<PostDto, ClientError> {
        self.update_post_with(post_id, content, |_| {}).await
    }

    pub async fn update_post_with(
        &self,
        post_id: i32,
        content: &str,
        on_success: impl FnOnce(&PostDto),
    ) -> Result<PostDto, ClientError> {
        let request = self.request(Method::PUT, &["api", "posts", &post_id.to_string()])?.json(&json!({ "content": content }));
        let post: PostDto = self.send_json(request, "update post").await?;
        self.after_post_mutation().await;
        on_success(&post);
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: i32) -> Result<(), ClientError> {
        self.delete_post_with(post_id, || {}).await
    }

    pub async fn delete_post_with(&self, post_id: i32, on_success: impl FnOnce()) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &["api", "posts", &post_id.to_string()])?;
        self.send_empty(request, "delete post").await?;
        self.after_post_mutation().await;
        on_success();
        Ok(())
    }

    pub(crate) async fn after_post_mutation(&self) {
        self.cache().invalidate_entity(POSTS).await;
        self.cache().invalidate_entity(OWNER_POSTS).await;
    }
}
