use reqwest::{header, Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{ClientError, QueryCache, Session};

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client of the SNS API. Owns the optional session and the query cache;
/// every call that needs the signed-in user fails with
/// [`ClientError::MissingSession`] while signed out.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Option<Session>,
    cache: QueryCache,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
            cache: QueryCache::default(),
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_cache(mut self, cache: QueryCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn is_owner(&self, candidate: &str) -> bool {
        crate::session::is_owner(self.session(), candidate)
    }

    pub(crate) fn require_session(&self) -> Result<&Session, ClientError> {
        self.session.as_ref().ok_or(ClientError::MissingSession)
    }

    /// `base_url` followed by `segments`, each percent-encoded as one path segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Network(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Network(format!("base url {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        Ok(self.client.request(method, self.url(segments)?))
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response, ClientError> {
        let session = self.require_session()?;
        let response = request
            .header(header::AUTHORIZATION, &session.id_token)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error body".to_string());
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown Error").to_string());

        tracing::debug!(action, status = status.as_u16(), body = %text, "request failed");
        Err(ClientError::Http { status: status.as_u16(), message })
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T, ClientError> {
        let response = self.send(request, action).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn send_empty(&self, request: RequestBuilder, action: &str) -> Result<(), ClientError> {
        self.send(request, action).await?;
        Ok(())
    }
}
