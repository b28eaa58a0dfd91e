use std::future::Future;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use quire_core::{
    AuthToken, BlogDetail, BlogId, BlogInput, BlogSummary, Credentials, LikeCounts, Registration,
    Session, ViewCounts,
};

use crate::error::ClientError;
use crate::protocol::{
    AuthPayload, Envelope, ErrorBody, LikePayload, RawBlog, RegisterRequest, ViewPayload,
};

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Remote blog API. Implementations return canonical types only.
pub trait BlogApi: Send + Sync {
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Session, ClientError>> + Send;

    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<Session, ClientError>> + Send;

    fn list_blogs(&self) -> impl Future<Output = Result<Vec<BlogSummary>, ClientError>> + Send;

    fn get_blog(&self, id: &BlogId)
        -> impl Future<Output = Result<BlogDetail, ClientError>> + Send;

    fn create_blog(
        &self,
        token: &AuthToken,
        input: &BlogInput,
    ) -> impl Future<Output = Result<BlogDetail, ClientError>> + Send;

    fn update_blog(
        &self,
        token: &AuthToken,
        id: &BlogId,
        input: &BlogInput,
    ) -> impl Future<Output = Result<BlogDetail, ClientError>> + Send;

    fn delete_blog(
        &self,
        token: &AuthToken,
        id: &BlogId,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn like_blog(
        &self,
        token: &AuthToken,
        id: &BlogId,
    ) -> impl Future<Output = Result<LikeCounts, ClientError>> + Send;

    fn increment_view(
        &self,
        id: &BlogId,
    ) -> impl Future<Output = Result<ViewCounts, ClientError>> + Send;
}

/// reqwest-backed client for the REST API.
pub struct HttpBlogApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBlogApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send a request and unwrap the `{ data }` envelope.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::send(request).await?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Network(format!("invalid response body: {}", e)))?;

        Ok(envelope.data)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status, response).await);
        }

        Ok(response)
    }

    async fn error_from(status: StatusCode, response: Response) -> ClientError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        tracing::debug!(status = status.as_u16(), %message, "API request failed");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl BlogApi for HttpBlogApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let request = self.client.post(self.url("auth/login")).json(credentials);
        let payload: AuthPayload = self.fetch(request).await?;
        Ok(payload.into_session())
    }

    async fn register(&self, registration: &Registration) -> Result<Session, ClientError> {
        let request = self
            .client
            .post(self.url("auth/register"))
            .json(&RegisterRequest::from(registration));
        let payload: AuthPayload = self.fetch(request).await?;
        Ok(payload.into_session())
    }

    async fn list_blogs(&self) -> Result<Vec<BlogSummary>, ClientError> {
        let raw: Vec<RawBlog> = self.fetch(self.client.get(self.url("blogs"))).await?;
        Ok(raw.into_iter().map(RawBlog::into_summary).collect())
    }

    async fn get_blog(&self, id: &BlogId) -> Result<BlogDetail, ClientError> {
        let url = self.url(&format!("blogs/{}", id));
        let raw: RawBlog = self.fetch(self.client.get(url)).await?;
        Ok(raw.into_detail())
    }

    async fn create_blog(&self, token: &AuthToken, input: &BlogInput) -> Result<BlogDetail, ClientError> {
        let request = self
            .client
            .post(self.url("blogs"))
            .bearer_auth(token.as_str())
            .json(input);
        let raw: RawBlog = self.fetch(request).await?;
        Ok(raw.into_detail())
    }

    async fn update_blog(
        &self,
        token: &AuthToken,
        id: &BlogId,
        input: &BlogInput,
    ) -> Result<BlogDetail, ClientError> {
        let request = self
            .client
            .put(self.url(&format!("blogs/{}", id)))
            .bearer_auth(token.as_str())
            .json(input);
        let raw: RawBlog = self.fetch(request).await?;
        Ok(raw.into_detail())
    }

    async fn delete_blog(&self, token: &AuthToken, id: &BlogId) -> Result<(), ClientError> {
        let request = self
            .client
            .delete(self.url(&format!("blogs/{}", id)))
            .bearer_auth(token.as_str());
        Self::send(request).await?;
        Ok(())
    }

    async fn like_blog(&self, token: &AuthToken, id: &BlogId) -> Result<LikeCounts, ClientError> {
        let request = self
            .client
            .post(self.url(&format!("blogs/{}/like", id)))
            .bearer_auth(token.as_str());
        let payload: LikePayload = self.fetch(request).await?;
        Ok(payload.into())
    }

    async fn increment_view(&self, id: &BlogId) -> Result<ViewCounts, ClientError> {
        let request = self.client.post(self.url(&format!("blogs/{}/view", id)));
        let payload: ViewPayload = self.fetch(request).await?;
        Ok(payload.into())
    }
}
