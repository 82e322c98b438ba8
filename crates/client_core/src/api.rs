use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::protocol::{ErrorResponse, FunctionsResponse, TransformRequest, TransformResponse};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

/// The external transformation service, addressed per call by its base URL.
#[async_trait]
pub trait TransformApi: Send + Sync {
    async fn list_functions(&self, base: &str) -> Result<Vec<String>, ClientError>;
    async fn transform(&self, base: &str, request: &TransformRequest)
        -> Result<String, ClientError>;
}

pub struct HttpTransformApi {
    http: Client,
}

impl Default for HttpTransformApi {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransformApi {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Builds a client whose requests give up after `timeout`. `None` leaves
    /// requests bounded only by the transport.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    fn endpoint(base: &str, path: &str) -> Result<String, ClientError> {
        let base = base.trim().trim_end_matches('/');
        Url::parse(base).map_err(|source| ClientError::InvalidBaseAddress {
            address: base.to_string(),
            source,
        })?;
        Ok(format!("{base}/{path}"))
    }
}

async fn decode_body<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let body = res.text().await?;
    serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
}

#[async_trait]
impl TransformApi for HttpTransformApi {
    async fn list_functions(&self, base: &str) -> Result<Vec<String>, ClientError> {
        let url = Self::endpoint(base, "functions")?;
        debug!(%url, "fetching transform functions");
        let res = self.http.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                reason: None,
            });
        }
        let body: FunctionsResponse = decode_body(res).await?;
        Ok(body.functions)
    }

    async fn transform(
        &self,
        base: &str,
        request: &TransformRequest,
    ) -> Result<String, ClientError> {
        let url = Self::endpoint(base, "transform")?;
        debug!(%url, function = %request.function, "posting transform request");
        let res = self.http.post(&url).json(request).send().await?;
        let status = res.status();
        if !status.is_success() {
            // The envelope is best effort; an unreadable body just leaves the reason unset.
            let reason = res
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorResponse>(&body).ok())
                .and_then(|envelope| envelope.reason().map(str::to_owned));
            return Err(ClientError::Status { status, reason });
        }
        let body: TransformResponse = decode_body(res).await?;
        Ok(body.output)
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
