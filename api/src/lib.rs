pub mod domain;
pub mod utilities;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::envelope::{ApiResponse, OperationResult};
use crate::domain::history::OperationRecord;
use crate::domain::metrics::MetricsSnapshot;
use crate::domain::operation::{FactorialRequest, FibonacciRequest, Operation, PowerRequest};
use crate::utilities::auth::TokenProvider;

pub const DEFAULT_DEV_BASE_URL: &str = "http://localhost:8000";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Resolve the base URL from the environment: outside production mode,
    /// an explicit `MATHDASH_API_BASE_URL` or the localhost default; in
    /// production, the override or an empty base so requests use relative
    /// paths against whatever serves the dashboard.
    pub fn from_env() -> Self {
        let mode = std::env::var("MATHDASH_MODE").unwrap_or_else(|_| String::from("development"));
        let override_url = std::env::var("MATHDASH_API_BASE_URL")
            .ok()
            .filter(|url| !url.is_empty());
        let base_url = if mode == "production" {
            override_url.unwrap_or_default()
        } else {
            override_url.unwrap_or_else(|| String::from(DEFAULT_DEV_BASE_URL))
        };
        ApiConfig::new(base_url)
    }
}

/// Client for the arithmetic service. Constructed explicitly with its
/// configuration and token provider; no ambient globals.
pub struct MathApi {
    client: reqwest::Client,
    config: ApiConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl MathApi {
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenProvider>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("could not build http client")?;
        Ok(MathApi {
            client,
            config,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Attach the bearer token when the provider has one, send, and collapse
    /// transport failures and non-2xx statuses into one generic error. Every
    /// failure is logged before being re-signaled unchanged; there is no
    /// retry.
    async fn send(
        &self,
        mut request: reqwest::RequestBuilder,
        path: &str,
    ) -> anyhow::Result<reqwest::Response> {
        if let Some(token) = self.tokens.token() {
            request = request.bearer_auth(token);
        }
        log::debug!("sending request to {}", path);
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                log::error!("API error on {}: {}", path, err);
                return Err(err).context("request failed");
            }
        };
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("API error on {}: status {} body {}", path, status, body);
            bail!("request failed with status {}", status);
        }
        Ok(response)
    }

    async fn post_operation<B: Serialize>(
        &self,
        operation: Operation,
        body: &B,
    ) -> anyhow::Result<ApiResponse<f64>> {
        let path = operation.endpoint();
        let request = self.client.post(self.endpoint(path)).json(body);
        let response = self.send(request, path).await?;
        let raw: OperationResult = response
            .json()
            .await
            .context("could not decode operation response")?;
        Ok(ApiResponse::from(raw))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let request = self.client.get(self.endpoint(path));
        let response = self.send(request, path).await?;
        response
            .json()
            .await
            .context("could not decode response body")
    }

    pub async fn calculate_power(&self, request: &PowerRequest) -> anyhow::Result<ApiResponse<f64>> {
        self.post_operation(Operation::Power, request).await
    }

    pub async fn calculate_fibonacci(
        &self,
        request: &FibonacciRequest,
    ) -> anyhow::Result<ApiResponse<f64>> {
        self.post_operation(Operation::Fibonacci, request).await
    }

    pub async fn calculate_factorial(
        &self,
        request: &FactorialRequest,
    ) -> anyhow::Result<ApiResponse<f64>> {
        self.post_operation(Operation::Factorial, request).await
    }

    /// Full history, newest first as the server returns it. No pagination,
    /// no server-side filtering; callers filter in memory.
    pub async fn get_history(&self) -> anyhow::Result<Vec<OperationRecord>> {
        self.get_json("/api/history").await
    }

    pub async fn get_metrics(&self) -> anyhow::Result<MetricsSnapshot> {
        self.get_json("/api/metrics").await
    }
}
