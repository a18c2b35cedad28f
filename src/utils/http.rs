// src/utils/http.rs

//! HTTP transport used by every source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::TransportConfig;

/// Form parameters of a single request.
pub type Params = Vec<(&'static str, String)>;

/// Minimal POST primitive the sources are written against.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `params` form-encoded to `base_url` joined with `method`.
    ///
    /// Network failures, timeouts and non-200 responses all surface as
    /// `AppError::Transport`.
    async fn post(&self, base_url: &str, method: &str, params: &Params) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &TransportConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Join a base URL and a method with exactly one `/` between them.
///
/// An empty method leaves the base URL untouched.
pub fn endpoint(base_url: &str, method: &str) -> String {
    let method = method.trim_start_matches('/');
    if method.is_empty() {
        return base_url.to_string();
    }
    format!("{}/{}", base_url.trim_end_matches('/'), method)
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a transport from configuration.
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, base_url: &str, method: &str, params: &Params) -> Result<String> {
        let url = endpoint(base_url, method);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::transport(&url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::transport(&url, format!("status {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::transport(&url, e))
    }
}
