//! HTTP implementation of the REDCap requester
//!
//! REDCap exposes one project endpoint; every operation is a form-encoded
//! POST carrying the project token, a `content` selector, and an output
//! format. This module implements the [`Requester`] trait on top of that
//! endpoint with `reqwest`.

use super::traits::Requester;
use crate::config::ApiConfig;
use crate::domain::{ApiError, FieldDescriptor, MetadataField, RedsyncError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// `reqwest`-backed REDCap requester
///
/// Holds the project endpoint, the token, and a pooled HTTP client. The
/// token is sent as a form field on every request, never logged.
pub struct HttpRequester {
    /// Project API endpoint
    url: String,

    /// HTTP client for making requests
    client: Client,

    /// API connection configuration
    config: ApiConfig,
}

impl HttpRequester {
    /// Create a new requester from API configuration
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            RedsyncError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            url: config.url.clone(),
            client,
            config: config.clone(),
        })
    }

    /// The project endpoint this requester talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue the POST and surface transport failures as `ApiError`
    async fn send(&self, form: &BTreeMap<String, String>) -> Result<Response> {
        let resp = self
            .client
            .post(&self.url)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RedsyncError::Api(ApiError::Timeout(e.to_string()))
                } else {
                    RedsyncError::Api(ApiError::ConnectionFailed(e.to_string()))
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status, "REDCap request rejected");
            return Err(RedsyncError::Api(ApiError::from_status(status, body)));
        }

        Ok(resp)
    }

    /// Merge the authentication and format fields under the caller's payload
    fn build_form(&self, payload: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut form = BTreeMap::new();
        form.insert(
            "token".to_string(),
            self.config.token.expose_secret().as_ref().to_string(),
        );
        form.insert("format".to_string(), "json".to_string());
        // Caller-supplied fields win so format overrides stay possible
        for (key, value) in payload {
            form.insert(key.clone(), value.clone());
        }
        form
    }
}

#[async_trait]
impl Requester for HttpRequester {
    async fn post(&self, payload: &BTreeMap<String, String>) -> Result<Value> {
        let form = self.build_form(payload);

        tracing::debug!(
            url = %self.url,
            content = form.get("content").map(String::as_str).unwrap_or(""),
            "Sending REDCap request"
        );

        let resp = self.send(&form).await?;
        resp.json::<Value>()
            .await
            .map_err(|e| RedsyncError::Api(ApiError::InvalidResponse(e.to_string())))
    }

    async fn metadata(&self) -> Result<Vec<MetadataField>> {
        let mut payload = BTreeMap::new();
        payload.insert("content".to_string(), "metadata".to_string());

        let value = self.post(&payload).await?;
        serde_json::from_value(value)
            .map_err(|e| RedsyncError::Api(ApiError::InvalidResponse(e.to_string())))
    }

    async fn export_field_names(&self) -> Result<Vec<FieldDescriptor>> {
        let mut payload = BTreeMap::new();
        payload.insert("content".to_string(), "exportFieldNames".to_string());

        let value = self.post(&payload).await?;
        serde_json::from_value(value)
            .map_err(|e| RedsyncError::Api(ApiError::InvalidResponse(e.to_string())))
    }

    async fn version(&self) -> Result<String> {
        // The version call answers with a bare text body, not JSON
        let mut payload = BTreeMap::new();
        payload.insert("content".to_string(), "version".to_string());
        let form = self.build_form(&payload);

        let resp = self.send(&form).await?;
        let body = resp
            .text()
            .await
            .map_err(|e| RedsyncError::Api(ApiError::InvalidResponse(e.to_string())))?;
        Ok(body.trim().to_string())
    }
}
