//! HTTP client wrapper for the Kite REST API.

use std::time::Instant;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::api_types::{KiteEnvelope, KiteErrorBody};
use super::config::KiteConfig;
use super::error::KiteError;
use crate::domain::credentials::Credentials;
use crate::infrastructure::metrics;

const KITE_VERSION_HEADER: &str = "X-Kite-Version";
const KITE_VERSION: &str = "3";

/// Build the shared HTTP client for a configuration.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(config: &KiteConfig) -> Result<Client, KiteError> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!("kite-mcp-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| KiteError::Http(e.to_string()))
}

/// Authenticated HTTP client for one Kite session.
#[derive(Clone)]
pub struct KiteHttpClient {
    client: Client,
    base_url: Url,
    authorization: String,
}

impl std::fmt::Debug for KiteHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KiteHttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("authorization", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl KiteHttpClient {
    /// Create a client bound to `credentials`, sharing `client`'s pool.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(client: Client, base_url: &str, credentials: &Credentials) -> Result<Self, KiteError> {
        let base_url = Url::parse(base_url).map_err(|e| KiteError::Http(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(KiteError::Http(format!("invalid base URL {base_url}")));
        }
        Ok(Self {
            client,
            base_url,
            authorization: credentials.authorization_header(),
        })
    }

    /// GET `segments` with optional repeated query pairs.
    pub async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, KiteError> {
        let mut request = self.request(Method::GET, segments)?;
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(operation, request).await
    }

    /// POST a form body.
    pub async fn post_form<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        operation: &'static str,
        segments: &[&str],
        form: &B,
    ) -> Result<T, KiteError> {
        let request = self.request(Method::POST, segments)?.form(form);
        self.send(operation, request).await
    }

    /// PUT a form body.
    pub async fn put_form<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        operation: &'static str,
        segments: &[&str],
        form: &B,
    ) -> Result<T, KiteError> {
        let request = self.request(Method::PUT, segments)?.form(form);
        self.send(operation, request).await
    }

    /// DELETE `segments`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        segments: &[&str],
    ) -> Result<T, KiteError> {
        let request = self.request(Method::DELETE, segments)?;
        self.send(operation, request).await
    }

    /// Resolve path segments against the base URL. Segments are
    /// percent-encoded, so caller-supplied IDs cannot change the route.
    fn url(&self, segments: &[&str]) -> Result<Url, KiteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| KiteError::Http(format!("invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, KiteError> {
        let url = self.url(segments)?;
        Ok(self
            .client
            .request(method, url)
            .header(KITE_VERSION_HEADER, KITE_VERSION)
            .header(AUTHORIZATION, &self.authorization))
    }

    /// Single attempt: send, decode the envelope, classify failures.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, KiteError> {
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_broker_request(operation, 0, started.elapsed());
                tracing::warn!(operation, error = %e, "Kite request failed");
                return Err(KiteError::Network(e.to_string()));
            }
        };

        let status = response.status();
        let body = response.text().await;
        metrics::record_broker_request(operation, status.as_u16(), started.elapsed());
        let body = body.map_err(|e| {
            tracing::warn!(operation, status = status.as_u16(), error = %e, "Failed to read Kite response body");
            KiteError::Network(e.to_string())
        })?;

        if status.is_success() {
            let envelope: KiteEnvelope<T> =
                serde_json::from_str(&body).map_err(|e| KiteError::JsonParse(e.to_string()))?;
            if envelope.is_success() {
                tracing::debug!(operation, status = status.as_u16(), "Kite request succeeded");
                return match envelope.data {
                    Some(data) => Ok(data),
                    None => serde_json::from_value(Value::Null)
                        .map_err(|e| KiteError::JsonParse(e.to_string())),
                };
            }
            return Err(api_error(
                status.as_u16(),
                envelope.error_type,
                envelope.message,
                &body,
            ));
        }

        let error = serde_json::from_str::<KiteErrorBody>(&body).unwrap_or_default();
        let err = api_error(status.as_u16(), error.error_type, error.message, &body);
        tracing::warn!(
            operation,
            status = status.as_u16(),
            error = %err,
            "Kite API error"
        );
        Err(err)
    }
}

fn api_error(status: u16, error_type: Option<String>, message: Option<String>, body: &str) -> KiteError {
    KiteError::Api {
        status,
        error_type: error_type.unwrap_or_else(|| "GeneralException".to_string()),
        message: message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| if body.is_empty() { format!("HTTP {status}") } else { body.to_string() }),
    }
}
