use crate::config::ClassifierConfig;
use crate::Result;
use reqwest::{Proxy, StatusCode};
use std::time::Duration;

/// Raw outcome of one HTTP exchange. Status interpretation is left to the caller,
/// since the completion and catalog endpoints classify rejections differently.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        StatusCode::from_u16(self.status)
            .map(|s| s.is_success())
            .unwrap_or(false)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Thin wrapper over a pooled `reqwest::Client` that speaks bearer-authenticated JSON.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            match Proxy::all(proxy_url.as_str()) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => tracing::warn!(proxy = %proxy_url, error = %e, "ignoring invalid proxy url"),
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    /// `GET url` with `Authorization: Bearer <credential>`.
    pub async fn get_json(&self, url: &str, credential: &str) -> Result<HttpResponse> {
        let request = self
            .client
            .get(url)
            .bearer_auth(credential)
            .header("accept", "application/json");
        Self::send(request).await
    }

    /// `POST url` with a JSON body and `Authorization: Bearer <credential>`.
    pub async fn post_json(
        &self,
        url: &str,
        credential: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse> {
        let request = self
            .client
            .post(url)
            .bearer_auth(credential)
            .header("accept", "application/json")
            .json(body);
        Self::send(request).await
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<HttpResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let not_found = HttpResponse {
            status: 404,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }

    #[test]
    fn test_http_response_json() {
        let resp = HttpResponse {
            status: 200,
            body: r#"{"data":[]}"#.to_string(),
        };
        let value: serde_json::Value = resp.json().unwrap();
        assert!(value["data"].is_array());
    }
}
