//! HTTP backend over reqwest
//!
//! The real client used by the acceptance tier: it exercises the full stack
//! of the server under test, with a global per-request timeout so a hung
//! dependency cannot stall a run.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::common::{Error, Result};

use super::{Backend, Exchange, Method};

pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    /// Create a backend for the given base URL.
    ///
    /// The URL is validated up front so a typo fails the run immediately
    /// instead of producing a wall of unreachable-server case failures.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .user_agent(concat!("tiercheck/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn to_reqwest_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }

    /// Error marker recorded on the exchange when no response arrived
    fn connection_marker(error: &reqwest::Error, timeout: Duration) -> String {
        if error.is_timeout() {
            format!("timed out after {} ms", timeout.as_millis())
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else {
            error.to_string()
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn execute(&self, method: Method, path: &str) -> Exchange {
        let url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        let start = Instant::now();
        let response = self
            .client
            .request(Self::to_reqwest_method(method), &url)
            .timeout(self.timeout)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status().as_u16();
                let headers = response
                    .headers()
                    .iter()
                    .map(|(k, v)| {
                        (
                            k.to_string(),
                            v.to_str().unwrap_or("<binary>").to_string(),
                        )
                    })
                    .collect();

                match response.text().await {
                    Ok(body) => Exchange {
                        status,
                        body,
                        headers,
                        elapsed_ms: start.elapsed().as_millis() as u64,
                        error: None,
                    },
                    Err(e) => Exchange::failure(
                        format!("failed to read body: {e}"),
                        start.elapsed().as_millis() as u64,
                    ),
                }
            }
            Err(e) => Exchange::failure(
                Self::connection_marker(&e, self.timeout),
                start.elapsed().as_millis() as u64,
            ),
        }
    }
}
