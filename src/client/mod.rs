//! Endpoint clients
//!
//! A `Backend` issues one HTTP exchange against the server under test and
//! captures everything the assertion layer needs. The acceptance tier always
//! talks to the real server over the network; lower tiers may run against an
//! in-process stub instead.

mod http;
mod stub;

pub use http::HttpBackend;
pub use stub::StubBackend;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::common::Error;

/// HTTP method of a request spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            other => Err(Error::Config(format!("unsupported HTTP method '{other}'"))),
        }
    }
}

/// One captured request/response exchange.
///
/// Network faults are folded into the exchange instead of surfacing as an
/// error: `status` is 0 and `error` carries the marker, so assertion logic
/// treats unreachable servers the same way it treats wrong answers.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

impl Exchange {
    /// Exchange for a request that never produced a response
    pub fn failure(marker: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            status: 0,
            body: String::new(),
            headers: HashMap::new(),
            elapsed_ms,
            error: Some(marker.into()),
        }
    }

    /// Whether a response was received at all
    pub fn is_connected(&self) -> bool {
        self.status != 0
    }

    /// Short description used in mismatch messages
    pub fn describe_status(&self) -> String {
        if self.is_connected() {
            self.status.to_string()
        } else {
            match &self.error {
                Some(marker) => format!("no response ({marker})"),
                None => "no response".to_string(),
            }
        }
    }
}

/// An endpoint client: executes one request and captures the exchange
#[async_trait]
pub trait Backend: Send + Sync {
    async fn execute(&self, method: Method, path: &str) -> Exchange;
}
