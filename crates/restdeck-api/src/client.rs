// JSON-over-HTTP request execution.
//
// Wraps `reqwest::Client` with per-request method/header/body application,
// status classification, and body decoding. This module performs exactly one
// request per call; caching and proxy fallback are layered on top by
// `restdeck-core`.

use std::collections::BTreeMap;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Per-request options carried on a widget definition: HTTP method, extra
/// headers, and an optional raw body.
///
/// Headers are stored sorted so serialized widgets stay stable. The fixed
/// JSON `Content-Type`/`Accept` pair is always applied first, with these
/// headers layered on top (caller wins on conflict).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: "GET".to_owned(),
            headers: BTreeMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// Options for a GET request with no extra headers or body.
    pub fn get() -> Self {
        Self::default()
    }
}

/// Thin JSON request client shared by every widget.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Perform one request against `url` and decode the body as JSON.
    ///
    /// The URL is used verbatim. A non-2xx status maps to [`Error::Http`]
    /// with the canonical reason phrase; an undecodable body maps to
    /// [`Error::Json`] carrying the raw text.
    pub async fn fetch_json(&self, url: &str, options: &RequestOptions) -> Result<Value, Error> {
        let url = Url::parse(url)?;
        let method: Method =
            options
                .method
                .to_uppercase()
                .parse()
                .map_err(|_| Error::InvalidRequest {
                    message: format!("unsupported HTTP method `{}`", options.method),
                })?;

        debug!("{} {}", method, url);

        let mut headers = json_headers();
        for (name, value) in &options.headers {
            let name: HeaderName = name.parse().map_err(|_| Error::InvalidRequest {
                message: format!("invalid header name `{name}`"),
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidRequest {
                message: format!("invalid value for header `{name}`"),
            })?;
            headers.insert(name, value);
        }

        let mut request = self.http.request(method, url).headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let resp = request.send().await.map_err(Error::Transport)?;
        let status = resp.status();

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("Unknown Status")
                    .to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Json {
            message: e.to_string(),
            body,
        })
    }
}

/// The fixed header pair attached to every request.
fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}
