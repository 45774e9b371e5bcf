// Fetch orchestration: cache consult, request execution, proxy fallback,
// and the adaptive expiry policy tying cache lifetime to refresh cadence.

use std::sync::Arc;
use std::time::Duration;

use restdeck_api::{ApiClient, RequestOptions};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::config::FetchConfig;
use crate::error::CoreError;
use crate::model::field::FieldDescriptor;
use crate::path;

/// Cache behavior for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheUse {
    /// Skip the lookup and do not store the result.
    Bypass,
    /// Serve from cache while live; store a success for this long.
    Ttl(Duration),
}

/// Outcome of one fetch: a payload or a display-ready error message,
/// never both.
#[derive(Debug, Clone)]
pub enum FetchResult {
    Success { data: Arc<Value>, cached: bool },
    Failure { error: String },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The payload, when the fetch succeeded.
    pub fn data(&self) -> Option<&Arc<Value>> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The error message, when the fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success { .. } => None,
        }
    }

    /// Whether the payload was served from cache without a network round
    /// trip.
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Success { cached: true, .. })
    }
}

/// A probe outcome: one bypassing fetch plus shape discovery on the body.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub fetch: FetchResult,
    pub fields: Vec<FieldDescriptor>,
}

/// Fetch pipeline shared by every widget: one HTTP client, one cache.
pub struct Fetcher {
    client: ApiClient,
    cache: Arc<ResponseCache>,
    proxy_prefix: Option<String>,
    sweep_interval: Duration,
}

impl Fetcher {
    /// Build the pipeline from engine settings.
    pub fn new(config: &FetchConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(&config.transport())?;
        Ok(Self {
            client,
            cache: Arc::new(ResponseCache::new()),
            proxy_prefix: config.proxy_prefix.clone(),
            sweep_interval: config.sweep_interval,
        })
    }

    /// The shared response cache.
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Fetch `url`, honoring `cache`.
    ///
    /// Every failure on this path is recovered into
    /// [`FetchResult::Failure`]; the caller never sees an `Err`. Failed
    /// requests are not retried, except for the single proxy fallback on
    /// pre-status failures.
    pub async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
        cache: CacheUse,
    ) -> FetchResult {
        if let CacheUse::Ttl(_) = cache {
            if let Some(data) = self.cache.get(url) {
                return FetchResult::Success { data, cached: true };
            }
        }

        match self.request_with_fallback(url, options).await {
            Ok(value) => {
                let data = Arc::new(value);
                if let CacheUse::Ttl(ttl) = cache {
                    self.cache.set(url, Arc::clone(&data), ttl);
                }
                FetchResult::Success {
                    data,
                    cached: false,
                }
            }
            Err(error) => {
                debug!(url, error = %error, "fetch failed");
                FetchResult::Failure { error }
            }
        }
    }

    /// Probe an endpoint for widget creation: fetch once with the cache
    /// bypassed and enumerate the addressable fields of the body.
    pub async fn probe(
        &self,
        url: &str,
        options: &RequestOptions,
        max_depth: usize,
    ) -> ProbeResult {
        let fetch = self.fetch(url, options, CacheUse::Bypass).await;
        let fields = match fetch.data() {
            Some(data) => path::explore(data, max_depth),
            None => Vec::new(),
        };
        ProbeResult { fetch, fields }
    }

    /// One request, with a single proxy retry for failures that happened
    /// before any HTTP status existed. A failure of the proxy attempt
    /// itself is reported under a distinguished message.
    async fn request_with_fallback(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Value, String> {
        match self.client.fetch_json(url, options).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_network() => {
                let Some(prefix) = self.proxy_prefix.as_deref() else {
                    return Err(err.to_string());
                };
                warn!(url, error = %err, "network failure, retrying through proxy");
                let proxied = format!("{prefix}{url}");
                self.client
                    .fetch_json(&proxied, options)
                    .await
                    .map_err(|proxy_err| format!("proxy fallback failed: {proxy_err}"))
            }
            Err(err) => Err(err.to_string()),
        }
    }
}

/// Cache lifetime matched to a widget's refresh cadence.
///
/// Sub-30s cadences get a third of the cadence, at most 5s; everything
/// else gets a quarter, at most 30s. `skip_cache` forces zero.
pub fn adaptive_ttl(refresh: Duration, skip_cache: bool) -> Duration {
    if skip_cache {
        return Duration::ZERO;
    }

    let secs = refresh.as_secs_f64();
    let ttl = if secs < 30.0 {
        (secs / 3.0).min(5.0)
    } else if secs < 120.0 {
        secs / 4.0
    } else {
        (secs / 4.0).min(30.0)
    };
    Duration::from_secs_f64(ttl)
}
