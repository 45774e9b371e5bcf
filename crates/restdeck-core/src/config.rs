// Engine-level settings shared by the fetcher and scheduler.

use std::time::Duration;

use restdeck_api::TransportConfig;

/// Settings for the fetch pipeline.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Accept self-signed TLS certificates.
    pub accept_invalid_certs: bool,
    /// Proxy prefix prepended verbatim to the original URL when a request
    /// fails before receiving a status line. `None` disables the retry.
    pub proxy_prefix: Option<String>,
    /// Cadence of the background cache sweep.
    pub sweep_interval: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            proxy_prefix: None,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl FetchConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}
