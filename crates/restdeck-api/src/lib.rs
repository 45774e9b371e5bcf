// restdeck-api: JSON-over-HTTP transport for dashboard widgets

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ApiClient, RequestOptions};
pub use error::Error;
pub use transport::TransportConfig;
