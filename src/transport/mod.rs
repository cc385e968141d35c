//! Delivery of queued events to the collector.
//!
//! A flush hands one [`Payload`] to a [`Transport`]. The payload is JSON,
//! carried form-encoded in a single `data` field:
//!
//! ```text
//! POST /notify HTTP/1.1
//! Content-Type: application/x-www-form-urlencoded
//! Connection: close
//!
//! data=%7B%22apiKey%22%3A...
//! ```
//!
//! Delivery is fire-and-forget: the response body is never read and a
//! failed batch is not retried.

#[cfg(feature = "http")]
mod http;
mod memory;

#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use memory::{Delivery, MemoryTransport};

use crate::error::{RelayError, RelayResult};
use crate::types::{Event, MetaData};
use serde::Serialize;

/// Content type of every delivery.
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Deliveries never reuse the connection.
pub const CONNECTION: &str = "close";
/// Name of the form field carrying the JSON document.
pub const FORM_FIELD: &str = "data";

/// Sends one encoded batch to the collector.
pub trait Transport: Send {
    /// Sends `payload` to `endpoint`; the response body is ignored.
    fn deliver(&mut self, endpoint: &str, payload: &Payload<'_>) -> RelayResult<()>;
}

/// Identifies this client to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotifierInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub url: &'static str,
}

impl NotifierInfo {
    /// This crate's own identity.
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            url: env!("CARGO_PKG_REPOSITORY"),
        }
    }
}

/// The wire document for one flush.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload<'a> {
    pub api_key: &'a str,
    pub notifier: NotifierInfo,
    pub events: &'a [Event],
    pub meta_data: &'a MetaData,
}

impl<'a> Payload<'a> {
    /// A payload stamped with [`NotifierInfo::current`].
    pub fn new(api_key: &'a str, events: &'a [Event], meta_data: &'a MetaData) -> Self {
        Self {
            api_key,
            notifier: NotifierInfo::current(),
            events,
            meta_data,
        }
    }

    /// Serializes the payload to its JSON document.
    pub fn to_json(&self) -> RelayResult<String> {
        serde_json::to_string(self).map_err(RelayError::from)
    }

    /// Encodes the payload as `data=<urlencoded JSON>`.
    pub fn to_form_body(&self) -> RelayResult<String> {
        let json = self.to_json()?;
        let mut body = String::with_capacity(FORM_FIELD.len() + 1 + json.len() * 3 / 2);
        body.push_str(FORM_FIELD);
        body.push('=');
        body.extend(url::form_urlencoded::byte_serialize(json.as_bytes()));
        Ok(body)
    }
}
