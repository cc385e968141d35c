//! Blocking HTTP transport.

use super::{Payload, Transport, CONNECTION, CONTENT_TYPE};
use crate::error::{RelayError, RelayResult};
use core::fmt;
use std::time::Duration;
use ureq::Agent;

/// Connection-level timeout for one delivery.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// POSTs each batch synchronously with `ureq`.
#[derive(Clone)]
pub struct HttpTransport {
    agent: Agent,
    timeout: Duration,
}

impl HttpTransport {
    /// A transport with the default 30 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(HTTP_TIMEOUT)
    }

    /// A transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent, timeout }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn deliver(&mut self, endpoint: &str, payload: &Payload<'_>) -> RelayResult<()> {
        let body = payload.to_form_body()?;
        tracing::trace!(endpoint, bytes = body.len(), "posting error batch");

        self.agent
            .post(endpoint)
            .header("Content-Type", CONTENT_TYPE)
            .header("Connection", CONNECTION)
            .send(body.as_bytes())
            .map(drop)
            .map_err(|err| RelayError::delivery(endpoint, err))
    }
}
