//! In-memory transport for tests and dry runs.

use super::{Payload, Transport};
use crate::error::{RelayError, RelayResult};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// One recorded delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub endpoint: String,
    /// The form-encoded request body.
    pub body: String,
    /// The decoded JSON document.
    pub payload: Value,
}

impl Delivery {
    /// Events carried by this delivery.
    pub fn events(&self) -> &[Value] {
        self.payload["events"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Records deliveries instead of sending them.
///
/// Clones share the same record, so a test can keep one handle while the
/// notifier owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    failure: Option<String>,
}

impl MemoryTransport {
    /// A transport whose deliveries succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose deliveries are recorded and then fail with `reason`.
    pub fn failing<S: Into<String>>(reason: S) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Snapshot of every delivery so far.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().len()
    }

    /// Forgets recorded deliveries.
    pub fn clear(&self) {
        self.deliveries.lock().clear();
    }
}

impl Transport for MemoryTransport {
    fn deliver(&mut self, endpoint: &str, payload: &Payload<'_>) -> RelayResult<()> {
        let body = payload.to_form_body()?;
        let payload = serde_json::to_value(payload)?;
        self.deliveries.lock().push(Delivery {
            endpoint: endpoint.to_string(),
            body,
            payload,
        });

        match &self.failure {
            Some(reason) => Err(RelayError::delivery(endpoint, reason)),
            None => Ok(()),
        }
    }
}
