//! Error reporting client for a remote error-tracking collector.
//!
//! A [`Notifier`] turns exceptions, host error signals and fatal shutdowns
//! into events, attaches a filtered metadata tree and posts them to the
//! collector. Inside a request all events are batched into one delivery at
//! [`Notifier::shutdown`]; anywhere else each report is delivered right away.
//! Reporting never fails the caller: problems are logged through `tracing`
//! and surfaced as [`NotifyOutcome`] / [`FlushOutcome`] values.
//!
//! # Examples
//!
//! ## Reporting from a script
//!
//! ```
//! use error_relay::{Config, Exception, HostSnapshot, MemoryTransport, Notifier};
//!
//! let transport = MemoryTransport::new();
//! let config = Config::default()
//!     .with_endpoint("errors.example.com/notify")
//!     .with_project_root("/srv/app");
//!
//! let mut notifier = Notifier::new(config, HostSnapshot::script(), transport.clone());
//! notifier.register("0123456789abcdef");
//!
//! let exception = Exception::new("UploadFailed", "disk full").at("/srv/app/src/upload.rs", 88);
//! notifier.notify_exception(&exception, None);
//!
//! let deliveries = transport.deliveries();
//! assert_eq!(deliveries.len(), 1);
//! assert_eq!(deliveries[0].endpoint, "http://errors.example.com/notify");
//!
//! let frame = &deliveries[0].events()[0]["exceptions"][0]["stacktrace"][0];
//! assert_eq!(frame["file"], "src/upload.rs");
//! assert_eq!(frame["inProject"], true);
//! ```
//!
//! ## Batching within a request
//!
//! ```
//! use error_relay::{Config, HostSnapshot, MemoryTransport, Notifier, RequestInfo};
//!
//! let transport = MemoryTransport::new();
//! let host = HostSnapshot::for_request(RequestInfo::new("GET", "/orders?page=2"));
//! let config = Config::default().with_endpoint("errors.example.com/notify");
//!
//! let mut notifier = Notifier::new(config, host, transport.clone());
//! notifier.register("0123456789abcdef");
//!
//! notifier.notify_error("Timeout", "inventory service", None);
//! notifier.notify_error("Timeout", "pricing service", None);
//! assert_eq!(transport.delivery_count(), 0);
//!
//! notifier.shutdown();
//! assert_eq!(transport.deliveries()[0].events().len(), 2);
//! ```

/// Notifier settings and their defaults
pub mod config;
/// Client-side failures
pub mod error;
/// Exception-like values and the [`Reportable`] trait
pub mod exception;
/// Recursive metadata key filtering
pub mod filter;
/// Chaining of previously registered host hooks
pub mod hooks;
/// Host execution context: requests, environment, last error
pub mod host;
/// Metadata assembly and per-execution caching
pub mod metadata;
/// The reporting façade
pub mod notifier;
/// Panic hook integration
pub mod panic;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Host error severities
pub mod severity;
/// Stacktrace normalization and capture
pub mod stacktrace;
/// Delivery of event batches
pub mod transport;
/// Wire-level event, frame and metadata types
pub mod types;

pub use config::{Config, MetaDataMode};
pub use error::{RelayError, RelayResult};
pub use exception::{Exception, Reportable};
pub use hooks::{ErrorSignal, HookOutcome};
pub use host::{HostContext, HostSnapshot, LastError, ProcessHost, RequestInfo};
pub use notifier::{FlushOutcome, Notifier, NotifyOutcome, SkipReason};
pub use panic::{install_panic_hook, SharedNotifier};
pub use severity::Severity;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{MemoryTransport, Payload, Transport};
pub use types::{ErrorReport, Event, MetaData, StackFrame, Stacktrace};
