//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use error_relay::prelude::*;
//!
//! let config = Config::default().with_endpoint("errors.example.com/notify");
//! let mut notifier = Notifier::new(config, ProcessHost::new(), MemoryTransport::new());
//! notifier.register("0123456789abcdef");
//!
//! let signal = ErrorSignal::new(Severity::WARNING, "division by zero", "src/math.rs", 12);
//! assert_eq!(notifier.handle_error(&signal), HookOutcome::PassThrough);
//! ```

pub use crate::config::{Config, MetaDataMode};
pub use crate::exception::{Exception, Reportable};
pub use crate::hooks::{ErrorSignal, HookOutcome};
pub use crate::host::{HostContext, HostSnapshot, LastError, ProcessHost, RequestInfo};
pub use crate::notifier::{FlushOutcome, Notifier, NotifyOutcome};
pub use crate::panic::{install_panic_hook, SharedNotifier};
pub use crate::severity::Severity;
#[cfg(feature = "http")]
pub use crate::transport::HttpTransport;
pub use crate::transport::{MemoryTransport, Transport};
pub use crate::types::MetaData;
