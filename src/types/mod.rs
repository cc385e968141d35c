//! Report data types.
//!
//! This module holds the plain data that flows through the reporting
//! pipeline: normalized stack frames, the per-error [`Event`] record, the
//! metadata tree and the pending [`ErrorQueue`].
//!
//! # Examples
//!
//! ```
//! use error_relay::stacktrace::build_stacktrace;
//! use error_relay::types::{ErrorReport, Event};
//!
//! let trace = build_stacktrace("src/main.rs", 42, None, None);
//! let event = Event::new(
//!     "production",
//!     ErrorReport::new("Timeout", "upstream did not answer", trace),
//! );
//!
//! assert_eq!(event.report().stacktrace.frames()[0].method(), "[unknown]");
//! ```

use smallvec::SmallVec;

pub mod event;
pub mod frame;
pub mod metadata;
pub mod queue;

pub use event::*;
pub use frame::*;
pub use metadata::*;
pub use queue::*;

/// SmallVec-backed frame storage.
///
/// Uses inline storage for up to 8 frames, which covers most call depths
/// seen from application code without touching the heap.
pub type FrameVec = SmallVec<[StackFrame; 8]>;

/// SmallVec-backed storage for queued events.
///
/// Most executions report zero or one error, so a single inline slot is enough.
pub type EventVec = SmallVec<[Event; 1]>;
