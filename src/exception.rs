//! Exception-like values.
//!
//! Anything that can describe itself with a class name, a message, a source
//! location and an optional call trace can be reported through
//! [`Notifier::notify_exception`](crate::Notifier::notify_exception). The
//! crate ships [`Exception`] as a ready-made carrier and converts any
//! [`std::error::Error`] into one.
//!
//! # Examples
//!
//! ```
//! use error_relay::{Exception, Reportable};
//! use error_relay::stacktrace::RawFrame;
//!
//! let exception = Exception::new("PaymentDeclined", "card expired")
//!     .at("src/billing.rs", 214)
//!     .with_trace(vec![RawFrame::new("billing::charge").at("src/main.rs", 30)]);
//!
//! assert_eq!(exception.class_name(), "PaymentDeclined");
//! assert_eq!(exception.location(), ("src/billing.rs", 214));
//! ```

use crate::stacktrace::RawFrame;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::panic::Location;

/// The shape every reportable exception exposes.
pub trait Reportable {
    /// Error class shown as the report title.
    fn class_name(&self) -> Cow<'_, str>;

    /// Human-readable description.
    fn message(&self) -> Cow<'_, str>;

    /// Where the exception was raised.
    fn location(&self) -> (&str, u32);

    /// The call trace at the raise point, when one was captured.
    fn trace(&self) -> Option<&[RawFrame]> {
        None
    }
}

/// A ready-made [`Reportable`] with an owned class, message and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    class: String,
    message: String,
    file: String,
    line: u32,
    trace: Option<Vec<RawFrame>>,
}

impl Exception {
    /// Creates an exception located at the caller.
    #[track_caller]
    pub fn new<C: Into<String>, M: Into<String>>(class: C, message: M) -> Self {
        let caller = Location::caller();
        Self {
            class: class.into(),
            message: message.into(),
            file: caller.file().to_string(),
            line: caller.line(),
            trace: None,
        }
    }

    /// Wraps a standard error, named after its type and located at the caller.
    #[track_caller]
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        Self::new(std::any::type_name::<E>(), error.to_string())
    }

    /// Overrides the raise location.
    #[must_use]
    pub fn at<S: Into<String>>(mut self, file: S, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    /// Attaches the call trace leading to the raise point.
    #[must_use]
    pub fn with_trace(mut self, trace: Vec<RawFrame>) -> Self {
        self.trace = Some(trace);
        self
    }
}

impl Reportable for Exception {
    #[inline]
    fn class_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.class)
    }

    #[inline]
    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.message)
    }

    #[inline]
    fn location(&self) -> (&str, u32) {
        (&self.file, self.line)
    }

    #[inline]
    fn trace(&self) -> Option<&[RawFrame]> {
        self.trace.as_deref()
    }
}
