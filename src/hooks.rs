//! Chains of previously registered host hooks.
//!
//! When the notifier takes over a host hook, whatever was registered before
//! it is kept in a [`HookChain`] and run, in registration order, after the
//! notifier has done its own work. The notifier's hooks then answer
//! [`HookOutcome::PassThrough`] so the host's default handling still runs.

use crate::severity::Severity;
use crate::stacktrace::RawFrame;
use crate::types::MetaData;
use core::fmt;

/// What a hook tells the host after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The event is fully handled; the host should do nothing more.
    Handled,
    /// The host should continue with its default handling (e.g. logging).
    PassThrough,
}

/// A non-exception error raised by the host, as handed to the error hook.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSignal {
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: u32,
    /// Variables in scope at the raise point, forwarded to chained hooks.
    pub context: MetaData,
    /// Call trace of the raise point; captured on the spot when absent.
    pub trace: Option<Vec<RawFrame>>,
}

impl ErrorSignal {
    /// A signal raised at `file:line`.
    pub fn new<M: Into<String>, F: Into<String>>(
        severity: Severity,
        message: M,
        file: F,
        line: u32,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            file: file.into(),
            line,
            context: MetaData::new(),
            trace: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: MetaData) -> Self {
        self.context = context;
        self
    }

    /// Attaches the call trace of the raise point.
    #[must_use]
    pub fn with_trace(mut self, trace: Vec<RawFrame>) -> Self {
        self.trace = Some(trace);
        self
    }
}

type Handler<A> = Box<dyn FnMut(&A) + Send>;

/// Ordered list of handlers sharing one argument type.
pub struct HookChain<A: ?Sized> {
    handlers: Vec<Handler<A>>,
}

impl<A: ?Sized> HookChain<A> {
    /// An empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler behind the existing ones.
    pub fn push<F>(&mut self, handler: F)
    where
        F: FnMut(&A) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Number of chained handlers.
    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every handler in registration order.
    pub fn run(&mut self, arg: &A) {
        for handler in &mut self.handlers {
            handler(arg);
        }
    }
}

impl<A: ?Sized> Default for HookChain<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> fmt::Debug for HookChain<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
