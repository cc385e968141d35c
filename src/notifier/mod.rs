//! The reporting façade.
//!
//! A [`Notifier`] owns everything one execution needs: configuration, the
//! host context, the transport, the pending [`ErrorQueue`] and the memoized
//! metadata tree. Each report goes through the same steps:
//!
//! 1. release-stage gate, then API-key check
//! 2. metadata assembly (once per execution)
//! 3. event construction and enqueue
//! 4. flush policy: inside a request the queue is kept until
//!    [`Notifier::shutdown`], so one request costs one delivery; elsewhere
//!    the queue is flushed right away.
//!
//! # Examples
//!
//! ```
//! use error_relay::{Config, HostSnapshot, MemoryTransport, Notifier};
//!
//! let transport = MemoryTransport::new();
//! let config = Config::default().with_endpoint("errors.example.com/notify");
//! let mut notifier = Notifier::new(config, HostSnapshot::script(), transport.clone());
//! notifier.register("0123456789abcdef");
//!
//! let outcome = notifier.notify_error("CacheMiss", "key 'user:42' not found", None);
//! assert!(!outcome.is_skipped());
//! assert_eq!(transport.delivery_count(), 1);
//! ```

mod outcome;

pub use outcome::{FlushOutcome, NotifyOutcome, SkipReason};

use crate::config::Config;
use crate::error::{RelayError, RelayResult};
use crate::exception::Reportable;
use crate::hooks::{ErrorSignal, HookChain, HookOutcome};
use crate::host::{HostContext, LastError, RequestInfo};
use crate::metadata::MetaDataCache;
use crate::severity::Severity;
use crate::stacktrace::{build_stacktrace, capture_raw_frames, INTERNAL_FILE};
use crate::transport::{Payload, Transport};
use crate::types::{ErrorQueue, ErrorReport, Event, MetaData, Stacktrace};
use core::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};
use tracing::{debug, warn};

/// Reports errors for one execution and delivers them through a [`Transport`].
pub struct Notifier {
    config: Config,
    host: Box<dyn HostContext>,
    transport: Box<dyn Transport>,
    queue: ErrorQueue,
    meta_data: MetaDataCache,
    exception_hooks: HookChain<dyn Reportable>,
    error_hooks: HookChain<ErrorSignal>,
    shutdown_hooks: HookChain<()>,
    registered: bool,
    shut_down: bool,
}

impl Notifier {
    /// Creates an unregistered notifier; reports are skipped until an API key is set.
    pub fn new<H, T>(config: Config, host: H, transport: T) -> Self
    where
        H: HostContext + 'static,
        T: Transport + 'static,
    {
        Self {
            config,
            host: Box::new(host),
            transport: Box::new(transport),
            queue: ErrorQueue::new(),
            meta_data: MetaDataCache::new(),
            exception_hooks: HookChain::new(),
            error_hooks: HookChain::new(),
            shutdown_hooks: HookChain::new(),
            registered: false,
            shut_down: false,
        }
    }

    /// Sets the API key and arms the end-of-execution shutdown.
    ///
    /// Without an explicit project root, the host's document root becomes the
    /// default. Registering again only replaces the key.
    pub fn register<S: Into<String>>(&mut self, api_key: S) {
        self.config.set_api_key(api_key);

        if self.config.project_root().is_none() {
            if let Some(root) = self.host.document_root() {
                self.config.set_project_root(root);
            }
        }

        if !self.registered {
            self.registered = true;
            self.shut_down = false;
            debug!(release_stage = %self.config.release_stage(), "error notifier registered");
        }
    }

    /// Returns `true` once [`Notifier::register`] has been called.
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The current host context.
    #[inline]
    pub fn host(&self) -> &dyn HostContext {
        self.host.as_ref()
    }

    /// Mutable access to the host, e.g. to record the error ending the
    /// execution before [`Notifier::shutdown`].
    #[inline]
    pub fn host_mut(&mut self) -> &mut dyn HostContext {
        self.host.as_mut()
    }

    /// Records the error that is about to end this execution.
    pub fn record_last_error(&mut self, error: LastError) {
        self.host.record_last_error(error);
    }

    /// Starts a new execution on `host`, e.g. when a worker picks up its
    /// next request.
    ///
    /// Events still pending are delivered with the previous execution's
    /// metadata first. The memoized metadata is then discarded and shutdown
    /// is re-armed for a registered notifier.
    pub fn begin_execution<H: HostContext + 'static>(&mut self, host: H) -> FlushOutcome {
        let outcome = self.flush();
        self.meta_data.clear();
        self.host = Box::new(host);
        self.shut_down = false;
        debug!(request = self.host.is_request(), "execution started");
        outcome
    }

    /// Number of events waiting for the deferred flush.
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// The metadata tree memoized for this execution, once assembled.
    #[inline]
    pub fn meta_data(&self) -> Option<&MetaData> {
        self.meta_data.get()
    }

    /// Chains a previously registered exception hook.
    pub fn chain_exception_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&(dyn Reportable + 'static)) + Send + 'static,
    {
        self.exception_hooks.push(hook);
    }

    /// Chains a previously registered error hook.
    pub fn chain_error_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&ErrorSignal) + Send + 'static,
    {
        self.error_hooks.push(hook);
    }

    /// Chains a previously registered shutdown hook.
    pub fn chain_shutdown_hook<F>(&mut self, mut hook: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.shutdown_hooks.push(move |_: &()| hook());
    }

    /// Reports a handled exception.
    pub fn notify_exception(
        &mut self,
        exception: &dyn Reportable,
        meta_data: Option<MetaData>,
    ) -> NotifyOutcome {
        let (file, line) = exception.location();
        let stacktrace = build_stacktrace(
            file,
            line,
            exception.trace(),
            self.config.project_root(),
        );
        self.notify(
            exception.class_name(),
            exception.message(),
            Some(stacktrace),
            meta_data,
        )
    }

    /// Reports a named error raised at the caller's location.
    #[track_caller]
    pub fn notify_error<N, M>(
        &mut self,
        name: N,
        message: M,
        meta_data: Option<MetaData>,
    ) -> NotifyOutcome
    where
        N: Into<String>,
        M: Into<String>,
    {
        let caller = Location::caller();
        let trace = capture_raw_frames();
        let stacktrace = build_stacktrace(
            caller.file(),
            caller.line(),
            Some(&trace),
            self.config.project_root(),
        );
        self.notify(name, message, Some(stacktrace), meta_data)
    }

    /// Gates, records and, outside requests, delivers one report.
    ///
    /// A missing stacktrace is recorded as a single `[unknown]` frame at
    /// `[internal]:0`.
    pub fn notify<C, M>(
        &mut self,
        error_class: C,
        message: M,
        stacktrace: Option<Stacktrace>,
        meta_data: Option<MetaData>,
    ) -> NotifyOutcome
    where
        C: Into<String>,
        M: Into<String>,
    {
        if !self.config.should_notify_release_stage() {
            debug!(
                release_stage = %self.config.release_stage(),
                "release stage not notified, skipping"
            );
            return NotifyOutcome::Skipped(SkipReason::ReleaseStage);
        }

        if self.config.api_key().is_none() {
            warn!("{}", RelayError::MissingApiKey);
            return NotifyOutcome::Skipped(SkipReason::MissingApiKey);
        }

        self.meta_data
            .resolve(&self.config, self.host.as_ref(), meta_data);

        let stacktrace = stacktrace.unwrap_or_else(|| {
            build_stacktrace(INTERNAL_FILE, 0, None, self.config.project_root())
        });
        let report = ErrorReport::new(error_class, message, stacktrace);
        let event = Event::new(self.config.release_stage(), report)
            .with_user_id(self.user_id())
            .with_context(self.context());

        debug!(error_class = %event.report().error_class, "queueing error event");
        self.queue.push(event);

        if self.defers_flush() {
            NotifyOutcome::Queued {
                pending: self.queue.len(),
            }
        } else {
            NotifyOutcome::Flushed(self.flush())
        }
    }

    /// Returns `true` when errors of `severity` should be reported by the
    /// error hook.
    pub fn should_notify(&self, severity: Severity) -> bool {
        if self.config.ignore_reporting_level() {
            return true;
        }

        let mask = self
            .config
            .error_reporting_level()
            .unwrap_or_else(|| self.host.reporting_mask());
        mask.intersects(severity)
    }

    /// Delivers every queued event as one batch and empties the queue.
    ///
    /// A failed batch is logged and dropped.
    pub fn flush(&mut self) -> FlushOutcome {
        if self.queue.is_empty() {
            return FlushOutcome::Empty;
        }

        let events = self.queue.take();
        let count = events.len();

        match self.deliver(&events) {
            Ok(()) => {
                debug!(events = count, "error batch delivered");
                FlushOutcome::Delivered { events: count }
            }
            Err(error) => {
                warn!(%error, events = count, "dropping error batch");
                FlushOutcome::Failed {
                    events: count,
                    error,
                }
            }
        }
    }

    /// Exception hook: reports, then runs the chained hooks.
    pub fn handle_exception(&mut self, exception: &(dyn Reportable + 'static)) -> HookOutcome {
        let _ = self.notify_exception(exception, None);
        self.exception_hooks.run(exception);
        HookOutcome::PassThrough
    }

    /// Reports a host error signal, named after its severity.
    pub fn notify_signal(&mut self, signal: &ErrorSignal) -> NotifyOutcome {
        if !self.should_notify(signal.severity) {
            debug!(severity = %signal.severity, "severity below reporting level, skipping");
            return NotifyOutcome::Skipped(SkipReason::Severity);
        }

        let trace = signal.trace.clone().unwrap_or_else(capture_raw_frames);
        let stacktrace = build_stacktrace(
            &signal.file,
            signal.line,
            Some(&trace),
            self.config.project_root(),
        );
        self.notify(
            signal.severity.name(),
            signal.message.as_str(),
            Some(stacktrace),
            None,
        )
    }

    /// Error hook: reports the signal, then runs the chained hooks.
    pub fn handle_error(&mut self, signal: &ErrorSignal) -> HookOutcome {
        let _ = self.notify_signal(signal);
        self.error_hooks.run(signal);
        HookOutcome::PassThrough
    }

    /// Shutdown hook: reports a fatal last error, flushes deferred events
    /// and runs the chained hooks.
    pub fn shutdown(&mut self) -> FlushOutcome {
        self.shut_down = true;
        let mut outcome = FlushOutcome::Empty;

        if let Some(last) = self.host.last_error().filter(|e| e.severity.is_fatal()) {
            let file = last.file.as_deref().unwrap_or(INTERNAL_FILE);
            let line = last.line.unwrap_or(0);
            let stacktrace = build_stacktrace(file, line, None, self.config.project_root());

            if let NotifyOutcome::Flushed(flushed) = self.notify(
                last.severity.name(),
                last.message.as_str(),
                Some(stacktrace),
                None,
            ) {
                outcome = flushed;
            }
        }

        match self.flush() {
            FlushOutcome::Empty => {}
            flushed => outcome = flushed,
        }

        self.shutdown_hooks.run(&());
        outcome
    }

    /// Past shutdown nothing flushes the queue again, so reports go out
    /// immediately.
    fn defers_flush(&self) -> bool {
        !self.shut_down && self.host.is_request()
    }

    fn user_id(&self) -> Option<String> {
        self.config
            .user_id()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.host
                    .request()
                    .and_then(RequestInfo::client_ip)
                    .map(str::to_string)
            })
    }

    fn context(&self) -> Option<String> {
        self.config
            .context()
            .filter(|ctx| !ctx.is_empty())
            .map(str::to_string)
            .or_else(|| self.host.request().map(RequestInfo::context_label))
    }

    fn deliver(&mut self, events: &[Event]) -> RelayResult<()> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RelayError::MissingApiKey)?;
        if self.config.endpoint.is_empty() {
            return Err(RelayError::MissingEndpoint);
        }

        let empty = MetaData::new();
        let meta_data = self.meta_data.get().unwrap_or(&empty);
        let payload = Payload::new(api_key, events, meta_data);
        let endpoint = self.config.endpoint_url();

        let transport = &mut self.transport;
        catch_unwind(AssertUnwindSafe(|| transport.deliver(&endpoint, &payload)))
            .unwrap_or_else(|_| Err(RelayError::delivery(&endpoint, "transport panicked")))
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if self.registered && !self.shut_down {
            let _ = self.shutdown();
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("config", &self.config)
            .field("pending_events", &self.queue.len())
            .field("registered", &self.registered)
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}
