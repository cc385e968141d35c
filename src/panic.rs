//! Panic reporting.
//!
//! [`install_panic_hook`] turns every panic into an exception report named
//! `panic`, located where the panic was raised. The hook that was installed
//! before keeps running afterwards, so the usual panic message still reaches
//! stderr.

use crate::exception::Exception;
use crate::notifier::Notifier;
use crate::stacktrace::{capture_raw_frames, INTERNAL_FILE};
use parking_lot::Mutex;
use std::any::Any;
use std::panic;
use std::sync::Arc;

/// Class name given to panic reports.
pub const PANIC_CLASS: &str = "panic";

/// A notifier shared between the application and the panic hook.
pub type SharedNotifier = Arc<Mutex<Notifier>>;

/// Wraps a notifier for use from the panic hook.
pub fn share(notifier: Notifier) -> SharedNotifier {
    Arc::new(Mutex::new(notifier))
}

/// Installs a process-wide panic hook that reports through `notifier`.
///
/// A panic raised while the notifier is locked (e.g. inside a metadata
/// callback) is not reported, only passed on to the previous hook.
pub fn install_panic_hook(notifier: SharedNotifier) {
    let previous = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let (file, line) = info
            .location()
            .map_or((INTERNAL_FILE, 0), |loc| (loc.file(), loc.line()));
        let exception = Exception::new(PANIC_CLASS, panic_message(info.payload()))
            .at(file, line)
            .with_trace(capture_raw_frames());

        match notifier.try_lock() {
            Some(mut notifier) => {
                let _ = notifier.handle_exception(&exception);
            }
            None => tracing::debug!("notifier busy, panic not reported"),
        }

        previous(info);
    }));
}

/// Extracts the message of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Box<dyn Any>".to_string())
}
