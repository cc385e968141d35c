//! Raw call traces from [`std::backtrace::Backtrace`].
//!
//! Rust backtraces pair each function with a location *inside* it, while
//! [`build_stacktrace`](super::build_stacktrace) expects every entry to carry
//! the location it was *called from*. [`shift_call_sites`] converts between
//! the two conventions.

use super::RawFrame;
use std::backtrace::{Backtrace, BacktraceStatus};

/// Function-name prefixes belonging to the runtime or to this crate.
const REPORTER_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "error_relay::",
    "__rust",
    "rust_begin_unwind",
];

/// A resolved backtrace frame: a function and a location inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedFrame {
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

/// Captures the caller's call trace as raw entries.
///
/// Leading frames from the runtime and from this crate are dropped. Returns
/// an empty trace when backtraces are disabled (`RUST_BACKTRACE` /
/// `RUST_LIB_BACKTRACE` unset) or unsupported on the platform.
pub fn capture_raw_frames() -> Vec<RawFrame> {
    let backtrace = Backtrace::capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }

    let frames: Vec<ResolvedFrame> = parse_backtrace(&backtrace.to_string())
        .into_iter()
        .skip_while(|frame| is_reporter_frame(&frame.function))
        .collect();

    shift_call_sites(&frames)
}

/// Parses the `Display` rendering of a [`Backtrace`].
///
/// Understands numbered symbol lines (`  3: app::run`), unnumbered inlined
/// symbol lines and `at path:line:column` location lines. Anything else,
/// such as the trailing `note:` hint, is ignored.
pub fn parse_backtrace(text: &str) -> Vec<ResolvedFrame> {
    let mut frames: Vec<ResolvedFrame> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("note:") {
            continue;
        }

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (file, line) = parse_location(location);
                frame.file = Some(file.to_string());
                frame.line = line;
            }
            continue;
        }

        let function = match line.split_once(": ") {
            Some((index, symbol)) if index.chars().all(|c| c.is_ascii_digit()) => symbol,
            _ if frames.is_empty() => continue,
            _ => line,
        };
        frames.push(ResolvedFrame {
            function: function.to_string(),
            ..Default::default()
        });
    }

    frames
}

/// Re-pairs each function with the location of its caller.
///
/// Entry `i` keeps frame `i`'s function and takes frame `i + 1`'s location,
/// the last entry has no location.
pub fn shift_call_sites(frames: &[ResolvedFrame]) -> Vec<RawFrame> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let caller = frames.get(i + 1);
            RawFrame {
                function: frame.function.clone(),
                file: caller.and_then(|c| c.file.clone()),
                line: caller.and_then(|c| c.line),
            }
        })
        .collect()
}

fn is_reporter_frame(function: &str) -> bool {
    let function = function.trim_start_matches('<');
    REPORTER_PREFIXES
        .iter()
        .any(|prefix| function.starts_with(prefix))
}

/// Splits `path:line[:column]` from the right, tolerating drive letters.
fn parse_location(location: &str) -> (&str, Option<u32>) {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next().unwrap_or(location);
    let middle = parts.next();
    let rest = parts.next();

    match (rest, middle) {
        (Some(path), Some(line)) if line.parse::<u32>().is_ok() && last.parse::<u32>().is_ok() => {
            (path, line.parse().ok())
        }
        (_, Some(_)) if last.parse::<u32>().is_ok() => {
            let split = location.len() - last.len() - 1;
            (&location[..split], last.parse().ok())
        }
        _ => (location, None),
    }
}
