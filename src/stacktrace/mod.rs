//! Stacktrace normalization.
//!
//! Runtime call traces record, for every entry, the file and line of the
//! *caller's* call site next to the *callee's* function name. Read naively
//! that pairs every function with the wrong location. [`build_stacktrace`]
//! shifts the locations down one level so each display frame reads as
//! `file:line:method` for the same call site, and closes the trace with a
//! synthetic `[main]` frame for the trace root.
//!
//! # Examples
//!
//! ```
//! use error_relay::stacktrace::{build_stacktrace, RawFrame};
//!
//! let raw = [RawFrame::new("f1").at("a.rs", 10), RawFrame::new("f2").at("b.rs", 20)];
//! let trace = build_stacktrace("c.rs", 5, Some(&raw), None);
//!
//! let rendered: Vec<String> = trace.iter().map(ToString::to_string).collect();
//! assert_eq!(rendered, ["c.rs:5:f1", "a.rs:10:f2", "b.rs:20:[main]"]);
//! ```

mod backtrace;
mod project_root;

pub use backtrace::{capture_raw_frames, parse_backtrace, shift_call_sites, ResolvedFrame};
pub use project_root::ProjectRoot;

use crate::types::{FrameVec, StackFrame, Stacktrace};
use serde::{Deserialize, Serialize};

/// Method name of the lone frame built when no call trace is available.
pub const UNKNOWN_METHOD: &str = "[unknown]";
/// Method name of the synthetic trace-root frame.
pub const MAIN_METHOD: &str = "[main]";
/// File recorded for frames of native or internal calls.
pub const INTERNAL_FILE: &str = "[internal]";

/// One entry of a raw runtime call trace.
///
/// `file` and `line` describe where `function` was *called from*, not where
/// it lives. Native and internal calls carry no location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawFrame {
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl RawFrame {
    /// Creates an entry without a recorded call site.
    #[inline]
    pub fn new<S: Into<String>>(function: S) -> Self {
        Self {
            function: function.into(),
            file: None,
            line: None,
        }
    }

    /// Records the call site of this entry.
    #[must_use]
    #[inline]
    pub fn at<S: Into<String>>(mut self, file: S, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Returns the call site, or `None` unless both file and line are known.
    #[inline]
    pub fn call_site(&self) -> Option<(&str, u32)> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some((file.as_str(), line)),
            _ => None,
        }
    }
}

/// Builds display frames from a top location and an optional raw trace.
///
/// Without a raw trace (a fatal error observed after unwinding, for
/// instance) the result is a single `[unknown]` frame at the top location.
/// Otherwise each raw entry yields one frame pairing the *current* location
/// with the entry's function, after which the current location advances to
/// the entry's call site (or `("[internal]", 0)` when it has none). A final
/// `[main]` frame sits at the last location reached.
pub fn build_stacktrace(
    top_file: &str,
    top_line: u32,
    raw_frames: Option<&[RawFrame]>,
    project_root: Option<&ProjectRoot>,
) -> Stacktrace {
    let Some(raw_frames) = raw_frames else {
        let mut frames = FrameVec::new();
        frames.push(StackFrame::resolve(top_file, top_line, UNKNOWN_METHOD, project_root));
        return Stacktrace::from_frames(frames);
    };

    let mut frames = FrameVec::with_capacity(raw_frames.len() + 1);
    let (mut file, mut line) = (top_file, top_line);

    for raw in raw_frames {
        frames.push(StackFrame::resolve(file, line, raw.function.as_str(), project_root));
        (file, line) = raw.call_site().unwrap_or((INTERNAL_FILE, 0));
    }

    frames.push(StackFrame::resolve(file, line, MAIN_METHOD, project_root));
    Stacktrace::from_frames(frames)
}
