use crate::stacktrace::ProjectRoot;
use crate::types::FrameVec;
use core::fmt::{self, Display};
use serde::Serialize;

/// One display frame of a normalized stacktrace.
///
/// Frames are immutable once built. `in_project` is derived from the
/// configured [`ProjectRoot`] when the frame is resolved and cannot be set
/// by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub(crate) file: String,
    #[serde(rename = "lineNumber")]
    pub(crate) line: u32,
    pub(crate) method: String,
    pub(crate) in_project: bool,
}

impl StackFrame {
    /// Resolves a frame against an optional project root.
    ///
    /// When the file lies under the root, the root prefix (and one trailing
    /// separator) is stripped from the displayed path and the frame is
    /// tagged in-project.
    pub fn resolve<F, M>(file: F, line: u32, method: M, project_root: Option<&ProjectRoot>) -> Self
    where
        F: AsRef<str>,
        M: Into<String>,
    {
        let file = file.as_ref();
        let (file, in_project) = match project_root.and_then(|root| root.strip(file)) {
            Some(relative) => (relative.to_string(), true),
            None => (file.to_string(), false),
        };

        Self {
            file,
            line,
            method: method.into(),
            in_project,
        }
    }

    /// Source file, relative to the project root when in-project.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number, `0` when unknown.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Function the frame executes, or `[main]`/`[unknown]`.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns `true` when the file lies under the project root.
    #[inline]
    pub fn in_project(&self) -> bool {
        self.in_project
    }
}

impl Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.method)
    }
}

/// Ordered display frames, innermost call site first.
///
/// A stacktrace is never empty: the builders in
/// [`stacktrace`](crate::stacktrace) always terminate it with a `[main]`
/// frame, or produce a lone `[unknown]` frame when no call trace exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Stacktrace {
    frames: FrameVec,
}

impl Stacktrace {
    pub(crate) fn from_frames(frames: FrameVec) -> Self {
        debug_assert!(!frames.is_empty(), "empty stacktrace");
        Self { frames }
    }

    /// Returns the frames, innermost first.
    #[inline]
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Returns the number of frames (always at least one).
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns the innermost frame.
    #[inline]
    pub fn top(&self) -> &StackFrame {
        &self.frames[0]
    }

    /// Frames from innermost to outermost.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, StackFrame> {
        self.frames.iter()
    }
}

impl<'a> IntoIterator for &'a Stacktrace {
    type Item = &'a StackFrame;
    type IntoIter = core::slice::Iter<'a, StackFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl Display for Stacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}
