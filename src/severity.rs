//! Error severities and reporting masks.
//!
//! A [`Severity`] is a bit set. Single-bit values name one kind of error,
//! multi-bit values act as reporting masks (which kinds to report).
//!
//! # Examples
//!
//! ```
//! use error_relay::Severity;
//!
//! let mask = Severity::ALL & !Severity::NOTICE;
//! assert!(mask.intersects(Severity::WARNING));
//! assert!(!mask.intersects(Severity::NOTICE));
//! assert!(Severity::PARSE_ERROR.is_fatal());
//! ```

use core::fmt::{self, Display};
use core::ops::{BitAnd, BitOr, Not};
use serde::{Deserialize, Serialize};

/// A set of error severities, stored as the classic bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u32);

impl Severity {
    /// The empty set.
    pub const NONE: Self = Self(0);
    pub const FATAL_ERROR: Self = Self(1);
    pub const WARNING: Self = Self(1 << 1);
    pub const PARSE_ERROR: Self = Self(1 << 2);
    pub const NOTICE: Self = Self(1 << 3);
    pub const CORE_ERROR: Self = Self(1 << 4);
    pub const CORE_WARNING: Self = Self(1 << 5);
    pub const COMPILE_ERROR: Self = Self(1 << 6);
    pub const COMPILE_WARNING: Self = Self(1 << 7);
    pub const USER_ERROR: Self = Self(1 << 8);
    pub const USER_WARNING: Self = Self(1 << 9);
    pub const USER_NOTICE: Self = Self(1 << 10);
    pub const STRICT: Self = Self(1 << 11);
    pub const RECOVERABLE_ERROR: Self = Self(1 << 12);
    pub const DEPRECATED: Self = Self(1 << 13);
    pub const USER_DEPRECATED: Self = Self(1 << 14);

    /// Every known severity.
    pub const ALL: Self = Self((1 << 15) - 1);

    /// Severities that end the execution; they are only observable from the
    /// shutdown hook.
    pub const FATAL: Self = Self(
        Self::FATAL_ERROR.0
            | Self::PARSE_ERROR.0
            | Self::CORE_ERROR.0
            | Self::CORE_WARNING.0
            | Self::COMPILE_ERROR.0
            | Self::COMPILE_WARNING.0
            | Self::STRICT.0,
    );

    /// Builds a set from raw bits; unknown bits are kept.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` when the two sets share at least one severity.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` when every severity in `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Returns `true` for members of [`Severity::FATAL`].
    #[inline]
    pub const fn is_fatal(self) -> bool {
        Self::FATAL.contains(self)
    }

    /// Human-readable name, used as the error class of handler reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::FATAL_ERROR => "Fatal Error",
            Self::WARNING => "Warning",
            Self::PARSE_ERROR => "Parse Error",
            Self::NOTICE => "Notice",
            Self::CORE_ERROR => "Core Error",
            Self::CORE_WARNING => "Core Warning",
            Self::COMPILE_ERROR => "Compile Error",
            Self::COMPILE_WARNING => "Compile Warning",
            Self::USER_ERROR => "User Error",
            Self::USER_WARNING => "User Warning",
            Self::USER_NOTICE => "User Notice",
            Self::STRICT => "Strict Standards",
            Self::RECOVERABLE_ERROR => "Recoverable Error",
            Self::DEPRECATED => "Deprecated",
            Self::USER_DEPRECATED => "User Deprecated",
            _ => "Error",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::ALL
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl BitOr for Severity {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Severity {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Severity {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

impl From<u32> for Severity {
    #[inline]
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}
