use core::fmt::{self, Display};

/// The configured project root together with its match pattern.
///
/// The pattern is derived in [`ProjectRoot::new`] and never stored on its
/// own, so root and pattern always change together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    root: String,
    pattern: Vec<char>,
}

impl ProjectRoot {
    /// Creates a root and derives its match pattern.
    pub fn new<S: Into<String>>(root: S) -> Self {
        let root = root.into();
        let pattern = root.chars().map(fold).collect();
        Self { root, pattern }
    }

    /// The root as configured.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.root
    }

    /// Returns `true` when `file` starts with the root.
    ///
    /// Comparison ignores case and treats `/` and `\` as the same separator.
    #[inline]
    pub fn contains(&self, file: &str) -> bool {
        self.strip(file).is_some()
    }

    /// Strips the root and one following separator from `file`.
    ///
    /// Returns `None` when `file` does not lie under the root.
    pub fn strip<'a>(&self, file: &'a str) -> Option<&'a str> {
        let mut chars = file.chars();
        for &expected in &self.pattern {
            let actual = chars.next()?;
            if fold(actual) != expected {
                return None;
            }
        }

        let rest = chars.as_str();
        Some(rest.strip_prefix(['/', '\\']).unwrap_or(rest))
    }
}

impl Display for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)
    }
}

#[inline]
fn fold(c: char) -> char {
    match c {
        '\\' => '/',
        c if c.is_ascii() => c.to_ascii_lowercase(),
        c => c.to_lowercase().next().unwrap_or(c),
    }
}
