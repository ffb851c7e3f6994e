//! Resolution of scan roots into Go package directories.

pub mod go;
pub mod resolver;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use go::GoPackageResolver;
pub use resolver::{PackageResolver, ResolveError};

pub const RECURSIVE_SUFFIX: &str = "...";

pub const DEFAULT_SCAN_ROOT: &str = "./...";

/// A package directory and the test files in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// A directory to search, optionally with everything below it, written the
/// way the go tool takes package patterns: `./pkg` or `./pkg/...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRoot {
    pub path: PathBuf,
    pub recursive: bool,
}

impl ScanRoot {
    pub fn new(path: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            recursive,
        }
    }
}

impl Default for ScanRoot {
    fn default() -> Self {
        Self::new(".", true)
    }
}

impl FromStr for ScanRoot {
    type Err = std::convert::Infallible;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let Some(prefix) = pattern.strip_suffix(RECURSIVE_SUFFIX) else {
            return Ok(Self::new(pattern, false));
        };

        let prefix = prefix.trim_end_matches('/');
        let path = if prefix.is_empty() { "." } else { prefix };
        Ok(Self::new(path, true))
    }
}

impl fmt::Display for ScanRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.recursive {
            write!(f, "{}/{RECURSIVE_SUFFIX}", self.path.display())
        } else {
            write!(f, "{}", self.path.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(pattern: &str) -> ScanRoot {
        pattern.parse().unwrap()
    }

    #[test]
    fn test_parse_recursive_patterns() {
        assert_eq!(root("./..."), ScanRoot::new(".", true));
        assert_eq!(root("..."), ScanRoot::new(".", true));
        assert_eq!(root("./pkg/..."), ScanRoot::new("./pkg", true));
        assert_eq!(root("/abs/dir/..."), ScanRoot::new("/abs/dir", true));
    }

    #[test]
    fn test_parse_single_directory() {
        assert_eq!(root("./examples/simple"), ScanRoot::new("./examples/simple", false));
        assert_eq!(root("."), ScanRoot::new(".", false));
    }

    #[test]
    fn test_default_is_recursive_current_dir() {
        assert_eq!(ScanRoot::default(), root(DEFAULT_SCAN_ROOT));
    }

    #[test]
    fn test_display_round_trips() {
        for pattern in ["./...", "./pkg", "./pkg/..."] {
            assert_eq!(root(pattern).to_string(), pattern);
        }
    }
}
