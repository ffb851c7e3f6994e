use std::path::PathBuf;

use super::{ScanRoot, SourceLocation};

/// Resolves a scan root into the package directories to scan.
pub trait PackageResolver: Send + Sync {
    fn resolve(&self, root: &ScanRoot) -> Result<Vec<SourceLocation>, ResolveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("scan root does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("scan root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}
