use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use super::resolver::{PackageResolver, ResolveError};
use super::{ScanRoot, SourceLocation};

pub const TEST_FILE_SUFFIX: &str = "_test.go";

/// Directories the go tool never treats as packages.
pub const EXCLUDED_DIRS: &[&str] = &["testdata", "vendor"];

/// Marks the root of a module. A nested one belongs to another module and
/// is not part of `./...`.
pub const MODULE_FILE: &str = "go.mod";

/// Finds Go package directories holding `_test.go` files under a scan root.
///
/// Mirrors the go tool's `./...` expansion: `testdata` and `vendor`
/// directories, anything whose name starts with `.` or `_`, and nested
/// modules are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoPackageResolver;

impl PackageResolver for GoPackageResolver {
    fn resolve(&self, root: &ScanRoot) -> Result<Vec<SourceLocation>, ResolveError> {
        let path = &root.path;
        if !path.exists() {
            return Err(ResolveError::MissingRoot(path.clone()));
        }
        if !path.is_dir() {
            return Err(ResolveError::NotADirectory(path.clone()));
        }

        let files = walk_test_files(path, root.recursive)?;

        let mut packages: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for file in files {
            let dir = file.parent().unwrap_or(path).to_path_buf();
            packages.entry(dir).or_default().push(file);
        }

        let locations: Vec<SourceLocation> = packages
            .into_iter()
            .map(|(dir, files)| SourceLocation { dir, files })
            .collect();
        debug!(root = %root, packages = locations.len(), "resolved scan root");
        Ok(locations)
    }
}

fn walk_test_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ResolveError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e));

    for entry in walker {
        let entry = entry.map_err(|e| ResolveError::Walk {
            path: root.to_path_buf(),
            source: e,
        })?;

        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(TEST_FILE_SUFFIX)
        {
            trace!(file = %entry.path().display(), "found test file");
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || name.starts_with('_') {
        return true;
    }
    entry.file_type().is_dir()
        && (EXCLUDED_DIRS.contains(&name.as_ref()) || is_nested_module(entry))
}

fn is_nested_module(entry: &DirEntry) -> bool {
    let nested = entry.path().join(MODULE_FILE).is_file();
    if nested {
        trace!(dir = %entry.path().display(), "skipping nested module");
    }
    nested
}
