//! Finds test functions in a source location and reads their labels.

mod comments;
pub mod go;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::discovery::SourceLocation;
use crate::error::ScanError;
use crate::labels::{collect_labels, Labels};
pub use comments::{comment_lines, doc_lines};
pub use go::GoDeclarationSource;

/// Shape of a parameter type, as far as test detection cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Pointer(Box<TypeShape>),
    Qualified { package: String, name: String },
    Named(String),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub shape: TypeShape,
}

/// A top-level function as seen by the declaration parser: its name, its
/// parameters and the raw comment tokens directly above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub line: usize,
    pub params: Vec<Param>,
    pub doc: Vec<String>,
}

/// Source of declarations for a single file.
pub trait DeclarationSource: Send + Sync {
    fn declarations(&self, file: &Path) -> Result<Vec<Declaration>, ScanError>;
}

/// What makes a declaration a test: a name prefix and a single pointer
/// parameter to the test context type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConvention {
    pub name_prefix: String,
    pub context_type: String,
}

impl Default for TestConvention {
    fn default() -> Self {
        Self {
            name_prefix: "Test".to_string(),
            context_type: "T".to_string(),
        }
    }
}

impl TestConvention {
    pub fn is_test(&self, declaration: &Declaration) -> bool {
        declaration.name.starts_with(&self.name_prefix) && self.takes_context(&declaration.params)
    }

    fn takes_context(&self, params: &[Param]) -> bool {
        let [param] = params else {
            return false;
        };
        match &param.shape {
            TypeShape::Pointer(inner) => matches!(
                inner.as_ref(),
                TypeShape::Qualified { name, .. } if *name == self.context_type
            ),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestEntity {
    pub name: String,
    pub file: PathBuf,
    pub line: usize,
    pub labels: Labels,
}

pub struct Scanner {
    source: Box<dyn DeclarationSource>,
    convention: TestConvention,
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_source(GoDeclarationSource)
    }

    pub fn with_source<S: DeclarationSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            convention: TestConvention::default(),
        }
    }

    pub fn with_convention(mut self, convention: TestConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn convention(&self) -> &TestConvention {
        &self.convention
    }

    /// Scans every file of the location. The first file that fails to parse
    /// aborts the whole location.
    pub fn scan_location(&self, location: &SourceLocation) -> Result<Vec<TestEntity>, ScanError> {
        let mut entities = Vec::new();
        for file in &location.files {
            entities.extend(self.scan_file(file)?);
        }
        debug!(
            dir = %location.dir.display(),
            files = location.files.len(),
            tests = entities.len(),
            "scanned location"
        );
        Ok(entities)
    }

    /// Test name to labels for one location.
    pub fn scan_labels(
        &self,
        location: &SourceLocation,
    ) -> Result<BTreeMap<String, Labels>, ScanError> {
        Ok(self
            .scan_location(location)?
            .into_iter()
            .map(|entity| (entity.name, entity.labels))
            .collect())
    }

    pub fn scan_file(&self, file: &Path) -> Result<Vec<TestEntity>, ScanError> {
        let declarations = self.source.declarations(file)?;

        Ok(declarations
            .into_iter()
            .filter(|declaration| {
                let is_test = self.convention.is_test(declaration);
                if !is_test {
                    trace!(name = %declaration.name, "not a test function");
                }
                is_test
            })
            .map(|declaration| {
                let lines = doc_lines(&declaration.doc);
                let labels = collect_labels(lines.iter().map(String::as_str));
                trace!(name = %declaration.name, ?labels, "test function");
                TestEntity {
                    name: declaration.name,
                    file: file.to_path_buf(),
                    line: declaration.line,
                    labels,
                }
            })
            .collect())
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}
