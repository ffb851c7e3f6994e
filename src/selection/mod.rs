//! Runs the scanner over every resolved package and applies the label filter
//! and the name selector.

mod config;

pub use config::{SelectorConfig, LABELS_ENV_VAR};

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

use crate::discovery::{GoPackageResolver, PackageResolver, ScanRoot, SourceLocation};
use crate::error::SelectionError;
use crate::labels::Labels;
use crate::runner_args::{LIST_FLAG, RUN_FLAG};
use crate::scanner::{Scanner, TestEntity};

/// Outcome of one selection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub tests: BTreeMap<String, TestEntity>,
    pub list_mode: bool,
    pub labels_enabled: bool,
}

impl Selection {
    pub fn empty(list_mode: bool, labels_enabled: bool) -> Self {
        Self {
            tests: BTreeMap::new(),
            list_mode,
            labels_enabled,
        }
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    pub fn labels(&self) -> BTreeMap<&str, &Labels> {
        self.tests
            .iter()
            .map(|(name, entity)| (name.as_str(), &entity.labels))
            .collect()
    }

    /// Name pattern matching exactly the selected tests.
    pub fn pattern(&self) -> String {
        selection_pattern(self.names())
    }

    /// `-test.run <pattern>` or `-test.list <pattern>`; empty when no label
    /// filter is active, so the runner keeps its own selectors.
    pub fn runner_args(&self) -> Vec<String> {
        if !self.labels_enabled {
            return Vec::new();
        }
        let flag = if self.list_mode { LIST_FLAG } else { RUN_FLAG };
        vec![flag.to_string(), self.pattern()]
    }
}

/// `^(?:a|b|c)$`: every alternative is anchored at both ends.
pub fn selection_pattern<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let alternatives: Vec<String> = names.into_iter().map(regex::escape).collect();
    format!("^(?:{})$", alternatives.join("|"))
}

/// Keeps the entities accepted by the label filter, then those matched by
/// the name selector.
pub fn filter_entities(
    entities: BTreeMap<String, TestEntity>,
    config: &SelectorConfig,
) -> BTreeMap<String, TestEntity> {
    entities
        .into_iter()
        .filter(|(_, entity)| config.label_filter.matches(&entity.labels))
        .filter(|(name, _)| config.matches_name(name))
        .collect()
}

pub struct Orchestrator {
    roots: Vec<ScanRoot>,
    resolver: Box<dyn PackageResolver>,
    scanner: Scanner,
}

impl Orchestrator {
    pub fn new(roots: Vec<ScanRoot>) -> Self {
        Self {
            roots,
            resolver: Box::new(GoPackageResolver),
            scanner: Scanner::new(),
        }
    }

    pub fn with_resolver<R: PackageResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_scanner(mut self, scanner: Scanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn roots(&self) -> &[ScanRoot] {
        &self.roots
    }

    /// Resolves every root before scanning anything.
    pub fn resolve(&self) -> Result<Vec<SourceLocation>, SelectionError> {
        let mut locations = Vec::new();
        for root in &self.roots {
            let resolved = self
                .resolver
                .resolve(root)
                .map_err(|e| SelectionError::package_resolution(e.to_string()))?;
            locations.extend(resolved);
        }
        Ok(locations)
    }

    /// All tests under the scan roots, unfiltered. A name found in several
    /// packages keeps the entity of the last one scanned.
    pub fn collect(&self) -> Result<BTreeMap<String, TestEntity>, SelectionError> {
        let mut all = BTreeMap::new();
        for location in self.resolve()? {
            for entity in self.scanner.scan_location(&location)? {
                if let Some(previous) = all.insert(entity.name.clone(), entity) {
                    debug!(
                        name = %previous.name,
                        replaced = %previous.file.display(),
                        "test name found in more than one package"
                    );
                }
            }
        }
        Ok(all)
    }

    pub fn select(&self, config: &SelectorConfig) -> Result<Selection, SelectionError> {
        let all = self.collect()?;
        let found = all.len();
        let tests = filter_entities(all, config);

        info!(
            found,
            selected = tests.len(),
            labels = config.label_filter.source(),
            list_mode = config.list_mode,
            "selected tests"
        );

        Ok(Selection {
            tests,
            list_mode: config.list_mode,
            labels_enabled: config.labels_enabled(),
        })
    }

    /// Like [`Orchestrator::select`], logging the error and returning an
    /// empty selection instead.
    pub fn select_or_empty(&self, config: &SelectorConfig) -> Selection {
        self.select(config).unwrap_or_else(|e| {
            error!(error = %e, "test selection failed");
            Selection::empty(config.list_mode, config.labels_enabled())
        })
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(vec![ScanRoot::default()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ResolveError;
    use crate::expression::LabelFilter;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn entity(name: &str, pairs: &[(&str, &str)]) -> (String, TestEntity) {
        (
            name.to_string(),
            TestEntity {
                name: name.to_string(),
                file: PathBuf::from("demo_test.go"),
                line: 1,
                labels: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        )
    }

    fn alpha_beta_gamma() -> BTreeMap<String, TestEntity> {
        BTreeMap::from([
            entity("Alpha", &[("group", "demo")]),
            entity("Beta", &[("group", "integration")]),
            entity("Gamma", &[("group", "demo"), ("env", "prod")]),
        ])
    }

    fn config(expression: &str) -> SelectorConfig {
        SelectorConfig::new(LabelFilter::parse(expression).unwrap())
    }

    #[test]
    fn test_label_filter_selects_matching_entities() {
        let selected = filter_entities(alpha_beta_gamma(), &config("group=demo"));
        let names: Vec<&str> = selected.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);

        let selection = Selection {
            tests: selected,
            list_mode: false,
            labels_enabled: true,
        };
        assert_eq!(selection.pattern(), "^(?:Alpha|Gamma)$");
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let selected = filter_entities(alpha_beta_gamma(), &SelectorConfig::default());
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn test_name_selector_is_applied_after_labels() {
        let config = config("group=demo").with_name_selector("^Al").unwrap();
        let selected = filter_entities(alpha_beta_gamma(), &config);
        let names: Vec<&str> = selected.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Alpha"]);
    }

    #[test]
    fn test_selection_pattern_escapes_names() {
        assert_eq!(selection_pattern(["A.b", "C"]), r"^(?:A\.b|C)$");
        assert_eq!(selection_pattern(std::iter::empty()), "^(?:)$");
    }

    #[test]
    fn test_runner_args_follow_mode() {
        let mut selection = Selection {
            tests: alpha_beta_gamma(),
            list_mode: false,
            labels_enabled: true,
        };
        assert_eq!(
            selection.runner_args(),
            vec!["-test.run", "^(?:Alpha|Beta|Gamma)$"]
        );

        selection.list_mode = true;
        assert_eq!(selection.runner_args()[0], "-test.list");

        selection.labels_enabled = false;
        assert!(selection.runner_args().is_empty());
    }

    #[test]
    fn test_selection_labels_view() {
        let selection = Selection {
            tests: alpha_beta_gamma(),
            list_mode: false,
            labels_enabled: false,
        };
        let labels = selection.labels();
        assert_eq!(labels["Gamma"]["env"], "prod");
        assert_eq!(labels.len(), 3);
    }

    struct FailingResolver;

    impl PackageResolver for FailingResolver {
        fn resolve(&self, _root: &ScanRoot) -> Result<Vec<SourceLocation>, ResolveError> {
            Err(ResolveError::MissingRoot(PathBuf::from("gone")))
        }
    }

    #[test]
    fn test_resolution_failure_is_reported() {
        let orchestrator = Orchestrator::default().with_resolver(FailingResolver);
        let err = orchestrator.select(&SelectorConfig::default()).unwrap_err();
        assert!(matches!(err, SelectionError::PackageResolution { .. }));
    }

    #[test]
    fn test_select_or_empty_degrades() {
        let orchestrator = Orchestrator::default().with_resolver(FailingResolver);
        let config = config("group=demo").with_list_mode(true);
        let selection = orchestrator.select_or_empty(&config);
        assert!(selection.is_empty());
        assert!(selection.list_mode);
        assert!(selection.labels_enabled);
    }
}
