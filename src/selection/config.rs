use regex::Regex;

use crate::error::{Error, SelectionError};
use crate::expression::LabelFilter;
use crate::runner_args::RunnerArgs;

/// Environment variable holding the label expression when no command line
/// value is given.
pub const LABELS_ENV_VAR: &str = "TEST_LABELS";

/// Everything that decides which tests are selected in one pass.
#[derive(Debug, Clone, Default)]
pub struct SelectorConfig {
    pub label_filter: LabelFilter,
    pub name_selector: Option<Regex>,
    pub list_mode: bool,
}

impl SelectorConfig {
    pub fn new(label_filter: LabelFilter) -> Self {
        Self {
            label_filter,
            ..Self::default()
        }
    }

    pub fn with_name_selector(mut self, pattern: &str) -> Result<Self, SelectionError> {
        let regex = Regex::new(pattern)
            .map_err(|e| SelectionError::invalid_name_selector(pattern, e.to_string()))?;
        self.name_selector = Some(regex);
        Ok(self)
    }

    pub fn with_label_filter(mut self, label_filter: LabelFilter) -> Self {
        self.label_filter = label_filter;
        self
    }

    pub fn with_list_mode(mut self, list_mode: bool) -> Self {
        self.list_mode = list_mode;
        self
    }

    /// Builds the config from parsed runner arguments and an optional
    /// environment value. `-labels` overrides the environment value entirely.
    pub fn from_runner_args(args: &RunnerArgs, env_labels: Option<&str>) -> Result<Self, Error> {
        let label_filter = LabelFilter::from_sources(args.labels.as_deref(), env_labels)?;
        let mut config = Self::new(label_filter).with_list_mode(args.list_mode);
        if let Some(pattern) = &args.run_pattern {
            config = config.with_name_selector(pattern)?;
        }
        Ok(config)
    }

    pub fn labels_enabled(&self) -> bool {
        self.label_filter.is_enabled()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name_selector
            .as_ref()
            .map_or(true, |regex| regex.is_match(name))
    }
}
