use clap::{Parser, ValueEnum};

use crate::discovery::{ScanRoot, DEFAULT_SCAN_ROOT};
use crate::error::{Error, ExpressionError, SelectionError};
use crate::expression::LabelFilter;
use crate::runner_args::RunnerArgs;
use crate::selection::{SelectorConfig, LABELS_ENV_VAR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Args,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Args => "args",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gotest-labels")]
#[command(about = "Select Go tests by the @key=value labels in their doc comments", long_about = None)]
pub struct Args {
    /// Package pattern to scan (e.g. ./..., ./pkg). Can be specified multiple times.
    #[arg(long = "root", value_name = "PATTERN", default_value = DEFAULT_SCAN_ROOT)]
    pub roots: Vec<ScanRoot>,

    /// Label expression, e.g. "group=demo && !env=prod"
    #[arg(short, long, env = LABELS_ENV_VAR, value_name = "EXPR")]
    pub labels: Option<String>,

    /// Keep only tests whose name matches this regex
    #[arg(long, value_name = "REGEX", conflicts_with = "list")]
    pub run: Option<String>,

    /// Like --run, but the runner lists the tests instead of running them
    #[arg(long, value_name = "REGEX")]
    pub list: Option<String>,

    /// Output format (text, json, args)
    #[arg(short = 'f', long, default_value = "text")]
    pub format: OutputFormat,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Arguments of the go test binary; -labels, -test.run and -test.list are read from them
    #[arg(last = true, value_name = "RUNNER_ARGS")]
    pub runner_args: Vec<String>,
}

impl Args {
    pub fn selector_config(&self) -> Result<SelectorConfig, Error> {
        let label_filter = self.label_filter()?;
        Ok(self.name_selector_config()?.with_label_filter(label_filter))
    }

    /// `-labels` among the runner arguments wins over `--labels`, which
    /// clap already resolved against `TEST_LABELS`.
    pub fn label_filter(&self) -> Result<LabelFilter, ExpressionError> {
        let runner = RunnerArgs::parse(&self.runner_args);
        LabelFilter::from_sources(runner.labels.as_deref(), self.labels.as_deref())
    }

    /// The name selector and list mode alone, with no label filter.
    pub fn name_selector_config(&self) -> Result<SelectorConfig, SelectionError> {
        let (pattern, list_mode) = self.name_selector();
        let config = SelectorConfig::default().with_list_mode(list_mode);
        match pattern.filter(|p| !p.is_empty()) {
            Some(pattern) => config.with_name_selector(&pattern),
            None => Ok(config),
        }
    }

    /// Name pattern and list mode. `--run`/`--list` win over the runner's
    /// `-test.run`/`-test.list`.
    pub fn name_selector(&self) -> (Option<String>, bool) {
        match (&self.run, &self.list) {
            (Some(pattern), _) => (Some(pattern.clone()), false),
            (None, Some(pattern)) => (Some(pattern.clone()), true),
            (None, None) => {
                let runner = RunnerArgs::parse(&self.runner_args);
                (runner.run_pattern, runner.list_mode)
            }
        }
    }
}
