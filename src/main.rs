use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use gotest_labels::cli::Args;
use gotest_labels::logging::{self, Verbosity};
use gotest_labels::output::OutputFormatter;
use gotest_labels::selection::{Orchestrator, Selection};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet))?;

    let mut code = ExitCode::SUCCESS;
    let config = args.selector_config();

    let selection = match &config {
        Ok(config) => {
            let orchestrator = Orchestrator::new(args.roots.clone());
            orchestrator.select(config).unwrap_or_else(|e| {
                error!(error = %e, "test selection failed");
                code = ExitCode::FAILURE;
                Selection::empty(config.list_mode, config.labels_enabled())
            })
        }
        // Nothing is selected, and the runner arguments only lose `-labels`.
        Err(e) => {
            error!(error = %e, "invalid selector arguments");
            code = ExitCode::FAILURE;
            let (_, list_mode) = args.name_selector();
            Selection::empty(list_mode, false)
        }
    };
    let label_expression = config
        .as_ref()
        .map_or("", |config| config.label_filter.source());

    let output = OutputFormatter::format(
        &selection,
        label_expression,
        &args.runner_args,
        args.format,
    )
    .with_context(|| format!("Failed to render {} output", args.format.as_str()))?;
    print!("{output}");

    Ok(code)
}
