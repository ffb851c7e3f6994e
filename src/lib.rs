/// gotest-labels
///
/// Selects Go tests by the `@key=value` labels in their doc comments, using a
/// small boolean expression language, and renders the selection as a name
/// pattern for `go test`.
pub mod cli;
pub mod discovery;
pub mod error;
pub mod expression;
pub mod labels;
pub mod logging;
pub mod output;
pub mod runner_args;
pub mod scanner;
pub mod selection;

pub use error::{Error, Result};
pub use expression::{LabelFilter, Node};
pub use labels::Labels;
pub use selection::{Orchestrator, Selection, SelectorConfig};
