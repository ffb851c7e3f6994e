//! Boolean label expressions: `&&`, `||`, `!`, parentheses and `key=value`
//! conditions.

mod ast;
mod lexer;
mod parser;

pub use ast::{Node, Operator};
pub use lexer::{tokenize, Token};
pub use parser::{parse, parse_tokens, MAX_DEPTH};

use tracing::debug;

use crate::error::ExpressionError;
use crate::labels::Labels;

/// The label filter of one invocation, parsed once and read-only afterwards.
///
/// An empty source string means no filter: every test passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelFilter {
    source: String,
    root: Option<Node>,
}

impl LabelFilter {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        if source.is_empty() {
            return Ok(Self::disabled());
        }

        let root = parse(source)?;
        debug!(
            expression = %root,
            nodes = root.size(),
            keys = ?root.keys(),
            "parsed label filter"
        );
        Ok(Self {
            source: source.to_string(),
            root: Some(root),
        })
    }

    /// Picks the command line value when present, the environment value
    /// otherwise. The two are never merged.
    pub fn from_sources(cli: Option<&str>, env: Option<&str>) -> Result<Self, ExpressionError> {
        match cli.or(env) {
            Some(source) => Self::parse(source),
            None => Ok(Self::disabled()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.root.is_some()
    }

    pub fn matches(&self, labels: &Labels) -> bool {
        self.root.as_ref().map_or(true, |root| root.evaluate(labels))
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_source_disables_filter() {
        let filter = LabelFilter::parse("").unwrap();
        assert!(!filter.is_enabled());
        assert!(filter.matches(&Labels::new()));
        assert!(filter.matches(&labels(&[("group", "demo")])));
    }

    #[test]
    fn test_blank_source_is_an_empty_expression() {
        assert_eq!(LabelFilter::parse("  "), Err(ExpressionError::Empty));
    }

    #[test]
    fn test_enabled_filter_matches() {
        let filter = LabelFilter::parse("group=demo").unwrap();
        assert!(filter.is_enabled());
        assert_eq!(filter.source(), "group=demo");
        assert!(filter.matches(&labels(&[("group", "demo")])));
        assert!(!filter.matches(&labels(&[("group", "integration")])));
        assert!(!filter.matches(&Labels::new()));
    }

    #[test]
    fn test_cli_overrides_env_entirely() {
        let filter = LabelFilter::from_sources(Some("group=cli"), Some("group=env")).unwrap();
        assert_eq!(filter.source(), "group=cli");

        let filter = LabelFilter::from_sources(None, Some("group=env")).unwrap();
        assert_eq!(filter.source(), "group=env");

        let filter = LabelFilter::from_sources(None, None).unwrap();
        assert!(!filter.is_enabled());
    }

    #[test]
    fn test_empty_cli_value_disables_env_filter() {
        let filter = LabelFilter::from_sources(Some(""), Some("group=env")).unwrap();
        assert!(!filter.is_enabled());
    }

    #[test]
    fn test_invalid_source_is_reported() {
        assert!(matches!(
            LabelFilter::parse("group"),
            Err(ExpressionError::Syntax { .. })
        ));
    }
}
