//! Labels attached to a test through `@key=value` annotations in its doc comment.

use std::collections::BTreeMap;
use tracing::trace;

/// Value given to a bare `@key` annotation.
pub const DEFAULT_LABEL_VALUE: &str = "true";

pub const ANNOTATION_PREFIX: char = '@';

/// Label key to value. Keys are case-sensitive.
pub type Labels = BTreeMap<String, String>;

/// Parses a single, already delimiter-stripped comment line.
///
/// Returns `None` for lines that are not annotations and for annotations
/// without a key.
pub fn parse_annotation(line: &str) -> Option<(String, String)> {
    let text = line.trim().strip_prefix(ANNOTATION_PREFIX)?;

    let (key, value) = match text.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (text.trim(), DEFAULT_LABEL_VALUE),
    };

    if key.is_empty() {
        trace!(line, "skipping annotation without a key");
        return None;
    }

    Some((key.to_string(), value.to_string()))
}

/// Collects the labels declared by a sequence of comment lines. Later
/// annotations overwrite earlier ones with the same key.
pub fn collect_labels<'a, I>(lines: I) -> Labels
where
    I: IntoIterator<Item = &'a str>,
{
    let mut labels = Labels::new();
    for line in lines {
        if let Some((key, value)) = parse_annotation(line) {
            labels.insert(key, value);
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_value_annotation() {
        assert_eq!(
            parse_annotation("@group=demo"),
            Some(("group".to_string(), "demo".to_string()))
        );
    }

    #[test]
    fn test_bare_annotation_defaults_to_true() {
        assert_eq!(
            parse_annotation("@regression"),
            Some(("regression".to_string(), "true".to_string()))
        );
    }

    #[test]
    fn test_annotation_splits_on_first_equals() {
        assert_eq!(
            parse_annotation("@query=a=b"),
            Some(("query".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn test_annotation_trims_key_and_value() {
        assert_eq!(
            parse_annotation("  @env = prod  "),
            Some(("env".to_string(), "prod".to_string()))
        );
    }

    #[test]
    fn test_non_annotation_lines_are_ignored() {
        assert_eq!(parse_annotation("A test case with two labels"), None);
        assert_eq!(parse_annotation(""), None);
        assert_eq!(parse_annotation("email me @ home"), None);
    }

    #[test]
    fn test_annotation_without_key_is_skipped() {
        assert_eq!(parse_annotation("@"), None);
        assert_eq!(parse_annotation("@=value"), None);
    }

    #[test]
    fn test_collect_labels_later_wins() {
        let labels = collect_labels(["@group=demo", "not a label", "@env=dev", "@group=nightly"]);

        let expected: Labels = [
            ("env".to_string(), "dev".to_string()),
            ("group".to_string(), "nightly".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_collect_labels_keys_are_case_sensitive() {
        let labels = collect_labels(["@Env=dev", "@env=prod"]);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels["Env"], "dev");
        assert_eq!(labels["env"], "prod");
    }
}
