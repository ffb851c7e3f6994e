use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;

use crate::cli::OutputFormat;
use crate::runner_args::rewrite_args;
use crate::scanner::TestEntity;
use crate::selection::Selection;

#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub total_selected: usize,
    pub labels_enabled: bool,
    pub list_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_expression: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub tests: Vec<&'a TestEntity>,
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format(
        selection: &Selection,
        label_expression: &str,
        runner_args: &[String],
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => {
                let output = Self::build_output(selection, label_expression);
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::Text => Ok(Self::format_text(selection)),
            OutputFormat::Args => {
                let mut out = String::new();
                for arg in rewrite_args(runner_args, selection) {
                    writeln!(out, "{arg}")?;
                }
                Ok(out)
            }
        }
    }

    pub fn build_output<'a>(selection: &'a Selection, label_expression: &'a str) -> JsonOutput<'a> {
        JsonOutput {
            total_selected: selection.len(),
            labels_enabled: selection.labels_enabled,
            list_mode: selection.list_mode,
            label_expression: Some(label_expression).filter(|e| !e.is_empty()),
            pattern: selection.labels_enabled.then(|| selection.pattern()),
            tests: selection.tests.values().collect(),
        }
    }

    /// One test per line: name, then its labels as `key=value`.
    fn format_text(selection: &Selection) -> String {
        let mut out = String::new();
        for (name, labels) in selection.labels() {
            out.push_str(name);
            for (key, value) in labels {
                out.push(' ');
                out.push_str(key);
                out.push('=');
                out.push_str(value);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn selection() -> Selection {
        let gamma = TestEntity {
            name: "TestSimpleGamma".to_string(),
            file: PathBuf::from("simple/demo_test.go"),
            line: 24,
            labels: [
                ("group".to_string(), "demo".to_string()),
                ("env".to_string(), "prod".to_string()),
            ]
            .into_iter()
            .collect(),
        };
        let alpha = TestEntity {
            name: "TestSimpleAlpha".to_string(),
            file: PathBuf::from("simple/demo_test.go"),
            line: 10,
            labels: BTreeMap::new(),
        };
        Selection {
            tests: BTreeMap::from([
                (gamma.name.clone(), gamma),
                (alpha.name.clone(), alpha),
            ]),
            list_mode: false,
            labels_enabled: true,
        }
    }

    #[test]
    fn test_text_output() {
        let out = OutputFormatter::format(&selection(), "", &[], OutputFormat::Text).unwrap();
        assert_eq!(out, "TestSimpleAlpha\nTestSimpleGamma env=prod group=demo\n");
    }

    #[test]
    fn test_json_output() {
        let out =
            OutputFormatter::format(&selection(), "group=demo", &[], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total_selected"], 2);
        assert_eq!(value["label_expression"], "group=demo");
        assert_eq!(value["pattern"], "^(?:TestSimpleAlpha|TestSimpleGamma)$");
        assert_eq!(value["tests"][1]["labels"]["env"], "prod");
        assert_eq!(value["tests"][1]["line"], 24);
    }

    #[test]
    fn test_json_output_without_filter_omits_pattern() {
        let mut selection = selection();
        selection.labels_enabled = false;
        let out = OutputFormatter::format(&selection, "", &[], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value.get("pattern").is_none());
        assert!(value.get("label_expression").is_none());
    }

    #[test]
    fn test_args_output() {
        let runner_args = vec![
            "-test.v".to_string(),
            "-labels".to_string(),
            "group=demo".to_string(),
        ];
        let out =
            OutputFormatter::format(&selection(), "group=demo", &runner_args, OutputFormat::Args)
                .unwrap();
        assert_eq!(
            out,
            "-test.v\n-test.run\n^(?:TestSimpleAlpha|TestSimpleGamma)$\n"
        );
    }
}
