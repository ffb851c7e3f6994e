//! Reading and rewriting the argument vector of the underlying `go test`
//! binary.
//!
//! `-labels` is private to this tool and is removed before the arguments are
//! passed on. `-test.run` and `-test.list` are read as name selectors and are
//! only replaced when a label filter produced a selection.

use crate::selection::Selection;

pub const RUN_FLAG: &str = "-test.run";
pub const LIST_FLAG: &str = "-test.list";
pub const LABELS_FLAG: &str = "-labels";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerArgs {
    /// Name selector from `-test.run` or `-test.list`, whichever came last.
    pub run_pattern: Option<String>,
    /// Set when the selector came from `-test.list`.
    pub list_mode: bool,
    /// Label expression from `-labels`.
    pub labels: Option<String>,
}

impl RunnerArgs {
    /// Parses runner arguments, without the program name.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let mut parsed = Self::default();
        let mut iter = args.iter().map(AsRef::as_ref);

        while let Some(arg) = iter.next() {
            let Some((flag, inline)) = split_flag(arg) else {
                continue;
            };

            match flag {
                RUN_FLAG | LIST_FLAG => {
                    let value = inline.or_else(|| iter.next());
                    parsed.list_mode = flag == LIST_FLAG;
                    parsed.run_pattern = value.filter(|v| !v.is_empty()).map(str::to_string);
                }
                LABELS_FLAG => {
                    if let Some(value) = inline.or_else(|| iter.next()) {
                        parsed.labels = Some(unquote(value).to_string());
                    }
                }
                _ => {}
            }
        }

        parsed
    }
}

/// Removes `-labels X` and `-labels=X` from the arguments.
pub fn strip_label_flags<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    remove_flags(args, &[LABELS_FLAG])
}

/// Produces the arguments to hand to the runner: `-labels` is always
/// removed, and when a label filter is active any existing `-test.run` or
/// `-test.list` is replaced by the selection's pattern.
pub fn rewrite_args<S: AsRef<str>>(args: &[S], selection: &Selection) -> Vec<String> {
    if !selection.labels_enabled {
        return strip_label_flags(args);
    }

    let mut rewritten = remove_flags(args, &[LABELS_FLAG, RUN_FLAG, LIST_FLAG]);
    rewritten.extend(selection.runner_args());
    rewritten
}

fn remove_flags<S: AsRef<str>>(args: &[S], flags: &[&str]) -> Vec<String> {
    let mut kept = Vec::with_capacity(args.len());
    let mut iter = args.iter().map(AsRef::as_ref);

    while let Some(arg) = iter.next() {
        match split_flag(arg) {
            Some((flag, inline)) if flags.contains(&flag) => {
                if inline.is_none() {
                    iter.next();
                }
            }
            _ => kept.push(arg.to_string()),
        }
    }

    kept
}

/// Splits `-flag=value` into its name and inline value. `--flag` is
/// accepted like the Go flag package does.
fn split_flag(arg: &str) -> Option<(&str, Option<&str>)> {
    if !arg.starts_with('-') || arg == "-" || arg == "--" {
        return None;
    }
    let arg = if arg.starts_with("--") { &arg[1..] } else { arg };

    match arg.split_once('=') {
        Some((flag, value)) => Some((flag, Some(value))),
        None => Some((arg, None)),
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
