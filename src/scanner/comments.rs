//! Turns raw comment tokens into plain text lines.

/// Strips `//` and `/* */` delimiters. Block comments are split into lines
/// and a leading `*` continuation marker is dropped from each line.
pub fn comment_lines(raw: &str) -> Vec<String> {
    let text = raw.trim();

    if let Some(line) = text.strip_prefix("//") {
        return vec![line.trim().to_string()];
    }

    if let Some(body) = text.strip_prefix("/*") {
        let body = body.strip_suffix("*/").unwrap_or(body);
        return body
            .lines()
            .enumerate()
            .map(|(index, line)| {
                let line = line.trim();
                let line = if index > 0 {
                    line.strip_prefix('*').unwrap_or(line)
                } else {
                    line
                };
                line.trim().to_string()
            })
            .collect();
    }

    vec![text.to_string()]
}

/// Flattens a doc comment group into its text lines.
pub fn doc_lines<S: AsRef<str>>(doc: &[S]) -> Vec<String> {
    doc.iter()
        .flat_map(|raw| comment_lines(raw.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_comment() {
        assert_eq!(comment_lines("// @group=demo"), vec!["@group=demo"]);
        assert_eq!(comment_lines("//@group=demo  "), vec!["@group=demo"]);
    }

    #[test]
    fn test_single_line_block_comment() {
        assert_eq!(comment_lines("/* @env=dev */"), vec!["@env=dev"]);
    }

    #[test]
    fn test_multi_line_block_comment() {
        let raw = "/*\n * @group=demo\n   @env=prod\n */";
        assert_eq!(comment_lines(raw), vec!["", "@group=demo", "@env=prod", ""]);
    }

    #[test]
    fn test_doc_lines_flattens_group() {
        let doc = ["// A test case with two labels", "// @group=integration", "/* @env=dev */"];
        assert_eq!(
            doc_lines(&doc),
            vec!["A test case with two labels", "@group=integration", "@env=dev"]
        );
    }
}
