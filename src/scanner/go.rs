//! Go declaration extraction backed by tree-sitter-go.

use std::fs;
use std::path::Path;
use tracing::trace;
use tree_sitter::{Node, Parser};

use super::{Declaration, DeclarationSource, Param, TypeShape};
use crate::error::ScanError;

pub const LANGUAGE_NAME: &str = "go";

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reads top-level function declarations and their doc comments from Go
/// source files. Methods are not reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoDeclarationSource;

impl DeclarationSource for GoDeclarationSource {
    fn declarations(&self, file: &Path) -> Result<Vec<Declaration>, ScanError> {
        let source = read_source(file)?;
        parse_declarations(&source, file)
    }
}

fn read_source(file: &Path) -> Result<String, ScanError> {
    let metadata = fs::metadata(file).map_err(|e| ScanError::source_parse(file, e.to_string()))?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(ScanError::source_parse(
            file,
            format!(
                "file too large: {} bytes (max: {MAX_FILE_SIZE} bytes)",
                metadata.len()
            ),
        ));
    }
    fs::read_to_string(file).map_err(|e| ScanError::source_parse(file, e.to_string()))
}

/// Parses Go source text. `file` is only used for error reporting.
pub fn parse_declarations(source: &str, file: &Path) -> Result<Vec<Declaration>, ScanError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|_| ScanError::language_setup(LANGUAGE_NAME))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ScanError::source_parse(file, "parser returned no tree"))?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(ScanError::source_parse(file, describe_syntax_error(root)));
    }

    let bytes = source.as_bytes();
    let mut declarations = Vec::new();
    let mut comments: Vec<Node> = Vec::new();
    let mut last_code_row: Option<usize> = None;

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        if node.kind() == "comment" {
            let row = node.start_position().row;
            // Trailing comment on the same line as code: never a doc comment.
            if last_code_row == Some(row) {
                comments.clear();
                continue;
            }
            if let Some(last) = comments.last() {
                if row > last.end_position().row + 1 {
                    comments.clear();
                }
            }
            comments.push(node);
            continue;
        }

        let doc = take_doc_comments(&mut comments, &node, bytes);
        last_code_row = Some(node.end_position().row);

        if node.kind() == "function_declaration" {
            if let Some(declaration) = function_declaration(&node, bytes, doc) {
                trace!(
                    name = %declaration.name,
                    line = declaration.line,
                    params = declaration.params.len(),
                    "found function declaration"
                );
                declarations.push(declaration);
            }
        }
    }

    Ok(declarations)
}

fn take_doc_comments(comments: &mut Vec<Node>, node: &Node, bytes: &[u8]) -> Vec<String> {
    let attached = comments
        .last()
        .is_some_and(|last| last.end_position().row + 1 == node.start_position().row);

    let doc = if attached {
        comments
            .iter()
            .map(|comment| node_text(comment, bytes).to_string())
            .collect()
    } else {
        Vec::new()
    };
    comments.clear();
    doc
}

fn function_declaration(node: &Node, bytes: &[u8], doc: Vec<String>) -> Option<Declaration> {
    let name = node_text(&node.child_by_field_name("name")?, bytes).to_string();
    let params = node
        .child_by_field_name("parameters")
        .map(|list| parameters(&list, bytes))
        .unwrap_or_default();

    Some(Declaration {
        name,
        line: node.start_position().row + 1,
        params,
        doc,
    })
}

fn parameters(list: &Node, bytes: &[u8]) -> Vec<Param> {
    let mut params = Vec::new();
    let mut cursor = list.walk();

    for declaration in list.named_children(&mut cursor) {
        let shape = match declaration.kind() {
            "parameter_declaration" => declaration
                .child_by_field_name("type")
                .map(|ty| type_shape(&ty, bytes))
                .unwrap_or_else(|| TypeShape::Other(node_text(&declaration, bytes).to_string())),
            "variadic_parameter_declaration" => {
                TypeShape::Other(node_text(&declaration, bytes).to_string())
            }
            _ => continue,
        };

        let mut name_cursor = declaration.walk();
        let names: Vec<String> = declaration
            .children_by_field_name("name", &mut name_cursor)
            .map(|name| node_text(&name, bytes).to_string())
            .collect();

        if names.is_empty() {
            params.push(Param { name: None, shape });
        } else {
            params.extend(names.into_iter().map(|name| Param {
                name: Some(name),
                shape: shape.clone(),
            }));
        }
    }

    params
}

fn type_shape(node: &Node, bytes: &[u8]) -> TypeShape {
    match node.kind() {
        "pointer_type" => match node.named_child(0) {
            Some(inner) => TypeShape::Pointer(Box::new(type_shape(&inner, bytes))),
            None => TypeShape::Other(node_text(node, bytes).to_string()),
        },
        "parenthesized_type" => match node.named_child(0) {
            Some(inner) => type_shape(&inner, bytes),
            None => TypeShape::Other(node_text(node, bytes).to_string()),
        },
        "qualified_type" => {
            let package = node.child_by_field_name("package");
            let name = node.child_by_field_name("name");
            match (package, name) {
                (Some(package), Some(name)) => TypeShape::Qualified {
                    package: node_text(&package, bytes).to_string(),
                    name: node_text(&name, bytes).to_string(),
                },
                _ => TypeShape::Other(node_text(node, bytes).to_string()),
            }
        }
        "type_identifier" => TypeShape::Named(node_text(node, bytes).to_string()),
        _ => TypeShape::Other(node_text(node, bytes).to_string()),
    }
}

fn describe_syntax_error(root: Node) -> String {
    match first_error(root) {
        Some(node) => {
            let start = node.start_position();
            let what = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                "unexpected input".to_string()
            };
            format!(
                "syntax error at line {}, column {}: {what}",
                start.row + 1,
                start.column + 1
            )
        }
        None => "syntax error".to_string(),
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn node_text<'a>(node: &Node, bytes: &'a [u8]) -> &'a str {
    node.utf8_text(bytes).unwrap_or("")
}
