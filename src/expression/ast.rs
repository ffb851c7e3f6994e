//! Parsed label expressions and their evaluation against a test's labels.
//!
//! A condition matches when the key is present with exactly the given value.
//! `!` inverts its operand, so `!env=dev` holds both when `env` is missing and
//! when it carries another value. The two cases are deliberately not told
//! apart.

use serde::Serialize;
use std::fmt;

use crate::labels::Labels;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Condition { key: String, value: String },
    Logical { op: Operator, children: Vec<Node> },
}

impl Node {
    pub fn condition(key: impl Into<String>, value: impl Into<String>) -> Self {
        Node::Condition {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn and(lhs: Node, rhs: Node) -> Self {
        Node::Logical {
            op: Operator::And,
            children: vec![lhs, rhs],
        }
    }

    pub fn or(lhs: Node, rhs: Node) -> Self {
        Node::Logical {
            op: Operator::Or,
            children: vec![lhs, rhs],
        }
    }

    pub fn not(inner: Node) -> Self {
        Node::Logical {
            op: Operator::Not,
            children: vec![inner],
        }
    }

    /// Evaluates the expression. A logical node with the wrong number of
    /// children is false.
    pub fn evaluate(&self, labels: &Labels) -> bool {
        match self {
            Node::Condition { key, value } => labels.get(key).is_some_and(|v| v == value),
            Node::Logical { op, children } => match (op, children.as_slice()) {
                (Operator::And, [lhs, rhs]) => lhs.evaluate(labels) && rhs.evaluate(labels),
                (Operator::Or, [lhs, rhs]) => lhs.evaluate(labels) || rhs.evaluate(labels),
                (Operator::Not, [inner]) => !inner.evaluate(labels),
                _ => false,
            },
        }
    }

    /// Number of nodes in the tree, including this one.
    pub fn size(&self) -> usize {
        match self {
            Node::Condition { .. } => 1,
            Node::Logical { children, .. } => 1 + children.iter().map(Node::size).sum::<usize>(),
        }
    }

    /// Label keys referenced by the expression, in first-seen order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, keys: &mut Vec<&'a str>) {
        match self {
            Node::Condition { key, .. } => {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
            Node::Logical { children, .. } => {
                for child in children {
                    child.collect_keys(keys);
                }
            }
        }
    }
}

/// Canonical form: binary operations are parenthesised so the output parses
/// back to the same tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Condition { key, value } => write!(f, "{key}={value}"),
            Node::Logical { op, children } => match (op, children.as_slice()) {
                (Operator::And | Operator::Or, [lhs, rhs]) => {
                    write!(f, "({lhs} {} {rhs})", op.symbol())
                }
                (Operator::Not, [inner]) => write!(f, "!{inner}"),
                _ => write!(f, "<invalid {} with {} operands>", op.as_str(), children.len()),
            },
        }
    }
}
