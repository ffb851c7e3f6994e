//! Recursive-descent parser for label expressions.
//!
//! ```text
//! expr      := term ('||' term)*
//! term      := factor ('&&' factor)*
//! factor    := '!' factor | '(' expr ')' | condition
//! condition := WORD with exactly one '=' separating key and value
//! ```
//!
//! `!` binds tighter than `&&`, which binds tighter than `||`. Chains fold
//! into left-deep binary nodes.
//!
//! Both the parser's recursion and the height of the resulting tree are
//! capped at [`MAX_DEPTH`], so evaluating, printing and dropping a parsed
//! expression never recurse deeper than that.

use tracing::trace;

use super::ast::Node;
use super::lexer::{tokenize, Token};
use crate::error::ExpressionError;

const FACTOR_EXPECTED: &str = "expected '(', '!' or key=value";

const TOO_DEEP: &str = "expression nested too deeply";

/// Deepest accepted nesting of `!` and `(`, and tallest accepted tree.
pub const MAX_DEPTH: usize = 256;

pub fn parse(input: &str) -> Result<Node, ExpressionError> {
    let tokens = tokenize(input);
    trace!(input, token_count = tokens.len(), "parsing label expression");
    parse_tokens(&tokens)
}

pub fn parse_tokens(tokens: &[Token]) -> Result<Node, ExpressionError> {
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser::new(tokens);
    let (node, _) = parser.parse_expr()?;
    parser.expect_end()?;
    Ok(node)
}

/// Parse results carry the height of the subtree built so far.
type Parsed = Result<(Node, usize), ExpressionError>;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Open `!` and `(` around the current position.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_end(&self) -> Result<(), ExpressionError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(ExpressionError::syntax(
                token.as_str(),
                self.pos,
                "unexpected token after complete expression",
            )),
        }
    }

    fn parse_expr(&mut self) -> Parsed {
        let (mut node, mut height) = self.parse_term()?;
        while self.eat(&Token::Or) {
            let operator = self.pos - 1;
            let (rhs, rhs_height) = self.parse_term()?;
            height = grow(height.max(rhs_height), &Token::Or, operator)?;
            node = Node::or(node, rhs);
        }
        Ok((node, height))
    }

    fn parse_term(&mut self) -> Parsed {
        let (mut node, mut height) = self.parse_factor()?;
        while self.eat(&Token::And) {
            let operator = self.pos - 1;
            let (rhs, rhs_height) = self.parse_factor()?;
            height = grow(height.max(rhs_height), &Token::And, operator)?;
            node = Node::and(node, rhs);
        }
        Ok((node, height))
    }

    fn parse_factor(&mut self) -> Parsed {
        let position = self.pos;
        match self.advance() {
            None => Err(ExpressionError::unexpected_end(position, FACTOR_EXPECTED)),
            Some(Token::Not) => {
                self.enter(&Token::Not, position)?;
                let (inner, height) = self.parse_factor()?;
                self.depth -= 1;
                Ok((Node::not(inner), grow(height, &Token::Not, position)?))
            }
            Some(Token::LParen) => {
                self.enter(&Token::LParen, position)?;
                let inner = self.parse_expr()?;
                self.depth -= 1;
                if self.eat(&Token::RParen) {
                    return Ok(inner);
                }
                let reason = format!("missing ')' for '(' at token {position}");
                Err(match self.peek() {
                    Some(token) => ExpressionError::syntax(token.as_str(), self.pos, reason),
                    None => ExpressionError::unexpected_end(self.pos, reason),
                })
            }
            Some(Token::Word(word)) => Ok((parse_condition(word, position)?, 1)),
            Some(token) => Err(ExpressionError::syntax(
                token.as_str(),
                position,
                FACTOR_EXPECTED,
            )),
        }
    }

    fn enter(&mut self, token: &Token, position: usize) -> Result<(), ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::syntax(token.as_str(), position, TOO_DEEP));
        }
        self.depth += 1;
        Ok(())
    }
}

/// Height of a node placed above a subtree of height `below`.
fn grow(below: usize, token: &Token, position: usize) -> Result<usize, ExpressionError> {
    let height = below + 1;
    if height > MAX_DEPTH {
        return Err(ExpressionError::syntax(token.as_str(), position, TOO_DEEP));
    }
    Ok(height)
}

fn parse_condition(word: &str, position: usize) -> Result<Node, ExpressionError> {
    let mut parts = word.split('=');
    let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ExpressionError::syntax(
            word,
            position,
            "expected exactly one '=' in key=value",
        ));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(ExpressionError::syntax(word, position, "missing key before '='"));
    }

    Ok(Node::condition(key, value.trim()))
}
