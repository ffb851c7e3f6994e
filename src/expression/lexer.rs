//! Splits a label expression into operator, parenthesis and word tokens.
//!
//! `&&` and `||` are recognised with one character of lookahead; `(`, `)` and
//! `!` always stand alone. Everything else accumulates into a word until the
//! next operator or parenthesis. Words are trimmed, so `key = value` is a
//! single word and whitespace around operators is insignificant.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    And,
    Or,
    Not,
    LParen,
    RParen,
    Word(String),
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(text.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Word(text) => text,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        let token = match ch {
            '&' if chars.peek() == Some(&'&') => {
                chars.next();
                Token::And
            }
            '|' if chars.peek() == Some(&'|') => {
                chars.next();
                Token::Or
            }
            '!' => Token::Not,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                buffer.push(other);
                continue;
            }
        };
        flush_word(&mut buffer, &mut tokens);
        tokens.push(token);
    }
    flush_word(&mut buffer, &mut tokens);

    tokens
}

fn flush_word(buffer: &mut String, tokens: &mut Vec<Token>) {
    let word = buffer.trim();
    if !word.is_empty() {
        tokens.push(Token::word(word));
    }
    buffer.clear();
}
