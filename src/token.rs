//! Token list and compact text format
//!
//! Every codec stage works on a flat list of tokens instead of raw text.
//! A scenario is walked into JSON tokens, the stages swap some of them for
//! shorter forms, and the result is rendered as compact text:
//!
//! ```text
//! {  }  [  ]  :  ,        JSON punctuation
//! "text"                  JSON string (standard escapes)
//! -12.5e3                 number, as serialized by serde_json
//! true false null         literals outside value position
//! F T N O P Q             fixed markers (value position)
//! name:                   bare object key
//! <07  >07  ~07           built-in dictionary word
//! (A   )A   !A            custom dictionary word
//! ```
//!
//! Decoding lexes the compact text back into tokens, the stages are
//! reversed, and the plain JSON tokens are rendered for the final parse.

use crate::abbreviate::Marker;
use crate::dictionary::adaptive::CUSTOM_SYMBOLS;
use crate::dictionary::Placement;
use crate::error::DecodeError;
use crate::scenario::Scenario;
use serde_json::{Map, Value};
use std::fmt;

/// Separates the tokenized JSON from the custom word list.
///
/// A control character: JSON serialization escapes it inside strings, so
/// it can only ever appear once in a payload.
pub const PAYLOAD_DELIMITER: char = '\u{1f}';

/// Separates words in the trailing custom word list
pub const WORD_SEPARATOR: char = '/';

/// A single lexical unit of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// Quoted string (key or value), unescaped content
    Str(String),
    /// Object key written without quotes
    BareKey(String),
    /// Number in its serialized form
    Number(String),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
    /// Fixed abbreviation
    Marker(Marker),
    /// Built-in dictionary word
    Builtin(Placement, u8),
    /// Custom dictionary word
    Custom(Placement, u8),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::ObjectStart => f.write_str("{"),
            Token::ObjectEnd => f.write_str("}"),
            Token::ArrayStart => f.write_str("["),
            Token::ArrayEnd => f.write_str("]"),
            Token::Colon => f.write_str(":"),
            Token::Comma => f.write_str(","),
            Token::Str(text) => write!(f, "{}", Value::from(text.as_str())),
            Token::BareKey(key) => f.write_str(key),
            Token::Number(number) => f.write_str(number),
            Token::Bool(value) => write!(f, "{}", value),
            Token::Null => f.write_str("null"),
            Token::Marker(marker) => write!(f, "{}", marker.symbol()),
            Token::Builtin(placement, index) => {
                write!(f, "{}{:02}", placement.builtin_prefix(), index)
            }
            Token::Custom(placement, index) => write!(
                f,
                "{}{}",
                placement.custom_prefix(),
                char::from(CUSTOM_SYMBOLS[usize::from(*index)])
            ),
        }
    }
}

/// Walk a scenario into JSON tokens (keys in sorted order)
pub fn tokenize(scenario: &Scenario) -> Vec<Token> {
    let mut tokens = Vec::new();
    push_object(scenario.as_map(), &mut tokens);
    tokens
}

fn push_object(fields: &Map<String, Value>, out: &mut Vec<Token>) {
    out.push(Token::ObjectStart);
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push(Token::Comma);
        }
        out.push(Token::Str(key.clone()));
        out.push(Token::Colon);
        push_value(value, out);
    }
    out.push(Token::ObjectEnd);
}

fn push_value(value: &Value, out: &mut Vec<Token>) {
    match value {
        Value::Null => out.push(Token::Null),
        Value::Bool(b) => out.push(Token::Bool(*b)),
        Value::Number(n) => out.push(Token::Number(n.to_string())),
        Value::String(s) => out.push(Token::Str(s.clone())),
        Value::Array(items) => {
            out.push(Token::ArrayStart);
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(Token::Comma);
                }
                push_value(item, out);
            }
            out.push(Token::ArrayEnd);
        }
        Value::Object(fields) => push_object(fields, out),
    }
}

/// Render tokens as text
pub fn render(tokens: &[Token]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(tokens.len() * 4);
    for token in tokens {
        // Writing into a String cannot fail
        let _ = write!(out, "{}", token);
    }
    out
}

/// Whether a key can be written without quotes
pub fn is_bare_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {
            bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }
        _ => false,
    }
}

/// Drop the quotes around object keys that are plain identifiers
pub fn strip_key_quotes(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        match token {
            Token::Str(key) if iter.peek() == Some(&Token::Colon) && is_bare_key(&key) => {
                out.push(Token::BareKey(key))
            }
            other => out.push(other),
        }
    }
    out
}

/// Put quotes back around bare object keys
pub fn quote_bare_keys(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| match token {
            Token::BareKey(key) => Token::Str(key),
            other => other,
        })
        .collect()
}

/// Split compact text back into tokens
pub fn lex(text: &str) -> Result<Vec<Token>, DecodeError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let byte = bytes[pos];
        let token = match byte {
            b'{' => Token::ObjectStart,
            b'}' => Token::ObjectEnd,
            b'[' => Token::ArrayStart,
            b']' => Token::ArrayEnd,
            b':' => Token::Colon,
            b',' => Token::Comma,
            b'"' => {
                pos = string_end(bytes, start)?;
                let content: String =
                    serde_json::from_str(&text[start..pos]).map_err(|e| DecodeError::Lex {
                        offset: start,
                        reason: e.to_string(),
                    })?;
                tokens.push(Token::Str(content));
                continue;
            }
            b'-' | b'0'..=b'9' => {
                pos = scan(bytes, start, is_number_byte);
                tokens.push(Token::Number(text[start..pos].to_string()));
                continue;
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                pos = scan(bytes, start, |b| b.is_ascii_alphanumeric() || b == b'_');
                let word = &text[start..pos];
                let token = if bytes.get(pos) == Some(&b':') {
                    Token::BareKey(word.to_string())
                } else {
                    word_token(word).ok_or_else(|| DecodeError::Lex {
                        offset: start,
                        reason: format!("unexpected word '{}'", word),
                    })?
                };
                tokens.push(token);
                continue;
            }
            _ => {
                if let Some(placement) = Placement::from_builtin_prefix(byte) {
                    let index = builtin_index(bytes, start)?;
                    pos += 3;
                    tokens.push(Token::Builtin(placement, index));
                    continue;
                }
                if let Some(placement) = Placement::from_custom_prefix(byte) {
                    let index = bytes
                        .get(start + 1)
                        .and_then(|&symbol| custom_index(symbol))
                        .ok_or_else(|| DecodeError::Lex {
                            offset: start,
                            reason: "invalid custom dictionary symbol".to_string(),
                        })?;
                    pos += 2;
                    tokens.push(Token::Custom(placement, index));
                    continue;
                }
                return Err(DecodeError::Lex {
                    offset: start,
                    reason: format!("unexpected byte 0x{:02x}", byte),
                });
            }
        };
        tokens.push(token);
        pos += 1;
    }

    Ok(tokens)
}

/// Position just past the closing quote of the string starting at `start`
fn string_end(bytes: &[u8], start: usize) -> Result<usize, DecodeError> {
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => return Ok(pos + 1),
            _ => pos += 1,
        }
    }
    Err(DecodeError::Lex {
        offset: start,
        reason: "unterminated string".to_string(),
    })
}

fn scan(bytes: &[u8], start: usize, accept: impl Fn(u8) -> bool) -> usize {
    let mut pos = start;
    while pos < bytes.len() && accept(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn is_number_byte(byte: u8) -> bool {
    byte.is_ascii_digit() || matches!(byte, b'.' | b'e' | b'E' | b'+' | b'-')
}

fn word_token(word: &str) -> Option<Token> {
    match word {
        "true" => Some(Token::Bool(true)),
        "false" => Some(Token::Bool(false)),
        "null" => Some(Token::Null),
        _ => {
            let mut chars = word.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => Marker::from_symbol(symbol).map(Token::Marker),
                _ => None,
            }
        }
    }
}

fn builtin_index(bytes: &[u8], start: usize) -> Result<u8, DecodeError> {
    match (bytes.get(start + 1), bytes.get(start + 2)) {
        (Some(&tens), Some(&ones)) if tens.is_ascii_digit() && ones.is_ascii_digit() => {
            Ok((tens - b'0') * 10 + (ones - b'0'))
        }
        _ => Err(DecodeError::Lex {
            offset: start,
            reason: "built-in token needs two digits".to_string(),
        }),
    }
}

fn custom_index(symbol: u8) -> Option<u8> {
    CUSTOM_SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .map(|i| i as u8)
}
