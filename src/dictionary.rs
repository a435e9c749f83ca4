//! Dictionary substitution
//!
//! Frequently recurring quoted words are swapped for short tokens. A word
//! is replaced in one of three placements, each written with its own
//! prefix so the token expands back without looking at its neighbours:
//!
//! - [`Placement::Opening`]: first key of an object, `{"word"` (the brace
//!   is absorbed into the token)
//! - [`Placement::Closing`]: value closing an object, `"word"}`
//! - [`Placement::Inline`]: any other occurrence, `"word"`
//!
//! The built-in table lives here; the per-encode table is in [`adaptive`].

pub mod adaptive;

use crate::error::{DecodeError, DictionaryError};
use crate::token::Token;
use std::collections::HashMap;

/// Maximum number of built-in words (tokens `00`..`98`)
pub const MAX_BUILTIN_WORDS: usize = 99;

/// Release-pinned built-in word table.
///
/// Tokens are positional: entries may only be appended. Reordering or
/// removing a word breaks every token issued before the change.
pub const STANDARD_WORDS: &[&str] = &[
    "value",
    "enabled",
    "name",
    "type",
    "unit",
    "count",
    "cost",
    "price",
    "quantity",
    "monthly",
    "hourly",
    "yearly",
    "region",
    "instance",
    "instances",
    "storage",
    "compute",
    "network",
    "database",
    "memory",
    "vcpu",
    "hours",
    "days",
    "users",
    "requests",
    "size",
    "tier",
    "standard",
    "premium",
    "basic",
    "onDemand",
    "reserved",
    "spot",
    "utilization",
    "growth",
    "rate",
    "discount",
    "currency",
    "label",
    "description",
    "inputs",
    "settings",
    "options",
    "mode",
    "custom",
    "default",
    "percentage",
    "min",
    "max",
    "total",
    "items",
    "duration",
    "period",
    "transfer",
    "backup",
    "licenses",
    "support",
    "support_level",
    "advanced",
    "simple",
];

/// Where a substituted word sat relative to the object braces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// `{"word"`
    Opening,
    /// `"word"}`
    Closing,
    /// `"word"`
    Inline,
}

impl Placement {
    /// Prefix of a built-in token
    pub fn builtin_prefix(self) -> char {
        match self {
            Placement::Opening => '<',
            Placement::Closing => '>',
            Placement::Inline => '~',
        }
    }

    /// Prefix of a custom token
    pub fn custom_prefix(self) -> char {
        match self {
            Placement::Opening => '(',
            Placement::Closing => ')',
            Placement::Inline => '!',
        }
    }

    /// Placement for a built-in prefix byte
    pub fn from_builtin_prefix(byte: u8) -> Option<Self> {
        match byte {
            b'<' => Some(Placement::Opening),
            b'>' => Some(Placement::Closing),
            b'~' => Some(Placement::Inline),
            _ => None,
        }
    }

    /// Placement for a custom prefix byte
    pub fn from_custom_prefix(byte: u8) -> Option<Self> {
        match byte {
            b'(' => Some(Placement::Opening),
            b')' => Some(Placement::Closing),
            b'!' => Some(Placement::Inline),
            _ => None,
        }
    }
}

/// A word table whose entries can stand in for quoted strings
pub trait WordTable {
    /// Index of a word, if the table holds it
    fn index_of(&self, word: &str) -> Option<u8>;

    /// Word stored at an index
    fn word_at(&self, index: u8) -> Option<&str>;

    /// Token written for a word of this table
    fn token(&self, placement: Placement, index: u8) -> Token;

    /// Placement and index when `token` belongs to this table
    fn matches(&self, token: &Token) -> Option<(Placement, u8)>;
}

/// Replace every quoted occurrence of a table word with its token
pub fn substitute<T: WordTable + ?Sized>(table: &T, tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        let index = match &token {
            Token::Str(word) => table.index_of(word),
            _ => None,
        };
        let index = match index {
            Some(index) => index,
            None => {
                out.push(token);
                continue;
            }
        };

        if out.last() == Some(&Token::ObjectStart) {
            out.pop();
            out.push(table.token(Placement::Opening, index));
        } else if iter.peek() == Some(&Token::ObjectEnd) {
            iter.next();
            out.push(table.token(Placement::Closing, index));
        } else {
            out.push(table.token(Placement::Inline, index));
        }
    }

    out
}

/// Expand the table's tokens back into quoted words
pub fn expand<T: WordTable + ?Sized>(
    table: &T,
    tokens: Vec<Token>,
) -> Result<Vec<Token>, DecodeError> {
    let mut out = Vec::with_capacity(tokens.len() + tokens.len() / 4);

    for token in tokens {
        let (placement, index) = match table.matches(&token) {
            Some(found) => found,
            None => {
                out.push(token);
                continue;
            }
        };
        let word = table
            .word_at(index)
            .ok_or_else(|| DecodeError::UnknownToken {
                token: token.to_string(),
            })?
            .to_string();

        match placement {
            Placement::Opening => {
                out.push(Token::ObjectStart);
                out.push(Token::Str(word));
            }
            Placement::Closing => {
                out.push(Token::Str(word));
                out.push(Token::ObjectEnd);
            }
            Placement::Inline => out.push(Token::Str(word)),
        }
    }

    Ok(out)
}

/// Fixed word table shared by every encode and decode.
///
/// Build it once and share it by reference; it is never modified after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinDictionary {
    words: Vec<String>,
    index: HashMap<String, u8>,
}

impl BuiltinDictionary {
    /// Build a dictionary, assigning tokens by position
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self, DictionaryError> {
        if words.len() > MAX_BUILTIN_WORDS {
            return Err(DictionaryError::Overflow {
                count: words.len(),
                max: MAX_BUILTIN_WORDS,
            });
        }

        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            let word = word.as_ref();
            if word.is_empty() {
                return Err(DictionaryError::EmptyWord { index: i });
            }
            if index.insert(word.to_string(), i as u8).is_some() {
                return Err(DictionaryError::DuplicateWord(word.to_string()));
            }
        }

        Ok(Self {
            words: words.iter().map(|w| w.as_ref().to_string()).collect(),
            index,
        })
    }

    /// The release-pinned table
    pub fn standard() -> Result<Self, DictionaryError> {
        Self::new(STANDARD_WORDS)
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in token order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Two-digit token of a word
    pub fn token_for(&self, word: &str) -> Option<String> {
        self.index.get(word).map(|i| format!("{:02}", i))
    }

    /// Word behind a two-digit token
    pub fn word_for(&self, token: &str) -> Option<&str> {
        if token.len() != 2 {
            return None;
        }
        let index: usize = token.parse().ok()?;
        self.words.get(index).map(String::as_str)
    }
}

impl WordTable for BuiltinDictionary {
    fn index_of(&self, word: &str) -> Option<u8> {
        self.index.get(word).copied()
    }

    fn word_at(&self, index: u8) -> Option<&str> {
        self.words.get(usize::from(index)).map(String::as_str)
    }

    fn token(&self, placement: Placement, index: u8) -> Token {
        Token::Builtin(placement, index)
    }

    fn matches(&self, token: &Token) -> Option<(Placement, u8)> {
        match token {
            Token::Builtin(placement, index) => Some((*placement, *index)),
            _ => None,
        }
    }
}
