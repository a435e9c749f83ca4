//! Adaptive (per-encode) dictionary
//!
//! After the built-in table has been applied, the remaining quoted words
//! are tallied and the ones that pay for their own storage are given
//! one-character tokens. The selected words travel with the payload as a
//! `/`-separated list; position `i` in the list maps to symbol `i` of
//! [`CUSTOM_SYMBOLS`].
//!
//! # Savings estimate
//!
//! For a word of length `len` seen `f` times:
//!
//! ```text
//! raw     = (len + 2) * f        quoted literal every time
//! encoded = 2 * f + len + 1      prefix + symbol, plus one list entry
//! savings = raw - encoded
//! ```

use super::{Placement, WordTable};
use crate::error::DecodeError;
use crate::token::{Token, WORD_SEPARATOR};
use std::collections::{BTreeMap, HashMap};

/// Token alphabet, in assignment order
pub const CUSTOM_SYMBOLS: [u8; 36] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maximum number of custom words per payload
pub const MAX_CUSTOM_WORDS: usize = CUSTOM_SYMBOLS.len();

/// A selected custom word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveEntry {
    /// The word
    pub word: String,
    /// Token symbol
    pub symbol: char,
    /// Occurrences counted during analysis (0 when rebuilt from a list)
    pub frequency: usize,
    /// Estimated characters saved (0 when rebuilt from a list)
    pub savings: i64,
}

/// Per-call word table, never shared between calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptiveDictionary {
    entries: Vec<AdaptiveEntry>,
    index: HashMap<String, u8>,
}

/// Estimated characters saved by tokenizing a word
pub fn savings(len: usize, frequency: usize) -> i64 {
    let raw = (len as i64 + 2) * frequency as i64;
    let encoded = 2 * frequency as i64 + len as i64 + 1;
    raw - encoded
}

/// Whether a word is eligible: `[A-Za-z][A-Za-z0-9]+`
pub fn is_candidate(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..].iter().all(u8::is_ascii_alphanumeric)
}

impl AdaptiveDictionary {
    /// Select up to `max_words` words from the quoted strings of `tokens`.
    ///
    /// Candidates are ranked by savings, highest first; equal savings keep
    /// lexicographic word order so the result is deterministic.
    pub fn analyze(tokens: &[Token], max_words: usize) -> Self {
        let mut frequencies: BTreeMap<&str, usize> = BTreeMap::new();
        for token in tokens {
            if let Token::Str(word) = token {
                if is_candidate(word) {
                    *frequencies.entry(word.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut candidates: Vec<(&str, usize, i64)> = frequencies
            .into_iter()
            .map(|(word, frequency)| (word, frequency, savings(word.len(), frequency)))
            .filter(|&(_, _, saved)| saved > 0)
            .collect();
        candidates.sort_by(|a, b| b.2.cmp(&a.2));
        candidates.truncate(max_words.min(MAX_CUSTOM_WORDS));

        let mut dictionary = Self::default();
        for (word, frequency, saved) in candidates {
            dictionary.push(word.to_string(), frequency, saved);
        }
        dictionary
    }

    /// Rebuild the table from a payload's trailing word list
    pub fn from_word_list(list: &str) -> Result<Self, DecodeError> {
        let mut dictionary = Self::default();
        if list.is_empty() {
            return Ok(dictionary);
        }

        for word in list.split(WORD_SEPARATOR) {
            if dictionary.len() == MAX_CUSTOM_WORDS {
                return Err(DecodeError::InvalidWordList {
                    reason: format!("more than {} words", MAX_CUSTOM_WORDS),
                });
            }
            if !is_candidate(word) {
                return Err(DecodeError::InvalidWordList {
                    reason: format!("'{}' is not a word", word),
                });
            }
            if dictionary.index.contains_key(word) {
                return Err(DecodeError::InvalidWordList {
                    reason: format!("'{}' listed twice", word),
                });
            }
            dictionary.push(word.to_string(), 0, 0);
        }

        Ok(dictionary)
    }

    fn push(&mut self, word: String, frequency: usize, savings: i64) {
        let position = self.entries.len();
        self.index.insert(word.clone(), position as u8);
        self.entries.push(AdaptiveEntry {
            word,
            symbol: char::from(CUSTOM_SYMBOLS[position]),
            frequency,
            savings,
        });
    }

    /// Words joined in symbol order, as stored after the delimiter
    pub fn word_list(&self) -> String {
        let words: Vec<&str> = self.entries.iter().map(|e| e.word.as_str()).collect();
        let separator = WORD_SEPARATOR.to_string();
        words.join(separator.as_str())
    }

    /// Selected entries in symbol order
    pub fn entries(&self) -> &[AdaptiveEntry] {
        &self.entries
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no word was selected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total estimated savings of the selection
    pub fn total_savings(&self) -> i64 {
        self.entries.iter().map(|e| e.savings).sum()
    }
}

impl WordTable for AdaptiveDictionary {
    fn index_of(&self, word: &str) -> Option<u8> {
        self.index.get(word).copied()
    }

    fn word_at(&self, index: u8) -> Option<&str> {
        self.entries
            .get(usize::from(index))
            .map(|e| e.word.as_str())
    }

    fn token(&self, placement: Placement, index: u8) -> Token {
        Token::Custom(placement, index)
    }

    fn matches(&self, token: &Token) -> Option<(Placement, u8)> {
        match token {
            Token::Custom(placement, index) => Some((*placement, *index)),
            _ => None,
        }
    }
}
