//! Fixed abbreviations
//!
//! Literals in property-value position (right after `:`) are replaced by
//! one-letter markers. Empty objects in value position also absorb up to
//! two closing braces that follow them, longest run first.
//!
//! | JSON     | Marker |
//! |----------|--------|
//! | `false`  | `F`    |
//! | `true`   | `T`    |
//! | `null`   | `N`    |
//! | `{}`     | `O`    |
//! | `{}}`    | `P`    |
//! | `{}}}`   | `Q`    |
//!
//! Literals inside arrays are left untouched. Strings are separate
//! tokens, so a string value `"true"` is never mistaken for a literal.

use crate::token::Token;

/// One-letter replacement for a literal in value position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `false`
    False,
    /// `true`
    True,
    /// `null`
    Null,
    /// `{}`
    EmptyObject,
    /// `{}}`
    EmptyObjectClose,
    /// `{}}}`
    EmptyObjectCloseTwice,
}

impl Marker {
    /// Letter written in the compact text
    pub fn symbol(self) -> char {
        match self {
            Marker::False => 'F',
            Marker::True => 'T',
            Marker::Null => 'N',
            Marker::EmptyObject => 'O',
            Marker::EmptyObjectClose => 'P',
            Marker::EmptyObjectCloseTwice => 'Q',
        }
    }

    /// Parse a marker letter
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'F' => Some(Marker::False),
            'T' => Some(Marker::True),
            'N' => Some(Marker::Null),
            'O' => Some(Marker::EmptyObject),
            'P' => Some(Marker::EmptyObjectClose),
            'Q' => Some(Marker::EmptyObjectCloseTwice),
            _ => None,
        }
    }

    fn empty_object(closes: usize) -> Self {
        match closes {
            0 => Marker::EmptyObject,
            1 => Marker::EmptyObjectClose,
            _ => Marker::EmptyObjectCloseTwice,
        }
    }

    fn expand_into(self, out: &mut Vec<Token>) {
        let closes = match self {
            Marker::False => return out.push(Token::Bool(false)),
            Marker::True => return out.push(Token::Bool(true)),
            Marker::Null => return out.push(Token::Null),
            Marker::EmptyObject => 0,
            Marker::EmptyObjectClose => 1,
            Marker::EmptyObjectCloseTwice => 2,
        };
        out.push(Token::ObjectStart);
        out.push(Token::ObjectEnd);
        out.extend(std::iter::repeat(Token::ObjectEnd).take(closes));
    }
}

/// Replace value-position literals with markers
pub fn encode(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if out.last() != Some(&Token::Colon) {
            out.push(token);
            continue;
        }
        match token {
            Token::Bool(false) => out.push(Token::Marker(Marker::False)),
            Token::Bool(true) => out.push(Token::Marker(Marker::True)),
            Token::Null => out.push(Token::Marker(Marker::Null)),
            Token::ObjectStart if iter.peek() == Some(&Token::ObjectEnd) => {
                iter.next();
                let mut closes = 0;
                while closes < 2 && iter.peek() == Some(&Token::ObjectEnd) {
                    iter.next();
                    closes += 1;
                }
                out.push(Token::Marker(Marker::empty_object(closes)));
            }
            other => out.push(other),
        }
    }

    out
}

/// Expand markers back into JSON tokens
pub fn decode(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Marker(marker) => marker.expand_into(&mut out),
            other => out.push(other),
        }
    }
    out
}
