//! String interning for k-mers
//!
//! The graph never stores k-mer text. Each distinct k-mer is assigned a
//! [`Token`] the first time it is seen, and the text can be recovered for
//! rendering. A table is an ordinary value passed by reference to whoever
//! needs it; there is no process-wide instance.

use std::fmt;

/// Stable integer identifier of an interned k-mer
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u32);

impl Token {
    /// Raw value of the token
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bidirectional k-mer ↔ token mapping
///
/// Tokens are handed out densely from 0 in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct TokenTable {
    /// Interned strings, indexed by token value
    strings: Vec<String>,
    /// O(1) lookup: string → token
    index: ahash::AHashMap<String, Token>,
}

impl TokenTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for `s`, interning it on first sight
    pub fn token_for(&mut self, s: &str) -> Token {
        if let Some(&token) = self.index.get(s) {
            return token;
        }

        let token = Token(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.index.insert(s.to_owned(), token);
        token
    }

    /// Token for `s` if it has already been interned
    pub fn get_token(&self, s: &str) -> Option<Token> {
        self.index.get(s).copied()
    }

    /// Text behind `token`, `None` if this table never issued it
    pub fn string_for(&self, token: Token) -> Option<&str> {
        self.strings.get(token.index()).map(String::as_str)
    }

    /// Number of distinct strings interned
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if nothing has been interned
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_same_token() {
        let mut table = TokenTable::new();
        let a = table.token_for("ACGT");
        let b = table.token_for("TTTT");
        let again = table.token_for("ACGT");

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_reverse_lookup() {
        let mut table = TokenTable::new();
        let a = table.token_for("ACGT");
        let b = table.token_for("GGCC");

        assert_eq!(table.string_for(a), Some("ACGT"));
        assert_eq!(table.string_for(b), Some("GGCC"));
        assert_eq!(table.string_for(Token(99)), None);
    }

    #[test]
    fn test_get_token_does_not_intern() {
        let mut table = TokenTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get_token("ACGT"), None);
        assert!(table.is_empty());

        let token = table.token_for("ACGT");
        assert_eq!(table.get_token("ACGT"), Some(token));
    }

    #[test]
    fn test_tokens_are_dense() {
        let mut table = TokenTable::new();
        let values: Vec<u32> = ["AAA", "CCC", "AAA", "GGG"]
            .iter()
            .map(|s| table.token_for(s).value())
            .collect();
        assert_eq!(values, vec![0, 1, 0, 2]);
    }
}
