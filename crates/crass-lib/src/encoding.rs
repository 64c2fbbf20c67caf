//! Nucleotide handling for reads
//!
//! Reads are stored as uppercase ASCII over the alphabet `ACGTN`. This module
//! validates and normalizes raw sequence bytes and computes reverse
//! complements when a read's orientation is flipped.

use thiserror::Error;

/// Error type for encoding operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The input byte is not a nucleotide
    #[error("Invalid base {base:?} at position {position}")]
    InvalidBase {
        /// Offending byte
        base: u8,
        /// Position of the byte in the sequence
        position: usize,
    },
    /// The sequence is not valid UTF-8 after normalization
    #[error("Sequence is not valid ASCII")]
    NotAscii,
}

/// Normalize a single base to uppercase, rejecting anything outside `ACGTN`
#[inline]
pub const fn normalize_base(base: u8) -> Option<u8> {
    match base {
        b'A' | b'a' => Some(b'A'),
        b'C' | b'c' => Some(b'C'),
        b'G' | b'g' => Some(b'G'),
        b'T' | b't' => Some(b'T'),
        b'N' | b'n' => Some(b'N'),
        _ => None,
    }
}

/// Complement of an uppercase base. `N` (and anything unknown) maps to `N`.
#[inline]
pub const fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        _ => b'N',
    }
}

/// Validate and uppercase a raw sequence
///
/// # Errors
/// Returns [`EncodingError::InvalidBase`] for the first byte outside `ACGTN`
pub fn normalize_sequence(sequence: &[u8]) -> Result<String, EncodingError> {
    let mut normalized = Vec::with_capacity(sequence.len());
    for (position, &base) in sequence.iter().enumerate() {
        let upper = normalize_base(base).ok_or(EncodingError::InvalidBase { base, position })?;
        normalized.push(upper);
    }
    String::from_utf8(normalized).map_err(|_| EncodingError::NotAscii)
}

/// Reverse complement of a normalized sequence
pub fn reverse_complement(sequence: &str) -> String {
    sequence
        .bytes()
        .rev()
        .map(|b| complement_base(b) as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(b'a'), Some(b'A'));
        assert_eq!(normalize_base(b'C'), Some(b'C'));
        assert_eq!(normalize_base(b'g'), Some(b'G'));
        assert_eq!(normalize_base(b'T'), Some(b'T'));
        assert_eq!(normalize_base(b'n'), Some(b'N'));

        assert_eq!(normalize_base(b'X'), None);
        assert_eq!(normalize_base(b'-'), None);
        assert_eq!(normalize_base(b' '), None);
    }

    #[test]
    fn test_complement_base() {
        assert_eq!(complement_base(b'A'), b'T');
        assert_eq!(complement_base(b'T'), b'A');
        assert_eq!(complement_base(b'C'), b'G');
        assert_eq!(complement_base(b'G'), b'C');
        assert_eq!(complement_base(b'N'), b'N');
    }

    #[test]
    fn test_normalize_sequence() {
        assert_eq!(normalize_sequence(b"acgtN").unwrap(), "ACGTN");

        let err = normalize_sequence(b"ACG-T").unwrap_err();
        assert_eq!(err, EncodingError::InvalidBase { base: b'-', position: 3 });
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement("ACGT"), "ACGT");
        assert_eq!(reverse_complement("AACG"), "CGTT");
        assert_eq!(reverse_complement("GATTACA"), "TGTAATC");
        assert_eq!(reverse_complement(""), "");
    }
}
