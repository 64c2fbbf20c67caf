//! Constants and default parameters for crass
//!
//! K-mer bounds, repeat/spacer length defaults used by the direct repeat
//! scan, and the version triple.

/// Default k-mer length for graph construction
pub const DEFAULT_K: usize = 8;

/// Minimum k-mer length supported
pub const MIN_K: usize = 3;

/// Maximum k-mer length supported
pub const MAX_K: usize = 63;

/// Check if a k-mer size is valid
#[inline]
pub const fn is_valid_k(k: usize) -> bool {
    k >= MIN_K && k <= MAX_K
}

/// Default minimum direct repeat length
pub const DEFAULT_MIN_REPEAT_LEN: usize = 23;
/// Default maximum direct repeat length
pub const DEFAULT_MAX_REPEAT_LEN: usize = 47;

/// Default minimum spacer length
pub const DEFAULT_MIN_SPACER_LEN: usize = 26;
/// Default maximum spacer length
pub const DEFAULT_MAX_SPACER_LEN: usize = 50;

/// Minimum number of repeat copies a read must carry to be annotated
pub const DEFAULT_MIN_REPEAT_COPIES: usize = 2;

/// Length of the exact seed used to find repeat candidates
pub const DEFAULT_SEED_LEN: usize = 8;

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_k() {
        assert!(is_valid_k(3));
        assert!(is_valid_k(8));
        assert!(is_valid_k(31));
        assert!(is_valid_k(63));

        assert!(!is_valid_k(0));
        assert!(!is_valid_k(2));
        assert!(!is_valid_k(64));
    }

    #[test]
    fn test_default_bounds_are_ordered() {
        assert!(is_valid_k(DEFAULT_K));
        assert!(DEFAULT_MIN_REPEAT_LEN <= DEFAULT_MAX_REPEAT_LEN);
        assert!(DEFAULT_MIN_SPACER_LEN <= DEFAULT_MAX_SPACER_LEN);
        assert!(DEFAULT_SEED_LEN <= DEFAULT_MIN_REPEAT_LEN);
    }
}
