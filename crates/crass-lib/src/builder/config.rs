//! Build configuration for repeat graph construction
//!
//! Holds the k-mer length used for graph nodes, the length windows the direct
//! repeat scan accepts for repeats and spacers, and resource limits.

use crate::constants::{
    is_valid_k, DEFAULT_K, DEFAULT_MAX_REPEAT_LEN, DEFAULT_MAX_SPACER_LEN,
    DEFAULT_MIN_REPEAT_COPIES, DEFAULT_MIN_REPEAT_LEN, DEFAULT_MIN_SPACER_LEN, DEFAULT_SEED_LEN,
    MAX_K, MIN_K,
};

/// Configuration parameters for building a repeat graph
#[derive(Debug, Clone)]
pub struct BuildConfiguration {
    /// K-mer length of graph nodes
    pub k: usize,

    /// Shortest direct repeat accepted by the scan
    pub min_repeat_len: usize,

    /// Longest direct repeat accepted by the scan
    pub max_repeat_len: usize,

    /// Shortest spacer accepted between two repeat copies
    pub min_spacer_len: usize,

    /// Longest spacer accepted between two repeat copies
    pub max_spacer_len: usize,

    /// Minimum number of repeat copies for a read to be annotated
    pub min_repeat_copies: usize,

    /// Exact seed length used to find candidate repeat pairs
    pub seed_len: usize,

    /// Number of threads for read preparation (0 = all available cores)
    pub num_threads: usize,

    /// Verbose output during construction
    pub verbose: bool,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            min_repeat_len: DEFAULT_MIN_REPEAT_LEN,
            max_repeat_len: DEFAULT_MAX_REPEAT_LEN,
            min_spacer_len: DEFAULT_MIN_SPACER_LEN,
            max_spacer_len: DEFAULT_MAX_SPACER_LEN,
            min_repeat_copies: DEFAULT_MIN_REPEAT_COPIES,
            seed_len: DEFAULT_SEED_LEN,
            num_threads: 0,
            verbose: false,
        }
    }
}

impl BuildConfiguration {
    /// Create a new build configuration with the specified k-mer length
    pub fn new(k: usize) -> Result<Self, String> {
        let config = Self {
            k,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_k(self.k) {
            return Err(format!(
                "k must be in range [{}, {}], got k={}",
                MIN_K, MAX_K, self.k
            ));
        }

        if self.min_repeat_len > self.max_repeat_len {
            return Err(format!(
                "min repeat length {} exceeds max repeat length {}",
                self.min_repeat_len, self.max_repeat_len
            ));
        }
        if self.min_spacer_len > self.max_spacer_len {
            return Err(format!(
                "min spacer length {} exceeds max spacer length {}",
                self.min_spacer_len, self.max_spacer_len
            ));
        }

        // seeds must fit inside the shortest repeat
        if self.seed_len == 0 || self.seed_len > self.min_repeat_len {
            return Err(format!(
                "seed length must be in range [1, {}], got {}",
                self.min_repeat_len, self.seed_len
            ));
        }

        if self.min_repeat_copies < 2 {
            return Err(format!(
                "at least two repeat copies are needed to call an array, got {}",
                self.min_repeat_copies
            ));
        }

        Ok(())
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Build Configuration:");
        tracing::info!("  k = {}", self.k);
        tracing::info!(
            "  repeat length = [{}, {}]",
            self.min_repeat_len,
            self.max_repeat_len
        );
        tracing::info!(
            "  spacer length = [{}, {}]",
            self.min_spacer_len,
            self.max_spacer_len
        );
        tracing::debug!("  min_repeat_copies = {}", self.min_repeat_copies);
        tracing::debug!("  seed_len = {}", self.seed_len);
        if self.num_threads == 0 {
            tracing::info!("  num_threads = all available cores");
        } else {
            tracing::info!("  num_threads = {}", self.num_threads);
        }
        tracing::debug!("  verbose = {}", self.verbose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfiguration::default();
        assert_eq!(config.k, 8);
        assert_eq!(config.min_repeat_len, 23);
        assert_eq!(config.max_spacer_len, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_config() {
        let config = BuildConfiguration::new(11).unwrap();
        assert_eq!(config.k, 11);
        assert!(BuildConfiguration::new(2).is_err());
    }

    #[test]
    fn test_validate_k_out_of_range() {
        let config = BuildConfiguration { k: 64, ..BuildConfiguration::default() };
        assert!(config.validate().is_err());

        let config = BuildConfiguration { k: 1, ..BuildConfiguration::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_length_windows() {
        let config = BuildConfiguration {
            min_repeat_len: 40,
            max_repeat_len: 30,
            ..BuildConfiguration::default()
        };
        assert!(config.validate().is_err());

        let config = BuildConfiguration {
            min_spacer_len: 60,
            ..BuildConfiguration::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_seed_and_copies() {
        let config = BuildConfiguration { seed_len: 0, ..BuildConfiguration::default() };
        assert!(config.validate().is_err());

        let config = BuildConfiguration { seed_len: 30, ..BuildConfiguration::default() };
        assert!(config.validate().is_err());

        let config = BuildConfiguration { min_repeat_copies: 1, ..BuildConfiguration::default() };
        assert!(config.validate().is_err());
    }
}
