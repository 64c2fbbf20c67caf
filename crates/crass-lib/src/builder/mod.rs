//! Builder module for constructing repeat graphs
//!
//! This module implements the build pipeline:
//! 1. Parse input reads (FASTA/FASTQ)
//! 2. Scan each read for a direct repeat array
//! 3. Fold annotated reads into the k-mer graph
//! 4. Classify repeat paths and add jumping edges

pub mod config;
pub mod parse;
pub mod graph_builder;

pub use config::BuildConfiguration;
pub use graph_builder::{GraphBuilder, RepeatGraph};
