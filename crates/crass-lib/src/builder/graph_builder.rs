//! Repeat graph builder orchestration
//!
//! Coordinates the pipeline that turns raw reads into a classified graph:
//! 1. Scan reads for direct repeats (parallel)
//! 2. Fold annotated reads into the graph
//! 3. Classify repeat paths and add jumping edges

use crate::{
    builder::config::BuildConfiguration,
    graph::{Graph, NodeTypeCounts},
    node::NodeId,
    read::{RawRead, ReadSet},
    scan::annotate_read,
    token_table::TokenTable,
};
use ahash::AHashSet;
use rayon::prelude::*;
use tracing::info;

/// A built graph together with the collaborators its handles point into
#[derive(Debug)]
pub struct RepeatGraph {
    /// The k-mer graph
    pub graph: Graph,
    /// Interned k-mers behind the graph's tokens
    pub tokens: TokenTable,
    /// Reads the graph's read handles refer to
    pub reads: ReadSet,
    /// Distinct repeat paths classified
    pub repeat_paths: usize,
    /// Jumping edges added while classifying repeats
    pub jump_edges: usize,
}

impl RepeatGraph {
    /// Node counts by classification
    pub fn node_type_counts(&self) -> NodeTypeCounts {
        self.graph.node_type_counts()
    }
}

/// Builder for constructing repeat graphs
pub struct GraphBuilder {
    config: BuildConfiguration,
}

impl GraphBuilder {
    /// Create a new graph builder with the given configuration
    pub fn new(config: BuildConfiguration) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &BuildConfiguration {
        &self.config
    }

    /// Build a graph from raw reads
    ///
    /// Reads without a direct repeat array are dropped before graph
    /// construction.
    ///
    /// # Parallelism
    /// Repeat scanning runs on a rayon pool sized by `config.num_threads`
    /// (`0` = all cores). Graph mutation is single threaded.
    pub fn build_from_reads(&self, reads: Vec<RawRead>) -> Result<RepeatGraph, String> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()
            .map_err(|e| format!("Failed to create thread pool: {e}"))?;

        pool.install(|| self.build_from_reads_inner(reads))
    }

    fn build_from_reads_inner(&self, reads: Vec<RawRead>) -> Result<RepeatGraph, String> {
        if self.config.verbose {
            self.config.print();
        }
        info!("Building repeat graph");

        info!("Step 1: Scanning reads for direct repeats...");
        let num_input = reads.len();
        let reads = self.scan_reads(reads);
        info!("  {} of {} reads carry a repeat array", reads.len(), num_input);

        info!("Step 2: Adding reads to graph...");
        let mut graph = Graph::new(self.config.k);
        let mut tokens = TokenTable::new();
        let mut num_kmers = 0;
        for (id, read) in reads.iter() {
            num_kmers += graph
                .add_read_to_graph(id, read, &mut tokens)
                .map_err(|e| format!("Failed to add read '{}': {}", read.header(), e))?;
        }
        info!("  {} k-mers, {} distinct nodes", num_kmers, graph.num_nodes());

        info!("Step 3: Identifying repeat nodes...");
        let mut seen_paths: AHashSet<Vec<NodeId>> = AHashSet::new();
        let mut jump_edges = 0;
        for (_, read) in reads.iter() {
            for i in 0..read.repeats().number_of_repeats() {
                let Some(path) = graph.repeat_path(read, &tokens, i) else {
                    continue;
                };
                // copies of a repeat already classified add nothing
                if seen_paths.contains(&path) {
                    continue;
                }
                jump_edges += graph
                    .identify_repeat_nodes(&path)
                    .map_err(|e| e.to_string())?;
                seen_paths.insert(path);
            }
        }
        graph.classify_spacer_nodes();
        let counts = graph.node_type_counts();
        info!(
            "  repeat={} mixed={} spacer={} undefined={}",
            counts.repeat, counts.mixed, counts.spacer, counts.undefined
        );
        info!("  {} distinct repeat paths, {} jumping edges", seen_paths.len(), jump_edges);

        info!("Repeat Graph Build Complete");
        Ok(RepeatGraph {
            graph,
            tokens,
            reads,
            repeat_paths: seen_paths.len(),
            jump_edges,
        })
    }

    /// Annotate every read in parallel and keep the ones with repeats
    fn scan_reads(&self, mut reads: Vec<RawRead>) -> ReadSet {
        reads
            .par_iter_mut()
            .for_each(|read| {
                annotate_read(read, &self.config);
            });
        reads
            .into_iter()
            .filter(|read| !read.repeats().is_empty())
            .collect()
    }
}
