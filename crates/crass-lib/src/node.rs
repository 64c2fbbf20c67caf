//! Graph nodes
//!
//! A [`Node`] is one k-mer's presence in the [`Graph`](crate::graph::Graph).
//! Edges and read back-references are stored as handles ([`NodeId`],
//! [`ReadId`]) into arenas owned elsewhere, never as owning references.
//!
//! Two kinds of edges leave a node:
//! - normal edges join k-mers that follow each other in a read, one base apart
//!   (standard de Bruijn adjacency);
//! - jumping edges join the nodes on either side of a repeat, standing in for
//!   the repeat itself so a walk can step over it.

use crate::read::{KmerContext, ReadId};
use crate::token_table::Token;
use std::fmt;

/// Handle of a node inside its graph's arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// Classification of the bases a node covers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// All bases come from a repeat
    Repeat,
    /// Bases come from both repeat and non-repeat sequence
    Mixed,
    /// All bases come from a spacer
    Spacer,
    /// Not classified yet
    #[default]
    Undefined,
}

impl NodeType {
    /// Short lowercase name, used in renderings
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Repeat => "repeat",
            NodeType::Mixed => "mixed",
            NodeType::Spacer => "spacer",
            NodeType::Undefined => "undefined",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occurrence counts of a node, split by read context
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContextCounts {
    /// Occurrences fully inside a repeat
    pub repeat: u32,
    /// Occurrences fully inside a spacer
    pub spacer: u32,
    /// Occurrences in flanking sequence or across a boundary
    pub other: u32,
}

impl ContextCounts {
    fn record(&mut self, context: KmerContext) {
        match context {
            KmerContext::Repeat => self.repeat += 1,
            KmerContext::Spacer => self.spacer += 1,
            KmerContext::Other => self.other += 1,
            KmerContext::Unannotated => {}
        }
    }

    /// Whether any occurrence lay outside a repeat
    pub fn seen_outside_repeat(&self) -> bool {
        self.spacer > 0 || self.other > 0
    }
}

/// A k-mer node
#[derive(Clone, Debug)]
pub struct Node {
    token: Token,
    coverage: u32,
    node_type: NodeType,
    contexts: ContextCounts,
    fwd_edges: Vec<NodeId>,
    rev_edges: Vec<NodeId>,
    fwd_jmp_edges: Vec<NodeId>,
    rev_jmp_edges: Vec<NodeId>,
    reads: Vec<ReadId>,
}

impl Node {
    /// Create a node seen once, unclassified and without edges
    pub fn new(token: Token) -> Self {
        Self {
            token,
            coverage: 1,
            node_type: NodeType::Undefined,
            contexts: ContextCounts::default(),
            fwd_edges: Vec::new(),
            rev_edges: Vec::new(),
            fwd_jmp_edges: Vec::new(),
            rev_jmp_edges: Vec::new(),
            reads: Vec::new(),
        }
    }

    /// Token of the k-mer this node stands for
    pub fn token(&self) -> Token {
        self.token
    }

    /// Number of times the k-mer has been observed
    pub fn coverage(&self) -> u32 {
        self.coverage
    }

    /// Current classification
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Occurrence counts by read context
    pub fn contexts(&self) -> ContextCounts {
        self.contexts
    }

    /// Reads passing through this node, one entry per occurrence
    pub fn reads(&self) -> &[ReadId] {
        &self.reads
    }

    /// Number of normal edges arriving at this node
    pub fn in_degree(&self) -> usize {
        self.rev_edges.len()
    }

    /// Number of normal edges leaving this node
    pub fn out_degree(&self) -> usize {
        self.fwd_edges.len()
    }

    /// Number of jumping edges arriving at this node
    pub fn in_jmp_degree(&self) -> usize {
        self.rev_jmp_edges.len()
    }

    /// Number of jumping edges leaving this node
    pub fn out_jmp_degree(&self) -> usize {
        self.fwd_jmp_edges.len()
    }

    /// Forward normal edges in insertion order
    pub fn fwd_edges(&self) -> &[NodeId] {
        &self.fwd_edges
    }

    /// Reverse normal edges in insertion order
    pub fn rev_edges(&self) -> &[NodeId] {
        &self.rev_edges
    }

    /// Forward jumping edges in insertion order
    pub fn fwd_jmp_edges(&self) -> &[NodeId] {
        &self.fwd_jmp_edges
    }

    /// Reverse jumping edges in insertion order
    pub fn rev_jmp_edges(&self) -> &[NodeId] {
        &self.rev_jmp_edges
    }

    /// `n`-th forward edge
    pub fn fwd_edge(&self, n: usize) -> Option<NodeId> {
        self.fwd_edges.get(n).copied()
    }

    /// `n`-th reverse edge
    pub fn rev_edge(&self, n: usize) -> Option<NodeId> {
        self.rev_edges.get(n).copied()
    }

    /// `n`-th forward jumping edge
    pub fn fwd_jmp_edge(&self, n: usize) -> Option<NodeId> {
        self.fwd_jmp_edges.get(n).copied()
    }

    /// `n`-th reverse jumping edge
    pub fn rev_jmp_edge(&self, n: usize) -> Option<NodeId> {
        self.rev_jmp_edges.get(n).copied()
    }

    pub(crate) fn increment_coverage(&mut self) {
        self.coverage = self.coverage.saturating_add(1);
    }

    pub(crate) fn record_occurrence(&mut self, read: ReadId, context: KmerContext) {
        self.reads.push(read);
        self.contexts.record(context);
    }

    pub(crate) fn set_node_type(&mut self, node_type: NodeType) {
        self.node_type = node_type;
    }

    pub(crate) fn add_fwd_edge(&mut self, n: NodeId) {
        self.fwd_edges.push(n);
    }

    pub(crate) fn add_rev_edge(&mut self, n: NodeId) {
        self.rev_edges.push(n);
    }

    pub(crate) fn add_fwd_jmp_edge(&mut self, n: NodeId) {
        self.fwd_jmp_edges.push(n);
    }

    pub(crate) fn add_rev_jmp_edge(&mut self, n: NodeId) {
        self.rev_jmp_edges.push(n);
    }
}
