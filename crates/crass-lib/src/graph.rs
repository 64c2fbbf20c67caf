//! K-mer graph with normal and jumping edges
//!
//! The [`Graph`] owns every [`Node`] in a single arena and maps each k-mer
//! [`Token`] to the node's [`NodeId`]. Nodes are created the first time their
//! k-mer is seen and live until the graph is dropped.
//!
//! Building happens read by read: successive k-mers of a read become nodes
//! joined by a forward edge and a matching reverse edge. Once repeats are
//! known, [`Graph::identify_repeat_nodes`] classifies the nodes of a repeat
//! path and adds jumping edges that step over it.

use crate::node::{Node, NodeId, NodeType};
use crate::read::{KmerContext, RawRead, ReadId};
use crate::token_table::{Token, TokenTable};
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

/// Errors raised by graph mutation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge referenced a token that has no node yet
    #[error("No node exists for token {0}")]
    MissingNode(Token),
    /// A node handle does not belong to this graph
    #[error("Node handle {0:?} is not part of this graph")]
    UnknownNode(NodeId),
}

/// Number of nodes of each type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeTypeCounts {
    /// Nodes classified as repeat
    pub repeat: usize,
    /// Nodes classified as mixed
    pub mixed: usize,
    /// Nodes classified as spacer
    pub spacer: usize,
    /// Unclassified nodes
    pub undefined: usize,
}

/// K-mer graph built from reads
#[derive(Clone, Debug)]
pub struct Graph {
    /// K-mer length, fixed at construction
    k: usize,
    /// Node arena, indexed by `NodeId`
    nodes: Vec<Node>,
    /// O(1) lookup: token → node handle
    index: ahash::AHashMap<Token, NodeId>,
    /// Nodes first seen inside a spacer since the last spacer pass
    spacer_candidates: Vec<NodeId>,
}

impl Graph {
    /// Create an empty graph for k-mers of length `k`
    pub fn new(k: usize) -> Self {
        Self {
            k,
            nodes: Vec::new(),
            index: ahash::AHashMap::new(),
            spacer_candidates: Vec::new(),
        }
    }

    /// K-mer length
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no k-mer has been added
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node for `token`, or `None` if the k-mer was never observed
    pub fn get_node(&self, token: Token) -> Option<&Node> {
        self.node_id(token).map(|id| &self.nodes[id.0])
    }

    /// Handle of the node for `token`
    pub fn node_id(&self, token: Token) -> Option<NodeId> {
        self.index.get(&token).copied()
    }

    /// Node behind a handle
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Iterate over all nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Fold a read into the graph
    ///
    /// Every k-mer of the read is interned in `tokens`, its node is created or
    /// has its coverage bumped, and the node records a back-reference to
    /// `read_id` together with where the k-mer sits relative to the read's
    /// repeat annotation. Consecutive k-mers are joined by a forward and a
    /// reverse edge.
    ///
    /// Returns the number of k-mers added.
    pub fn add_read_to_graph(
        &mut self,
        read_id: ReadId,
        read: &RawRead,
        tokens: &mut TokenTable,
    ) -> Result<usize, GraphError> {
        let k = self.k;
        let occurrences = read
            .kmers(k)
            .enumerate()
            .map(|(pos, kmer)| (tokens.token_for(kmer), read.kmer_context(pos, k)))
            .collect::<Vec<_>>();
        self.add_occurrences(read_id, &occurrences)?;
        Ok(occurrences.len())
    }

    /// Fold a pre-tokenized k-mer sequence into the graph
    ///
    /// Same as [`Graph::add_read_to_graph`] for callers that tokenize reads
    /// themselves; occurrences are recorded without repeat context.
    pub fn add_tokens(&mut self, read_id: ReadId, tokens: &[Token]) -> Result<(), GraphError> {
        let occurrences = tokens
            .iter()
            .map(|&t| (t, KmerContext::Unannotated))
            .collect::<Vec<_>>();
        self.add_occurrences(read_id, &occurrences)
    }

    fn add_occurrences(
        &mut self,
        read_id: ReadId,
        occurrences: &[(Token, KmerContext)],
    ) -> Result<(), GraphError> {
        let mut previous: Option<Token> = None;
        for &(token, context) in occurrences {
            let id = self.observe(token);
            if context == KmerContext::Spacer && self.nodes[id.0].contexts().spacer == 0 {
                self.spacer_candidates.push(id);
            }
            self.nodes[id.0].record_occurrence(read_id, context);
            if let Some(prev) = previous {
                self.add_edge(prev, token)?;
            }
            previous = Some(token);
        }
        Ok(())
    }

    /// Create the node for `token` or bump its coverage
    fn observe(&mut self, token: Token) -> NodeId {
        if let Some(&id) = self.index.get(&token) {
            self.nodes[id.0].increment_coverage();
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(token));
        self.index.insert(token, id);
        id
    }

    /// Add a normal edge `from → to` and its reverse `to → from`
    ///
    /// Both k-mers must already have nodes. Repeated calls add parallel edges.
    ///
    /// # Errors
    /// [`GraphError::MissingNode`] if either token has no node
    pub fn add_edge(&mut self, from: Token, to: Token) -> Result<(), GraphError> {
        let (from_id, to_id) = self.edge_ends(from, to)?;
        self.nodes[from_id.0].add_fwd_edge(to_id);
        self.nodes[to_id.0].add_rev_edge(from_id);
        Ok(())
    }

    /// Add a jumping edge `from → to` and its reverse `to → from`
    ///
    /// # Errors
    /// [`GraphError::MissingNode`] if either token has no node
    pub fn add_jump_edge(&mut self, from: Token, to: Token) -> Result<(), GraphError> {
        let (from_id, to_id) = self.edge_ends(from, to)?;
        self.nodes[from_id.0].add_fwd_jmp_edge(to_id);
        self.nodes[to_id.0].add_rev_jmp_edge(from_id);
        Ok(())
    }

    fn edge_ends(&self, from: Token, to: Token) -> Result<(NodeId, NodeId), GraphError> {
        let from_id = self.node_id(from).ok_or(GraphError::MissingNode(from))?;
        let to_id = self.node_id(to).ok_or(GraphError::MissingNode(to))?;
        Ok((from_id, to_id))
    }

    /// Nodes of the k-mers lying entirely inside the `i`-th repeat of `read`
    ///
    /// Returns `None` if the read has no `i`-th repeat or one of its k-mers
    /// was never added to the graph. A repeat shorter than `k` gives an empty
    /// path.
    pub fn repeat_path(&self, read: &RawRead, tokens: &TokenTable, i: usize) -> Option<Vec<NodeId>> {
        let repeats = read.repeats();
        let span = repeats.repeat(repeats.repeat_at(i))?;
        let seq = read.seq();
        if span.len() < self.k || span.end > seq.len() {
            return Some(Vec::new());
        }
        (span.start..=span.end - self.k)
            .map(|pos| {
                let token = tokens.get_token(&seq[pos..pos + self.k])?;
                self.node_id(token)
            })
            .collect()
    }

    /// Classify the nodes of a repeat path and add jumping edges around it
    ///
    /// Every path node becomes [`NodeType::Repeat`] when all of its annotated
    /// occurrences lie inside repeats and [`NodeType::Mixed`] otherwise.
    /// Unclassified nodes seen inside a spacer become [`NodeType::Spacer`].
    /// The nodes immediately before the path's first node are then linked by
    /// jumping edges to the nodes immediately after its last node. Running the
    /// pass again over the same path changes nothing.
    ///
    /// Returns the number of jumping edges added.
    ///
    /// # Errors
    /// [`GraphError::UnknownNode`] if the path holds a handle from another graph
    pub fn identify_repeat_nodes(&mut self, path: &[NodeId]) -> Result<usize, GraphError> {
        if let Some(&bad) = path.iter().find(|id| id.0 >= self.nodes.len()) {
            return Err(GraphError::UnknownNode(bad));
        }

        for &id in path {
            let node = &mut self.nodes[id.0];
            let node_type = if node.contexts().seen_outside_repeat() {
                NodeType::Mixed
            } else {
                NodeType::Repeat
            };
            node.set_node_type(node_type);
        }

        self.classify_spacer_nodes();

        let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
            return Ok(0);
        };
        let before = distinct_off_path(self.nodes[first.0].rev_edges(), path);
        let after = distinct_off_path(self.nodes[last.0].fwd_edges(), path);

        let mut added = 0;
        for &from in &before {
            for &to in &after {
                if !self.nodes[from.0].fwd_jmp_edges().contains(&to) {
                    self.nodes[from.0].add_fwd_jmp_edge(to);
                    self.nodes[to.0].add_rev_jmp_edge(from);
                    added += 1;
                }
            }
        }
        debug!(
            "Repeat path of {} nodes: {} entry, {} exit, {} new jumping edges",
            path.len(),
            before.len(),
            after.len(),
            added
        );
        Ok(added)
    }

    /// Promote unclassified nodes seen inside a spacer to [`NodeType::Spacer`]
    ///
    /// Only nodes that gained spacer context since the previous pass are
    /// visited, so repeated calls cost nothing once the graph stops growing.
    /// Returns the number of nodes promoted.
    pub fn classify_spacer_nodes(&mut self) -> usize {
        let mut promoted = 0;
        for id in self.spacer_candidates.drain(..) {
            let node = &mut self.nodes[id.0];
            if node.node_type() == NodeType::Undefined {
                node.set_node_type(NodeType::Spacer);
                promoted += 1;
            }
        }
        promoted
    }

    /// Count nodes by classification
    pub fn node_type_counts(&self) -> NodeTypeCounts {
        let mut counts = NodeTypeCounts::default();
        for node in &self.nodes {
            match node.node_type() {
                NodeType::Repeat => counts.repeat += 1,
                NodeType::Mixed => counts.mixed += 1,
                NodeType::Spacer => counts.spacer += 1,
                NodeType::Undefined => counts.undefined += 1,
            }
        }
        counts
    }

    /// Write the graph in Graphviz DOT format
    ///
    /// Nodes are listed in creation order, each labelled with its k-mer and
    /// coverage, followed by all edges. Edge kinds are told apart by style:
    /// forward solid, reverse dotted, forward jumping bold, reverse jumping
    /// dashed.
    pub fn to_graphviz<W: Write>(&self, tokens: &TokenTable, out: &mut W) -> io::Result<()> {
        writeln!(out, "digraph crass {{")?;
        writeln!(out, "  node [shape=box, fontname=\"Courier\"];")?;

        for (id, node) in self.nodes() {
            let kmer = tokens
                .string_for(node.token())
                .map(str::to_owned)
                .unwrap_or_else(|| format!("#{}", node.token()));
            writeln!(
                out,
                "  n{} [label=\"{}\\ncov={}\", color={}, comment=\"{}\"];",
                id.0,
                escape_label(&kmer),
                node.coverage(),
                node_color(node.node_type()),
                node.node_type()
            )?;
        }

        for (id, node) in self.nodes() {
            for to in node.fwd_edges() {
                writeln!(out, "  n{} -> n{};", id.0, to.0)?;
            }
            for to in node.rev_edges() {
                writeln!(out, "  n{} -> n{} [style=dotted, color=gray];", id.0, to.0)?;
            }
            for to in node.fwd_jmp_edges() {
                writeln!(out, "  n{} -> n{} [style=bold, color=blue];", id.0, to.0)?;
            }
            for to in node.rev_jmp_edges() {
                writeln!(out, "  n{} -> n{} [style=dashed, color=blue];", id.0, to.0)?;
            }
        }

        writeln!(out, "}}")
    }
}

fn node_color(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Repeat => "red",
        NodeType::Mixed => "orange",
        NodeType::Spacer => "darkgreen",
        NodeType::Undefined => "black",
    }
}

/// Quote-safe DOT label text
fn escape_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Distinct entries of `edges` not on `path`, in first-seen order
fn distinct_off_path(edges: &[NodeId], path: &[NodeId]) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = Vec::new();
    for &n in edges {
        if !path.contains(&n) && !out.contains(&n) {
            out.push(n);
        }
    }
    out
}
