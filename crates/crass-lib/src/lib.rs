// crass: CRISPR repeat and spacer assembly graph
//
// A Rust library for finding direct repeat arrays in sequencing reads and
// assembling their k-mers into a graph with jumping edges across repeats.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod constants;
pub mod encoding;
pub mod token_table;
pub mod repeat_array;
pub mod read;
pub mod node;
pub mod graph;
pub mod scan;
pub mod builder;

// Re-export common types at crate root
pub use token_table::{Token, TokenTable};
pub use repeat_array::{RepeatArray, RepeatCursor, Span, SpacerCursor};
pub use read::{KmerContext, RawRead, ReadId, ReadSet};
pub use node::{Node, NodeId, NodeType};
pub use graph::{Graph, GraphError, NodeTypeCounts};
pub use builder::{BuildConfiguration, GraphBuilder, RepeatGraph};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}
