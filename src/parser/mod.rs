//! Passage parser for Twine dialogue stories
//!
//! Turns the raw name, tags and body of a passage into a typed node. Nothing
//! in here fails: malformed names, links and sequence steps are dropped and
//! reported through [`Diagnostics`](crate::types::Diagnostics).

pub mod edge;
pub mod name;
pub mod node;
pub mod sequence;
pub mod text;


pub use edge::{parse_edge, parse_edges};
pub use name::{NodeName, parse_node_index, parse_node_name};
pub use node::{ParsedNode, RawNode};
pub use sequence::{parse_sequence, parse_step};
pub use text::clean_text;
