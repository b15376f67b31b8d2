//! Hierarchical row generation
//!
//! Turns the nested leads document (buyers → tiers → makes → models →
//! years, buyers → dealers → ...) into flat per-entity rows. Each level of
//! the document is matched against a node of the [`GeneratorTree`]; the
//! identity of every entry is handed down so that deeply nested rows carry
//! their full composite key.

pub mod extractor;
pub mod node;
pub mod rows;
pub mod tree;

pub use extractor::RowExtractor;
pub use node::{derive_identity, NodeDef, NodeId, Normalize};
pub use rows::{EntityRows, Row, RowSet};
pub use tree::{GeneratorTree, NodeSpec};
