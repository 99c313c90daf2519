//! In-memory namespace tree.
//!
//! This module provides the hierarchical model behind the emulated session:
//! a tree of nodes that are either directories (owning an ordered set of
//! children) or files (holding immutable text), plus absolute-path
//! computation and path-expression resolution. It performs no I/O of its
//! own; all failures are typed returns.

mod node;
mod tree;

pub use node::{Node, NodeId, NodeKind};
pub use tree::{AttachError, Namespace, ResolveError};
