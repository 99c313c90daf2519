use hashlink::LinkedHashMap;

/// Handle to a node inside a [`Namespace`](super::Namespace).
///
/// Ids are plain arena indices: freely copyable, never owning. The arena is
/// the only place a node can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(super) usize);

/// A single entry in the namespace tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(super) name: String,
    pub(super) parent: Option<NodeId>,
    pub(super) kind: NodeKind,
}

impl Node {
    /// The segment identifying this node within its parent.
    ///
    /// Non-empty and free of `/` for every node except the root, whose name
    /// is the empty string.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing directory, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// The closed set of node variants. Callers match exhaustively on this
/// instead of querying a boolean and downcasting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Children keyed by name, insertion order preserved.
    Directory {
        children: LinkedHashMap<String, NodeId>,
    },
    /// Terminal node holding an opaque text blob, immutable after
    /// construction.
    File { content: String },
}
