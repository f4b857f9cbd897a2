//! Node arena.
//!
//! Nodes live in one flat `Vec` per file and reference each other by
//! `NodeId`. The front end serializes the arena without parent links;
//! `set_parents` fills them in after loading, walking `child_ids` from the
//! root. The engine treats a loaded arena as immutable.

use serde::{Deserialize, Serialize};

use tsdart_common::Span;

use crate::kind::SyntaxKind;
use crate::node::{Comment, NodeData};
use crate::symbols::SymbolId;

/// Index of a node in its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One tree node: span, annotations, payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<Comment>,
    #[serde(skip)]
    pub parent: Option<NodeId>,
    pub data: NodeData,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind()
    }
}

/// Arena of nodes for one source file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    #[must_use]
    pub fn new() -> Ast {
        Ast::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node with an empty span. Builder convenience for front ends
    /// and tests.
    pub fn add(&mut self, data: NodeData) -> NodeId {
        self.add_spanned(data, Span::empty())
    }

    /// Append a node with a source span.
    pub fn add_spanned(&mut self, data: NodeData, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            span,
            symbol: None,
            leading_comments: Vec::new(),
            parent: None,
            data,
        });
        id
    }

    /// Attach a resolved symbol to a node (builder side).
    pub fn set_symbol(&mut self, id: NodeId, symbol: SymbolId) {
        self.nodes[id.index()].symbol = Some(symbol);
    }

    /// Attach a leading comment to a node (builder side).
    pub fn add_leading_comment(&mut self, id: NodeId, pos: u32, text: impl Into<String>) {
        self.nodes[id.index()]
            .leading_comments
            .push(Comment {
                pos,
                text: text.into(),
            });
    }

    /// Fill in parent links for the subtree under `root`. Called once after
    /// loading or building; children are discovered via `NodeData::child_ids`.
    pub fn set_parents(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            for child in self.nodes[id.index()].data.child_ids() {
                self.nodes[child.index()].parent = Some(id);
                stack.push(child);
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].kind()
    }

    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[must_use]
    pub fn symbol_of(&self, id: NodeId) -> Option<SymbolId> {
        self.nodes[id.index()].symbol
    }

    /// Identifier or property-access name text, when the node has one.
    /// The facade engine's candidate pre-filter runs on this.
    #[must_use]
    pub fn name_text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Identifier { text } => Some(text),
            NodeData::PropertyAccess { name, .. } => Some(name),
            NodeData::TypeRef { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Pre-order iteration over the subtree under `root`.
    pub fn walk(&self, root: NodeId, mut visit: impl FnMut(NodeId)) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            visit(id);
            let mut children = self.data(id).child_ids();
            children.reverse();
            stack.extend(children);
        }
    }

    /// Does `needle` occur in the subtree under `root` (inclusive)?
    #[must_use]
    pub fn subtree_contains(&self, root: NodeId, mut pred: impl FnMut(NodeId) -> bool) -> bool {
        let mut found = false;
        self.walk(root, |id| {
            if pred(id) {
                found = true;
            }
        });
        found
    }
}
