//! Arena-backed module tree
//!
//! Nodes live in one `Vec` and refer to each other by index. Documents are
//! owned by the tree and referenced from nodes by index, so a page is stored
//! once no matter how the tree is shaped.

use crate::extract::NormalizedDocument;

/// Index of a node in [`ModuleTree::nodes`]
pub type NodeId = usize;

/// Index of a document in [`ModuleTree::documents`]
pub type DocId = usize;

/// The heading a virtual node was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRef {
    pub doc: DocId,
    /// Index into the document's `headings`
    pub heading: usize,
}

/// One module or submodule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    /// Short name taken from the URL path or heading
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// URL path shared by the node's pages, e.g. `/docs/guide`
    pub path_prefix: String,

    pub description: String,

    /// Pages owned directly by this node, in URL order
    pub pages: Vec<DocId>,

    /// Child nodes, in name order
    pub submodules: Vec<NodeId>,

    pub parent: Option<NodeId>,

    /// Set for nodes derived from a page's headings rather than URL paths
    pub section: Option<SectionRef>,
}

impl ModuleNode {
    pub(crate) fn new(name: &str, title: &str, path_prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            path_prefix: path_prefix.to_string(),
            description: String::new(),
            pages: Vec::new(),
            submodules: Vec::new(),
            parent: None,
            section: None,
        }
    }

    /// Returns true for heading-derived nodes, which own no pages
    pub fn is_virtual(&self) -> bool {
        self.section.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.submodules.is_empty()
    }
}

/// The inferred module hierarchy of a site
#[derive(Debug, Clone)]
pub struct ModuleTree {
    nodes: Vec<ModuleNode>,
    documents: Vec<NormalizedDocument>,
}

impl ModuleTree {
    /// Id of the root node
    pub const ROOT: NodeId = 0;

    /// Creates a tree holding only a root node
    pub(crate) fn new(root: ModuleNode, documents: Vec<NormalizedDocument>) -> Self {
        Self {
            nodes: vec![root],
            documents,
        }
    }

    /// Appends `node` as the last child of `parent`
    pub(crate) fn add_child(&mut self, parent: NodeId, mut node: ModuleNode) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].submodules.push(id);
        id
    }

    /// Removes the most recently added node if it is a leaf
    ///
    /// Nodes are built depth-first, so a childless node that was just filled
    /// is always the last one in the arena.
    pub(crate) fn pop_leaf(&mut self, id: NodeId) -> Option<ModuleNode> {
        if id == Self::ROOT || id + 1 != self.nodes.len() || !self.nodes[id].is_leaf() {
            return None;
        }

        let node = self.nodes.pop()?;
        if let Some(parent) = node.parent {
            self.nodes[parent].submodules.retain(|child| *child != id);
        }
        Some(node)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut ModuleNode {
        &mut self.nodes[id]
    }

    pub fn root(&self) -> &ModuleNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &ModuleNode {
        &self.nodes[id]
    }

    /// All nodes; index 0 is the root. Detached nodes are never created, so
    /// every entry is reachable from the root.
    pub fn nodes(&self) -> &[ModuleNode] {
        &self.nodes
    }

    pub fn document(&self, id: DocId) -> &NormalizedDocument {
        &self.documents[id]
    }

    /// All documents in URL order
    pub fn documents(&self) -> &[NormalizedDocument] {
        &self.documents
    }

    /// Children of a node, in order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &ModuleNode)> + '_ {
        self.nodes[id]
            .submodules
            .iter()
            .map(move |child| (*child, &self.nodes[*child]))
    }

    /// Finds a node by its path of names below the root
    pub fn find(&self, names: &[&str]) -> Option<NodeId> {
        names.iter().try_fold(Self::ROOT, |current, name| {
            self.nodes[current]
                .submodules
                .iter()
                .copied()
                .find(|child| self.nodes[*child].name == *name)
        })
    }

    /// Pages of a node and all of its descendants, in URL order
    pub fn pages_under(&self, id: NodeId) -> Vec<DocId> {
        let mut pages = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            pages.extend(node.pages.iter().copied());
            stack.extend(node.submodules.iter().copied());
        }
        pages.sort_unstable();
        pages
    }

    /// Number of page placements across the tree
    pub fn page_count(&self) -> usize {
        self.nodes.iter().map(|n| n.pages.len()).sum()
    }

    /// Number of nodes below the root
    pub fn module_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Depth of the deepest node; the root alone has depth 0
    pub fn depth(&self) -> usize {
        fn walk(tree: &ModuleTree, id: NodeId) -> usize {
            tree.nodes[id]
                .submodules
                .iter()
                .map(|child| 1 + walk(tree, *child))
                .max()
                .unwrap_or(0)
        }
        walk(self, Self::ROOT)
    }
}
