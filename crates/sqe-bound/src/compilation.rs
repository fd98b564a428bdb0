//! The compilation: every tree, its binding results, and the shared
//! symbol and scope arenas.
//!
//! A compilation is assembled by the binder and is immutable while
//! queries run; query engines borrow it.

use rustc_hash::FxHashMap;
use sqe_symbols::{SymbolArena, SymbolId};
use sqe_syntax::{NodeIndex, SyntaxTree, TreeId};
use tracing::debug;

use crate::bound::BoundTree;
use crate::scope::{ScopeArena, ScopeId};

/// Binding results for one syntax tree.
#[derive(Debug)]
pub struct TreeData {
    pub tree: SyntaxTree,
    pub bound: BoundTree,
    /// Scope introduced by each scope-introducing syntax node.
    pub node_scopes: FxHashMap<NodeIndex, ScopeId>,
    /// Symbol declared by each declaration node.
    pub declarations: FxHashMap<NodeIndex, SymbolId>,
    /// Scope of the compilation unit.
    pub root_scope: ScopeId,
}

#[derive(Debug, Default)]
pub struct Compilation {
    pub symbols: SymbolArena,
    pub scopes: ScopeArena,
    trees: Vec<TreeData>,
    tree_index: FxHashMap<TreeId, usize>,
}

impl Compilation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            symbols: SymbolArena::new(),
            scopes: ScopeArena::new(),
            trees: Vec::new(),
            tree_index: FxHashMap::default(),
        }
    }

    /// Add a tree whose compilation-unit scope is `root_scope`.
    pub fn add_tree(&mut self, tree: SyntaxTree, root_scope: ScopeId) -> TreeId {
        let id = tree.id();
        debug!(tree = id.0, nodes = tree.len(), "adding tree to compilation");
        let mut node_scopes = FxHashMap::default();
        node_scopes.insert(tree.root(), root_scope);
        self.tree_index.insert(id, self.trees.len());
        self.trees.push(TreeData {
            tree,
            bound: BoundTree::new(),
            node_scopes,
            declarations: FxHashMap::default(),
            root_scope,
        });
        id
    }

    /// True if a tree with this id takes part in the compilation.
    #[must_use]
    pub fn contains_tree(&self, id: TreeId) -> bool {
        self.tree_index.contains_key(&id)
    }

    #[must_use]
    pub fn tree_data(&self, id: TreeId) -> Option<&TreeData> {
        self.tree_index.get(&id).and_then(|&i| self.trees.get(i))
    }

    pub fn tree_data_mut(&mut self, id: TreeId) -> Option<&mut TreeData> {
        match self.tree_index.get(&id) {
            Some(&i) => self.trees.get_mut(i),
            None => None,
        }
    }

    #[must_use]
    pub fn tree(&self, id: TreeId) -> Option<&SyntaxTree> {
        self.tree_data(id).map(|d| &d.tree)
    }

    pub fn tree_ids(&self) -> impl Iterator<Item = TreeId> + '_ {
        self.trees.iter().map(|d| d.tree.id())
    }

    /// Record that `node` introduces `scope`.
    pub fn set_node_scope(&mut self, tree: TreeId, node: NodeIndex, scope: ScopeId) {
        if let Some(data) = self.tree_data_mut(tree) {
            data.node_scopes.insert(node, scope);
        }
    }

    /// Record that `node` declares `symbol`.
    pub fn record_declaration(&mut self, tree: TreeId, node: NodeIndex, symbol: SymbolId) {
        if let Some(data) = self.tree_data_mut(tree) {
            data.declarations.insert(node, symbol);
        }
    }
}
