//! The immutable syntax tree arena.
//!
//! Nodes are stored in a flat `Vec` and addressed by [`NodeIndex`]. Parent
//! links are stored explicitly so upward walks never need the root. Tokens
//! are leaves; each token owns its leading trivia, so a token's `full_span`
//! starts where the previous token's `span` ended.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use sqe_common::TextSpan;
use sqe_common::limits::MAX_TREE_WALK_ITERATIONS;

use crate::kind::SyntaxKind;

/// Identity of a syntax tree. The compilation records which ids take part
/// in it; trees built for speculation carry ids the compilation never saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeId(pub u32);

/// Index of a node in its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

/// One node or token.
#[derive(Clone, Debug)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub parent: NodeIndex,
    pub children: SmallVec<[NodeIndex; 4]>,
    /// Span including leading trivia.
    pub full_span: TextSpan,
    /// Span excluding leading trivia.
    pub span: TextSpan,
    /// Position of this token in document order (`u32::MAX` for nodes).
    pub token_ordinal: u32,
    /// Parser error recovery inserted this token (or every token of this node).
    pub missing: bool,
}

impl SyntaxNode {
    #[inline]
    #[must_use]
    pub fn is_token(&self) -> bool {
        self.kind.is_token()
    }
}

/// An immutable syntax tree.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    pub(crate) id: TreeId,
    pub(crate) nodes: Vec<SyntaxNode>,
    pub(crate) root: NodeIndex,
    pub(crate) text: String,
    /// Tokens in document order; the last one is always end-of-file.
    pub(crate) tokens: Vec<NodeIndex>,
}

impl SyntaxTree {
    #[inline]
    #[must_use]
    pub fn id(&self) -> TreeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if `idx` addresses a node of this tree.
    #[inline]
    #[must_use]
    pub fn contains_node(&self, idx: NodeIndex) -> bool {
        (idx.0 as usize) < self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> Option<&SyntaxNode> {
        self.nodes.get(idx.0 as usize)
    }

    #[must_use]
    pub fn kind(&self, idx: NodeIndex) -> Option<SyntaxKind> {
        self.node(idx).map(|n| n.kind)
    }

    #[must_use]
    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        self.node(idx).map_or(NodeIndex::NONE, |n| n.parent)
    }

    #[must_use]
    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.node(idx).map_or(&[], |n| n.children.as_slice())
    }

    /// Child nodes that are not tokens.
    pub fn child_nodes(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.children(idx)
            .iter()
            .copied()
            .filter(move |&c| self.node(c).is_some_and(|n| !n.is_token()))
    }

    #[must_use]
    pub fn full_span(&self, idx: NodeIndex) -> TextSpan {
        self.node(idx).map_or_else(TextSpan::default, |n| n.full_span)
    }

    #[must_use]
    pub fn span(&self, idx: NodeIndex) -> TextSpan {
        self.node(idx).map_or_else(TextSpan::default, |n| n.span)
    }

    #[must_use]
    pub fn is_missing(&self, idx: NodeIndex) -> bool {
        self.node(idx).is_some_and(|n| n.missing)
    }

    /// Source text of a node or token, without leading trivia.
    #[must_use]
    pub fn node_text(&self, idx: NodeIndex) -> &str {
        let span = self.span(idx);
        self.text
            .get(span.start as usize..span.end as usize)
            .unwrap_or("")
    }

    /// Tokens in document order.
    #[must_use]
    pub fn tokens(&self) -> &[NodeIndex] {
        &self.tokens
    }

    #[must_use]
    pub fn end_of_file(&self) -> NodeIndex {
        self.tokens.last().copied().unwrap_or(NodeIndex::NONE)
    }

    /// The token whose full span contains `pos`.
    ///
    /// A position at the very end of the text finds the end-of-file token.
    /// Positions outside the root's full span find nothing.
    #[must_use]
    pub fn find_token(&self, pos: u32) -> NodeIndex {
        let root_span = self.full_span(self.root);
        if pos == root_span.end {
            return self.end_of_file();
        }
        if !root_span.contains(pos) {
            return NodeIndex::NONE;
        }
        let found = self.tokens.partition_point(|&t| self.full_span(t).end <= pos);
        self.tokens.get(found).copied().unwrap_or(NodeIndex::NONE)
    }

    /// The previous non-missing token in document order. `NONE` for nodes
    /// that are not tokens.
    #[must_use]
    pub fn previous_token(&self, token: NodeIndex) -> NodeIndex {
        let Some(node) = self.node(token).filter(|n| n.is_token()) else {
            return NodeIndex::NONE;
        };
        let ordinal = (node.token_ordinal as usize).min(self.tokens.len());
        self.tokens[..ordinal]
            .iter()
            .rev()
            .copied()
            .find(|&candidate| !self.is_missing(candidate))
            .unwrap_or(NodeIndex::NONE)
    }

    /// The first token of a node (the node itself for tokens).
    #[must_use]
    pub fn first_token(&self, idx: NodeIndex) -> NodeIndex {
        let mut current = idx;
        for _ in 0..MAX_TREE_WALK_ITERATIONS {
            let Some(node) = self.node(current) else {
                return NodeIndex::NONE;
            };
            if node.is_token() {
                return current;
            }
            match node.children.first() {
                Some(&first) => current = first,
                None => return NodeIndex::NONE,
            }
        }
        NodeIndex::NONE
    }

    /// Ancestors of `idx`, nearest first, excluding `idx` itself.
    pub fn ancestors(&self, idx: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(idx),
            remaining: MAX_TREE_WALK_ITERATIONS,
        }
    }

    /// True if `ancestor` is `idx` or one of its ancestors.
    #[must_use]
    pub fn is_self_or_descendant_of(&self, idx: NodeIndex, ancestor: NodeIndex) -> bool {
        idx == ancestor || self.ancestors(idx).any(|a| a == ancestor)
    }

    /// Nearest ancestor-or-self with the given kind.
    #[must_use]
    pub fn ancestor_or_self_of_kind(&self, idx: NodeIndex, kind: SyntaxKind) -> NodeIndex {
        if self.kind(idx) == Some(kind) {
            return idx;
        }
        self.ancestors(idx)
            .find(|&a| self.kind(a) == Some(kind))
            .unwrap_or(NodeIndex::NONE)
    }

    /// The first child token with exactly `text`, if any.
    #[must_use]
    pub fn child_token(&self, idx: NodeIndex, text: &str) -> NodeIndex {
        self.children(idx)
            .iter()
            .copied()
            .find(|&c| self.node(c).is_some_and(|n| n.is_token()) && self.node_text(c) == text)
            .unwrap_or(NodeIndex::NONE)
    }

    /// The first identifier token directly under `idx` (a declaration's name).
    #[must_use]
    pub fn identifier_token(&self, idx: NodeIndex) -> NodeIndex {
        self.children(idx)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == Some(SyntaxKind::IdentifierToken))
            .unwrap_or(NodeIndex::NONE)
    }

    /// Find the first node of `kind` whose text (without trivia) equals `text`.
    ///
    /// Intended for hosts and tests locating nodes in hand-built trees.
    #[must_use]
    pub fn find_node(&self, kind: SyntaxKind, text: &str) -> NodeIndex {
        self.nodes
            .iter()
            .enumerate()
            .find(|(i, n)| n.kind == kind && self.node_text(NodeIndex(*i as u32)) == text)
            .map_or(NodeIndex::NONE, |(i, _)| NodeIndex(i as u32))
    }

    /// Every node of `kind` whose text equals `text`, in arena order.
    #[must_use]
    pub fn find_nodes(&self, kind: SyntaxKind, text: &str) -> Vec<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, n)| n.kind == kind && self.node_text(NodeIndex(*i as u32)) == text)
            .map(|(i, _)| NodeIndex(i as u32))
            .collect()
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    current: NodeIndex,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        if self.current.is_none() || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let result = self.current;
        self.current = self.tree.parent(result);
        Some(result)
    }
}
