//! Incremental construction of [`SyntaxTree`]s.
//!
//! The builder works like a stack machine: `start_node` opens a node,
//! `token` appends a leaf to the innermost open node, `finish_node` closes
//! it and computes its spans from its children. Offsets are derived from
//! the accumulated text, so callers never compute positions by hand.
//!
//! ```
//! use sqe_syntax::{SyntaxKind, TreeBuilder, TreeId};
//!
//! let mut b = TreeBuilder::new(TreeId(0));
//! b.start_node(SyntaxKind::CompilationUnit);
//! b.node(SyntaxKind::ExpressionStatement, |b| {
//!     b.node(SyntaxKind::IdentifierName, |b| {
//!         b.token("x");
//!     });
//!     b.token(";");
//! });
//! let tree = b.finish();
//! assert_eq!(tree.text(), "x ;");
//! ```

use smallvec::SmallVec;
use sqe_common::TextSpan;
use tracing::trace;

use crate::kind::SyntaxKind;
use crate::tree::{NodeIndex, SyntaxNode, SyntaxTree, TreeId};

/// Builds a [`SyntaxTree`] from token text.
pub struct TreeBuilder {
    id: TreeId,
    nodes: Vec<SyntaxNode>,
    stack: Vec<NodeIndex>,
    text: String,
    pending_trivia: String,
    tokens: Vec<NodeIndex>,
    root: NodeIndex,
    auto_space: bool,
    glue_next: bool,
}

impl TreeBuilder {
    #[must_use]
    pub fn new(id: TreeId) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            stack: Vec::new(),
            text: String::new(),
            pending_trivia: String::new(),
            tokens: Vec::new(),
            root: NodeIndex::NONE,
            auto_space: true,
            glue_next: false,
        }
    }

    /// Disable the single space of trivia inserted between tokens.
    #[must_use]
    pub fn without_auto_space(mut self) -> Self {
        self.auto_space = false;
        self
    }

    /// Current end offset of the text.
    #[must_use]
    pub fn offset(&self) -> u32 {
        (self.text.len() + self.pending_trivia.len()) as u32
    }

    pub fn start_node(&mut self, kind: SyntaxKind) -> NodeIndex {
        let offset = self.text.len() as u32;
        let idx = self.push(SyntaxNode {
            kind,
            parent: self.stack.last().copied().unwrap_or(NodeIndex::NONE),
            children: SmallVec::new(),
            full_span: TextSpan::new(offset, offset),
            span: TextSpan::new(offset, offset),
            token_ordinal: u32::MAX,
            missing: false,
        });
        if self.stack.is_empty() && self.root.is_none() {
            self.root = idx;
        }
        self.stack.push(idx);
        idx
    }

    /// Close the innermost open node, computing its spans from its tokens.
    pub fn finish_node(&mut self) -> NodeIndex {
        let Some(idx) = self.stack.pop() else {
            return NodeIndex::NONE;
        };
        let node = &self.nodes[idx.0 as usize];
        let first = node.children.first().copied();
        let last = node.children.last().copied();
        let all_missing =
            !node.children.is_empty() && node.children.iter().all(|c| self.nodes[c.0 as usize].missing);
        if let (Some(first), Some(last)) = (first, last) {
            let full_start = self.nodes[first.0 as usize].full_span.start;
            let start = self.nodes[first.0 as usize].span.start;
            let end = self.nodes[last.0 as usize].span.end;
            let node = &mut self.nodes[idx.0 as usize];
            node.full_span = TextSpan::new(full_start, end);
            node.span = TextSpan::new(start, end);
            node.missing = all_missing;
        } else {
            let offset = self.text.len() as u32;
            let node = &mut self.nodes[idx.0 as usize];
            node.full_span = TextSpan::new(offset, offset);
            node.span = TextSpan::new(offset, offset);
        }
        idx
    }

    /// Open a node, run `f` to fill it, and close it.
    pub fn node(&mut self, kind: SyntaxKind, f: impl FnOnce(&mut Self)) -> NodeIndex {
        self.start_node(kind);
        f(self);
        self.finish_node()
    }

    /// Append leading trivia (whitespace, comments) for the next token.
    pub fn trivia(&mut self, text: &str) {
        self.pending_trivia.push_str(text);
    }

    /// Suppress the automatic space before the next token.
    pub fn glue(&mut self) {
        self.glue_next = true;
    }

    /// Append a token, classifying its kind from its text.
    pub fn token(&mut self, text: &str) -> NodeIndex {
        self.token_of_kind(SyntaxKind::classify_token(text), text)
    }

    pub fn token_of_kind(&mut self, kind: SyntaxKind, text: &str) -> NodeIndex {
        if self.auto_space && !self.glue_next && self.pending_trivia.is_empty() && !self.text.is_empty() {
            self.pending_trivia.push(' ');
        }
        self.glue_next = false;
        self.push_token(kind, text, false)
    }

    /// Append a zero-width token inserted by error recovery.
    pub fn missing(&mut self, kind: SyntaxKind) -> NodeIndex {
        self.glue_next = false;
        self.push_token(kind, "", true)
    }

    /// Close any open nodes, append the end-of-file token, and freeze the tree.
    #[must_use]
    pub fn finish(mut self) -> SyntaxTree {
        if self.root.is_none() {
            self.start_node(SyntaxKind::CompilationUnit);
        }
        // The end-of-file token belongs to the root, after every open node closes.
        while self.stack.len() > 1 {
            self.finish_node();
        }
        if self.stack.is_empty() {
            self.stack.push(self.root);
        }
        self.push_token(SyntaxKind::EndOfFileToken, "", false);
        self.finish_node();
        // The root spans the whole text, trailing trivia included.
        let text_len = self.text.len() as u32;
        let root = &mut self.nodes[self.root.0 as usize];
        root.full_span = TextSpan::new(0, text_len);
        root.missing = false;
        trace!(tree = self.id.0, nodes = self.nodes.len(), tokens = self.tokens.len(), "built syntax tree");
        SyntaxTree {
            id: self.id,
            nodes: self.nodes,
            root: self.root,
            text: self.text,
            tokens: self.tokens,
        }
    }

    fn push(&mut self, node: SyntaxNode) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        if let Some(&parent) = self.stack.last() {
            self.nodes[parent.0 as usize].children.push(idx);
        }
        self.nodes.push(node);
        idx
    }

    fn push_token(&mut self, kind: SyntaxKind, text: &str, missing: bool) -> NodeIndex {
        let full_start = self.text.len() as u32;
        self.text.push_str(&self.pending_trivia);
        self.pending_trivia.clear();
        let start = self.text.len() as u32;
        self.text.push_str(text);
        let end = self.text.len() as u32;
        let idx = self.push(SyntaxNode {
            kind,
            parent: self.stack.last().copied().unwrap_or(NodeIndex::NONE),
            children: SmallVec::new(),
            full_span: TextSpan::new(full_start, end),
            span: TextSpan::new(start, end),
            token_ordinal: self.tokens.len() as u32,
            missing,
        });
        self.tokens.push(idx);
        idx
    }
}
