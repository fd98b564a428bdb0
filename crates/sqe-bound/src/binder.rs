//! The binder collaborator driven by speculative queries.
//!
//! The query engine never decides what a name means. For syntax that is not
//! part of the compilation it resolves a scope and asks a [`Binder`] to bind
//! the foreign node against it. The binder returns a throwaway
//! [`BoundTree`]; any diagnostics it produces are its own business and are
//! never merged into the compilation.

use serde::{Deserialize, Serialize};
use sqe_symbols::{SymbolId, SymbolKind, SymbolRef};
use sqe_syntax::{NodeIndex, SyntaxTree};

use crate::bound::BoundTree;
use crate::compilation::Compilation;
use crate::scope::ScopeId;

/// How a speculative node should be bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingMode {
    /// Bind as a full expression.
    #[default]
    Expression,
    /// Bind as a bare type or namespace name.
    TypeOrNamespace,
}

/// Declares symbols for locals introduced by speculative syntax.
///
/// Declared locals belong to the query that created them and are never
/// added to the compilation's symbol arena or scopes.
pub trait LocalDeclarer {
    fn declare_local(&self, name: &str, kind: SymbolKind, ty: SymbolId) -> SymbolRef;
}

/// Everything a binder needs to bind foreign syntax at a position.
pub struct SpeculativeContext<'a> {
    pub compilation: &'a Compilation,
    /// Innermost scope at the adjusted position.
    pub scope: ScopeId,
    pub position: u32,
    pub mode: BindingMode,
    /// The position is inside `typeof(...)`: open generic names are allowed.
    pub in_typeof: bool,
    /// The position is inside a documentation cross-reference.
    pub in_cref: bool,
    pub locals: &'a dyn LocalDeclarer,
}

/// The external binder.
pub trait Binder: Send + Sync {
    /// Bind `node` of a foreign `tree` against `cx.scope`.
    ///
    /// Returns `None` when there is legitimately nothing to bind.
    fn bind_speculative(
        &self,
        cx: &SpeculativeContext<'_>,
        tree: &SyntaxTree,
        node: NodeIndex,
    ) -> Option<BoundTree>;

    /// Bind a documentation cross-reference to the symbols it names.
    fn bind_cref(&self, cx: &SpeculativeContext<'_>, tree: &SyntaxTree, cref: NodeIndex) -> Vec<SymbolRef> {
        let _ = (cx, tree, cref);
        Vec::new()
    }
}
