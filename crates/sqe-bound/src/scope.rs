//! The scope arena: immutable, parent-linked binder chains.
//!
//! Each scope records what names it introduces and what container it sits
//! in. Scopes are addressed by [`ScopeId`] and link to their parent by
//! index, so a chain walk is a loop over indices with no back-references.

use bitflags::bitflags;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use sqe_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use sqe_symbols::SymbolId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);

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

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    CompilationUnit,
    Namespace,
    /// Body of a class, struct, interface, or extension block.
    Type,
    /// Parameters and type parameters of a method-like member.
    Method,
    Block,
    Catch,
    Lambda,
    Query,
    /// A documentation cross-reference.
    Cref,
    /// The argument of `nameof(...)`.
    NameOf,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScopeFlags: u32 {
        /// Executable code of a method, accessor, or lambda.
        const IN_METHOD_BODY = 1 << 0;
        /// A non-evaluating `nameof(...)` context.
        const INSIDE_NAMEOF  = 1 << 1;
        /// A documentation cross-reference; cref lookup rules apply.
        const IN_CREF        = 1 << 2;
        /// Member lookups are made through `base.` and see protected base
        /// members without the receiver-type check.
        const BASE_ACCESS    = 1 << 3;
        /// Static member or static class body: no `this`.
        const STATIC_CONTEXT = 1 << 4;
    }
}

pub type NameTable = IndexMap<String, SmallVec<[SymbolId; 1]>, FxBuildHasher>;

/// One link of a binder chain.
#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: ScopeId,
    /// Namespace, type, or member this scope belongs to.
    pub container: SymbolId,
    pub flags: ScopeFlags,
    /// Locals, parameters, type parameters, and range variables declared here.
    pub locals: NameTable,
    /// Labels declared here.
    pub labels: NameTable,
    /// `using N;` / `using static T;` imports: namespaces whose types, and
    /// static types whose static and extension members, become visible.
    pub imports: SmallVec<[SymbolId; 2]>,
    /// `using A = ...;` aliases declared here.
    pub aliases: IndexMap<String, SymbolId, FxBuildHasher>,
}

impl Scope {
    #[must_use]
    pub fn new(kind: ScopeKind, parent: ScopeId, container: SymbolId) -> Self {
        Self {
            kind,
            parent,
            container,
            flags: ScopeFlags::empty(),
            locals: NameTable::default(),
            labels: NameTable::default(),
            imports: SmallVec::new(),
            aliases: IndexMap::default(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ScopeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn declare_local(&mut self, name: impl Into<String>, symbol: SymbolId) {
        self.locals.entry(name.into()).or_default().push(symbol);
    }

    pub fn declare_label(&mut self, name: impl Into<String>, symbol: SymbolId) {
        self.labels.entry(name.into()).or_default().push(symbol);
    }

    /// True for scopes whose container is a type (members are in scope).
    #[must_use]
    pub fn is_type_scope(&self) -> bool {
        self.kind == ScopeKind::Type
    }
}

/// Arena of scopes for a compilation.
#[derive(Clone, Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0 as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// `id` and its ancestors, innermost first.
    pub fn chain(&self, id: ScopeId) -> ScopeChain<'_> {
        ScopeChain {
            arena: self,
            current: id,
            remaining: MAX_SCOPE_WALK_ITERATIONS,
        }
    }

    /// Union of the flags of every scope on the chain.
    #[must_use]
    pub fn chain_flags(&self, id: ScopeId) -> ScopeFlags {
        self.chain(id)
            .fold(ScopeFlags::empty(), |acc, (_, scope)| acc | scope.flags)
    }

    /// Innermost type whose body contains the scope, or `NONE`.
    #[must_use]
    pub fn containing_type(&self, id: ScopeId) -> SymbolId {
        self.chain(id)
            .find(|(_, scope)| scope.kind == ScopeKind::Type)
            .map_or(SymbolId::NONE, |(_, scope)| scope.container)
    }

    /// Innermost member (method-like) whose body contains the scope, or `NONE`.
    #[must_use]
    pub fn containing_member(&self, id: ScopeId) -> SymbolId {
        self.chain(id)
            .find(|(_, scope)| scope.kind == ScopeKind::Method)
            .map_or(SymbolId::NONE, |(_, scope)| scope.container)
    }
}

/// Iterator over a scope chain, innermost first.
pub struct ScopeChain<'a> {
    arena: &'a ScopeArena,
    current: ScopeId,
    remaining: usize,
}

impl<'a> Iterator for ScopeChain<'a> {
    type Item = (ScopeId, &'a Scope);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let id = self.current;
        let scope = self.arena.get(id)?;
        self.current = scope.parent;
        Some((id, scope))
    }
}
