//! Extension members: discovery through the scope chain and reduction
//! against a receiver type.
//!
//! Two forms are supported: classic extension methods (a static method
//! whose first parameter is the receiver) and members of extension blocks
//! (`extension<T>(T receiver) { ... }` nested in a static class). Reducing
//! a classic method yields a synthesized method without the receiver
//! parameter; a member of a generic block yields a synthesized member with
//! the block's type parameter bound to the receiver.

use smallvec::SmallVec;
use sqe_bound::ScopeKind;
use sqe_common::CancellationToken;
use sqe_symbols::hierarchy::{self, SymbolSet};
use sqe_symbols::{ResultKind, SymbolId, SymbolKind, SymbolRef, TypeKind};
use tracing::trace;

use crate::error::Result;
use crate::model::SemanticModel;
use crate::scope_resolver::ScopeContext;

/// A type parameter inferred from the receiver.
type Inferred = Option<(SymbolId, SymbolId)>;

impl SemanticModel<'_> {
    /// Extension members named `name` (every one when `None`) visible from
    /// the scope, innermost scope first, each marked `Viable` or
    /// `Inaccessible`. A member reachable from several scopes is reported
    /// once, at the innermost one.
    pub(crate) fn extension_candidates(
        &self,
        cx: &ScopeContext,
        name: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<(SymbolId, ResultKind)>> {
        let arena = &self.compilation.symbols;
        let mut seen = SymbolSet::default();
        let mut result = Vec::new();
        for (_, scope) in self.compilation.scopes.chain(cx.scope).take(self.options.max_scope_walk) {
            cancel.check()?;
            let mut sources: SmallVec<[SymbolId; 8]> = SmallVec::new();
            if matches!(scope.kind, ScopeKind::Namespace | ScopeKind::CompilationUnit) {
                self.push_static_types(scope.container, &mut sources);
            }
            for &import in &scope.imports {
                match arena.kind(import) {
                    Some(SymbolKind::Namespace) => self.push_static_types(import, &mut sources),
                    Some(SymbolKind::NamedType) => sources.push(import),
                    _ => {}
                }
            }
            for source in sources {
                for member in self.extension_members_of(source, name) {
                    cancel.check()?;
                    if !seen.insert(member) {
                        continue;
                    }
                    let kind = if self.is_accessible_from(cx, member, SymbolId::NONE) {
                        ResultKind::Viable
                    } else {
                        ResultKind::Inaccessible
                    };
                    result.push((member, kind));
                }
            }
        }
        trace!(name = name.unwrap_or(""), found = result.len(), "extension candidates");
        Ok(result)
    }

    /// Static classes declared directly in a namespace.
    fn push_static_types(&self, namespace: SymbolId, out: &mut SmallVec<[SymbolId; 8]>) {
        let arena = &self.compilation.symbols;
        let Some(ns) = arena.get(namespace) else {
            return;
        };
        out.extend(ns.members.iter().copied().filter(|&m| {
            arena
                .get(m)
                .is_some_and(|s| s.kind == SymbolKind::NamedType && s.is_static())
        }));
    }

    /// Extension methods of a static class, and the members of the
    /// extension blocks it contains.
    fn extension_members_of(&self, ty: SymbolId, name: Option<&str>) -> Vec<SymbolId> {
        let arena = &self.compilation.symbols;
        let Some(symbol) = arena.get(ty) else {
            return Vec::new();
        };
        let named = |container: SymbolId| -> Vec<SymbolId> {
            match name {
                Some(n) => arena.members_named(container, n).to_vec(),
                None => arena.get(container).map(|c| c.members.clone()).unwrap_or_default(),
            }
        };
        let mut found: Vec<SymbolId> = named(ty)
            .into_iter()
            .filter(|&m| arena.get(m).is_some_and(|s| s.is_extension_method()))
            .collect();
        for &block in &symbol.members {
            if arena.get(block).is_some_and(|b| b.type_kind == TypeKind::Extension) {
                found.extend(named(block).into_iter().filter(|&m| {
                    arena
                        .kind(m)
                        .is_some_and(|k| matches!(k, SymbolKind::Method | SymbolKind::Property))
                }));
            }
        }
        found
    }

    /// True for classic extension methods and extension-block members.
    pub(crate) fn is_extension_member(&self, member: SymbolId) -> bool {
        let arena = &self.compilation.symbols;
        arena.get(member).is_some_and(|m| {
            m.is_extension_method()
                || arena
                    .get(m.container)
                    .is_some_and(|c| c.type_kind == TypeKind::Extension)
        })
    }

    /// Bind an extension member to `receiver`.
    ///
    /// Returns `None` when the receiver does not convert to the receiver
    /// parameter, or an inferred type argument violates its constraints.
    pub(crate) fn reduce_extension(&self, member: SymbolId, receiver: SymbolId) -> Option<SymbolRef> {
        let arena = &self.compilation.symbols;
        let symbol = arena.get(member)?;
        if receiver.is_none() {
            return None;
        }
        if symbol.is_extension_method() {
            let first = *symbol.parameters.first()?;
            let receiver_parameter = arena.get(first)?.ty;
            let inferred = self.bind_receiver(receiver_parameter, member, receiver)?;
            let return_type = substitute(symbol.ty, inferred);
            return Some(
                self.synthesized
                    .reduced_extension(arena, member, receiver, return_type),
            );
        }
        let block = arena.get(symbol.container)?;
        if block.type_kind != TypeKind::Extension {
            return None;
        }
        let inferred = self.bind_receiver(block.extension_receiver, symbol.container, receiver)?;
        if block.type_parameters.is_empty() {
            return Some(SymbolRef::Declared(member));
        }
        let return_type = substitute(symbol.ty, inferred);
        Some(
            self.synthesized
                .substituted_extension(arena, member, receiver, return_type),
        )
    }

    /// The reduced form of an extension member, or the member unchanged.
    pub(crate) fn reduce_if_possible(&self, symbol: SymbolRef, receiver: SymbolId) -> SymbolRef {
        match symbol {
            SymbolRef::Declared(id) if receiver.is_some() && self.is_extension_member(id) => {
                self.reduce_extension(id, receiver).unwrap_or(symbol)
            }
            _ => symbol,
        }
    }

    /// Match a receiver parameter type against the receiver type. A type
    /// parameter owned by `owner` is inferred as the receiver type and
    /// checked against its constraints.
    fn bind_receiver(&self, parameter_type: SymbolId, owner: SymbolId, receiver: SymbolId) -> Option<Inferred> {
        let arena = &self.compilation.symbols;
        let parameter = arena.get(parameter_type)?;
        if parameter.kind == SymbolKind::TypeParameter && parameter.container == owner {
            return hierarchy::satisfies_constraints(arena, parameter_type, receiver)
                .then_some(Some((parameter_type, receiver)));
        }
        self.receiver_converts(receiver, parameter_type).then_some(None)
    }

    fn receiver_converts(&self, from: SymbolId, to: SymbolId) -> bool {
        let arena = &self.compilation.symbols;
        if hierarchy::has_identity_or_reference_conversion(arena, from, to) {
            return true;
        }
        // A type parameter receiver converts through its constraints.
        arena.get(from).is_some_and(|tp| {
            tp.kind == SymbolKind::TypeParameter
                && tp
                    .constraints
                    .iter()
                    .any(|&c| hierarchy::has_identity_or_reference_conversion(arena, c, to))
        })
    }
}

fn substitute(ty: SymbolId, inferred: Inferred) -> SymbolId {
    match inferred {
        Some((parameter, argument)) if parameter == ty => argument,
        _ => ty,
    }
}
