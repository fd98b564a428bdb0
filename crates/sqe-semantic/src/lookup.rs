//! Lookup: the symbols visible at a position, optionally restricted to the
//! members of a container, to one name, and to one lookup mode.
//!
//! Without a container the scope chain is walked innermost first and the
//! first scope that yields a visible symbol wins, so inner declarations
//! hide outer ones. Within a scope, locals come before aliases, type
//! members, namespace members, and finally imports.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use sqe_bound::{Scope, ScopeFlags, ScopeKind};
use sqe_common::CancellationToken;
use sqe_symbols::{SymbolId, SymbolKind, SymbolRef, hierarchy};
use tracing::{debug, trace};

use crate::error::{Result, SemanticError};
use crate::member_group::filter_overridden_or_hidden;
use crate::model::SemanticModel;
use crate::options::LookupOptions;
use crate::scope_resolver::ScopeContext;

/// Raw candidates per visible name, before hiding, mode, and accessibility.
type NameCandidates = IndexMap<String, SmallVec<[SymbolRef; 2]>, FxBuildHasher>;

impl SemanticModel<'_> {
    pub(crate) fn lookup(
        &self,
        position: u32,
        container: Option<SymbolId>,
        name: Option<&str>,
        options: LookupOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        options.validate()?;
        cancel.check()?;
        let cx = self.scope_context_at(position)?;
        let arena = &self.compilation.symbols;
        let mut options = options;
        let mut container = container.filter(|c| c.is_some());

        if options.contains(LookupOptions::BASE_MEMBERS) {
            if container.is_some() {
                return Err(SemanticError::InvalidLookupOptions(
                    "base member lookup does not take a container".to_string(),
                ));
            }
            let ty = self.compilation.scopes.containing_type(cx.scope);
            let base = arena.get(ty).map_or(SymbolId::NONE, |t| t.base_type);
            if base.is_none() {
                return Err(SemanticError::InvalidLookupOptions(format!(
                    "no base type at position {}",
                    cx.position
                )));
            }
            container = Some(base);
        }
        if options.contains(LookupOptions::INCLUDE_EXTENSIONS)
            && !container.is_some_and(|c| arena.get(c).is_some_and(|s| s.is_type()))
        {
            options.remove(LookupOptions::INCLUDE_EXTENSIONS);
        }

        let result = match name {
            Some(name) => self.lookup_name(&cx, container, name, None, options, cancel)?,
            None => self.lookup_all_names(&cx, container, options, cancel)?,
        };
        debug!(
            position = cx.position,
            name = name.unwrap_or("*"),
            ?options,
            found = result.len(),
            "lookup"
        );
        Ok(result)
    }

    /// Symbols named `name`, restricted to `arity` when given.
    fn lookup_name(
        &self,
        cx: &ScopeContext,
        container: Option<SymbolId>,
        name: &str,
        arity: Option<usize>,
        options: LookupOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        let found = match container {
            Some(container) => self.lookup_in_container(cx, container, name, options, cancel)?,
            None => self.lookup_in_scopes(cx, name, arity, options, cancel)?,
        };
        Ok(match arity {
            Some(arity) => found.into_iter().filter(|&s| self.arity_of(s) == arity).collect(),
            None => found,
        })
    }

    fn lookup_in_container(
        &self,
        cx: &ScopeContext,
        container: SymbolId,
        name: &str,
        options: LookupOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        let arena = &self.compilation.symbols;
        let Some(symbol) = arena.get(container) else {
            return Ok(Vec::new());
        };
        let mut found: Vec<SymbolRef> = if symbol.is_type() {
            let members: Vec<SymbolRef> = hierarchy::lookup_members(arena, container, name)
                .into_iter()
                .map(SymbolRef::Declared)
                .collect();
            filter_overridden_or_hidden(arena, &members, cancel)?
        } else if symbol.kind == SymbolKind::Namespace {
            arena
                .members_named(container, name)
                .iter()
                .map(|&m| SymbolRef::Declared(m))
                .collect()
        } else {
            Vec::new()
        };
        found.retain(|&s| self.is_visible(cx, s, container, options));

        if options.contains(LookupOptions::INCLUDE_EXTENSIONS) {
            for (member, kind) in self.extension_candidates(cx, Some(name), cancel)? {
                cancel.check()?;
                if !kind.is_viable() {
                    continue;
                }
                if let Some(reduced) = self.reduce_extension(member, container) {
                    found.push(reduced);
                }
            }
        }
        Ok(dedupe(found))
    }

    /// Walk the scope chain; the first scope with a visible symbol wins.
    fn lookup_in_scopes(
        &self,
        cx: &ScopeContext,
        name: &str,
        arity: Option<usize>,
        options: LookupOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        for (id, scope) in self.compilation.scopes.chain(cx.scope).take(self.options.max_scope_walk) {
            cancel.check()?;
            let mut level = self.scope_candidates(scope, name, options, cancel)?;
            level.retain(|&s| {
                arity.is_none_or(|a| self.arity_of(s) == a) && self.is_visible(cx, s, SymbolId::NONE, options)
            });
            if !level.is_empty() {
                trace!(scope = id.0, name, found = level.len(), "lookup level");
                return Ok(dedupe(level));
            }
        }
        Ok(Vec::new())
    }

    /// Every symbol named `name` that one scope introduces.
    fn scope_candidates(
        &self,
        scope: &Scope,
        name: &str,
        options: LookupOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        let arena = &self.compilation.symbols;
        let declared = |ids: &[SymbolId]| ids.iter().map(|&id| SymbolRef::Declared(id)).collect::<Vec<_>>();
        if options.contains(LookupOptions::LABELS_ONLY) {
            return Ok(scope.labels.get(name).map(|l| declared(l)).unwrap_or_default());
        }
        let mut level = Vec::new();
        if let Some(locals) = scope.locals.get(name) {
            level.extend(declared(locals));
        }
        if let Some(&alias) = scope.aliases.get(name) {
            level.push(SymbolRef::Declared(alias));
        }
        if scope.is_type_scope() && scope.container.is_some() {
            let members: Vec<SymbolRef> = hierarchy::lookup_members(arena, scope.container, name)
                .into_iter()
                .map(SymbolRef::Declared)
                .collect();
            level.extend(filter_overridden_or_hidden(arena, &members, cancel)?);
        }
        if matches!(scope.kind, ScopeKind::Namespace | ScopeKind::CompilationUnit) {
            let namespace = self.namespace_of(scope);
            level.extend(declared(arena.members_named(namespace, name)));
            if level.is_empty() {
                for &import in &scope.imports {
                    cancel.check()?;
                    level.extend(self.imported_named(import, name));
                }
            }
        }
        Ok(level)
    }

    /// Types of an imported namespace, or static members and nested types
    /// of an imported static type.
    fn imported_named(&self, import: SymbolId, name: &str) -> Vec<SymbolRef> {
        let arena = &self.compilation.symbols;
        let is_namespace = arena.kind(import) == Some(SymbolKind::Namespace);
        arena
            .members_named(import, name)
            .iter()
            .copied()
            .filter(|&m| {
                arena.get(m).is_some_and(|s| {
                    if is_namespace {
                        s.is_type()
                    } else {
                        s.is_type() || (s.is_static() && !s.is_extension_method())
                    }
                })
            })
            .map(SymbolRef::Declared)
            .collect()
    }

    fn namespace_of(&self, scope: &Scope) -> SymbolId {
        if scope.container.is_some() {
            scope.container
        } else {
            self.compilation.symbols.global_namespace()
        }
    }

    /// Every visible name, each looked up once.
    ///
    /// A name with a single candidate is checked directly. Otherwise the
    /// name is looked up once per arity among its candidates, so `C` and
    /// `C<T>` in different scopes do not hide each other. Symbols that
    /// cannot be referenced by name are dropped.
    fn lookup_all_names(
        &self,
        cx: &ScopeContext,
        container: Option<SymbolId>,
        options: LookupOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        let names = self.visible_names(cx, container, options, cancel)?;
        let mut result: IndexSet<SymbolRef, FxBuildHasher> = IndexSet::default();
        for (name, candidates) in &names {
            cancel.check()?;
            if let [only] = candidates.as_slice() {
                if self.is_visible(cx, *only, container.unwrap_or(SymbolId::NONE), options) {
                    result.insert(*only);
                }
                continue;
            }
            let arities: IndexSet<usize, FxBuildHasher> = candidates.iter().map(|&c| self.arity_of(c)).collect();
            for arity in arities {
                cancel.check()?;
                result.extend(self.lookup_name(cx, container, name, Some(arity), options, cancel)?);
            }
        }
        if options.contains(LookupOptions::INCLUDE_EXTENSIONS) {
            if let Some(container) = container {
                for (member, kind) in self.extension_candidates(cx, None, cancel)? {
                    cancel.check()?;
                    if kind.is_viable() {
                        result.extend(self.reduce_extension(member, container));
                    }
                }
            }
        }
        let arena = &self.compilation.symbols;
        result.retain(|s| match s {
            SymbolRef::Declared(id) => arena.get(*id).is_some_and(|s| s.can_be_referenced_by_name()),
            SymbolRef::Synthesized(_) => true,
        });
        Ok(result.into_iter().collect())
    }

    /// Raw candidates of every name visible from the position or in the
    /// container.
    fn visible_names(
        &self,
        cx: &ScopeContext,
        container: Option<SymbolId>,
        options: LookupOptions,
        cancel: &CancellationToken,
    ) -> Result<NameCandidates> {
        let arena = &self.compilation.symbols;
        let mut names = NameCandidates::default();
        let mut add = |name: &str, symbol: SymbolId| {
            names
                .entry(name.to_string())
                .or_default()
                .push(SymbolRef::Declared(symbol));
        };

        if let Some(container) = container {
            match arena.get(container) {
                Some(symbol) if symbol.is_type() => {
                    for name in hierarchy::visible_member_names(arena, container) {
                        cancel.check()?;
                        for member in hierarchy::lookup_members(arena, container, &name) {
                            add(&name, member);
                        }
                    }
                }
                Some(symbol) if symbol.kind == SymbolKind::Namespace => {
                    for &member in &symbol.members {
                        add(arena.name(member), member);
                    }
                }
                _ => {}
            }
            return Ok(names);
        }

        for (_, scope) in self.compilation.scopes.chain(cx.scope).take(self.options.max_scope_walk) {
            cancel.check()?;
            if options.contains(LookupOptions::LABELS_ONLY) {
                for (name, labels) in &scope.labels {
                    labels.iter().for_each(|&l| add(name, l));
                }
                continue;
            }
            for (name, locals) in &scope.locals {
                locals.iter().for_each(|&l| add(name, l));
            }
            for (name, &alias) in &scope.aliases {
                add(name, alias);
            }
            if scope.is_type_scope() && scope.container.is_some() {
                for name in hierarchy::visible_member_names(arena, scope.container) {
                    for member in hierarchy::lookup_members(arena, scope.container, &name) {
                        add(&name, member);
                    }
                }
            }
            if matches!(scope.kind, ScopeKind::Namespace | ScopeKind::CompilationUnit) {
                if let Some(namespace) = arena.get(self.namespace_of(scope)) {
                    for &member in &namespace.members {
                        add(arena.name(member), member);
                    }
                }
                for &import in &scope.imports {
                    let Some(imported) = arena.get(import) else {
                        continue;
                    };
                    for &member in &imported.members {
                        let name = arena.name(member);
                        if self.imported_named(import, name).contains(&SymbolRef::Declared(member)) {
                            add(name, member);
                        }
                    }
                }
            }
        }
        Ok(names)
    }

    /// Mode, accessibility, and method type parameter rules.
    fn is_visible(&self, cx: &ScopeContext, symbol: SymbolRef, through: SymbolId, options: LookupOptions) -> bool {
        let arena = &self.compilation.symbols;
        let declared = match symbol {
            SymbolRef::Declared(id) => id,
            SymbolRef::Synthesized(id) => {
                // Reduced extension members always need a receiver.
                return !options.intersects(
                    LookupOptions::STATIC_ONLY | LookupOptions::NAMESPACES_AND_TYPES | LookupOptions::LABELS_ONLY,
                ) && self.synthesized_symbol(id).is_some();
            }
        };
        let Some(s) = arena.get(declared) else {
            return false;
        };
        let mode_ok = if options.contains(LookupOptions::LABELS_ONLY) {
            s.kind == SymbolKind::Label
        } else if options.contains(LookupOptions::NAMESPACES_AND_TYPES) {
            s.is_namespace_or_type() || s.kind == SymbolKind::Alias
        } else if options.contains(LookupOptions::STATIC_ONLY) {
            s.kind != SymbolKind::Label && !s.requires_instance_receiver()
        } else {
            s.kind != SymbolKind::Label
        };
        if !mode_ok {
            return false;
        }
        if s.kind == SymbolKind::TypeParameter
            && arena.kind(s.container) == Some(SymbolKind::Method)
            && self.hides_method_type_parameters(cx, options)
        {
            trace!(symbol = declared.0, "method type parameter not in scope");
            return false;
        }
        self.options.ignore_accessibility
            || self
                .access_context(cx)
                .with_base_access(cx.flags.contains(ScopeFlags::BASE_ACCESS) || options.contains(LookupOptions::BASE_MEMBERS))
                .is_accessible(arena, declared, through)
    }

    /// Outside a method body, a method's type parameters are only in scope
    /// where a type is expected.
    fn hides_method_type_parameters(&self, cx: &ScopeContext, options: LookupOptions) -> bool {
        !cx.in_method_body()
            && !options.intersects(LookupOptions::NAMESPACES_AND_TYPES | LookupOptions::LABELS_ONLY)
            && cx.in_expression
            && !cx.type_only
            && !cx.in_xml_name
            && !cx.in_nameof
    }

    fn arity_of(&self, symbol: SymbolRef) -> usize {
        let arena = &self.compilation.symbols;
        let declared = match symbol {
            SymbolRef::Declared(id) => Some(id),
            SymbolRef::Synthesized(id) => self.synthesized_symbol(id).and_then(|s| s.origin),
        };
        declared.and_then(|id| arena.get(id)).map_or(0, |s| s.arity())
    }
}

fn dedupe(symbols: Vec<SymbolRef>) -> Vec<SymbolRef> {
    let unique: IndexSet<SymbolRef, FxBuildHasher> = symbols.into_iter().collect();
    unique.into_iter().collect()
}
