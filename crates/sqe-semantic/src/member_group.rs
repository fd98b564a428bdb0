//! Member groups: the methods, properties, or indexers a name could denote
//! before overload resolution, and the view of them a call site selects.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use smallvec::{SmallVec, smallvec};
use sqe_bound::{BoundKind, BoundNode, ConversionKind, MethodGroup};
use sqe_common::CancellationToken;
use sqe_common::limits::MAX_HIDING_ITERATIONS;
use sqe_symbols::hierarchy::{self, SymbolSet};
use sqe_symbols::{ResultKind, SymbolArena, SymbolId, SymbolKind, SymbolRef};
use sqe_syntax::{NodeIndex, facts};
use tracing::trace;

use crate::error::Result;
use crate::extract::Extracted;
use crate::model::SemanticModel;

/// Metadata name of indexers.
pub const INDEXER_NAME: &str = "this[]";

/// Remove members that another member of the set overrides or hides.
///
/// Hiding is followed transitively (`C.M` hides `B.M` hides `A.M` removes
/// both `A.M` and `B.M` even when only `A.M` and `C.M` are present) and the
/// filter runs to a fixed point. Duplicates collapse to their first
/// occurrence. Synthesized members are kept as they are.
pub fn filter_overridden_or_hidden(
    arena: &SymbolArena,
    members: &[SymbolRef],
    cancel: &CancellationToken,
) -> Result<Vec<SymbolRef>> {
    let mut result: IndexSet<SymbolRef, FxBuildHasher> = members.iter().copied().collect();
    for _ in 0..MAX_HIDING_ITERATIONS {
        let mut shadowed = SymbolSet::default();
        for member in &result {
            cancel.check()?;
            if let SymbolRef::Declared(id) = *member {
                collect_shadowed(arena, id, &mut shadowed);
            }
        }
        let before = result.len();
        result.retain(|m| !matches!(m, SymbolRef::Declared(id) if shadowed.contains(id)));
        if result.len() == before {
            break;
        }
        trace!(removed = before - result.len(), "removed overridden or hidden members");
    }
    Ok(result.into_iter().collect())
}

/// Everything `member` overrides or hides, directly or through the members
/// it overrides or hides.
fn collect_shadowed(arena: &SymbolArena, member: SymbolId, out: &mut SymbolSet) {
    let mut worklist: SmallVec<[SymbolId; 4]> = smallvec![member];
    let mut steps = 0;
    while let Some(current) = worklist.pop() {
        steps += 1;
        if steps > MAX_HIDING_ITERATIONS {
            break;
        }
        let Some(symbol) = arena.get(current) else {
            continue;
        };
        for &target in std::iter::once(&symbol.overridden).chain(symbol.hidden.iter()) {
            if target.is_some() && target != member && out.insert(target) {
                worklist.push(target);
            }
        }
    }
}

/// A method group after extension reduction and hiding.
#[derive(Debug, Default)]
pub(crate) struct FilteredGroup {
    /// Reduced, arity-filtered, hiding-filtered members of the best kind.
    pub members: Vec<SymbolRef>,
    /// Every candidate before reduction and filtering.
    pub raw: Vec<SymbolRef>,
}

impl FilteredGroup {
    /// The members callers see: the filtered ones, or every raw candidate
    /// when none survived.
    pub fn view(&self) -> Vec<SymbolRef> {
        if self.members.is_empty() {
            dedupe(&self.raw)
        } else {
            self.members.clone()
        }
    }
}

fn dedupe(symbols: &[SymbolRef]) -> Vec<SymbolRef> {
    let unique: IndexSet<SymbolRef, FxBuildHasher> = symbols.iter().copied().collect();
    unique.into_iter().collect()
}

impl SemanticModel<'_> {
    /// Members of a method group, with applicable extension members
    /// reduced against the receiver type.
    ///
    /// Candidates of a worse kind than the best seen so far are skipped,
    /// and a better kind discards what was collected before it.
    pub(crate) fn reduced_and_filtered_methods(
        &self,
        node: &BoundNode,
        group: &MethodGroup,
        cancel: &CancellationToken,
    ) -> Result<FilteredGroup> {
        let arena = &self.compilation.symbols;
        let receiver_type = group.receiver.map_or(SymbolId::NONE, |r| self.bound.type_of(r));
        let arity = group.type_arguments.len();
        let arity_ok = |symbol: SymbolRef| match symbol {
            SymbolRef::Declared(id) => arity == 0 || arena.get(id).is_some_and(|m| m.arity() == arity),
            SymbolRef::Synthesized(_) => true,
        };

        let mut raw = Vec::new();
        let mut merged = Vec::new();
        let mut best: Option<ResultKind> = None;
        let mut merge = |candidate: SymbolRef, kind: ResultKind, reduced: Option<SymbolRef>| {
            if let Some(current) = best {
                if current.is_better_than(kind) {
                    return;
                }
                if kind.is_better_than(current) {
                    merged.clear();
                }
            }
            if let Some(reduced) = reduced {
                best = Some(kind);
                merged.push(reduced);
            } else {
                trace!(%candidate, "extension member not applicable to receiver");
            }
        };

        for &method in &group.methods {
            cancel.check()?;
            raw.push(method);
            if arity_ok(method) {
                merge(method, ResultKind::Viable, Some(method));
            }
        }
        if group.search_extensions && receiver_type.is_some() {
            let cx = self.scope_of_node(node.syntax);
            for (member, kind) in self.extension_candidates(&cx, Some(&group.name), cancel)? {
                cancel.check()?;
                let candidate = SymbolRef::Declared(member);
                raw.push(candidate);
                if !arity_ok(candidate) {
                    continue;
                }
                merge(candidate, kind, self.reduce_extension(member, receiver_type));
            }
        }
        let members = filter_overridden_or_hidden(arena, &dedupe(&merged), cancel)?;
        trace!(name = %group.name, raw = raw.len(), filtered = members.len(), "method group");
        Ok(FilteredGroup { members, raw })
    }

    /// Symbols of a method group, as selected by its syntactic parent.
    pub(crate) fn method_group_symbols(
        &self,
        node: &BoundNode,
        group: &MethodGroup,
        parent: Option<&BoundNode>,
        cancel: &CancellationToken,
    ) -> Result<Extracted> {
        let filtered = self.reduced_and_filtered_methods(node, group, cancel)?;
        let member_group = filtered.view();
        let receiver_type = group.receiver.map_or(SymbolId::NONE, |r| self.bound.type_of(r));
        let mut kind = if node.result_kind.is_empty() {
            ResultKind::Viable
        } else {
            node.result_kind
        };
        let mut dynamic = false;
        let mut symbols: Vec<SymbolRef> = Vec::new();

        match parent.map(|p| (p, &p.kind)) {
            Some((p, BoundKind::Call(call))) if self.is_invoked_by(node.syntax, p.syntax) => {
                if let Some(originals) = &call.original_methods {
                    symbols = self.reduce_originals(originals, call.invoked_as_extension, call.receiver);
                    kind = self.invocation_ambiguity(p.result_kind.worse(ResultKind::OverloadResolutionFailure), &symbols, p.syntax);
                } else if let Some(method) = call.method {
                    symbols.push(self.reduce_if_possible(method, receiver_type));
                    kind = ResultKind::Viable;
                }
            }
            Some((p, BoundKind::DelegateCreation { method: Some(method), is_extension_method, .. })) => {
                symbols.push(if *is_extension_method {
                    self.reduce_if_possible(*method, receiver_type)
                } else {
                    *method
                });
                kind = p.result_kind;
            }
            Some((p, BoundKind::Conversion { conversion: ConversionKind::MethodGroup, method: Some(method), .. })) => {
                symbols.push(self.reduce_if_possible(*method, receiver_type));
                kind = p.result_kind;
            }
            Some((_, BoundKind::DynamicInvocation { applicable_methods, .. })) => {
                symbols.extend(applicable_methods.iter().copied());
                dynamic = true;
            }
            Some((p, BoundKind::BadExpression { symbols: guesses, .. })) => {
                symbols.extend(
                    guesses
                        .iter()
                        .copied()
                        .filter(|s| member_group.contains(s) || group.methods.contains(s)),
                );
                kind = p.result_kind;
            }
            Some((_, BoundKind::NameOf { .. })) => {
                symbols.clone_from(&member_group);
                kind = kind.worse(ResultKind::MemberGroup);
            }
            None if member_group.len() == 1 && !node.has_errors => {
                symbols.clone_from(&member_group);
            }
            _ => {
                symbols.clone_from(&member_group);
                kind = kind.worse(ResultKind::OverloadResolutionFailure);
            }
        }

        if symbols.is_empty() {
            // Never silently empty while a group existed.
            symbols.clone_from(&member_group);
            if !dynamic && kind.is_better_than(ResultKind::OverloadResolutionFailure) {
                kind = ResultKind::OverloadResolutionFailure;
            }
        }
        Ok(Extracted {
            symbols,
            kind,
            dynamic,
            member_group,
        })
    }

    /// Symbols of a property group, as selected by an indexer access.
    pub(crate) fn property_group_symbols(
        &self,
        node: &BoundNode,
        properties: &[SymbolRef],
        parent: Option<&BoundNode>,
        cancel: &CancellationToken,
    ) -> Result<Extracted> {
        let member_group = filter_overridden_or_hidden(&self.compilation.symbols, properties, cancel)?;
        let mut kind = if node.result_kind.is_empty() {
            ResultKind::Viable
        } else {
            node.result_kind
        };
        let mut symbols = Vec::new();
        match parent.map(|p| (p, &p.kind)) {
            Some((p, BoundKind::IndexerAccess { indexer, original_indexers, .. }))
                if self.is_invoked_by(node.syntax, p.syntax) =>
            {
                if let Some(originals) = original_indexers {
                    symbols.clone_from(originals);
                    kind = p.result_kind.worse(ResultKind::OverloadResolutionFailure);
                } else if let Some(indexer) = indexer {
                    symbols.push(*indexer);
                }
            }
            None if member_group.len() == 1 && !node.has_errors => {
                symbols.clone_from(&member_group);
            }
            _ => {
                symbols.clone_from(&member_group);
                kind = kind.worse(ResultKind::OverloadResolutionFailure);
            }
        }
        if symbols.is_empty() {
            symbols.clone_from(&member_group);
            if kind.is_better_than(ResultKind::OverloadResolutionFailure) {
                kind = ResultKind::OverloadResolutionFailure;
            }
        }
        Ok(Extracted {
            symbols,
            kind,
            dynamic: false,
            member_group,
        })
    }

    /// Instance indexers of `ty` accessible where `syntax` appears.
    pub(crate) fn indexers_of(&self, syntax: NodeIndex, ty: SymbolId, cancel: &CancellationToken) -> Result<Vec<SymbolRef>> {
        let arena = &self.compilation.symbols;
        let found: Vec<SymbolRef> = hierarchy::lookup_members(arena, ty, INDEXER_NAME)
            .into_iter()
            .filter(|&m| arena.get(m).is_some_and(|s| s.is_indexer() && !s.is_static()))
            .map(SymbolRef::Declared)
            .collect();
        let mut filtered = filter_overridden_or_hidden(arena, &found, cancel)?;
        let cx = self.scope_of_node(syntax);
        filtered.retain(|m| match m {
            SymbolRef::Declared(id) => self.is_accessible_from(&cx, *id, ty),
            SymbolRef::Synthesized(_) => true,
        });
        Ok(filtered)
    }

    /// Original candidates of a failed call, reduced when the call was an
    /// extension invocation. Candidates that do not reduce stay as declared.
    pub(crate) fn reduce_originals(
        &self,
        originals: &[SymbolRef],
        invoked_as_extension: bool,
        receiver: Option<sqe_bound::BoundId>,
    ) -> Vec<SymbolRef> {
        if !invoked_as_extension {
            return originals.to_vec();
        }
        let receiver_type = receiver.map_or(SymbolId::NONE, |r| self.bound.type_of(r));
        originals
            .iter()
            .map(|&m| self.reduce_if_possible(m, receiver_type))
            .collect()
    }

    /// True if `syntax` (through parentheses) is the expression invoked or
    /// indexed by `parent`.
    pub(crate) fn is_invoked_by(&self, syntax: NodeIndex, parent: NodeIndex) -> bool {
        facts::invoked_expression(self.tree, parent) == facts::walk_up_parentheses(self.tree, syntax)
    }

    /// An ambiguous call among methods written with an argument list is an
    /// overload resolution failure.
    pub(crate) fn invocation_ambiguity(&self, kind: ResultKind, symbols: &[SymbolRef], invocation: NodeIndex) -> ResultKind {
        if kind == ResultKind::Ambiguous
            && !symbols.is_empty()
            && facts::has_argument_list(self.tree, invocation)
            && symbols.iter().all(|&s| self.symbol_kind(s) == Some(SymbolKind::Method))
        {
            ResultKind::OverloadResolutionFailure
        } else {
            kind
        }
    }

    pub(crate) fn symbol_kind(&self, symbol: SymbolRef) -> Option<SymbolKind> {
        match symbol {
            SymbolRef::Declared(id) => self.compilation.symbols.kind(id),
            SymbolRef::Synthesized(id) => self.synthesized_symbol(id).map(|s| s.kind),
        }
    }

    /// The member group of the lowest bound node of `syntax`.
    pub(crate) fn member_group_for_syntax(&self, syntax: NodeIndex, cancel: &CancellationToken) -> Result<Vec<SymbolRef>> {
        let Some(lowest) = self.bound.lowest(syntax) else {
            return Ok(Vec::new());
        };
        let parent = self.parent_bound(syntax);
        let extracted = self.extract(lowest, parent, crate::SymbolInfoOptions::DEFAULT, cancel)?;
        Ok(extracted.member_group)
    }
}
