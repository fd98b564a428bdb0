//! Reconciling the lowest and highest bound nodes of a syntax node into
//! one symbol answer, and the final normalization every answer goes
//! through.

use sqe_bound::{BindingMode, BoundId, BoundKind, BoundNode, OperatorKind, SpeculativeContext};
use sqe_common::CancellationToken;
use sqe_common::limits::MAX_TREE_WALK_ITERATIONS;
use sqe_symbols::{ResultKind, SymbolRef};
use sqe_syntax::{NodeIndex, SyntaxKind, SyntaxTree, facts};
use tracing::trace;

use crate::alias::{alias_targets, expand_error_types};
use crate::error::Result;
use crate::extract::Extracted;
use crate::info::SymbolInfo;
use crate::model::SemanticModel;
use crate::options::SymbolInfoOptions;
use crate::synthesized::SpeculativeLocals;

impl SemanticModel<'_> {
    /// The lowest bound node of the syntactic parent of `syntax`.
    ///
    /// Parentheses, arguments, and argument lists bind to nothing of their
    /// own and are skipped.
    pub(crate) fn parent_bound(&self, syntax: NodeIndex) -> Option<BoundId> {
        let outer = facts::walk_up_parentheses(self.tree, syntax);
        for ancestor in self.tree.ancestors(outer).take(MAX_TREE_WALK_ITERATIONS) {
            if let Some(id) = self.bound.lowest(ancestor) {
                return Some(id);
            }
            if !matches!(
                self.tree.kind(ancestor),
                Some(SyntaxKind::Argument | SyntaxKind::ArgumentList | SyntaxKind::ParenthesizedExpression)
            ) {
                return None;
            }
        }
        None
    }

    pub(crate) fn symbol_info_for_syntax(
        &self,
        syntax: NodeIndex,
        options: SymbolInfoOptions,
        cancel: &CancellationToken,
    ) -> Result<SymbolInfo> {
        let ids = self.bound.nodes_for(syntax);
        let (Some(&lowest), Some(&highest)) = (ids.first(), ids.last()) else {
            trace!(node = syntax.0, "no bound nodes");
            return Ok(SymbolInfo::none());
        };
        let Some(highest_node) = self.bound.get(highest) else {
            return Ok(SymbolInfo::none());
        };
        // A deconstructing pattern answers with its Deconstruct method.
        if let BoundKind::RecursivePattern {
            deconstruct_method: Some(method),
            ..
        } = highest_node.kind
        {
            return Ok(self.finish_symbols(vec![method], highest_node.result_kind, false, options));
        }

        let parent = self.parent_bound(syntax);
        let low = self.extract(lowest, parent, options, cancel)?;
        let chosen = if highest == lowest {
            low
        } else {
            let high = self.extract(highest, parent, options, cancel)?;
            reconcile(low, high, highest_node)
        };
        Ok(self.finish_symbols(chosen.symbols, chosen.kind, chosen.dynamic, options))
    }

    /// Final normalization: empty answers, error-type expansion, alias
    /// resolution, deduplication, and kind normalization.
    pub(crate) fn finish_symbols(
        &self,
        symbols: Vec<SymbolRef>,
        kind: ResultKind,
        dynamic: bool,
        options: SymbolInfoOptions,
    ) -> SymbolInfo {
        if kind.is_empty() {
            return SymbolInfo::empty_dynamic(dynamic);
        }
        let arena = &self.compilation.symbols;
        let (mut symbols, mut kind) = expand_error_types(arena, &symbols, kind);
        if options.contains(SymbolInfoOptions::RESOLVE_ALIASES) {
            let targets = alias_targets(arena, &symbols);
            (symbols, kind) = expand_error_types(arena, &targets, kind);
        }
        SymbolInfo::create(symbols, kind, dynamic)
    }

    /// Symbol info of a documentation cross-reference in this tree.
    pub(crate) fn cref_symbol_info(
        &self,
        cref: NodeIndex,
        options: SymbolInfoOptions,
        cancel: &CancellationToken,
    ) -> Result<SymbolInfo> {
        cancel.check()?;
        let Some(binder) = self.binder else {
            return Ok(SymbolInfo::none());
        };
        let cx = self.scope_of_node(cref);
        let symbols = {
            let request = SpeculativeContext {
                compilation: self.compilation,
                scope: cx.scope,
                position: cx.position,
                mode: BindingMode::TypeOrNamespace,
                in_typeof: cx.in_typeof,
                in_cref: true,
                locals: &SpeculativeLocals::new(),
            };
            binder.bind_cref(&request, self.tree, cref)
        };
        Ok(self.cref_result(self.tree, cref, symbols, options))
    }

    /// Classify the symbols a cref names.
    ///
    /// Several symbols are ambiguous, unless the cref spells a parameter
    /// list and they are all of one kind: then overload resolution failed.
    pub(crate) fn cref_result(
        &self,
        tree: &SyntaxTree,
        cref: NodeIndex,
        symbols: Vec<SymbolRef>,
        options: SymbolInfoOptions,
    ) -> SymbolInfo {
        let kind = match symbols.len() {
            0 => return SymbolInfo::none(),
            1 => ResultKind::Viable,
            _ => {
                let first = self.symbol_kind(symbols[0]);
                if facts::cref_has_parameter_list(tree, cref) && symbols.iter().all(|&s| self.symbol_kind(s) == first) {
                    ResultKind::OverloadResolutionFailure
                } else {
                    ResultKind::Ambiguous
                }
            }
        };
        trace!(count = symbols.len(), %kind, "cref symbols");
        self.finish_symbols(symbols, kind, false, options)
    }
}

/// Merge what the lowest and highest bound nodes of one syntax say.
///
/// The highest node's symbols replace the lowest's when the lowest did
/// not settle on one symbol. Otherwise a better kind from the highest node
/// is kept with the lowest's symbols. `TypeOrValue` wrappers and
/// user-defined `true`/`false` operators always answer for their syntax.
fn reconcile(low: Extracted, high: Extracted, highest: &BoundNode) -> Extracted {
    let low_unsettled = low.symbols.len() != 1 || low.kind == ResultKind::OverloadResolutionFailure;
    if low_unsettled && !high.symbols.is_empty() {
        trace!("highest bound node answers");
        return high;
    }
    if !high.kind.is_empty() && high.kind.is_better_than(low.kind) {
        return Extracted {
            kind: high.kind,
            dynamic: high.dynamic,
            ..low
        };
    }
    match &highest.kind {
        BoundKind::TypeOrValue { .. } => high,
        BoundKind::UnaryOperator(info)
            if info.user_defined && matches!(info.operator, OperatorKind::True | OperatorKind::False) =>
        {
            high
        }
        _ => low,
    }
}
