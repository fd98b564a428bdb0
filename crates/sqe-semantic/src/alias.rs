//! Post-processing of symbol answers: error types are replaced by their
//! candidates, aliases by their targets.

use sqe_common::limits::MAX_ALIAS_CHAIN;
use sqe_symbols::{ResultKind, SymbolArena, SymbolId, SymbolKind, SymbolRef};
use tracing::trace;

/// Replace error types by the candidates they carry.
///
/// The result kind is degraded to the error type's candidate kind when
/// that is worse. An error type without candidates is dropped, so a result
/// made only of such error types ends up empty.
#[must_use]
pub fn expand_error_types(arena: &SymbolArena, symbols: &[SymbolRef], kind: ResultKind) -> (Vec<SymbolRef>, ResultKind) {
    let mut out = Vec::with_capacity(symbols.len());
    let mut kind = kind;
    for &symbol in symbols {
        expand_one(arena, symbol, &mut kind, &mut out, 0);
    }
    (out, kind)
}

fn expand_one(arena: &SymbolArena, symbol: SymbolRef, kind: &mut ResultKind, out: &mut Vec<SymbolRef>, depth: usize) {
    let SymbolRef::Declared(id) = symbol else {
        out.push(symbol);
        return;
    };
    match arena.get(id) {
        Some(error) if error.kind == SymbolKind::ErrorType => {
            if depth >= MAX_ALIAS_CHAIN {
                return;
            }
            trace!(error = id.0, candidates = error.candidates.len(), "expanding error type");
            *kind = kind.worse(error.candidate_kind);
            for &candidate in &error.candidates {
                expand_one(arena, SymbolRef::Declared(candidate), kind, out, depth + 1);
            }
        }
        _ => out.push(symbol),
    }
}

/// Replace aliases by their targets, then expand any error types the
/// targets turn out to be. Without `resolve` the symbols are returned as
/// they are.
#[must_use]
pub fn unwrap_aliases(arena: &SymbolArena, symbols: &[SymbolRef], resolve: bool) -> Vec<SymbolRef> {
    if !resolve {
        return symbols.to_vec();
    }
    let targets = alias_targets(arena, symbols);
    expand_error_types(arena, &targets, ResultKind::Viable).0
}

pub(crate) fn alias_targets(arena: &SymbolArena, symbols: &[SymbolRef]) -> Vec<SymbolRef> {
    symbols
        .iter()
        .map(|&symbol| match symbol {
            SymbolRef::Declared(id) => SymbolRef::Declared(resolve_alias(arena, id)),
            SymbolRef::Synthesized(_) => symbol,
        })
        .collect()
}

/// Follow an alias chain to the first non-alias symbol.
#[must_use]
pub fn resolve_alias(arena: &SymbolArena, symbol: SymbolId) -> SymbolId {
    let mut current = symbol;
    for _ in 0..MAX_ALIAS_CHAIN {
        match arena.get(current) {
            Some(s) if s.kind == SymbolKind::Alias && s.alias_target.is_some() => current = s.alias_target,
            _ => return current,
        }
    }
    trace!(alias = symbol.0, "alias chain too long");
    current
}
