//! Type hierarchy queries: base chains, interface closure, conversions
//! needed for receiver applicability, and member lookup by name.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use sqe_common::limits::MAX_BASE_TYPE_DEPTH;
use tracing::trace;

use crate::arena::SymbolArena;
use crate::symbol::{SymbolId, SymbolKind, TypeKind};

pub type SymbolSet = IndexSet<SymbolId, FxBuildHasher>;

/// Base classes of `ty`, nearest first (excluding `ty`).
pub fn base_types(arena: &SymbolArena, ty: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
    let mut current = arena.get(ty).map_or(SymbolId::NONE, |s| s.base_type);
    let mut remaining = MAX_BASE_TYPE_DEPTH;
    std::iter::from_fn(move || {
        if current.is_none() || remaining == 0 {
            return None;
        }
        remaining -= 1;
        let result = current;
        current = arena.get(current).map_or(SymbolId::NONE, |s| s.base_type);
        Some(result)
    })
}

/// Every interface `ty` implements or extends, directly or through bases,
/// in breadth-first discovery order without duplicates.
///
/// Diamond inheritance (`I3 : I1, I2` with `I1 : I0` and `I2 : I0`) yields
/// `I0` once.
#[must_use]
pub fn all_interfaces(arena: &SymbolArena, ty: SymbolId) -> SymbolSet {
    let mut result = SymbolSet::default();
    let mut worklist: Vec<SymbolId> = std::iter::once(ty).chain(base_types(arena, ty)).collect();
    let mut cursor = 0;
    while cursor < worklist.len() && cursor < MAX_BASE_TYPE_DEPTH * 4 {
        let current = worklist[cursor];
        cursor += 1;
        let Some(symbol) = arena.get(current) else {
            continue;
        };
        for &iface in &symbol.interfaces {
            if result.insert(iface) {
                worklist.push(iface);
            }
        }
    }
    result
}

/// True if `derived` is a proper subtype of `base` through base classes or
/// interfaces.
#[must_use]
pub fn is_derived_from(arena: &SymbolArena, derived: SymbolId, base: SymbolId) -> bool {
    if derived == base || derived.is_none() || base.is_none() {
        return false;
    }
    if base_types(arena, derived).any(|b| b == base) {
        return true;
    }
    arena.get(base).is_some_and(|s| s.type_kind == TypeKind::Interface)
        && all_interfaces(arena, derived).contains(&base)
}

#[must_use]
pub fn is_same_or_derived(arena: &SymbolArena, derived: SymbolId, base: SymbolId) -> bool {
    derived == base || is_derived_from(arena, derived, base)
}

/// Identity or implicit reference conversion from `from` to `to`, the
/// conversions allowed for an extension receiver.
#[must_use]
pub fn has_identity_or_reference_conversion(arena: &SymbolArena, from: SymbolId, to: SymbolId) -> bool {
    if from == to {
        return true;
    }
    let (Some(from_symbol), Some(to_symbol)) = (arena.get(from), arena.get(to)) else {
        return false;
    };
    if to_symbol.special == Some(crate::SpecialType::Object) {
        return from_symbol.kind == SymbolKind::NamedType;
    }
    if to_symbol.kind == SymbolKind::TypeParameter {
        return false;
    }
    is_derived_from(arena, from, to)
}

/// True if `ty` satisfies every constraint of `type_parameter`.
#[must_use]
pub fn satisfies_constraints(arena: &SymbolArena, type_parameter: SymbolId, ty: SymbolId) -> bool {
    let Some(tp) = arena.get(type_parameter) else {
        return false;
    };
    tp.constraints
        .iter()
        .all(|&constraint| is_same_or_derived(arena, ty, constraint))
}

/// The nearest containing named type of `symbol` (excluding `symbol`).
#[must_use]
pub fn containing_type(arena: &SymbolArena, symbol: SymbolId) -> SymbolId {
    let mut current = arena.get(symbol).map_or(SymbolId::NONE, |s| s.container);
    for _ in 0..MAX_BASE_TYPE_DEPTH {
        match arena.get(current) {
            Some(s) if s.kind == SymbolKind::NamedType => return current,
            Some(s) => current = s.container,
            None => return SymbolId::NONE,
        }
    }
    SymbolId::NONE
}

/// True if `inner` is `outer` or is nested (at any depth) inside `outer`.
#[must_use]
pub fn is_same_or_nested_in(arena: &SymbolArena, inner: SymbolId, outer: SymbolId) -> bool {
    if outer.is_none() {
        return false;
    }
    let mut current = inner;
    for _ in 0..MAX_BASE_TYPE_DEPTH {
        if current == outer {
            return true;
        }
        match arena.get(current) {
            Some(s) => current = s.container,
            None => return false,
        }
    }
    false
}

/// Members named `name` found by searching `ty` and then its bases.
///
/// A level that declares a non-method member with the name hides every
/// base level. Methods accumulate across levels; overridden and
/// `new`-hidden methods are removed later by the member-group filter.
/// Interfaces search their whole interface closure, since an interface has
/// no base class.
#[must_use]
pub fn lookup_members(arena: &SymbolArena, ty: SymbolId, name: &str) -> SymbolSet {
    let mut result = SymbolSet::default();
    let Some(symbol) = arena.get(ty) else {
        return result;
    };
    let levels: Vec<SymbolId> = if symbol.type_kind == TypeKind::Interface {
        std::iter::once(ty).chain(all_interfaces(arena, ty)).collect()
    } else if symbol.kind == SymbolKind::TypeParameter {
        // A type parameter exposes the members of its constraints.
        symbol
            .constraints
            .iter()
            .flat_map(|&c| std::iter::once(c).chain(base_types(arena, c)))
            .collect()
    } else {
        std::iter::once(ty).chain(base_types(arena, ty)).collect()
    };
    for level in levels {
        let found = arena.members_named(level, name);
        if found.is_empty() {
            continue;
        }
        let all_methods = found
            .iter()
            .all(|&m| arena.kind(m) == Some(SymbolKind::Method));
        result.extend(found.iter().copied());
        if !all_methods {
            trace!(ty = ty.0, level = level.0, name, "non-method member hides base levels");
            break;
        }
    }
    result
}

/// Every member name visible in `ty`, including inherited ones.
#[must_use]
pub fn visible_member_names(arena: &SymbolArena, ty: SymbolId) -> IndexSet<String, FxBuildHasher> {
    let mut names = IndexSet::default();
    let Some(symbol) = arena.get(ty) else {
        return names;
    };
    let levels: Vec<SymbolId> = if symbol.type_kind == TypeKind::Interface {
        std::iter::once(ty).chain(all_interfaces(arena, ty)).collect()
    } else {
        std::iter::once(ty).chain(base_types(arena, ty)).collect()
    };
    for level in levels {
        let mut level_names: Vec<&str> = arena.member_names(level).collect();
        level_names.sort_unstable();
        for name in level_names {
            names.insert(name.to_string());
        }
    }
    names
}
