//! The accessibility predicate.
//!
//! Accessibility is evaluated from a context: the type whose body contains
//! the reference (`within`), and whether the reference goes through `base.`
//! (which relaxes the protected-instance rule).

use crate::arena::SymbolArena;
use crate::hierarchy::{containing_type, is_same_or_derived, is_same_or_nested_in};
use crate::symbol::{Accessibility, SymbolFlags, SymbolId, SymbolKind};

/// Where an accessibility check is evaluated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessContext {
    /// Innermost type containing the reference, or `NONE` outside any type.
    pub within: SymbolId,
    /// The reference is qualified by `base.`: protected members of the base
    /// type are accessible without the receiver-type check.
    pub base_access: bool,
}

impl AccessContext {
    #[must_use]
    pub const fn new(within: SymbolId) -> Self {
        Self {
            within,
            base_access: false,
        }
    }

    #[must_use]
    pub const fn with_base_access(mut self, base_access: bool) -> Self {
        self.base_access = base_access;
        self
    }

    /// Can `symbol` be referenced from this context?
    ///
    /// `through_type` is the static type of the receiver for instance member
    /// access (`NONE` for simple names and static access).
    #[must_use]
    pub fn is_accessible(&self, arena: &SymbolArena, symbol: SymbolId, through_type: SymbolId) -> bool {
        let Some(sym) = arena.get(symbol) else {
            return false;
        };
        match sym.kind {
            SymbolKind::Namespace
            | SymbolKind::Local
            | SymbolKind::Parameter
            | SymbolKind::Label
            | SymbolKind::TypeParameter
            | SymbolKind::RangeVariable
            | SymbolKind::Alias
            | SymbolKind::ErrorType => return true,
            _ => {}
        }
        let declaring = if sym.kind == SymbolKind::NamedType {
            // Nested types are members of their containing type; top-level
            // types are members of a namespace.
            match arena.get(sym.container) {
                Some(c) if c.kind == SymbolKind::NamedType => sym.container,
                _ => return self.check_top_level(sym.accessibility, sym.flags),
            }
        } else {
            containing_type(arena, symbol)
        };
        if declaring.is_some() && !self.is_accessible(arena, declaring, SymbolId::NONE) {
            return false;
        }
        let in_assembly = !sym.flags.contains(SymbolFlags::FROM_METADATA);
        let receiver = if sym.is_static() || sym.kind == SymbolKind::NamedType {
            SymbolId::NONE
        } else {
            through_type
        };
        match sym.accessibility {
            Accessibility::Public => true,
            Accessibility::Internal => in_assembly,
            Accessibility::Private => {
                self.within.is_some() && is_same_or_nested_in(arena, self.within, declaring)
            }
            Accessibility::Protected => self.protected_ok(arena, declaring, receiver),
            Accessibility::ProtectedInternal => {
                in_assembly || self.protected_ok(arena, declaring, receiver)
            }
            Accessibility::PrivateProtected => {
                in_assembly && self.protected_ok(arena, declaring, receiver)
            }
        }
    }

    fn check_top_level(&self, accessibility: Accessibility, flags: SymbolFlags) -> bool {
        match accessibility {
            Accessibility::Public => true,
            _ => !flags.contains(SymbolFlags::FROM_METADATA),
        }
    }

    /// Protected access: some type enclosing the reference derives from the
    /// declaring type, and (unless through `base.`) the receiver's type
    /// derives from that enclosing type.
    fn protected_ok(&self, arena: &SymbolArena, declaring: SymbolId, receiver: SymbolId) -> bool {
        let mut enclosing = self.within;
        for _ in 0..sqe_common::limits::MAX_BASE_TYPE_DEPTH {
            if enclosing.is_none() {
                return false;
            }
            if is_same_or_derived(arena, enclosing, declaring) {
                if self.base_access || receiver.is_none() {
                    return true;
                }
                if is_same_or_derived(arena, receiver, enclosing) {
                    return true;
                }
            }
            enclosing = containing_type(arena, enclosing);
        }
        false
    }
}
