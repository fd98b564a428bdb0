//! Engine configuration and per-query option sets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use sqe_common::limits::MAX_SCOPE_WALK_ITERATIONS;

use crate::error::{Result, SemanticError};

/// Configuration of a [`SemanticModel`](crate::SemanticModel).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SemanticModelOptions {
    /// Treat every symbol as accessible (used by debuggers and REPLs).
    pub ignore_accessibility: bool,
    /// Upper bound on scopes visited by one lookup.
    pub max_scope_walk: usize,
}

impl Default for SemanticModelOptions {
    fn default() -> Self {
        Self {
            ignore_accessibility: false,
            max_scope_walk: MAX_SCOPE_WALK_ITERATIONS,
        }
    }
}

bitflags! {
    /// Options for symbol-info queries.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolInfoOptions: u32 {
        /// Replace alias symbols with their targets.
        const RESOLVE_ALIASES             = 1 << 0;
        /// On the type name of `new T(...)` or an attribute, answer with the
        /// constructor.
        const PREFER_CONSTRUCTORS_TO_TYPE = 1 << 1;
        /// On the type name of `new T(...)` or an attribute, answer with the type.
        const PREFER_TYPE_TO_CONSTRUCTORS = 1 << 2;

        const DEFAULT = Self::RESOLVE_ALIASES.bits() | Self::PREFER_CONSTRUCTORS_TO_TYPE.bits();
    }
}

bitflags! {
    /// Lookup modes. Exactly one mode bit must be set; `INCLUDE_EXTENSIONS`
    /// is a modifier of `ALL_MEMBERS`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LookupOptions: u32 {
        const ALL_MEMBERS          = 1 << 0;
        /// Members of the containing type's base type, with protected
        /// members accessible as through `base.`.
        const BASE_MEMBERS         = 1 << 1;
        const STATIC_ONLY          = 1 << 2;
        const NAMESPACES_AND_TYPES = 1 << 3;
        const LABELS_ONLY          = 1 << 4;
        /// Also return extension members applicable to the container type.
        const INCLUDE_EXTENSIONS   = 1 << 5;

        const MODES = Self::ALL_MEMBERS.bits()
            | Self::BASE_MEMBERS.bits()
            | Self::STATIC_ONLY.bits()
            | Self::NAMESPACES_AND_TYPES.bits()
            | Self::LABELS_ONLY.bits();
    }
}

impl LookupOptions {
    /// Reject option sets that do not name exactly one mode, or that combine
    /// `INCLUDE_EXTENSIONS` with anything but `ALL_MEMBERS`.
    pub fn validate(self) -> Result<()> {
        let modes = self & LookupOptions::MODES;
        if modes.bits().count_ones() != 1 {
            return Err(SemanticError::InvalidLookupOptions(format!(
                "exactly one lookup mode must be set, got {modes:?}"
            )));
        }
        if self.contains(LookupOptions::INCLUDE_EXTENSIONS) && modes != LookupOptions::ALL_MEMBERS {
            return Err(SemanticError::InvalidLookupOptions(format!(
                "extension members can only be included in all-members lookups, got {modes:?}"
            )));
        }
        Ok(())
    }
}
