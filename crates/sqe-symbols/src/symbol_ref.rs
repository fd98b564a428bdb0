//! References to symbols that may live outside the compilation arena.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::symbol::SymbolId;

/// Index of an engine-synthesized symbol (built-in operators, reduced
/// extension methods, `this` parameters, speculative locals).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SynthId(pub u32);

/// A symbol answer: either declared by the binder, or synthesized by the
/// query engine that produced it. Equal refs denote the same entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolRef {
    Declared(SymbolId),
    Synthesized(SynthId),
}

impl SymbolRef {
    #[inline]
    #[must_use]
    pub const fn declared(self) -> Option<SymbolId> {
        match self {
            SymbolRef::Declared(id) => Some(id),
            SymbolRef::Synthesized(_) => None,
        }
    }
}

impl From<SymbolId> for SymbolRef {
    fn from(id: SymbolId) -> Self {
        SymbolRef::Declared(id)
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolRef::Declared(id) => write!(f, "#{}", id.0),
            SymbolRef::Synthesized(id) => write!(f, "~{}", id.0),
        }
    }
}
