//! Compile-time symbols for the sqe semantic query engine.
//!
//! Symbols are produced by the binder (an external collaborator) and are
//! read-only for the query engine. This crate provides:
//! - The symbol arena (`SymbolArena`, `SymbolId`, `Symbol`)
//! - Symbol kinds, flags, and accessibility
//! - `ResultKind`, the ordered classification of a query's confidence
//! - Type-hierarchy helpers (base chains, interface closure, member lookup)
//! - The accessibility predicate

pub mod symbol;
pub use symbol::{
    Accessibility, MethodKind, SpecialType, Symbol, SymbolFlags, SymbolId, SymbolKind, TypeKind,
};

pub mod symbol_ref;
pub use symbol_ref::{SymbolRef, SynthId};

pub mod arena;
pub use arena::SymbolArena;

pub mod result_kind;
pub use result_kind::ResultKind;

pub mod hierarchy;

pub mod accessibility;
pub use accessibility::AccessContext;
