//! Semantic query engine for the sqe compiler front end.
//!
//! Given an immutable [`Compilation`](sqe_bound::Compilation) produced by a
//! binder, a [`SemanticModel`] answers the questions IDE features ask about
//! one syntax tree:
//! - Which symbol does this expression refer to, and how confidently
//!   ([`SymbolInfo`], [`ResultKind`](sqe_symbols::ResultKind))
//! - What are its type, converted type, and conversion ([`TypeInfo`])
//! - Which methods or properties could it denote before overload
//!   resolution (member and indexer groups)
//! - What would a piece of foreign syntax mean at a position (speculative
//!   queries against a throwaway bound tree)
//! - Which symbols are visible at a position (lookup)
//!
//! The engine never writes to the compilation. Symbols it has to invent
//! live in a [`SynthesizedStore`] owned by the model.

pub mod error;
pub use error::{Result, SemanticError};

pub mod options;
pub use options::{LookupOptions, SemanticModelOptions, SymbolInfoOptions};

pub mod info;
pub use info::{ConversionInfo, QueryClauseInfo, SymbolInfo, TypeInfo};

pub mod synthesized;
pub use synthesized::{SpeculativeLocals, SynthKey, SynthesizedStore, SynthesizedSymbol};

pub mod position;
pub use position::{NormalizedPosition, normalize_position};

mod scope_resolver;

mod extensions;

pub mod alias;
pub use alias::{expand_error_types, resolve_alias, unwrap_aliases};

pub mod member_group;
pub use member_group::filter_overridden_or_hidden;

pub mod conversions;
pub use conversions::classify_type_conversion;

mod extract;
mod reconcile;
mod type_info;
mod speculative;
mod lookup;

pub mod model;
pub use model::{SemanticModel, SpeculativeOrigin, SymbolData};
