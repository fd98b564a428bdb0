//! The binder's output, as consumed by the sqe semantic query engine.
//!
//! Binding itself is an external collaborator. This crate defines what the
//! binder hands over and what the engine reads:
//! - The scope arena (`ScopeArena`, `Scope`, `ScopeId`): the binder chain
//! - Bound trees (`BoundTree`, `BoundNode`, `BoundKind`): what the binder
//!   concluded about each syntax node
//! - The `Compilation`: symbols, scopes, and per-tree binding results
//! - The `Binder` trait the engine drives for speculative syntax

pub mod scope;
pub use scope::{Scope, ScopeArena, ScopeFlags, ScopeId, ScopeKind};

pub mod bound;
pub use bound::{
    BoundId, BoundKind, BoundNode, BoundTree, Call, ConstantValue, ConversionKind, MethodGroup,
    OperatorInfo, OperatorKind,
};

pub mod compilation;
pub use compilation::{Compilation, TreeData};

pub mod binder;
pub use binder::{Binder, BindingMode, LocalDeclarer, SpeculativeContext};
