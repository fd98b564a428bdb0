//! Syntax trees for the sqe semantic query engine.
//!
//! The parser is an external collaborator; this crate only defines the
//! immutable, arena-allocated tree it produces and the queries the semantic
//! layer needs on it:
//! - Node and token kinds (`SyntaxKind`)
//! - The tree arena (`SyntaxTree`, `NodeIndex`, `TreeId`)
//! - Token finding over leading trivia
//! - A `TreeBuilder` for hosts and tests that construct trees directly
//! - Syntactic facts (type-only contexts, `nameof`, named arguments, ...)

pub mod kind;
pub use kind::SyntaxKind;

pub mod tree;
pub use tree::{NodeIndex, SyntaxNode, SyntaxTree, TreeId};

pub mod builder;
pub use builder::TreeBuilder;

pub mod facts;
