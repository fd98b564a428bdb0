//! Errors for caller misuse of the query API.
//!
//! Program-level problems (ambiguity, overload failure, unresolved names)
//! are never errors: they are reported through [`ResultKind`](sqe_symbols::ResultKind).

use sqe_common::Cancelled;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// A position lies outside the query root's full span.
    #[error("position {position} is outside the root span [{start}..{end}]")]
    OutOfRange { position: u32, start: u32, end: u32 },

    /// Mutually exclusive lookup modes were combined.
    #[error("invalid lookup options: {0}")]
    InvalidLookupOptions(String),

    /// The speculative node belongs to the compilation, or speculation was
    /// attempted from a speculative model.
    #[error("invalid speculation: {0}")]
    InvalidSpeculation(String),

    /// The tree is not part of the compilation.
    #[error("tree {0} is not part of the compilation")]
    UnknownTree(u32),

    /// The node does not belong to the tree this model answers for.
    #[error("syntax node is not within the model's tree")]
    NodeNotInTree,

    #[error("operation was cancelled")]
    Cancelled,
}

impl From<Cancelled> for SemanticError {
    fn from(_: Cancelled) -> Self {
        SemanticError::Cancelled
    }
}

pub type Result<T> = std::result::Result<T, SemanticError>;
