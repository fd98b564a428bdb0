//! Position normalization.
//!
//! Every position-based query first maps the caller's offset to the start
//! of a real token, so scope lookups anchor on syntax with scope meaning
//! rather than on trivia or the end-of-file sentinel.

use sqe_syntax::{NodeIndex, SyntaxKind, SyntaxTree};
use tracing::trace;

use crate::error::{Result, SemanticError};

/// A position moved to a token boundary, and the token it anchors on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizedPosition {
    pub position: u32,
    /// `NONE` when the position was clamped to the root's start, or the
    /// root is empty.
    pub token: NodeIndex,
}

/// Normalize `position` against the full span of `root`.
///
/// Positions inside a token's leading trivia, and positions addressing
/// end-of-file, move back to the start of the previous non-missing token.
/// Stepping back past the first token clamps to the root's start.
pub fn normalize_position(tree: &SyntaxTree, root: NodeIndex, position: u32) -> Result<NormalizedPosition> {
    let full = tree.full_span(root);
    if !full.contains_inclusive(position) {
        return Err(SemanticError::OutOfRange {
            position,
            start: full.start,
            end: full.end,
        });
    }
    if full.is_empty() {
        return Ok(NormalizedPosition {
            position: full.start,
            token: NodeIndex::NONE,
        });
    }

    let mut token = tree.find_token(position);
    if token.is_none() {
        return Ok(NormalizedPosition {
            position: full.start,
            token: NodeIndex::NONE,
        });
    }
    let at_eof = tree.kind(token) == Some(SyntaxKind::EndOfFileToken);
    if at_eof || position < tree.span(token).start {
        token = tree.previous_token(token);
        if token.is_none() || !tree.is_self_or_descendant_of(token, root) {
            trace!(position, "position before the first token, clamped to root start");
            return Ok(NormalizedPosition {
                position: full.start,
                token: NodeIndex::NONE,
            });
        }
    }
    let adjusted = tree.span(token).start.max(full.start);
    trace!(position, adjusted, token = token.0, "normalized position");
    Ok(NormalizedPosition {
        position: adjusted,
        token,
    })
}
