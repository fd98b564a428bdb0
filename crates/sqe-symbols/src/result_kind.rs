//! Result kinds: how well a candidate set answers a symbol query.
//!
//! Kinds are totally ordered by [`ResultKind::rank`]; a lower rank is a
//! better answer. `Empty` is special when merging: it means "nothing was
//! found", so any other kind replaces it regardless of rank.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    /// A single unambiguous hit.
    Viable,
    /// No real symbol (error symbol with no guess).
    #[default]
    Empty,
    OverloadResolutionFailure,
    Ambiguous,
    NotReferencable,
    StaticInstanceMismatch,
    MemberGroup,
    Inaccessible,
    NotCreatable,
    NotInvocable,
    NotAValue,
    NotAVariable,
    NotATypeOrNamespace,
    WrongArity,
    LessDerived,
    NotLabel,
    NotAnAttributeType,
}

impl ResultKind {
    /// Position in the best-to-worst order.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            ResultKind::Viable => 0,
            ResultKind::Empty => 1,
            ResultKind::OverloadResolutionFailure => 2,
            ResultKind::Ambiguous => 3,
            ResultKind::NotReferencable => 4,
            ResultKind::StaticInstanceMismatch => 5,
            ResultKind::MemberGroup => 6,
            ResultKind::Inaccessible => 7,
            ResultKind::NotCreatable => 8,
            ResultKind::NotInvocable => 9,
            ResultKind::NotAValue => 10,
            ResultKind::NotAVariable => 11,
            ResultKind::NotATypeOrNamespace => 12,
            ResultKind::WrongArity => 13,
            ResultKind::LessDerived => 14,
            ResultKind::NotLabel => 15,
            ResultKind::NotAnAttributeType => 16,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_viable(self) -> bool {
        matches!(self, ResultKind::Viable)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, ResultKind::Empty)
    }

    /// Strictly better (lower rank) than `other`.
    #[inline]
    #[must_use]
    pub const fn is_better_than(self, other: ResultKind) -> bool {
        self.rank() < other.rank()
    }

    /// The worse of two kinds, where `Empty` means "no opinion".
    ///
    /// Used to cap a result at a given quality: `kind.worse(OverloadResolutionFailure)`
    /// never reports better than an overload failure, but keeps a worse
    /// kind that is already present.
    #[must_use]
    pub const fn worse(self, other: ResultKind) -> ResultKind {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        if self.rank() >= other.rank() { self } else { other }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
