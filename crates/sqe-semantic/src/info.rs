//! Caller-facing result records.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use sqe_bound::ConversionKind;
use sqe_symbols::{ResultKind, SymbolId, SymbolRef};

/// The answer to a symbol query: candidates, how well they match, and
/// whether the reference is dispatched dynamically.
///
/// `candidates` is empty exactly when `result_kind` is
/// [`ResultKind::Empty`]. The [`SymbolInfo::no_information`] sentinel is
/// also empty but reports [`SymbolInfo::is_no_information`], so callers can
/// tell "this node never carries symbols" from "nothing was found".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    candidates: SmallVec<[SymbolRef; 1]>,
    result_kind: ResultKind,
    is_dynamic: bool,
    no_information: bool,
}

impl SymbolInfo {
    /// Nothing was found.
    #[must_use]
    pub fn none() -> Self {
        Self {
            candidates: SmallVec::new(),
            result_kind: ResultKind::Empty,
            is_dynamic: false,
            no_information: false,
        }
    }

    /// The queried node cannot carry semantic information.
    #[must_use]
    pub fn no_information() -> Self {
        Self {
            no_information: true,
            ..Self::none()
        }
    }

    /// Build a normalized result.
    ///
    /// Duplicates are dropped (first occurrence wins). No candidates means
    /// `Empty`; candidates reported as `Empty` become `Viable`; several
    /// candidates reported as `Viable` become `OverloadResolutionFailure`.
    #[must_use]
    pub fn create(
        candidates: impl IntoIterator<Item = SymbolRef>,
        result_kind: ResultKind,
        is_dynamic: bool,
    ) -> Self {
        let unique: IndexSet<SymbolRef, FxBuildHasher> = candidates.into_iter().collect();
        let candidates: SmallVec<[SymbolRef; 1]> = unique.into_iter().collect();
        let result_kind = if candidates.is_empty() {
            ResultKind::Empty
        } else if !(result_kind.is_empty() || result_kind.is_viable()) {
            result_kind
        } else if candidates.len() > 1 {
            ResultKind::OverloadResolutionFailure
        } else {
            ResultKind::Viable
        };
        Self {
            candidates,
            result_kind,
            is_dynamic,
            no_information: false,
        }
    }

    /// An empty result that still records dynamic dispatch.
    #[must_use]
    pub fn empty_dynamic(is_dynamic: bool) -> Self {
        Self {
            is_dynamic,
            ..Self::none()
        }
    }

    /// The single chosen symbol, if the result is `Viable`.
    #[must_use]
    pub fn symbol(&self) -> Option<SymbolRef> {
        if self.result_kind.is_viable() {
            self.candidates.first().copied()
        } else {
            None
        }
    }

    /// Candidate symbols when the result is not `Viable`.
    #[must_use]
    pub fn candidate_symbols(&self) -> &[SymbolRef] {
        if self.result_kind.is_viable() {
            &[]
        } else {
            &self.candidates
        }
    }

    /// Every symbol in the result, chosen or candidate.
    #[inline]
    #[must_use]
    pub fn all_symbols(&self) -> &[SymbolRef] {
        &self.candidates
    }

    #[inline]
    #[must_use]
    pub fn result_kind(&self) -> ResultKind {
        self.result_kind
    }

    #[inline]
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    #[inline]
    #[must_use]
    pub fn is_no_information(&self) -> bool {
        self.no_information
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// A conversion applied to an expression, and the method implementing it
/// for user-defined and method-group conversions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConversionInfo {
    pub kind: ConversionKind,
    pub method: Option<SymbolRef>,
}

impl ConversionInfo {
    #[must_use]
    pub const fn of(kind: ConversionKind) -> Self {
        Self { kind, method: None }
    }

    /// No conversion exists.
    #[must_use]
    pub const fn no_conversion() -> Self {
        Self::of(ConversionKind::NoConversion)
    }

    #[must_use]
    pub const fn exists(&self) -> bool {
        !matches!(self.kind, ConversionKind::NoConversion)
    }

    #[must_use]
    pub const fn is_implicit(&self) -> bool {
        self.kind.is_implicit()
    }
}

/// Static type, converted type, and conversion of an expression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeInfo {
    /// Natural type of the expression. Lambdas, method groups, and
    /// target-typed expressions have none.
    pub ty: Option<SymbolId>,
    /// Type after the implicit conversion the context applied.
    pub converted_type: Option<SymbolId>,
    pub conversion: ConversionInfo,
}

impl TypeInfo {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Symbols of a query clause: the operator method it calls and the `Cast`
/// call an explicitly typed range variable implies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryClauseInfo {
    pub operation: SymbolInfo,
    pub cast: SymbolInfo,
}
