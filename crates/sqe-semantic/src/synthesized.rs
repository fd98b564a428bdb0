//! Symbols the engine creates on demand.
//!
//! Built-in operators, reduced extension methods, substituted extension
//! members, and `this` parameters have no declaration in the compilation.
//! The engine describes them with [`SynthesizedSymbol`] records kept in an
//! append-only, per-engine store. Records are interned by a structural key,
//! so asking twice for the same entity yields the same [`SynthId`]. The
//! store never touches the compilation.
//!
//! Locals declared by speculative syntax are not interned here. Each
//! speculation gets its own [`SpeculativeLocals`], dropped with the
//! speculative model.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use smallvec::SmallVec;
use sqe_bound::{LocalDeclarer, OperatorKind};
use sqe_symbols::{MethodKind, Symbol, SymbolArena, SymbolId, SymbolKind, SymbolRef, SynthId};
use tracing::trace;

/// Structural identity of a synthesized symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SynthKey {
    BuiltinOperator {
        operator: OperatorKind,
        left: SymbolId,
        right: SymbolId,
        result: SymbolId,
    },
    /// A classic extension method with its receiver fixed.
    ReducedExtension { method: SymbolId, receiver: SymbolId },
    /// A member of a generic extension block with the block's type
    /// parameter bound to the receiver type.
    SubstitutedExtension { member: SymbolId, receiver: SymbolId },
    ThisParameter { member: SymbolId, ty: SymbolId },
}

/// Description of an engine-created symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesizedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub method_kind: MethodKind,
    /// Return type for methods, declared type for locals and parameters.
    pub ty: SymbolId,
    pub parameter_types: SmallVec<[SymbolId; 2]>,
    /// The declared symbol this one was derived from.
    pub origin: Option<SymbolId>,
    /// Receiver type bound by extension reduction.
    pub receiver: SymbolId,
    pub container: SymbolId,
}

impl SynthesizedSymbol {
    fn bare(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            method_kind: MethodKind::Ordinary,
            ty: SymbolId::NONE,
            parameter_types: SmallVec::new(),
            origin: None,
            receiver: SymbolId::NONE,
            container: SymbolId::NONE,
        }
    }

    /// Human-readable signature, e.g. `int + int -> int` for a built-in
    /// operator or `C.M(int) -> void` for a reduced extension method.
    #[must_use]
    pub fn display(&self, arena: &SymbolArena, operator: Option<OperatorKind>) -> String {
        let ret = arena.name(self.ty);
        match (self.method_kind, operator) {
            (MethodKind::BuiltinOperator, Some(op)) => match self.parameter_types.as_slice() {
                [left, right] => format!("{} {} {} -> {ret}", arena.name(*left), op.text(), arena.name(*right)),
                [operand] => format!("{}{} -> {ret}", op.text(), arena.name(*operand)),
                _ => format!("{} -> {ret}", op.text()),
            },
            _ if self.kind == SymbolKind::Method => {
                let params: Vec<&str> = self.parameter_types.iter().map(|&p| arena.name(p)).collect();
                format!(
                    "{}.{}({}) -> {ret}",
                    arena.qualified_name(self.container),
                    self.name,
                    params.join(", ")
                )
            }
            _ => format!("{}: {ret}", self.name),
        }
    }
}

/// Append-only interning store for synthesized symbols.
#[derive(Debug, Default)]
pub struct SynthesizedStore {
    by_key: DashMap<SynthKey, SynthId>,
    by_id: DashMap<SynthId, Arc<SynthesizedSymbol>>,
    /// Operator of each built-in operator record, for display.
    operators: DashMap<SynthId, OperatorKind>,
    next: AtomicU32,
}

impl SynthesizedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `key`, creating the record with `make` on first use.
    pub fn intern(&self, key: SynthKey, make: impl FnOnce() -> SynthesizedSymbol) -> SynthId {
        match self.by_key.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = SynthId(self.next.fetch_add(1, Ordering::Relaxed));
                let symbol = make();
                trace!(id = id.0, name = %symbol.name, kind = ?symbol.kind, "synthesized symbol");
                if let SynthKey::BuiltinOperator { operator, .. } = entry.key() {
                    self.operators.insert(id, *operator);
                }
                self.by_id.insert(id, Arc::new(symbol));
                entry.insert(id);
                id
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: SynthId) -> Option<Arc<SynthesizedSymbol>> {
        self.by_id.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn operator(&self, id: SynthId) -> Option<OperatorKind> {
        self.operators.get(&id).map(|entry| *entry.value())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub(crate) fn builtin_operator(
        &self,
        arena: &SymbolArena,
        operator: OperatorKind,
        left: SymbolId,
        right: SymbolId,
        result: SymbolId,
    ) -> SymbolRef {
        let key = SynthKey::BuiltinOperator {
            operator,
            left,
            right,
            result,
        };
        SymbolRef::Synthesized(self.intern(key, || {
            let mut symbol = SynthesizedSymbol::bare(operator.metadata_name(), SymbolKind::Method);
            symbol.method_kind = MethodKind::BuiltinOperator;
            symbol.ty = result;
            symbol.parameter_types.push(left);
            if right.is_some() {
                symbol.parameter_types.push(right);
            }
            symbol.container = if arena.get(left).is_some() { left } else { result };
            symbol
        }))
    }

    /// `method` with its first parameter bound to `receiver`.
    pub(crate) fn reduced_extension(
        &self,
        arena: &SymbolArena,
        method: SymbolId,
        receiver: SymbolId,
        return_type: SymbolId,
    ) -> SymbolRef {
        let key = SynthKey::ReducedExtension { method, receiver };
        SymbolRef::Synthesized(self.intern(key, || {
            let declared = arena.get(method);
            let mut symbol = SynthesizedSymbol::bare(
                declared.map_or("", |m| m.name.as_str()),
                SymbolKind::Method,
            );
            symbol.method_kind = MethodKind::ReducedExtension;
            symbol.ty = return_type;
            if let Some(m) = declared {
                symbol.parameter_types = parameter_types(arena, m).skip(1).collect();
                symbol.container = m.container;
            }
            symbol.origin = Some(method);
            symbol.receiver = receiver;
            symbol
        }))
    }

    /// A member of a generic extension block viewed for `receiver`.
    pub(crate) fn substituted_extension(
        &self,
        arena: &SymbolArena,
        member: SymbolId,
        receiver: SymbolId,
        return_type: SymbolId,
    ) -> SymbolRef {
        let key = SynthKey::SubstitutedExtension { member, receiver };
        SymbolRef::Synthesized(self.intern(key, || {
            let declared = arena.get(member);
            let mut symbol = SynthesizedSymbol::bare(
                declared.map_or("", |m| m.name.as_str()),
                declared.map_or(SymbolKind::Method, |m| m.kind),
            );
            if let Some(m) = declared {
                symbol.method_kind = m.method_kind;
                symbol.parameter_types = parameter_types(arena, m).collect();
                symbol.container = m.container;
            }
            symbol.ty = return_type;
            symbol.origin = Some(member);
            symbol.receiver = receiver;
            symbol
        }))
    }

    pub(crate) fn this_parameter(&self, member: SymbolId, ty: SymbolId) -> SymbolRef {
        SymbolRef::Synthesized(self.intern(SynthKey::ThisParameter { member, ty }, || {
            let mut symbol = SynthesizedSymbol::bare("this", SymbolKind::Parameter);
            symbol.ty = ty;
            symbol.container = member;
            symbol
        }))
    }
}

/// Locals declared while binding one piece of speculative syntax.
///
/// Ids start at [`SpeculativeLocals::FIRST_ID`], above anything the shared
/// store hands out, and are only meaningful to the speculative model that
/// owns the declarations.
#[derive(Debug, Default)]
pub struct SpeculativeLocals {
    locals: DashMap<SynthId, Arc<SynthesizedSymbol>>,
    next: AtomicU32,
}

impl SpeculativeLocals {
    pub const FIRST_ID: u32 = 1 << 31;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `id` is in the range reserved for speculative locals.
    #[inline]
    #[must_use]
    pub const fn is_local_id(id: SynthId) -> bool {
        id.0 >= Self::FIRST_ID
    }

    #[must_use]
    pub fn get(&self, id: SynthId) -> Option<Arc<SynthesizedSymbol>> {
        self.locals.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}

impl LocalDeclarer for SpeculativeLocals {
    fn declare_local(&self, name: &str, kind: SymbolKind, ty: SymbolId) -> SymbolRef {
        let id = SynthId(Self::FIRST_ID + self.next.fetch_add(1, Ordering::Relaxed));
        let mut symbol = SynthesizedSymbol::bare(name, kind);
        symbol.ty = ty;
        trace!(id = id.0, name, "speculative local");
        self.locals.insert(id, Arc::new(symbol));
        SymbolRef::Synthesized(id)
    }
}

fn parameter_types<'a>(arena: &'a SymbolArena, method: &'a Symbol) -> impl Iterator<Item = SymbolId> + 'a {
    method
        .parameters
        .iter()
        .map(move |&p| arena.get(p).map_or(SymbolId::NONE, |param| param.ty))
}
