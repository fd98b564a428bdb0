//! The compilation-wide symbol arena.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::symbol::{SpecialType, Symbol, SymbolId, SymbolKind, TypeKind};

/// Arena of every symbol the binder declared.
///
/// Built once while binding and read-only afterwards. Members are indexed
/// by name per container so member lookup never scans a type's member list.
#[derive(Debug)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
    /// container -> name -> members with that name, in declaration order
    member_index: FxHashMap<SymbolId, FxHashMap<String, SmallVec<[SymbolId; 2]>>>,
    special_types: FxHashMap<SpecialType, SymbolId>,
    global_namespace: SymbolId,
}

impl Default for SymbolArena {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolArena {
    /// Create an arena holding the global namespace and the predefined types.
    #[must_use]
    pub fn new() -> Self {
        let mut arena = SymbolArena {
            symbols: Vec::new(),
            member_index: FxHashMap::default(),
            special_types: FxHashMap::default(),
            global_namespace: SymbolId::NONE,
        };
        arena.global_namespace = arena.alloc(Symbol::new(SymbolKind::Namespace, ""));
        for special in [
            SpecialType::Object,
            SpecialType::Void,
            SpecialType::Boolean,
            SpecialType::Int32,
            SpecialType::Int64,
            SpecialType::Double,
            SpecialType::String,
            SpecialType::Dynamic,
        ] {
            let mut symbol = Symbol::new(SymbolKind::NamedType, special.keyword());
            symbol.special = Some(special);
            symbol.type_kind = match special {
                SpecialType::Dynamic => TypeKind::Dynamic,
                SpecialType::Object | SpecialType::String => TypeKind::Class,
                _ => TypeKind::Struct,
            };
            let id = arena.alloc(symbol);
            arena.special_types.insert(special, id);
        }
        let object = arena.special_type(SpecialType::Object);
        for special in [SpecialType::Boolean, SpecialType::Int32, SpecialType::Int64, SpecialType::Double, SpecialType::String] {
            let id = arena.special_type(special);
            if let Some(symbol) = arena.get_mut(id) {
                symbol.base_type = object;
            }
        }
        arena
    }

    #[inline]
    #[must_use]
    pub fn global_namespace(&self) -> SymbolId {
        self.global_namespace
    }

    #[must_use]
    pub fn special_type(&self, special: SpecialType) -> SymbolId {
        self.special_types.get(&special).copied().unwrap_or(SymbolId::NONE)
    }

    /// Allocate a symbol without attaching it to a container.
    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        trace!(id = id.0, name = %symbol.name, kind = ?symbol.kind, "alloc symbol");
        self.symbols.push(symbol);
        id
    }

    /// Allocate a symbol as a member of `container` (namespace or type).
    pub fn add_member(&mut self, container: SymbolId, mut symbol: Symbol) -> SymbolId {
        symbol.container = container;
        let name = symbol.name.clone();
        let id = self.alloc(symbol);
        if let Some(parent) = self.get_mut(container) {
            parent.members.push(id);
        }
        self.member_index
            .entry(container)
            .or_default()
            .entry(name)
            .or_default()
            .push(id);
        id
    }

    /// Allocate a symbol owned by `container` that is not a named member
    /// (parameters, type parameters, locals).
    pub fn add_owned(&mut self, container: SymbolId, mut symbol: Symbol) -> SymbolId {
        symbol.container = container;
        self.alloc(symbol)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn kind(&self, id: SymbolId) -> Option<SymbolKind> {
        self.get(id).map(|s| s.kind)
    }

    #[must_use]
    pub fn name(&self, id: SymbolId) -> &str {
        self.get(id).map_or("", |s| s.name.as_str())
    }

    /// Members of `container` declared directly with `name`.
    #[must_use]
    pub fn members_named(&self, container: SymbolId, name: &str) -> &[SymbolId] {
        self.member_index
            .get(&container)
            .and_then(|by_name| by_name.get(name))
            .map_or(&[], |members| members.as_slice())
    }

    /// Every member name declared directly in `container`.
    pub fn member_names(&self, container: SymbolId) -> impl Iterator<Item = &str> + '_ {
        self.member_index
            .get(&container)
            .into_iter()
            .flat_map(|by_name| by_name.keys().map(String::as_str))
    }

    /// Dotted display name, e.g. `N.C.M`.
    #[must_use]
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let mut parts = Vec::new();
        let mut current = id;
        for _ in 0..sqe_common::limits::MAX_BASE_TYPE_DEPTH {
            let Some(symbol) = self.get(current) else {
                break;
            };
            if !symbol.name.is_empty() {
                parts.push(symbol.name.as_str());
            }
            current = symbol.container;
        }
        parts.reverse();
        parts.join(".")
    }
}
