//! Symbol records.
//!
//! A `Symbol` is a flat record; which fields are meaningful depends on its
//! [`SymbolKind`]. Unused id fields hold [`SymbolId::NONE`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::result_kind::ResultKind;

/// Index of a symbol in the compilation's [`SymbolArena`](crate::SymbolArena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Namespace,
    NamedType,
    TypeParameter,
    Method,
    Property,
    Field,
    Event,
    Local,
    Parameter,
    Label,
    Alias,
    /// Placeholder produced by error recovery; carries candidate symbols.
    ErrorType,
    RangeVariable,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    /// The `dynamic` pseudo-type.
    Dynamic,
    /// A C#-14 style `extension(Receiver r) { ... }` block.
    Extension,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
    UserDefinedOperator,
    Conversion,
    PropertyGet,
    PropertySet,
    LocalFunction,
    AnonymousFunction,
    /// Synthesized description of a language-defined operator.
    BuiltinOperator,
    /// An extension method viewed with its receiver already bound.
    ReducedExtension,
}

/// Predefined types the engine and binders need to name directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialType {
    Object,
    Void,
    Boolean,
    Int32,
    Int64,
    Double,
    String,
    Dynamic,
}

impl SpecialType {
    /// Keyword spelling of the type.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            SpecialType::Object => "object",
            SpecialType::Void => "void",
            SpecialType::Boolean => "bool",
            SpecialType::Int32 => "int",
            SpecialType::Int64 => "long",
            SpecialType::Double => "double",
            SpecialType::String => "string",
            SpecialType::Dynamic => "dynamic",
        }
    }

    /// True for types with implicit numeric conversions between them.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, SpecialType::Int32 | SpecialType::Int64 | SpecialType::Double)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const STATIC              = 1 << 0;
        const VIRTUAL             = 1 << 1;
        const OVERRIDE            = 1 << 2;
        const ABSTRACT            = 1 << 3;
        /// Declared with `new`: hides the members listed in `Symbol::hidden`.
        const NEW                 = 1 << 4;
        /// Classic extension method (`this` on the first parameter).
        const EXTENSION_METHOD    = 1 << 5;
        /// Compiler-synthesized; never referenced by name.
        const IMPLICITLY_DECLARED = 1 << 6;
        /// Imported from a referenced assembly rather than declared in source.
        const FROM_METADATA       = 1 << 7;
        /// Property that is an indexer (`this[...]`).
        const INDEXER             = 1 << 8;
        const CONST               = 1 << 9;
        const READONLY            = 1 << 10;
        /// The `true`/`false` operators used by conditional logic.
        const TRUE_FALSE_OPERATOR = 1 << 11;
        /// Event whose backing field may be used directly inside its type.
        const FIELD_LIKE_EVENT    = 1 << 12;
    }
}

/// Declared accessibility, from most to least restrictive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Accessibility {
    Private,
    PrivateProtected,
    Protected,
    Internal,
    ProtectedInternal,
    #[default]
    Public,
}

/// A compile-time program entity.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub type_kind: TypeKind,
    pub method_kind: MethodKind,
    pub accessibility: Accessibility,
    pub flags: SymbolFlags,
    /// Containing namespace, type, or member (`NONE` for the global namespace).
    pub container: SymbolId,
    /// Return type, field/property/local/parameter type, or event type.
    pub ty: SymbolId,
    pub type_parameters: SmallVec<[SymbolId; 2]>,
    pub parameters: SmallVec<[SymbolId; 4]>,
    /// Members of a namespace or type, in declaration order.
    pub members: Vec<SymbolId>,
    pub base_type: SymbolId,
    pub interfaces: SmallVec<[SymbolId; 2]>,
    /// Member this one overrides.
    pub overridden: SymbolId,
    /// Members this one hides with `new` (or implicitly by signature).
    pub hidden: SmallVec<[SymbolId; 1]>,
    /// Target of an alias.
    pub alias_target: SymbolId,
    /// Candidates of an error type, with the reason they were rejected.
    pub candidates: SmallVec<[SymbolId; 2]>,
    pub candidate_kind: ResultKind,
    /// Constraint types of a type parameter.
    pub constraints: SmallVec<[SymbolId; 1]>,
    /// Receiver type of an extension block.
    pub extension_receiver: SymbolId,
    pub special: Option<SpecialType>,
}

impl Symbol {
    #[must_use]
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            type_kind: TypeKind::default(),
            method_kind: MethodKind::default(),
            accessibility: Accessibility::Public,
            flags: SymbolFlags::empty(),
            container: SymbolId::NONE,
            ty: SymbolId::NONE,
            type_parameters: SmallVec::new(),
            parameters: SmallVec::new(),
            members: Vec::new(),
            base_type: SymbolId::NONE,
            interfaces: SmallVec::new(),
            overridden: SymbolId::NONE,
            hidden: SmallVec::new(),
            alias_target: SymbolId::NONE,
            candidates: SmallVec::new(),
            candidate_kind: ResultKind::Empty,
            constraints: SmallVec::new(),
            extension_receiver: SymbolId::NONE,
            special: None,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: SymbolId) -> Self {
        self.ty = ty;
        self
    }

    #[must_use]
    pub fn with_method_kind(mut self, method_kind: MethodKind) -> Self {
        self.method_kind = method_kind;
        self
    }

    #[must_use]
    pub fn with_type_kind(mut self, type_kind: TypeKind) -> Self {
        self.type_kind = type_kind;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(SymbolFlags::STATIC)
    }

    #[inline]
    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::NamedType | SymbolKind::TypeParameter | SymbolKind::ErrorType
        )
    }

    #[inline]
    #[must_use]
    pub fn is_namespace_or_type(&self) -> bool {
        self.kind == SymbolKind::Namespace || self.is_type()
    }

    /// Fields, methods, properties, and events: things that live in a type.
    #[inline]
    #[must_use]
    pub fn is_member(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Method | SymbolKind::Property | SymbolKind::Field | SymbolKind::Event
        )
    }

    /// Instance members need a receiver; types, locals, and static members do not.
    #[must_use]
    pub fn requires_instance_receiver(&self) -> bool {
        self.is_member()
            && !self.is_static()
            && !matches!(self.method_kind, MethodKind::Constructor)
            && !self.flags.contains(SymbolFlags::CONST)
    }

    #[inline]
    #[must_use]
    pub fn is_extension_method(&self) -> bool {
        self.kind == SymbolKind::Method && self.flags.contains(SymbolFlags::EXTENSION_METHOD)
    }

    #[inline]
    #[must_use]
    pub fn is_indexer(&self) -> bool {
        self.kind == SymbolKind::Property && self.flags.contains(SymbolFlags::INDEXER)
    }

    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_parameters.len()
    }

    /// True if the symbol may be found by writing its name in source.
    ///
    /// Constructors, indexers, operators, and compiler-synthesized members
    /// cannot be.
    #[must_use]
    pub fn can_be_referenced_by_name(&self) -> bool {
        if self.flags.contains(SymbolFlags::IMPLICITLY_DECLARED) || self.name.is_empty() {
            return false;
        }
        match self.kind {
            SymbolKind::Method => matches!(
                self.method_kind,
                MethodKind::Ordinary | MethodKind::LocalFunction | MethodKind::ReducedExtension
            ),
            SymbolKind::Property => !self.is_indexer(),
            _ => true,
        }
    }
}
