//! Conversion classification: how an expression would convert to a type
//! nobody asked the binder about.
//!
//! The binder records the conversions it applied as `Conversion` bound
//! nodes; those answer first. Everything else is classified from the
//! expression's natural type with the language's built-in rules, plus
//! user-defined `op_Implicit` / `op_Explicit` operators declared on either
//! type.

use sqe_bound::{BindingMode, BoundKind, ConstantValue, ConversionKind};
use sqe_common::CancellationToken;
use sqe_symbols::{MethodKind, SpecialType, Symbol, SymbolArena, SymbolId, SymbolRef, TypeKind, hierarchy};
use sqe_syntax::{NodeIndex, SyntaxTree, facts};
use tracing::{debug_span, trace};

use crate::error::Result;
use crate::info::ConversionInfo;
use crate::model::SemanticModel;

/// Classify the conversion from a value of type `from` to type `to`.
///
/// With `explicit`, conversions that need a cast are reported too;
/// otherwise they are [`ConversionKind::NoConversion`].
#[must_use]
pub fn classify_type_conversion(arena: &SymbolArena, from: SymbolId, to: SymbolId, explicit: bool) -> ConversionInfo {
    let (Some(source), Some(target)) = (arena.get(from), arena.get(to)) else {
        return ConversionInfo::no_conversion();
    };
    if from == to {
        return ConversionInfo::of(ConversionKind::Identity);
    }
    if source.type_kind == TypeKind::Dynamic {
        return ConversionInfo::of(ConversionKind::Dynamic);
    }
    if target.type_kind == TypeKind::Dynamic {
        return ConversionInfo::of(if is_value_type(source) {
            ConversionKind::Boxing
        } else {
            ConversionKind::ImplicitReference
        });
    }
    if let (Some(a), Some(b)) = (source.special, target.special) {
        if a.is_numeric() && b.is_numeric() {
            return if widens(a, b) {
                ConversionInfo::of(ConversionKind::ImplicitNumeric)
            } else if explicit {
                ConversionInfo::of(ConversionKind::ExplicitNumeric)
            } else {
                ConversionInfo::no_conversion()
            };
        }
    }
    if is_value_type(source) {
        if target.special == Some(SpecialType::Object) || hierarchy::is_derived_from(arena, from, to) {
            return ConversionInfo::of(ConversionKind::Boxing);
        }
    } else if hierarchy::has_identity_or_reference_conversion(arena, from, to) {
        return ConversionInfo::of(ConversionKind::ImplicitReference);
    }
    if let Some(method) = user_defined_operator(arena, from, to, "op_Implicit") {
        return ConversionInfo {
            kind: ConversionKind::UserDefined,
            method: Some(SymbolRef::Declared(method)),
        };
    }
    if !explicit {
        return ConversionInfo::no_conversion();
    }
    if let Some(method) = user_defined_operator(arena, from, to, "op_Explicit") {
        return ConversionInfo {
            kind: ConversionKind::UserDefined,
            method: Some(SymbolRef::Declared(method)),
        };
    }
    // Downcasts, and casts to or from an interface.
    if !is_value_type(source)
        && !is_value_type(target)
        && (hierarchy::is_derived_from(arena, to, from)
            || source.type_kind == TypeKind::Interface
            || target.type_kind == TypeKind::Interface)
    {
        return ConversionInfo::of(ConversionKind::ExplicitReference);
    }
    ConversionInfo::no_conversion()
}

fn is_value_type(ty: &Symbol) -> bool {
    matches!(ty.type_kind, TypeKind::Struct | TypeKind::Enum)
}

fn is_reference_type(ty: &Symbol) -> bool {
    matches!(
        ty.type_kind,
        TypeKind::Class | TypeKind::Interface | TypeKind::Delegate | TypeKind::Dynamic
    )
}

/// Implicit numeric conversions between the predefined numeric types.
fn widens(from: SpecialType, to: SpecialType) -> bool {
    matches!(
        (from, to),
        (SpecialType::Int32, SpecialType::Int64)
            | (SpecialType::Int32, SpecialType::Double)
            | (SpecialType::Int64, SpecialType::Double)
    )
}

/// A conversion operator named `name`, declared on `from` or `to`, taking
/// exactly `from` and returning exactly `to`.
fn user_defined_operator(arena: &SymbolArena, from: SymbolId, to: SymbolId, name: &str) -> Option<SymbolId> {
    [from, to].into_iter().find_map(|holder| {
        arena.members_named(holder, name).iter().copied().find(|&candidate| {
            arena.get(candidate).is_some_and(|method| {
                method.method_kind == MethodKind::Conversion
                    && method.ty == to
                    && method.parameters.len() == 1
                    && arena.get(method.parameters[0]).is_some_and(|p| p.ty == from)
            })
        })
    })
}

impl SemanticModel<'_> {
    /// How the expression `node` would convert to `destination`.
    ///
    /// A conversion the binder recorded for the expression to exactly
    /// `destination` answers first. Lambdas and method groups convert to
    /// delegate types only; method-group conversions classified here carry
    /// no method, since no overload resolution is run.
    pub fn classify_conversion(
        &self,
        node: NodeIndex,
        destination: SymbolId,
        explicit: bool,
        cancel: &CancellationToken,
    ) -> Result<ConversionInfo> {
        let _span = debug_span!("classify_conversion", node = node.0, destination = destination.0).entered();
        self.check_node(node)?;
        cancel.check()?;
        if !self.can_get_semantic_info(node) {
            return Ok(ConversionInfo::no_conversion());
        }
        Ok(self.conversion_for_syntax(facts::skip_parentheses(self.tree, node), destination, explicit))
    }

    fn conversion_for_syntax(&self, syntax: NodeIndex, destination: SymbolId, explicit: bool) -> ConversionInfo {
        let arena = &self.compilation.symbols;
        let ids = self.bound.nodes_for(syntax);
        let Some(lowest) = ids.first().and_then(|&id| self.bound.get(id)) else {
            return ConversionInfo::no_conversion();
        };
        let recorded = ids.iter().skip(1).rev().find_map(|&id| {
            let node = self.bound.get(id)?;
            match &node.kind {
                BoundKind::Conversion {
                    conversion,
                    method,
                    explicit: cast,
                    ..
                } if node.ty == destination && (explicit || !*cast) => Some(ConversionInfo {
                    kind: *conversion,
                    method: *method,
                }),
                _ => None,
            }
        });
        if let Some(recorded) = recorded {
            trace!(kind = ?recorded.kind, "binder recorded the conversion");
            return recorded;
        }

        let to_delegate = |kind| {
            if arena.get(destination).is_some_and(|d| d.type_kind == TypeKind::Delegate) {
                ConversionInfo::of(kind)
            } else {
                ConversionInfo::no_conversion()
            }
        };
        match &lowest.kind {
            BoundKind::Lambda { .. } => to_delegate(ConversionKind::AnonymousFunction),
            BoundKind::MethodGroup(_) => to_delegate(ConversionKind::MethodGroup),
            BoundKind::ConditionalOperator { target_typed: true, .. } if destination.is_some() => {
                ConversionInfo::of(ConversionKind::ConditionalExpression)
            }
            BoundKind::CollectionExpression { .. } if destination.is_some() => {
                ConversionInfo::of(ConversionKind::CollectionExpression)
            }
            BoundKind::NamespaceExpression { .. } | BoundKind::TypeExpression { .. } => ConversionInfo::no_conversion(),
            _ if lowest.constant == Some(ConstantValue::Null) && lowest.ty.is_none() => {
                if arena.get(destination).is_some_and(is_reference_type) {
                    ConversionInfo::of(ConversionKind::ImplicitReference)
                } else {
                    ConversionInfo::no_conversion()
                }
            }
            _ => match self.type_info_for_syntax(syntax).ty {
                Some(from) => classify_type_conversion(arena, from, destination, explicit),
                None => ConversionInfo::no_conversion(),
            },
        }
    }

    /// The conversion the binder applies to foreign `node` when it is bound
    /// as an expression at `position`.
    pub fn speculative_conversion(
        &self,
        position: u32,
        foreign: &SyntaxTree,
        node: NodeIndex,
        cancel: &CancellationToken,
    ) -> Result<ConversionInfo> {
        let _span = debug_span!("speculative_conversion", position, node = node.0).entered();
        self.check_speculation(foreign, node)?;
        let Some(model) = self.speculate(position, foreign, node, BindingMode::Expression, cancel)? else {
            return Ok(ConversionInfo::no_conversion());
        };
        let info = model.type_info(node, cancel)?;
        if info.ty.is_none() && info.converted_type.is_none() {
            return Ok(ConversionInfo::no_conversion());
        }
        Ok(info.conversion)
    }

    /// How foreign `node`, bound as an expression at `position`, would
    /// convert to `destination`.
    pub fn speculative_classify_conversion(
        &self,
        position: u32,
        foreign: &SyntaxTree,
        node: NodeIndex,
        destination: SymbolId,
        explicit: bool,
        cancel: &CancellationToken,
    ) -> Result<ConversionInfo> {
        let _span = debug_span!("speculative_classify_conversion", position, node = node.0).entered();
        self.check_speculation(foreign, node)?;
        match self.speculate(position, foreign, node, BindingMode::Expression, cancel)? {
            Some(model) => model.classify_conversion(node, destination, explicit, cancel),
            None => Ok(ConversionInfo::no_conversion()),
        }
    }
}
