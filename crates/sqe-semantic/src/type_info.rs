//! Type, alias, and constant queries over bound nodes.

use sqe_bound::{BoundKind, BoundNode, ConstantValue};
use sqe_symbols::SymbolId;
use sqe_syntax::NodeIndex;

use crate::info::{ConversionInfo, TypeInfo};
use crate::model::SemanticModel;

fn some_id(id: SymbolId) -> Option<SymbolId> {
    id.is_some().then_some(id)
}

impl SemanticModel<'_> {
    /// The natural type of the lowest node, and the type and conversion a
    /// conversion wrapper applied on top of it.
    pub(crate) fn type_info_for_syntax(&self, syntax: NodeIndex) -> TypeInfo {
        let ids = self.bound.nodes_for(syntax);
        let (Some(lowest), Some(highest)) = (
            ids.first().and_then(|&id| self.bound.get(id)),
            ids.last().and_then(|&id| self.bound.get(id)),
        ) else {
            return TypeInfo::none();
        };
        let natural = natural_type(lowest);

        if ids.len() > 1 {
            if let BoundKind::Conversion { conversion, method, .. } = &highest.kind {
                return TypeInfo {
                    ty: natural,
                    converted_type: some_id(highest.ty),
                    conversion: ConversionInfo {
                        kind: *conversion,
                        method: *method,
                    },
                };
            }
        }
        match &lowest.kind {
            BoundKind::RecursivePattern {
                input_type,
                narrowed_type,
                ..
            } => TypeInfo {
                ty: some_id(*input_type),
                converted_type: some_id(*narrowed_type).or(some_id(*input_type)),
                conversion: ConversionInfo::default(),
            },
            BoundKind::NamespaceExpression { .. } | BoundKind::Lambda { .. } | BoundKind::MethodGroup(_) => {
                TypeInfo::none()
            }
            _ => TypeInfo {
                ty: natural,
                // Target-typed expressions only have the type of their context.
                converted_type: natural.or(some_id(lowest.ty)),
                conversion: ConversionInfo::default(),
            },
        }
    }

    /// The alias a type or namespace name was written with.
    pub(crate) fn alias_for_syntax(&self, syntax: NodeIndex) -> Option<SymbolId> {
        let node = self.bound.lowest(syntax).and_then(|id| self.bound.get(id))?;
        match node.kind {
            BoundKind::TypeExpression { alias, .. } | BoundKind::NamespaceExpression { alias, .. } => some_id(alias),
            _ => None,
        }
    }

    /// The constant of the outermost node recording one.
    pub(crate) fn constant_for_syntax(&self, syntax: NodeIndex) -> Option<ConstantValue> {
        self.bound
            .nodes_for(syntax)
            .iter()
            .rev()
            .find_map(|&id| self.bound.get(id).and_then(|n| n.constant.clone()))
    }
}

/// The type an expression has on its own, before any conversion.
///
/// Lambdas, method groups, target-typed conditionals, and collection
/// expressions have none.
fn natural_type(node: &BoundNode) -> Option<SymbolId> {
    match &node.kind {
        BoundKind::Lambda { .. }
        | BoundKind::MethodGroup(_)
        | BoundKind::NamespaceExpression { .. }
        | BoundKind::CollectionExpression { .. }
        | BoundKind::ConditionalOperator { target_typed: true, .. } => None,
        BoundKind::TypeExpression { ty, .. } => some_id(*ty),
        BoundKind::RecursivePattern { input_type, .. } => some_id(*input_type),
        _ => some_id(node.ty),
    }
}
