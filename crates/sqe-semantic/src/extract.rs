//! Symbol extraction: what one bound node says about the symbols its
//! syntax refers to.
//!
//! Extraction is a total match over [`BoundKind`]. It looks at the node and
//! the lowest bound node of its syntactic parent, never further, and leaves
//! choosing between the lowest and highest node of a syntax to the
//! reconciler.

use sqe_bound::{BoundId, BoundKind, BoundNode, ConversionKind, OperatorInfo};
use sqe_common::CancellationToken;
use sqe_symbols::{ResultKind, SymbolId, SymbolRef, hierarchy};
use sqe_syntax::{SyntaxKind, facts};
use tracing::trace;

use crate::error::Result;
use crate::model::SemanticModel;
use crate::options::SymbolInfoOptions;

/// Symbols, result kind, and member group extracted from one bound node.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Extracted {
    pub symbols: Vec<SymbolRef>,
    pub kind: ResultKind,
    pub dynamic: bool,
    pub member_group: Vec<SymbolRef>,
}

impl Extracted {
    fn of(symbols: impl IntoIterator<Item = SymbolRef>, kind: ResultKind) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
            kind,
            ..Self::default()
        }
    }

    fn dynamic(kind: ResultKind) -> Self {
        Self {
            kind,
            dynamic: true,
            ..Self::default()
        }
    }
}

impl SemanticModel<'_> {
    pub(crate) fn extract(
        &self,
        id: BoundId,
        parent: Option<BoundId>,
        options: SymbolInfoOptions,
        cancel: &CancellationToken,
    ) -> Result<Extracted> {
        cancel.check()?;
        let Some(node) = self.bound.get(id) else {
            return Ok(Extracted::default());
        };
        let parent_node = parent.and_then(|p| self.bound.get(p));
        let kind = node.result_kind;

        let extracted = match &node.kind {
            BoundKind::Literal
            | BoundKind::NameOf { .. }
            | BoundKind::ConditionalOperator { .. }
            | BoundKind::CollectionExpression { .. } => Extracted::default(),

            BoundKind::Local { .. }
            | BoundKind::Parameter { .. }
            | BoundKind::FieldAccess { .. }
            | BoundKind::PropertyAccess { .. }
            | BoundKind::EventAccess { .. }
            | BoundKind::Label { .. }
            | BoundKind::Lambda { .. } => Extracted::of(node.expression_symbol(), kind),

            BoundKind::TypeExpression { ty, alias } => self.type_name_symbols(node, *ty, *alias, parent_node, options),
            BoundKind::NamespaceExpression { namespace, alias } => {
                let symbol = if alias.is_some() { *alias } else { *namespace };
                Extracted::of([SymbolRef::Declared(symbol)], kind)
            }

            BoundKind::TypeOrValue { value_expr, .. } => {
                if *value_expr == id {
                    Extracted::default()
                } else {
                    self.extract(*value_expr, parent, options, cancel)?
                }
            }

            BoundKind::MethodGroup(group) => self.method_group_symbols(node, group, parent_node, cancel)?,
            BoundKind::PropertyGroup { properties, .. } => {
                self.property_group_symbols(node, properties, parent_node, cancel)?
            }

            BoundKind::Call(call) | BoundKind::CollectionElementInitializer(call) => {
                let mut out = if let Some(originals) = &call.original_methods {
                    let symbols = self.reduce_originals(originals, call.invoked_as_extension, call.receiver);
                    let kind = self.invocation_ambiguity(
                        kind.worse(ResultKind::OverloadResolutionFailure),
                        &symbols,
                        node.syntax,
                    );
                    Extracted::of(symbols, kind)
                } else if let Some(method) = call.method {
                    let method = if call.invoked_as_extension {
                        let receiver = call.receiver.map_or(SymbolId::NONE, |r| self.bound.type_of(r));
                        self.reduce_if_possible(method, receiver)
                    } else {
                        method
                    };
                    Extracted::of([method], kind)
                } else {
                    Extracted::default()
                };
                out.member_group.clone_from(&out.symbols);
                out
            }

            BoundKind::IndexerAccess {
                indexer,
                original_indexers,
                ..
            } => {
                let mut out = match (original_indexers, indexer) {
                    (Some(originals), _) => {
                        let kind = self.invocation_ambiguity(
                            kind.worse(ResultKind::OverloadResolutionFailure),
                            originals,
                            node.syntax,
                        );
                        Extracted::of(originals.iter().copied(), kind)
                    }
                    (None, Some(indexer)) => Extracted::of([*indexer], kind),
                    (None, None) => Extracted::default(),
                };
                out.member_group.clone_from(&out.symbols);
                out
            }

            BoundKind::DynamicInvocation {
                applicable_methods: applicable,
                ..
            }
            | BoundKind::DynamicIndexerAccess {
                applicable_indexers: applicable,
                ..
            }
            | BoundKind::DynamicObjectCreation {
                applicable_constructors: applicable,
            } => Extracted {
                symbols: applicable.clone(),
                kind,
                dynamic: true,
                member_group: applicable.clone(),
            },
            BoundKind::DynamicMemberAccess { .. } => Extracted::dynamic(kind),

            BoundKind::ObjectCreation {
                constructor,
                constructors_group,
                ..
            }
            | BoundKind::Attribute {
                constructor,
                constructors_group,
            } => self.constructor_symbols(node, *constructor, constructors_group),

            BoundKind::Conversion {
                operand,
                conversion,
                method,
                ..
            } => match (conversion, method) {
                (ConversionKind::Dynamic, _) => Extracted::dynamic(kind),
                (ConversionKind::UserDefined, Some(method)) => Extracted::of([*method], kind),
                (ConversionKind::MethodGroup, Some(method)) => {
                    let receiver = self.receiver_type_of(*operand);
                    Extracted::of([self.reduce_if_possible(*method, receiver)], kind)
                }
                _ => Extracted::default(),
            },

            BoundKind::DelegateCreation {
                argument,
                method,
                is_extension_method,
            } => match method {
                Some(method) if *is_extension_method => {
                    let receiver = argument.map_or(SymbolId::NONE, |a| self.receiver_type_of(a));
                    Extracted::of([self.reduce_if_possible(*method, receiver)], kind)
                }
                Some(method) => Extracted::of([*method], kind),
                None => Extracted::default(),
            },

            BoundKind::UnaryOperator(info)
            | BoundKind::BinaryOperator(info)
            | BoundKind::CompoundAssignment(info)
            | BoundKind::Increment(info) => self.operator_symbols(kind, info),

            BoundKind::BadExpression { symbols, .. } => {
                let kind = if !symbols.is_empty() && (kind.is_viable() || kind.is_empty()) {
                    ResultKind::OverloadResolutionFailure
                } else {
                    kind
                };
                Extracted::of(symbols.iter().copied(), kind)
            }

            BoundKind::RecursivePattern {
                deconstruct_method, ..
            } => Extracted::of(*deconstruct_method, kind),
            BoundKind::Subpattern { symbol } => Extracted::of(*symbol, kind),
            BoundKind::QueryClause { operation, .. } => Extracted::of(*operation, kind),

            BoundKind::ThisReference { member, is_base } => self.this_symbols(node, *member, *is_base),
        };
        trace!(
            bound = id.0,
            symbols = extracted.symbols.len(),
            kind = %extracted.kind,
            dynamic = extracted.dynamic,
            "extracted"
        );
        Ok(extracted)
    }

    /// A type name: the alias it was written with or the type, or the
    /// attribute constructor when the name is an attribute's.
    fn type_name_symbols(
        &self,
        node: &BoundNode,
        ty: SymbolId,
        alias: SymbolId,
        parent: Option<&BoundNode>,
        options: SymbolInfoOptions,
    ) -> Extracted {
        if let Some(parent) = parent {
            let parent_syntax = self.tree.kind(parent.syntax);
            if let BoundKind::Attribute {
                constructor,
                constructors_group,
            } = &parent.kind
            {
                if parent_syntax == Some(SyntaxKind::Attribute)
                    && !options.contains(SymbolInfoOptions::PREFER_TYPE_TO_CONSTRUCTORS)
                {
                    return self.constructor_symbols(parent, *constructor, constructors_group);
                }
            }
            if let BoundKind::BadExpression { .. } = parent.kind {
                if parent_syntax == Some(SyntaxKind::ObjectCreation)
                    && parent.result_kind == ResultKind::NotCreatable
                    && facts::type_child(self.tree, parent.syntax) == facts::walk_up_parentheses(self.tree, node.syntax)
                {
                    return Extracted::of([SymbolRef::Declared(ty)], ResultKind::NotCreatable);
                }
            }
        }
        let symbol = if alias.is_some() { alias } else { ty };
        Extracted::of([SymbolRef::Declared(symbol)], node.result_kind)
    }

    /// The chosen constructor, or every accessible candidate as an
    /// overload resolution failure.
    fn constructor_symbols(
        &self,
        node: &BoundNode,
        constructor: Option<SymbolRef>,
        constructors_group: &[SymbolRef],
    ) -> Extracted {
        let cx = self.scope_of_node(node.syntax);
        let accessible: Vec<SymbolRef> = constructors_group
            .iter()
            .copied()
            .filter(|c| match c {
                SymbolRef::Declared(id) => self.is_accessible_from(&cx, *id, SymbolId::NONE),
                SymbolRef::Synthesized(_) => true,
            })
            .collect();
        let mut out = match constructor {
            Some(constructor) => Extracted::of([constructor], node.result_kind),
            None => Extracted::of(
                accessible.iter().copied(),
                node.result_kind.worse(ResultKind::OverloadResolutionFailure),
            ),
        };
        out.member_group = accessible;
        out
    }

    /// A user-defined operator or failed candidates when the binder
    /// recorded them, else a synthesized description of the built-in
    /// operator.
    fn operator_symbols(&self, kind: ResultKind, info: &OperatorInfo) -> Extracted {
        if info.dynamic {
            return Extracted::dynamic(kind);
        }
        if let Some(method) = info.method {
            if info.user_defined || !kind.is_viable() || info.operator.is_conditional() {
                return Extracted::of([method], kind);
            }
        }
        if let Some(originals) = &info.original_candidates {
            if !kind.is_viable() {
                return Extracted::of(originals.iter().copied(), kind);
            }
        }
        if info.left_type.is_some() && info.return_type.is_some() {
            let builtin = self.synthesized.builtin_operator(
                &self.compilation.symbols,
                info.operator,
                info.left_type,
                info.right_type,
                info.return_type,
            );
            return Extracted::of([builtin], kind);
        }
        Extracted::default()
    }

    /// The implicit `this` parameter of the enclosing member.
    fn this_symbols(&self, node: &BoundNode, member: SymbolId, is_base: bool) -> Extracted {
        let arena = &self.compilation.symbols;
        let Some(declared) = arena.get(member) else {
            return Extracted::default();
        };
        let ty = if node.ty.is_some() && !is_base {
            node.ty
        } else {
            hierarchy::containing_type(arena, member)
        };
        let kind = if is_base {
            ResultKind::NotReferencable
        } else if declared.is_static() {
            ResultKind::StaticInstanceMismatch
        } else {
            ResultKind::Viable
        };
        let kind = kind.worse(node.result_kind);
        Extracted::of([self.synthesized.this_parameter(member, ty)], kind)
    }

    /// Receiver type of a method group, or the type of any other node.
    fn receiver_type_of(&self, id: BoundId) -> SymbolId {
        match self.bound.get(id).map(|n| &n.kind) {
            Some(BoundKind::MethodGroup(group)) => group.receiver.map_or(SymbolId::NONE, |r| self.bound.type_of(r)),
            _ => self.bound.type_of(id),
        }
    }
}
