//! Bound trees: what the binder concluded about each syntax node.
//!
//! A bound node is a closed sum type ([`BoundKind`]) plus a common header
//! (syntax, type, result kind). One syntax node may map to several bound
//! nodes: the innermost is the *lowest*, and implicit wrappers such as
//! conversions added around it are higher. The binder records nodes
//! inner-first, so the last node recorded for a syntax node is its highest.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use sqe_symbols::{ResultKind, SymbolId, SymbolRef};
use sqe_syntax::NodeIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoundId(pub u32);

/// A compile-time constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
}

/// Classification of a conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionKind {
    #[default]
    Identity,
    ImplicitNumeric,
    ImplicitReference,
    Boxing,
    UserDefined,
    MethodGroup,
    AnonymousFunction,
    Dynamic,
    /// Target-typed conditional or switch expression.
    ConditionalExpression,
    CollectionExpression,
    Tuple,
    ExplicitNumeric,
    ExplicitReference,
    NoConversion,
}

impl ConversionKind {
    #[must_use]
    pub const fn is_implicit(self) -> bool {
        !matches!(
            self,
            ConversionKind::ExplicitNumeric | ConversionKind::ExplicitReference | ConversionKind::NoConversion
        )
    }
}

/// Language operators, with their metadata names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Addition,
    Subtraction,
    Multiply,
    Division,
    Modulus,
    Equality,
    Inequality,
    LessThan,
    GreaterThan,
    LogicalAnd,
    LogicalOr,
    ConditionalAnd,
    ConditionalOr,
    UnaryPlus,
    UnaryNegation,
    LogicalNot,
    Increment,
    Decrement,
    True,
    False,
}

impl OperatorKind {
    /// The metadata name of the operator method (`op_Addition`, ...).
    #[must_use]
    pub const fn metadata_name(self) -> &'static str {
        match self {
            OperatorKind::Addition => "op_Addition",
            OperatorKind::Subtraction => "op_Subtraction",
            OperatorKind::Multiply => "op_Multiply",
            OperatorKind::Division => "op_Division",
            OperatorKind::Modulus => "op_Modulus",
            OperatorKind::Equality => "op_Equality",
            OperatorKind::Inequality => "op_Inequality",
            OperatorKind::LessThan => "op_LessThan",
            OperatorKind::GreaterThan => "op_GreaterThan",
            OperatorKind::LogicalAnd | OperatorKind::ConditionalAnd => "op_BitwiseAnd",
            OperatorKind::LogicalOr | OperatorKind::ConditionalOr => "op_BitwiseOr",
            OperatorKind::UnaryPlus => "op_UnaryPlus",
            OperatorKind::UnaryNegation => "op_UnaryNegation",
            OperatorKind::LogicalNot => "op_LogicalNot",
            OperatorKind::Increment => "op_Increment",
            OperatorKind::Decrement => "op_Decrement",
            OperatorKind::True => "op_True",
            OperatorKind::False => "op_False",
        }
    }

    /// Source spelling of the operator.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            OperatorKind::Addition | OperatorKind::UnaryPlus => "+",
            OperatorKind::Subtraction | OperatorKind::UnaryNegation => "-",
            OperatorKind::Multiply => "*",
            OperatorKind::Division => "/",
            OperatorKind::Modulus => "%",
            OperatorKind::Equality => "==",
            OperatorKind::Inequality => "!=",
            OperatorKind::LessThan => "<",
            OperatorKind::GreaterThan => ">",
            OperatorKind::LogicalAnd => "&",
            OperatorKind::LogicalOr => "|",
            OperatorKind::ConditionalAnd => "&&",
            OperatorKind::ConditionalOr => "||",
            OperatorKind::LogicalNot => "!",
            OperatorKind::Increment => "++",
            OperatorKind::Decrement => "--",
            OperatorKind::True => "true",
            OperatorKind::False => "false",
        }
    }

    /// `&&` and `||`: short-circuiting operators.
    #[must_use]
    pub const fn is_conditional(self) -> bool {
        matches!(self, OperatorKind::ConditionalAnd | OperatorKind::ConditionalOr)
    }
}

/// Operator resolution recorded by the binder, shared by unary, binary,
/// compound-assignment, and increment nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorInfo {
    pub operator: OperatorKind,
    pub operands: SmallVec<[BoundId; 2]>,
    /// The user-defined operator chosen, if any.
    pub method: Option<SymbolRef>,
    /// Candidates considered when resolution failed.
    pub original_candidates: Option<Vec<SymbolRef>>,
    pub user_defined: bool,
    pub dynamic: bool,
    /// Signature of the resolved built-in operator.
    pub left_type: SymbolId,
    pub right_type: SymbolId,
    pub return_type: SymbolId,
}

impl OperatorInfo {
    #[must_use]
    pub fn builtin(operator: OperatorKind, left_type: SymbolId, right_type: SymbolId, return_type: SymbolId) -> Self {
        Self {
            operator,
            operands: SmallVec::new(),
            method: None,
            original_candidates: None,
            user_defined: false,
            dynamic: false,
            left_type,
            right_type,
            return_type,
        }
    }

    #[must_use]
    pub fn user_defined(operator: OperatorKind, method: SymbolRef) -> Self {
        Self {
            operator,
            operands: SmallVec::new(),
            method: Some(method),
            original_candidates: None,
            user_defined: true,
            dynamic: false,
            left_type: SymbolId::NONE,
            right_type: SymbolId::NONE,
            return_type: SymbolId::NONE,
        }
    }

    #[must_use]
    pub fn with_operands(mut self, operands: &[BoundId]) -> Self {
        self.operands = operands.iter().copied().collect();
        self
    }
}

/// A method group: the methods a name (or member access) denotes before
/// overload resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodGroup {
    pub receiver: Option<BoundId>,
    pub name: String,
    /// Methods found by member lookup (extension methods are not included).
    pub methods: SmallVec<[SymbolRef; 4]>,
    pub type_arguments: SmallVec<[SymbolId; 1]>,
    /// Extension methods in scope should be considered for this group.
    pub search_extensions: bool,
}

/// A method invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub receiver: Option<BoundId>,
    /// The method overload resolution chose (or its best guess).
    pub method: Option<SymbolRef>,
    /// Candidates, present only when overload resolution failed.
    pub original_methods: Option<Vec<SymbolRef>>,
    pub arguments: Vec<BoundId>,
    pub invoked_as_extension: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoundKind {
    Literal,
    Local {
        local: SymbolRef,
    },
    Parameter {
        parameter: SymbolRef,
    },
    FieldAccess {
        receiver: Option<BoundId>,
        field: SymbolRef,
    },
    PropertyAccess {
        receiver: Option<BoundId>,
        property: SymbolRef,
    },
    EventAccess {
        receiver: Option<BoundId>,
        event: SymbolRef,
    },
    TypeExpression {
        ty: SymbolId,
        alias: SymbolId,
    },
    NamespaceExpression {
        namespace: SymbolId,
        alias: SymbolId,
    },
    /// A name that could be a type or a value (`Color Color`), resolved by
    /// its context.
    TypeOrValue {
        type_expr: BoundId,
        value_expr: BoundId,
    },
    MethodGroup(MethodGroup),
    PropertyGroup {
        receiver: Option<BoundId>,
        properties: SmallVec<[SymbolRef; 4]>,
    },
    Call(Call),
    IndexerAccess {
        receiver: Option<BoundId>,
        indexer: Option<SymbolRef>,
        original_indexers: Option<Vec<SymbolRef>>,
        arguments: Vec<BoundId>,
    },
    DynamicInvocation {
        expression: BoundId,
        applicable_methods: Vec<SymbolRef>,
    },
    DynamicIndexerAccess {
        receiver: BoundId,
        applicable_indexers: Vec<SymbolRef>,
    },
    DynamicMemberAccess {
        receiver: BoundId,
        name: String,
    },
    ObjectCreation {
        constructor: Option<SymbolRef>,
        constructors_group: Vec<SymbolRef>,
        arguments: Vec<BoundId>,
    },
    DynamicObjectCreation {
        applicable_constructors: Vec<SymbolRef>,
    },
    Attribute {
        constructor: Option<SymbolRef>,
        constructors_group: Vec<SymbolRef>,
    },
    Conversion {
        operand: BoundId,
        conversion: ConversionKind,
        /// Method of a user-defined or method-group conversion.
        method: Option<SymbolRef>,
        explicit: bool,
    },
    DelegateCreation {
        argument: Option<BoundId>,
        method: Option<SymbolRef>,
        is_extension_method: bool,
    },
    UnaryOperator(OperatorInfo),
    BinaryOperator(OperatorInfo),
    CompoundAssignment(OperatorInfo),
    Increment(OperatorInfo),
    /// Error recovery: the binder's guesses for an expression it could not bind.
    BadExpression {
        symbols: Vec<SymbolRef>,
        children: Vec<BoundId>,
    },
    RecursivePattern {
        deconstruct_method: Option<SymbolRef>,
        input_type: SymbolId,
        narrowed_type: SymbolId,
    },
    /// A positional or property subpattern and the member it matches.
    Subpattern {
        symbol: Option<SymbolRef>,
    },
    Label {
        label: SymbolRef,
    },
    /// `this` (or `base` when `is_base`) inside `member`.
    ThisReference {
        member: SymbolId,
        is_base: bool,
    },
    NameOf {
        argument: BoundId,
    },
    Lambda {
        symbol: SymbolRef,
    },
    /// `c ? a : b`; `target_typed` when its type comes from the context.
    ConditionalOperator {
        target_typed: bool,
        operands: SmallVec<[BoundId; 3]>,
    },
    CollectionExpression {
        elements: Vec<BoundId>,
    },
    /// The implicit `Add` call of one collection initializer element, bound
    /// to the element's syntax.
    CollectionElementInitializer(Call),
    /// A query clause: the operator method it calls, the range variable it
    /// defines, and the `Cast<T>` call it implies.
    QueryClause {
        operation: Option<SymbolRef>,
        defined: Option<SymbolRef>,
        cast: Option<SymbolRef>,
    },
}

/// One bound node.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundNode {
    pub syntax: NodeIndex,
    /// Static type of the expression (`NONE` for typeless nodes).
    pub ty: SymbolId,
    pub result_kind: ResultKind,
    pub has_errors: bool,
    pub constant: Option<ConstantValue>,
    pub kind: BoundKind,
}

impl BoundNode {
    #[must_use]
    pub fn new(syntax: NodeIndex, kind: BoundKind) -> Self {
        Self {
            syntax,
            ty: SymbolId::NONE,
            result_kind: ResultKind::Viable,
            has_errors: false,
            constant: None,
            kind,
        }
    }

    #[must_use]
    pub fn with_type(mut self, ty: SymbolId) -> Self {
        self.ty = ty;
        self
    }

    #[must_use]
    pub fn with_result_kind(mut self, result_kind: ResultKind) -> Self {
        self.result_kind = result_kind;
        self
    }

    #[must_use]
    pub fn with_errors(mut self) -> Self {
        self.has_errors = true;
        self
    }

    #[must_use]
    pub fn with_constant(mut self, constant: ConstantValue) -> Self {
        self.constant = Some(constant);
        self
    }

    /// The single symbol this node refers to directly, if it has one.
    #[must_use]
    pub fn expression_symbol(&self) -> Option<SymbolRef> {
        match &self.kind {
            BoundKind::Local { local } => Some(*local),
            BoundKind::Parameter { parameter } => Some(*parameter),
            BoundKind::FieldAccess { field, .. } => Some(*field),
            BoundKind::PropertyAccess { property, .. } => Some(*property),
            BoundKind::EventAccess { event, .. } => Some(*event),
            BoundKind::TypeExpression { ty, .. } => Some(SymbolRef::Declared(*ty)),
            BoundKind::NamespaceExpression { namespace, .. } => Some(SymbolRef::Declared(*namespace)),
            BoundKind::Label { label } => Some(*label),
            BoundKind::Lambda { symbol } => Some(*symbol),
            BoundKind::Call(call) => call.method,
            BoundKind::IndexerAccess { indexer, .. } => *indexer,
            BoundKind::DelegateCreation { method, .. } => *method,
            BoundKind::ObjectCreation { constructor, .. }
            | BoundKind::Attribute { constructor, .. } => *constructor,
            _ => None,
        }
    }
}

/// The bound nodes of one syntax tree (or one speculative fragment).
#[derive(Clone, Debug, Default)]
pub struct BoundTree {
    nodes: Vec<BoundNode>,
    by_syntax: FxHashMap<NodeIndex, SmallVec<[BoundId; 2]>>,
    /// `Add` calls of collection initializer elements. Kept out of
    /// `by_syntax`: the call is not what the element expression means.
    element_initializers: FxHashMap<NodeIndex, BoundId>,
}

impl BoundTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node. Nodes for the same syntax must be added inner-first.
    ///
    /// Element initializer calls are recorded on the side and never show up
    /// in [`nodes_for`](Self::nodes_for).
    pub fn add(&mut self, node: BoundNode) -> BoundId {
        let id = BoundId(self.nodes.len() as u32);
        if matches!(node.kind, BoundKind::CollectionElementInitializer(_)) {
            self.element_initializers.insert(node.syntax, id);
        } else {
            self.by_syntax.entry(node.syntax).or_default().push(id);
        }
        self.nodes.push(node);
        id
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: BoundId) -> Option<&BoundNode> {
        self.nodes.get(id.0 as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every bound node recorded for `syntax`, lowest first.
    #[must_use]
    pub fn nodes_for(&self, syntax: NodeIndex) -> &[BoundId] {
        self.by_syntax.get(&syntax).map_or(&[], |ids| ids.as_slice())
    }

    #[must_use]
    pub fn lowest(&self, syntax: NodeIndex) -> Option<BoundId> {
        self.nodes_for(syntax).first().copied()
    }

    #[must_use]
    pub fn highest(&self, syntax: NodeIndex) -> Option<BoundId> {
        self.nodes_for(syntax).last().copied()
    }

    /// The `Add` call bound for a collection initializer element.
    #[must_use]
    pub fn element_initializer(&self, element: NodeIndex) -> Option<BoundId> {
        self.element_initializers.get(&element).copied()
    }

    /// Type of a bound node, `NONE` if it has none.
    #[must_use]
    pub fn type_of(&self, id: BoundId) -> SymbolId {
        self.get(id).map_or(SymbolId::NONE, |n| n.ty)
    }
}
