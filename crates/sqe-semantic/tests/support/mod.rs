//! Shared fixtures for the semantic model tests: a compilation assembled by
//! hand (symbols, scopes, trees, bound nodes) and a toy binder for
//! speculative queries.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use sqe_bound::{
    Binder, BindingMode, BoundId, BoundKind, BoundNode, BoundTree, Compilation, ConstantValue,
    MethodGroup, OperatorInfo, OperatorKind, Scope, ScopeFlags, ScopeId, ScopeKind,
    SpeculativeContext,
};
use sqe_common::CancellationToken;
use sqe_semantic::SemanticModel;
use sqe_symbols::{
    MethodKind, SpecialType, Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolRef, TypeKind,
    hierarchy,
};
use sqe_syntax::{NodeIndex, SyntaxKind, SyntaxTree, TreeBuilder, TreeId};

pub fn init() {
    sqe_common::tracing_config::init_tracing();
}

pub fn cancel() -> CancellationToken {
    CancellationToken::none()
}

pub fn declared(ids: &[SymbolId]) -> Vec<SymbolRef> {
    ids.iter().map(|&id| SymbolRef::Declared(id)).collect()
}

/// Scopes and symbols of `class C { void M() { ... } }` in one tree.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub tree: TreeId,
    pub class: SymbolId,
    pub method: SymbolId,
    pub type_scope: ScopeId,
    pub method_scope: ScopeId,
    pub block_scope: ScopeId,
    pub class_decl: NodeIndex,
    pub method_decl: NodeIndex,
    pub block: NodeIndex,
}

/// A compilation under construction.
pub struct Fixture {
    pub compilation: Compilation,
    pub global: SymbolId,
    pub int: SymbolId,
    pub object: SymbolId,
    pub string: SymbolId,
    pub unit_scope: ScopeId,
    next_tree: u32,
}

impl Fixture {
    pub fn new() -> Self {
        init();
        let mut compilation = Compilation::new();
        let global = compilation.symbols.global_namespace();
        let int = compilation.symbols.special_type(SpecialType::Int32);
        let object = compilation.symbols.special_type(SpecialType::Object);
        let string = compilation.symbols.special_type(SpecialType::String);
        let unit_scope = compilation
            .scopes
            .alloc(Scope::new(ScopeKind::CompilationUnit, ScopeId::NONE, global));
        Self {
            compilation,
            global,
            int,
            object,
            string,
            unit_scope,
            next_tree: 0,
        }
    }

    pub fn next_tree_id(&mut self) -> TreeId {
        let id = TreeId(self.next_tree);
        self.next_tree += 1;
        id
    }

    // =====================================================================
    // Symbols
    // =====================================================================

    pub fn class(&mut self, name: &str) -> SymbolId {
        let global = self.global;
        self.class_in(global, name)
    }

    pub fn class_in(&mut self, container: SymbolId, name: &str) -> SymbolId {
        let object = self.object;
        let mut symbol = Symbol::new(SymbolKind::NamedType, name).with_type_kind(TypeKind::Class);
        symbol.base_type = object;
        self.compilation.symbols.add_member(container, symbol)
    }

    pub fn derived_class(&mut self, name: &str, base: SymbolId) -> SymbolId {
        let id = self.class(name);
        self.symbol_mut(id).base_type = base;
        id
    }

    pub fn static_class(&mut self, name: &str) -> SymbolId {
        let id = self.class(name);
        self.symbol_mut(id).flags |= SymbolFlags::STATIC;
        id
    }

    pub fn namespace(&mut self, name: &str) -> SymbolId {
        let global = self.global;
        self.compilation
            .symbols
            .add_member(global, Symbol::new(SymbolKind::Namespace, name))
    }

    pub fn method(&mut self, ty: SymbolId, name: &str, ret: SymbolId) -> SymbolId {
        self.compilation
            .symbols
            .add_member(ty, Symbol::new(SymbolKind::Method, name).with_type(ret))
    }

    pub fn static_method(&mut self, ty: SymbolId, name: &str, ret: SymbolId) -> SymbolId {
        let id = self.method(ty, name, ret);
        self.symbol_mut(id).flags |= SymbolFlags::STATIC;
        id
    }

    pub fn constructor(&mut self, ty: SymbolId) -> SymbolId {
        self.compilation.symbols.add_member(
            ty,
            Symbol::new(SymbolKind::Method, ".ctor").with_method_kind(MethodKind::Constructor),
        )
    }

    pub fn field(&mut self, ty: SymbolId, name: &str, field_type: SymbolId) -> SymbolId {
        self.compilation
            .symbols
            .add_member(ty, Symbol::new(SymbolKind::Field, name).with_type(field_type))
    }

    pub fn indexer(&mut self, ty: SymbolId, value_type: SymbolId) -> SymbolId {
        self.compilation.symbols.add_member(
            ty,
            Symbol::new(SymbolKind::Property, "this[]")
                .with_type(value_type)
                .with_flags(SymbolFlags::INDEXER),
        )
    }

    pub fn parameter(&mut self, method: SymbolId, name: &str, ty: SymbolId) -> SymbolId {
        let id = self
            .compilation
            .symbols
            .add_owned(method, Symbol::new(SymbolKind::Parameter, name).with_type(ty));
        self.symbol_mut(method).parameters.push(id);
        id
    }

    pub fn type_parameter(&mut self, owner: SymbolId, name: &str) -> SymbolId {
        let id = self
            .compilation
            .symbols
            .add_owned(owner, Symbol::new(SymbolKind::TypeParameter, name));
        self.symbol_mut(owner).type_parameters.push(id);
        id
    }

    pub fn local(&mut self, owner: SymbolId, name: &str, ty: SymbolId) -> SymbolId {
        self.compilation
            .symbols
            .add_owned(owner, Symbol::new(SymbolKind::Local, name).with_type(ty))
    }

    pub fn alias(&mut self, name: &str, target: SymbolId) -> SymbolId {
        let mut alias = Symbol::new(SymbolKind::Alias, name);
        alias.alias_target = target;
        self.compilation.symbols.alloc(alias)
    }

    /// A classic extension method `static ret name(this receiver self)` in
    /// the static class `holder`.
    pub fn extension_method(&mut self, holder: SymbolId, name: &str, receiver: SymbolId, ret: SymbolId) -> SymbolId {
        let id = self.static_method(holder, name, ret);
        self.symbol_mut(id).flags |= SymbolFlags::EXTENSION_METHOD;
        self.parameter(id, "self", receiver);
        id
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        self.compilation.symbols.get_mut(id).expect("symbol exists")
    }

    // =====================================================================
    // Scopes, trees, and bound nodes
    // =====================================================================

    pub fn scope(&mut self, kind: ScopeKind, parent: ScopeId, container: SymbolId, flags: ScopeFlags) -> ScopeId {
        self.compilation
            .scopes
            .alloc(Scope::new(kind, parent, container).with_flags(flags))
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        self.compilation.scopes.get_mut(id).expect("scope exists")
    }

    /// Add `class <class> { void <method>() { <body> } }` as a new tree,
    /// with a type scope, a method scope, and a body block scope.
    pub fn program(&mut self, class: SymbolId, method: SymbolId, body: impl FnOnce(&mut TreeBuilder)) -> Layout {
        self.program_with(class, method, |_| {}, body)
    }

    /// Like [`Fixture::program`], with `parameters` written between the
    /// method's parentheses.
    pub fn program_with(
        &mut self,
        class: SymbolId,
        method: SymbolId,
        parameters: impl FnOnce(&mut TreeBuilder),
        body: impl FnOnce(&mut TreeBuilder),
    ) -> Layout {
        let id = self.next_tree_id();
        let class_name = self.compilation.symbols.name(class).to_string();
        let method_name = self.compilation.symbols.name(method).to_string();
        let mut method_decl = NodeIndex::NONE;
        let mut block = NodeIndex::NONE;

        let mut b = TreeBuilder::new(id);
        b.start_node(SyntaxKind::CompilationUnit);
        let class_decl = b.node(SyntaxKind::ClassDeclaration, |b| {
            b.token("class");
            b.token(&class_name);
            b.token("{");
            method_decl = b.node(SyntaxKind::MethodDeclaration, |b| {
                b.node(SyntaxKind::PredefinedType, |b| {
                    b.token("void");
                });
                b.token(&method_name);
                b.node(SyntaxKind::ParameterList, |b| {
                    b.token("(");
                    parameters(b);
                    b.token(")");
                });
                block = b.node(SyntaxKind::Block, |b| {
                    b.token("{");
                    body(b);
                    b.token("}");
                });
            });
            b.token("}");
        });
        let tree = b.finish();

        let is_static = self.compilation.symbols.get(method).is_some_and(|m| m.is_static());
        let unit = self.unit_scope;
        let type_scope = self.scope(ScopeKind::Type, unit, class, ScopeFlags::empty());
        let method_flags = if is_static {
            ScopeFlags::STATIC_CONTEXT
        } else {
            ScopeFlags::empty()
        };
        let method_scope = self.scope(ScopeKind::Method, type_scope, method, method_flags);
        let block_scope = self.scope(ScopeKind::Block, method_scope, method, ScopeFlags::IN_METHOD_BODY);

        let tree_id = self.compilation.add_tree(tree, unit);
        self.compilation.set_node_scope(tree_id, class_decl, type_scope);
        self.compilation.set_node_scope(tree_id, method_decl, method_scope);
        self.compilation.set_node_scope(tree_id, block, block_scope);
        self.compilation.record_declaration(tree_id, class_decl, class);
        self.compilation.record_declaration(tree_id, method_decl, method);
        Layout {
            tree: tree_id,
            class,
            method,
            type_scope,
            method_scope,
            block_scope,
            class_decl,
            method_decl,
            block,
        }
    }

    pub fn tree(&self, id: TreeId) -> &SyntaxTree {
        self.compilation.tree(id).expect("tree in compilation")
    }

    /// The first node of `kind` spelled `text` in tree `id`.
    pub fn find(&self, id: TreeId, kind: SyntaxKind, text: &str) -> NodeIndex {
        let node = self.tree(id).find_node(kind, text);
        assert!(node.is_some(), "no {kind:?} node `{text}`");
        node
    }

    /// Every node of `kind` in tree `id`, in arena order.
    pub fn nodes_of(&self, id: TreeId, kind: SyntaxKind) -> Vec<NodeIndex> {
        let tree = self.tree(id);
        (0..tree.len() as u32)
            .map(NodeIndex)
            .filter(|&n| tree.kind(n) == Some(kind))
            .collect()
    }

    pub fn first_of(&self, id: TreeId, kind: SyntaxKind) -> NodeIndex {
        let found = self.nodes_of(id, kind);
        *found.first().unwrap_or_else(|| panic!("no {kind:?} node"))
    }

    /// Start offset of the first node of `kind` spelled `text`.
    pub fn position_of(&self, id: TreeId, kind: SyntaxKind, text: &str) -> u32 {
        let node = self.find(id, kind, text);
        self.tree(id).span(node).start
    }

    pub fn bind(&mut self, tree: TreeId, node: BoundNode) -> BoundId {
        self.compilation
            .tree_data_mut(tree)
            .expect("tree in compilation")
            .bound
            .add(node)
    }

    pub fn model(&self, tree: TreeId) -> SemanticModel<'_> {
        SemanticModel::new(&self.compilation, tree).expect("tree in compilation")
    }
}

/// Tokens of a `name ( arg, ... )` invocation statement.
pub fn invocation(b: &mut TreeBuilder, callee: impl FnOnce(&mut TreeBuilder), args: &[&str]) -> NodeIndex {
    b.node(SyntaxKind::ExpressionStatement, |b| {
        b.node(SyntaxKind::Invocation, |b| {
            callee(b);
            argument_list(b, args);
        });
        b.token(";");
    })
}

pub fn argument_list(b: &mut TreeBuilder, args: &[&str]) {
    b.node(SyntaxKind::ArgumentList, |b| {
        b.token("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                b.token(",");
            }
            b.node(SyntaxKind::Argument, |b| {
                name(b, arg);
            });
        }
        b.token(")");
    });
}

pub fn name(b: &mut TreeBuilder, text: &str) -> NodeIndex {
    b.node(SyntaxKind::IdentifierName, |b| {
        b.token(text);
    })
}

/// `receiver.member`
pub fn member_access(b: &mut TreeBuilder, receiver: &str, member: &str) -> NodeIndex {
    b.node(SyntaxKind::SimpleMemberAccess, |b| {
        name(b, receiver);
        b.glue();
        b.token(".");
        b.glue();
        name(b, member);
    })
}

pub fn statement(b: &mut TreeBuilder, f: impl FnOnce(&mut TreeBuilder)) -> NodeIndex {
    b.node(SyntaxKind::ExpressionStatement, |b| {
        f(b);
        b.token(";");
    })
}

/// A foreign tree holding one expression statement.
pub fn foreign_tree(id: TreeId, f: impl FnOnce(&mut TreeBuilder)) -> SyntaxTree {
    let mut b = TreeBuilder::new(id);
    b.start_node(SyntaxKind::CompilationUnit);
    f(&mut b);
    b.finish()
}

// =========================================================================
// A toy binder
// =========================================================================

/// Binds a tiny expression language against the compilation: names through
/// the scope chain, integer literals, `+` on `int`, and `int x = ...;`
/// declarations. Crefs bind to the members of the containing type.
#[derive(Debug, Default)]
pub struct MiniBinder {
    /// Names of every local the binder declared, in order.
    pub declared_locals: Mutex<Vec<String>>,
}

impl MiniBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declared_locals(&self) -> Vec<String> {
        self.declared_locals.lock().expect("lock").clone()
    }
}

struct Run<'a, 'b> {
    cx: &'a SpeculativeContext<'b>,
    tree: &'a SyntaxTree,
    bound: BoundTree,
    locals: HashMap<String, (SymbolRef, SymbolId)>,
    binder: &'a MiniBinder,
}

impl Binder for MiniBinder {
    fn bind_speculative(&self, cx: &SpeculativeContext<'_>, tree: &SyntaxTree, node: NodeIndex) -> Option<BoundTree> {
        let mut run = Run {
            cx,
            tree,
            bound: BoundTree::new(),
            locals: HashMap::new(),
            binder: self,
        };
        run.bind(node);
        (!run.bound.is_empty()).then_some(run.bound)
    }

    fn bind_cref(&self, cx: &SpeculativeContext<'_>, tree: &SyntaxTree, cref: NodeIndex) -> Vec<SymbolRef> {
        let arena = &cx.compilation.symbols;
        let Some(name) = tree
            .child_nodes(cref)
            .find(|&c| tree.kind(c) == Some(SyntaxKind::IdentifierName))
        else {
            return Vec::new();
        };
        let text = tree.node_text(name);
        let ty = cx.compilation.scopes.containing_type(cx.scope);
        let members: Vec<SymbolId> = hierarchy::lookup_members(arena, ty, text).into_iter().collect();
        let Some(list) = tree
            .child_nodes(cref)
            .find(|&c| tree.kind(c) == Some(SyntaxKind::CrefParameterList))
        else {
            return members.into_iter().map(SymbolRef::Declared).collect();
        };
        let wanted: Vec<&str> = tree.child_nodes(list).map(|p| tree.node_text(p)).collect();
        let matching: Vec<SymbolId> = members
            .iter()
            .copied()
            .filter(|&m| {
                arena.get(m).is_some_and(|method| {
                    method.parameters.len() == wanted.len()
                        && method
                            .parameters
                            .iter()
                            .zip(&wanted)
                            .all(|(&p, &w)| arena.get(p).is_some_and(|p| arena.name(p.ty) == w))
                })
            })
            .collect();
        // No overload matches: every member is a candidate.
        let chosen = if matching.is_empty() { members } else { matching };
        chosen.into_iter().map(SymbolRef::Declared).collect()
    }
}

impl Run<'_, '_> {
    fn bind(&mut self, node: NodeIndex) -> Option<BoundId> {
        let tree = self.tree;
        let cx = self.cx;
        let arena = &cx.compilation.symbols;
        let int = arena.special_type(SpecialType::Int32);
        match tree.kind(node)? {
            SyntaxKind::IdentifierName => Some(self.bind_name(node)),
            SyntaxKind::PredefinedType => {
                let ty = match tree.node_text(node) {
                    "int" => int,
                    "string" => arena.special_type(SpecialType::String),
                    "object" => arena.special_type(SpecialType::Object),
                    _ => SymbolId::NONE,
                };
                Some(self.bound.add(
                    BoundNode::new(node, BoundKind::TypeExpression { ty, alias: SymbolId::NONE }).with_type(ty),
                ))
            }
            SyntaxKind::LiteralExpression => {
                let value: i64 = tree.node_text(node).parse().ok()?;
                Some(self.bound.add(
                    BoundNode::new(node, BoundKind::Literal)
                        .with_type(int)
                        .with_constant(ConstantValue::Int(value)),
                ))
            }
            SyntaxKind::ParenthesizedExpression => {
                let inner = tree.child_nodes(node).next()?;
                self.bind(inner)
            }
            SyntaxKind::BinaryExpression => self.bind_binary(node, int),
            SyntaxKind::VariableDeclarator => {
                let name = tree.node_text(tree.identifier_token(node)).to_string();
                if let Some(init) = tree.child_nodes(node).next() {
                    self.bind(init);
                }
                let ty = self.declared_type(node);
                let local = cx.locals.declare_local(&name, SymbolKind::Local, ty);
                self.binder.declared_locals.lock().expect("lock").push(name.clone());
                self.locals.insert(name, (local, ty));
                None
            }
            _ => {
                let mut last = None;
                let children: Vec<NodeIndex> = tree.child_nodes(node).collect();
                for child in children {
                    if let Some(id) = self.bind(child) {
                        last = Some(id);
                    }
                }
                last
            }
        }
    }

    /// Declared type of a local: the type child of its declaration statement.
    fn declared_type(&self, declarator: NodeIndex) -> SymbolId {
        let statement = self.tree.parent(declarator);
        let ty = sqe_syntax::facts::type_child(self.tree, statement);
        self.bound
            .lowest(ty)
            .map_or(SymbolId::NONE, |id| self.bound.type_of(id))
    }

    fn bind_name(&mut self, node: NodeIndex) -> BoundId {
        let cx = self.cx;
        let tree = self.tree;
        let arena = &cx.compilation.symbols;
        let text = tree.node_text(node);
        if let Some(&(local, ty)) = self.locals.get(text) {
            return self
                .bound
                .add(BoundNode::new(node, BoundKind::Local { local }).with_type(ty));
        }
        for (_, scope) in cx.compilation.scopes.chain(cx.scope) {
            if cx.mode == BindingMode::Expression {
                if let Some(&local) = scope.locals.get(text).and_then(|l| l.first()) {
                    let ty = arena.get(local).map_or(SymbolId::NONE, |s| s.ty);
                    let kind = match arena.kind(local) {
                        Some(SymbolKind::Parameter) => BoundKind::Parameter {
                            parameter: SymbolRef::Declared(local),
                        },
                        _ => BoundKind::Local {
                            local: SymbolRef::Declared(local),
                        },
                    };
                    return self.bound.add(BoundNode::new(node, kind).with_type(ty));
                }
            }
            let members: Vec<SymbolId> = if scope.is_type_scope() {
                hierarchy::lookup_members(arena, scope.container, text).into_iter().collect()
            } else if matches!(scope.kind, ScopeKind::CompilationUnit | ScopeKind::Namespace) {
                arena.members_named(scope.container, text).to_vec()
            } else {
                Vec::new()
            };
            let Some(&first) = members.first() else {
                continue;
            };
            let Some(symbol) = arena.get(first) else {
                continue;
            };
            return match symbol.kind {
                SymbolKind::NamedType => self.bound.add(
                    BoundNode::new(
                        node,
                        BoundKind::TypeExpression {
                            ty: first,
                            alias: SymbolId::NONE,
                        },
                    )
                    .with_type(first),
                ),
                SymbolKind::Method if cx.mode == BindingMode::Expression => self.bound.add(BoundNode::new(
                    node,
                    BoundKind::MethodGroup(MethodGroup {
                        receiver: None,
                        name: text.to_string(),
                        methods: members.iter().map(|&m| SymbolRef::Declared(m)).collect(),
                        type_arguments: Default::default(),
                        search_extensions: false,
                    }),
                )),
                SymbolKind::Field if cx.mode == BindingMode::Expression => self.bound.add(
                    BoundNode::new(
                        node,
                        BoundKind::FieldAccess {
                            receiver: None,
                            field: SymbolRef::Declared(first),
                        },
                    )
                    .with_type(symbol.ty),
                ),
                _ => continue,
            };
        }
        self.bound.add(
            BoundNode::new(
                node,
                BoundKind::BadExpression {
                    symbols: Vec::new(),
                    children: Vec::new(),
                },
            )
            .with_result_kind(sqe_symbols::ResultKind::Empty)
            .with_errors(),
        )
    }

    fn bind_binary(&mut self, node: NodeIndex, int: SymbolId) -> Option<BoundId> {
        let tree = self.tree;
        let operands: Vec<NodeIndex> = tree.child_nodes(node).collect();
        let [left, right] = operands.as_slice() else {
            return None;
        };
        let left = self.bind(*left)?;
        let right = self.bind(*right)?;
        let op = tree
            .children(node)
            .iter()
            .copied()
            .find(|&c| tree.kind(c) == Some(SyntaxKind::PunctuationToken))
            .map(|c| tree.node_text(c))?;
        let both_int = self.bound.type_of(left) == int && self.bound.type_of(right) == int;
        if op != "+" || !both_int {
            return Some(self.bound.add(
                BoundNode::new(
                    node,
                    BoundKind::BadExpression {
                        symbols: Vec::new(),
                        children: vec![left, right],
                    },
                )
                .with_result_kind(sqe_symbols::ResultKind::Empty)
                .with_errors(),
            ));
        }
        let constant = match (
            self.bound.get(left).and_then(|n| n.constant.clone()),
            self.bound.get(right).and_then(|n| n.constant.clone()),
        ) {
            (Some(ConstantValue::Int(a)), Some(ConstantValue::Int(b))) => Some(ConstantValue::Int(a + b)),
            _ => None,
        };
        let info = OperatorInfo::builtin(OperatorKind::Addition, int, int, int).with_operands(&[left, right]);
        let mut bound = BoundNode::new(node, BoundKind::BinaryOperator(info)).with_type(int);
        bound.constant = constant;
        Some(self.bound.add(bound))
    }
}
