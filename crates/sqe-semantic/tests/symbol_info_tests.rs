//! Symbol info queries over hand-bound trees.

mod support;

use sqe_bound::{BoundKind, BoundNode, Call, ConversionKind, MethodGroup};
use sqe_common::CancellationToken;
use sqe_semantic::{SemanticError, SemanticModel, SymbolData, SymbolInfoOptions};
use sqe_symbols::{ResultKind, SpecialType, Symbol, SymbolId, SymbolKind, SymbolRef};
use sqe_syntax::{NodeIndex, SyntaxKind, TreeId};
use support::{Fixture, MiniBinder, argument_list, cancel, declared, invocation, member_access, name, statement};

fn local(node: NodeIndex, symbol: SymbolId, ty: SymbolId) -> BoundNode {
    BoundNode::new(
        node,
        BoundKind::Local {
            local: SymbolRef::Declared(symbol),
        },
    )
    .with_type(ty)
}

fn type_expr(node: NodeIndex, ty: SymbolId, alias: SymbolId) -> BoundNode {
    BoundNode::new(node, BoundKind::TypeExpression { ty, alias }).with_type(ty)
}

#[test]
fn test_unique_type_name_is_viable() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let foo = f.class("Foo");
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "Foo");
        });
    });
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "Foo");
    f.bind(layout.tree, type_expr(node, foo, SymbolId::NONE));

    let model = f.model(layout.tree);
    let info = model.symbol_info(node, &cancel()).expect("symbol info");
    assert_eq!(info.symbol(), Some(SymbolRef::Declared(foo)));
    assert_eq!(info.result_kind(), ResultKind::Viable);
    assert!(info.candidate_symbols().is_empty());
    assert!(!info.is_dynamic());
}

#[test]
fn test_failed_call_with_argument_list_is_overload_failure() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let other = f.class("Other");
    let obj = f.field(c, "Obj", other);
    let candidates = [
        f.method(other, "M", f.int),
        f.method(other, "M", f.int),
        f.method(other, "M", f.int),
    ];
    let a = f.local(run, "a", f.string);
    let layout = f.program(c, run, |b| {
        invocation(
            b,
            |b| {
                member_access(b, "Obj", "M");
            },
            &["a"],
        );
    });
    let tree = layout.tree;
    let obj_node = f.find(tree, SyntaxKind::IdentifierName, "Obj");
    let access = f.first_of(tree, SyntaxKind::SimpleMemberAccess);
    let a_node = f.find(tree, SyntaxKind::IdentifierName, "a");
    let call_node = f.first_of(tree, SyntaxKind::Invocation);

    let receiver = f.bind(
        tree,
        BoundNode::new(
            obj_node,
            BoundKind::FieldAccess {
                receiver: None,
                field: SymbolRef::Declared(obj),
            },
        )
        .with_type(other),
    );
    f.bind(
        tree,
        BoundNode::new(
            access,
            BoundKind::MethodGroup(MethodGroup {
                receiver: Some(receiver),
                name: "M".to_string(),
                methods: declared(&candidates).into_iter().collect(),
                type_arguments: Default::default(),
                search_extensions: false,
            }),
        ),
    );
    let argument = f.bind(tree, local(a_node, a, f.string));
    f.bind(
        tree,
        BoundNode::new(
            call_node,
            BoundKind::Call(Call {
                receiver: Some(receiver),
                method: None,
                original_methods: Some(declared(&candidates)),
                arguments: vec![argument],
                invoked_as_extension: false,
            }),
        )
        .with_result_kind(ResultKind::Ambiguous)
        .with_errors(),
    );

    let model = f.model(tree);
    let info = model.symbol_info(call_node, &cancel()).expect("symbol info");
    assert_eq!(info.result_kind(), ResultKind::OverloadResolutionFailure);
    assert_eq!(info.candidate_symbols(), declared(&candidates).as_slice());
    assert_eq!(info.symbol(), None);

    // The invoked member access reports what the call concluded.
    let access_info = model.symbol_info(access, &cancel()).expect("symbol info");
    assert_eq!(access_info.result_kind(), ResultKind::OverloadResolutionFailure);
    assert_eq!(access_info.all_symbols(), declared(&candidates).as_slice());
    assert_eq!(
        model.member_group(access, &cancel()).expect("member group"),
        declared(&candidates)
    );
}

#[test]
fn test_unbound_expression_is_empty_not_no_information() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "missing");
        });
    });
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "missing");
    let model = f.model(layout.tree);

    let info = model.symbol_info(node, &cancel()).expect("symbol info");
    assert!(info.is_empty());
    assert_eq!(info.result_kind(), ResultKind::Empty);
    assert!(!info.is_no_information());
}

#[test]
fn test_non_expression_syntax_has_no_information() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "x");
        });
    });
    let model = f.model(layout.tree);
    let tree = model.tree();
    let semicolon = tree.child_token(f.first_of(layout.tree, SyntaxKind::ExpressionStatement), ";");

    for node in [layout.block, layout.method_decl, semicolon] {
        assert!(!model.can_get_semantic_info(node));
        let info = model.symbol_info(node, &cancel()).expect("symbol info");
        assert!(info.is_no_information(), "{:?} carries no symbols", tree.kind(node));
        assert_eq!(info.result_kind(), ResultKind::Empty);
        assert_eq!(model.type_info(node, &cancel()).expect("type info").ty, None);
    }
}

#[test]
fn test_caller_errors() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let layout = f.program(c, run, |_| {});
    let model = f.model(layout.tree);

    assert_eq!(
        model.symbol_info(NodeIndex(100_000), &cancel()),
        Err(SemanticError::NodeNotInTree)
    );
    assert!(matches!(
        SemanticModel::new(&f.compilation, TreeId(99)),
        Err(SemanticError::UnknownTree(99))
    ));

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    assert_eq!(
        model.symbol_info(layout.block, &cancelled),
        Err(SemanticError::Cancelled)
    );
}

#[test]
fn test_alias_resolution_follows_options() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let list = f.class("List");
    let alias = f.alias("L", list);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "L");
        });
    });
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "L");
    f.bind(layout.tree, type_expr(node, list, alias));
    let model = f.model(layout.tree);

    let resolved = model.symbol_info(node, &cancel()).expect("symbol info");
    assert_eq!(resolved.symbol(), Some(SymbolRef::Declared(list)));

    let raw = model
        .symbol_info_with_options(node, SymbolInfoOptions::empty(), &cancel())
        .expect("symbol info");
    assert_eq!(raw.symbol(), Some(SymbolRef::Declared(alias)));
    assert_eq!(model.alias_info(node, &cancel()).expect("alias info"), Some(alias));
}

#[test]
fn test_error_type_reports_its_candidates() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let ns_a = f.namespace("A");
    let ns_b = f.namespace("B");
    let first = f.class_in(ns_a, "Thing");
    let second = f.class_in(ns_b, "Thing");
    let mut error = Symbol::new(SymbolKind::ErrorType, "Thing");
    error.candidates.extend([first, second]);
    error.candidate_kind = ResultKind::Ambiguous;
    let error = f.compilation.symbols.alloc(error);

    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "Thing");
        });
    });
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "Thing");
    f.bind(layout.tree, type_expr(node, error, SymbolId::NONE));
    let model = f.model(layout.tree);

    let info = model.symbol_info(node, &cancel()).expect("symbol info");
    assert_eq!(info.result_kind(), ResultKind::Ambiguous);
    assert_eq!(info.candidate_symbols(), declared(&[first, second]).as_slice());
}

#[test]
fn test_degraded_kind_keeps_candidate() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let other = f.class("Other");
    let secret = f.field(other, "secret", f.int);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "secret");
        });
    });
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "secret");
    f.bind(
        layout.tree,
        BoundNode::new(
            node,
            BoundKind::FieldAccess {
                receiver: None,
                field: SymbolRef::Declared(secret),
            },
        )
        .with_type(f.int)
        .with_result_kind(ResultKind::Inaccessible),
    );
    let model = f.model(layout.tree);

    let info = model.symbol_info(node, &cancel()).expect("symbol info");
    assert_eq!(info.result_kind(), ResultKind::Inaccessible);
    assert_eq!(info.symbol(), None);
    assert_eq!(info.candidate_symbols(), &[SymbolRef::Declared(secret)]);
}

#[test]
fn test_implicit_conversion_keeps_operand_symbol() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let long = f.compilation.symbols.special_type(SpecialType::Int64);
    let x = f.local(run, "x", f.int);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "x");
        });
    });
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "x");
    let operand = f.bind(layout.tree, local(node, x, f.int));
    f.bind(
        layout.tree,
        BoundNode::new(
            node,
            BoundKind::Conversion {
                operand,
                conversion: ConversionKind::ImplicitNumeric,
                method: None,
                explicit: false,
            },
        )
        .with_type(long),
    );
    let model = f.model(layout.tree);

    let info = model.symbol_info(node, &cancel()).expect("symbol info");
    assert_eq!(info.symbol(), Some(SymbolRef::Declared(x)));
}

#[test]
fn test_user_defined_conversion_on_unsettled_operand() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let celsius = f.class("Celsius");
    let convert = f.static_method(celsius, "op_Implicit", f.int);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            name(b, "temperature");
        });
    });
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "temperature");
    let operand = f.bind(
        layout.tree,
        BoundNode::new(
            node,
            BoundKind::BadExpression {
                symbols: Vec::new(),
                children: Vec::new(),
            },
        )
        .with_result_kind(ResultKind::Empty),
    );
    f.bind(
        layout.tree,
        BoundNode::new(
            node,
            BoundKind::Conversion {
                operand,
                conversion: ConversionKind::UserDefined,
                method: Some(SymbolRef::Declared(convert)),
                explicit: false,
            },
        )
        .with_type(f.int),
    );
    let model = f.model(layout.tree);

    let info = model.symbol_info(node, &cancel()).expect("symbol info");
    assert_eq!(info.symbol(), Some(SymbolRef::Declared(convert)));
}

#[test]
fn test_parentheses_are_transparent() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let x = f.local(run, "x", f.int);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            b.node(SyntaxKind::ParenthesizedExpression, |b| {
                b.token("(");
                name(b, "x");
                b.token(")");
            });
        });
    });
    let node = f.find(layout.tree, SyntaxKind::IdentifierName, "x");
    let parens = f.first_of(layout.tree, SyntaxKind::ParenthesizedExpression);
    f.bind(layout.tree, local(node, x, f.int));
    let model = f.model(layout.tree);

    let inner = model.symbol_info(node, &cancel()).expect("symbol info");
    let outer = model.symbol_info(parens, &cancel()).expect("symbol info");
    assert_eq!(inner, outer);
    assert_eq!(outer.symbol(), Some(SymbolRef::Declared(x)));
}

#[test]
fn test_this_and_base_references() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            b.node(SyntaxKind::ThisExpression, |b| {
                b.token("this");
            });
        });
        statement(b, |b| {
            b.node(SyntaxKind::BaseExpression, |b| {
                b.token("base");
            });
        });
    });
    let this_node = f.first_of(layout.tree, SyntaxKind::ThisExpression);
    let base_node = f.first_of(layout.tree, SyntaxKind::BaseExpression);
    f.bind(
        layout.tree,
        BoundNode::new(
            this_node,
            BoundKind::ThisReference {
                member: run,
                is_base: false,
            },
        )
        .with_type(c),
    );
    f.bind(
        layout.tree,
        BoundNode::new(
            base_node,
            BoundKind::ThisReference {
                member: run,
                is_base: true,
            },
        )
        .with_type(f.object),
    );
    let model = f.model(layout.tree);

    let this_info = model.symbol_info(this_node, &cancel()).expect("symbol info");
    let this_param = this_info.symbol().expect("viable this");
    assert!(matches!(this_param, SymbolRef::Synthesized(_)));
    assert_eq!(model.display(this_param), "this: C");
    let again = model.symbol_info(this_node, &cancel()).expect("symbol info");
    assert_eq!(again.symbol(), Some(this_param), "synthesized symbols are interned");

    let base_info = model.symbol_info(base_node, &cancel()).expect("symbol info");
    assert_eq!(base_info.result_kind(), ResultKind::NotReferencable);
    assert_eq!(base_info.candidate_symbols(), &[this_param]);
}

#[test]
fn test_this_in_static_member() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let main = f.static_method(c, "Main", f.int);
    let layout = f.program(c, main, |b| {
        statement(b, |b| {
            b.node(SyntaxKind::ThisExpression, |b| {
                b.token("this");
            });
        });
    });
    let node = f.first_of(layout.tree, SyntaxKind::ThisExpression);
    f.bind(
        layout.tree,
        BoundNode::new(
            node,
            BoundKind::ThisReference {
                member: main,
                is_base: false,
            },
        )
        .with_type(c)
        .with_errors(),
    );
    let model = f.model(layout.tree);

    let info = model.symbol_info(node, &cancel()).expect("symbol info");
    assert_eq!(info.result_kind(), ResultKind::StaticInstanceMismatch);
    assert_eq!(info.candidate_symbols().len(), 1);
}

#[test]
fn test_object_creation_reports_type_on_name_and_constructor_on_creation() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let foo = f.class("Foo");
    let default_ctor = f.constructor(foo);
    let int_ctor = f.constructor(foo);
    f.parameter(int_ctor, "value", f.int);
    let hidden_ctor = f.constructor(foo);
    f.symbol_mut(hidden_ctor).accessibility = sqe_symbols::Accessibility::Private;

    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            b.node(SyntaxKind::ObjectCreation, |b| {
                b.token("new");
                name(b, "Foo");
                argument_list(b, &[]);
            });
        });
    });
    let tree = layout.tree;
    let type_name = f.find(tree, SyntaxKind::IdentifierName, "Foo");
    let creation = f.first_of(tree, SyntaxKind::ObjectCreation);
    f.bind(tree, type_expr(type_name, foo, SymbolId::NONE));
    f.bind(
        tree,
        BoundNode::new(
            creation,
            BoundKind::ObjectCreation {
                constructor: Some(SymbolRef::Declared(default_ctor)),
                constructors_group: declared(&[default_ctor, int_ctor, hidden_ctor]),
                arguments: Vec::new(),
            },
        )
        .with_type(foo),
    );
    let model = f.model(tree);

    let name_info = model.symbol_info(type_name, &cancel()).expect("symbol info");
    assert_eq!(name_info.symbol(), Some(SymbolRef::Declared(foo)));
    let creation_info = model.symbol_info(creation, &cancel()).expect("symbol info");
    assert_eq!(creation_info.symbol(), Some(SymbolRef::Declared(default_ctor)));
    assert_eq!(
        model.member_group(creation, &cancel()).expect("member group"),
        declared(&[default_ctor, int_ctor]),
        "inaccessible constructors are not in the group"
    );
}

#[test]
fn test_attribute_name_prefers_constructor() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let attr = f.class("ObsoleteAttribute");
    let ctor = f.constructor(attr);
    let layout = f.program(c, run, |b| {
        b.node(SyntaxKind::AttributeList, |b| {
            b.token("[");
            b.node(SyntaxKind::Attribute, |b| {
                name(b, "Obsolete");
            });
            b.token("]");
        });
    });
    let tree = layout.tree;
    let attr_name = f.find(tree, SyntaxKind::IdentifierName, "Obsolete");
    let attribute = f.first_of(tree, SyntaxKind::Attribute);
    f.bind(tree, type_expr(attr_name, attr, SymbolId::NONE));
    f.bind(
        tree,
        BoundNode::new(
            attribute,
            BoundKind::Attribute {
                constructor: Some(SymbolRef::Declared(ctor)),
                constructors_group: declared(&[ctor]),
            },
        )
        .with_type(attr),
    );
    let model = f.model(tree);

    let info = model.symbol_info(attr_name, &cancel()).expect("symbol info");
    assert_eq!(info.symbol(), Some(SymbolRef::Declared(ctor)));
    let as_type = model
        .symbol_info_with_options(attr_name, SymbolInfoOptions::PREFER_TYPE_TO_CONSTRUCTORS, &cancel())
        .expect("symbol info");
    assert_eq!(as_type.symbol(), Some(SymbolRef::Declared(attr)));
}

#[test]
fn test_dynamic_invocation_is_flagged() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let first = f.method(c, "Send", f.int);
    let second = f.method(c, "Send", f.int);
    let layout = f.program(c, run, |b| {
        invocation(
            b,
            |b| {
                name(b, "Send");
            },
            &["d"],
        );
    });
    let tree = layout.tree;
    let callee = f.find(tree, SyntaxKind::IdentifierName, "Send");
    let call = f.first_of(tree, SyntaxKind::Invocation);
    let group = f.bind(
        tree,
        BoundNode::new(
            callee,
            BoundKind::MethodGroup(MethodGroup {
                receiver: None,
                name: "Send".to_string(),
                methods: declared(&[first, second]).into_iter().collect(),
                type_arguments: Default::default(),
                search_extensions: false,
            }),
        ),
    );
    f.bind(
        tree,
        BoundNode::new(
            call,
            BoundKind::DynamicInvocation {
                expression: group,
                applicable_methods: declared(&[first, second]),
            },
        )
        .with_type(f.compilation.symbols.special_type(SpecialType::Dynamic)),
    );
    let model = f.model(tree);

    let info = model.symbol_info(call, &cancel()).expect("symbol info");
    assert!(info.is_dynamic());
    assert_eq!(info.result_kind(), ResultKind::OverloadResolutionFailure);
    assert_eq!(info.candidate_symbols(), declared(&[first, second]).as_slice());

    let callee_info = model.symbol_info(callee, &cancel()).expect("symbol info");
    assert!(callee_info.is_dynamic());
    assert_eq!(callee_info.all_symbols(), declared(&[first, second]).as_slice());
}

#[test]
fn test_named_argument_resolves_to_parameter() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let target = f.method(c, "Resize", f.int);
    let count = f.parameter(target, "count", f.int);
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            b.node(SyntaxKind::Invocation, |b| {
                name(b, "Resize");
                b.node(SyntaxKind::ArgumentList, |b| {
                    b.token("(");
                    b.node(SyntaxKind::Argument, |b| {
                        b.node(SyntaxKind::NameColon, |b| {
                            name(b, "count");
                            b.token(":");
                        });
                        b.node(SyntaxKind::LiteralExpression, |b| {
                            b.token("3");
                        });
                    });
                    b.token(")");
                });
            });
        });
    });
    let tree = layout.tree;
    let call = f.first_of(tree, SyntaxKind::Invocation);
    let arg_name = f.find(tree, SyntaxKind::IdentifierName, "count");
    f.bind(
        tree,
        BoundNode::new(
            call,
            BoundKind::Call(Call {
                receiver: None,
                method: Some(SymbolRef::Declared(target)),
                original_methods: None,
                arguments: Vec::new(),
                invoked_as_extension: false,
            }),
        )
        .with_type(f.int),
    );
    let model = f.model(tree);

    let info = model.symbol_info(arg_name, &cancel()).expect("symbol info");
    assert_eq!(info.symbol(), Some(SymbolRef::Declared(count)));
    let direct = model
        .named_argument_symbol_info(arg_name, &cancel())
        .expect("named argument");
    assert_eq!(direct, info);
}

#[test]
fn test_cref_classification() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let long = f.compilation.symbols.special_type(SpecialType::Int64);
    let m_int = f.method(c, "M", f.int);
    f.parameter(m_int, "value", f.int);
    let m_long = f.method(c, "M", f.int);
    f.parameter(m_long, "value", long);

    let cref = |b: &mut sqe_syntax::TreeBuilder, parameter: Option<&str>| {
        b.node(SyntaxKind::NameMemberCref, |b| {
            name(b, "M");
            if let Some(parameter) = parameter {
                b.node(SyntaxKind::CrefParameterList, |b| {
                    b.token("(");
                    b.node(SyntaxKind::PredefinedType, |b| {
                        b.token(parameter);
                    });
                    b.token(")");
                });
            }
        });
    };
    let layout = f.program(c, run, |b| {
        b.node(SyntaxKind::DocumentationComment, |b| {
            cref(b, Some("int"));
            cref(b, None);
            cref(b, Some("string"));
        });
    });
    let crefs = f.nodes_of(layout.tree, SyntaxKind::NameMemberCref);
    let binder = MiniBinder::new();
    let model = f.model(layout.tree).with_binder(&binder);

    let exact = model.symbol_info(crefs[0], &cancel()).expect("cref");
    assert_eq!(exact.symbol(), Some(SymbolRef::Declared(m_int)));

    let bare = model.symbol_info(crefs[1], &cancel()).expect("cref");
    assert_eq!(bare.result_kind(), ResultKind::Ambiguous);
    assert_eq!(bare.candidate_symbols(), declared(&[m_int, m_long]).as_slice());

    let mismatched = model.symbol_info(crefs[2], &cancel()).expect("cref");
    assert_eq!(mismatched.result_kind(), ResultKind::OverloadResolutionFailure);

    // Without a binder a cref binds to nothing.
    let unbound = f.model(layout.tree);
    assert!(unbound.symbol_info(crefs[0], &cancel()).expect("cref").is_empty());
}

#[test]
fn test_symbol_data_resolves_declared_symbols() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let x = f.local(run, "x", f.int);
    let layout = f.program(c, run, |_| {});
    let model = f.model(layout.tree);

    match model.symbol_data(SymbolRef::Declared(x)) {
        Some(SymbolData::Declared(symbol)) => {
            assert_eq!(symbol.name, "x");
            assert_eq!(symbol.kind, SymbolKind::Local);
        }
        other => panic!("expected declared symbol, got {other:?}"),
    }
    assert_eq!(model.display(SymbolRef::Declared(run)), "C.Run");
}

#[test]
fn test_collection_initializer_elements_report_their_add_method() {
    let mut f = Fixture::new();
    let c = f.class("C");
    let run = f.method(c, "Run", f.int);
    let list = f.class("List");
    let add_one = f.method(list, "Add", f.int);
    let add_two = f.method(list, "Add", f.int);
    f.parameter(add_one, "item", f.int);
    f.parameter(add_two, "key", f.int);
    f.parameter(add_two, "value", f.int);
    // new List { 1, { 2, 3 } }
    let mut creation = NodeIndex::NONE;
    let mut one = NodeIndex::NONE;
    let mut pair = NodeIndex::NONE;
    let mut two = NodeIndex::NONE;
    let layout = f.program(c, run, |b| {
        statement(b, |b| {
            creation = b.node(SyntaxKind::ObjectCreation, |b| {
                b.token("new");
                name(b, "List");
                b.node(SyntaxKind::CollectionInitializer, |b| {
                    b.token("{");
                    one = b.node(SyntaxKind::LiteralExpression, |b| {
                        b.token("1");
                    });
                    b.token(",");
                    pair = b.node(SyntaxKind::ComplexElementInitializer, |b| {
                        b.token("{");
                        two = b.node(SyntaxKind::LiteralExpression, |b| {
                            b.token("2");
                        });
                        b.token(",");
                        b.node(SyntaxKind::LiteralExpression, |b| {
                            b.token("3");
                        });
                        b.token("}");
                    });
                    b.token("}");
                });
            });
        });
    });
    let int = f.int;
    let literal = f.bind(layout.tree, BoundNode::new(one, BoundKind::Literal).with_type(int));
    let add_call = |node, method: Option<SymbolId>, originals: Option<&[SymbolId]>, arguments| {
        BoundNode::new(
            node,
            BoundKind::CollectionElementInitializer(Call {
                receiver: None,
                method: method.map(SymbolRef::Declared),
                original_methods: originals.map(declared),
                arguments,
                invoked_as_extension: false,
            }),
        )
    };
    f.bind(layout.tree, add_call(one, Some(add_one), None, vec![literal]));
    f.bind(
        layout.tree,
        add_call(pair, None, Some(&[add_one, add_two][..]), Vec::new())
            .with_result_kind(ResultKind::OverloadResolutionFailure)
            .with_errors(),
    );
    let model = f.model(layout.tree);

    let single = model
        .collection_initializer_symbol_info(one, &cancel())
        .expect("initializer info");
    assert_eq!(single.symbol(), Some(SymbolRef::Declared(add_one)));
    assert_eq!(single.result_kind(), ResultKind::Viable);

    // The element itself still means the literal.
    assert!(model.symbol_info(one, &cancel()).expect("symbol info").is_empty());
    assert_eq!(model.type_info(one, &cancel()).expect("type info").ty, Some(int));

    let failed = model
        .collection_initializer_symbol_info(pair, &cancel())
        .expect("initializer info");
    assert_eq!(failed.result_kind(), ResultKind::OverloadResolutionFailure);
    assert_eq!(failed.candidate_symbols(), declared(&[add_one, add_two]).as_slice());

    assert!(
        model
            .collection_initializer_symbol_info(two, &cancel())
            .expect("initializer info")
            .is_no_information(),
        "parts of a complex element are not elements"
    );
    assert!(
        model
            .collection_initializer_symbol_info(creation, &cancel())
            .expect("initializer info")
            .is_no_information()
    );
}
