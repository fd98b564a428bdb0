//! Tests for token finding and tree navigation.

use sqe_syntax::facts;
use sqe_syntax::{NodeIndex, SyntaxKind, SyntaxTree, TreeBuilder, TreeId};

/// `class C { int x ; }` with a leading comment.
fn class_tree() -> SyntaxTree {
    let mut b = TreeBuilder::new(TreeId(7));
    b.start_node(SyntaxKind::CompilationUnit);
    b.trivia("/* lead */ ");
    b.node(SyntaxKind::ClassDeclaration, |b| {
        b.token("class");
        b.token("C");
        b.token("{");
        b.node(SyntaxKind::FieldDeclaration, |b| {
            b.node(SyntaxKind::PredefinedType, |b| {
                b.token("int");
            });
            b.node(SyntaxKind::VariableDeclarator, |b| {
                b.token("x");
            });
            b.token(";");
        });
        b.token("}");
    });
    b.trivia("  ");
    b.finish()
}

#[test]
fn test_find_token_in_leading_trivia_returns_following_token() {
    let tree = class_tree();
    let token = tree.find_token(2);
    assert_eq!(tree.node_text(token), "class", "trivia belongs to the next token");
}

#[test]
fn test_find_token_at_end_is_eof() {
    let tree = class_tree();
    let end = tree.text().len() as u32;
    let token = tree.find_token(end);
    assert_eq!(tree.kind(token), Some(SyntaxKind::EndOfFileToken));
    assert!(tree.find_token(end + 1).is_none(), "past the end finds nothing");
}

#[test]
fn test_previous_token_skips_missing_tokens() {
    let mut b = TreeBuilder::new(TreeId(0));
    b.start_node(SyntaxKind::CompilationUnit);
    b.token("a");
    b.missing(SyntaxKind::PunctuationToken);
    let c = b.token("c");
    let tree = b.finish();
    let prev = tree.previous_token(c);
    assert_eq!(tree.node_text(prev), "a");
    let first = tree.tokens()[0];
    assert!(tree.previous_token(first).is_none());
}

#[test]
fn test_previous_token_of_a_node_is_none() {
    let tree = class_tree();
    let x = tree.find_node(SyntaxKind::VariableDeclarator, "x");
    let field = tree.ancestor_or_self_of_kind(x, SyntaxKind::FieldDeclaration);
    assert!(field.is_some());
    assert!(tree.previous_token(field).is_none());
    assert!(tree.previous_token(tree.root()).is_none());
    assert!(tree.previous_token(NodeIndex::NONE).is_none());
}

#[test]
fn test_ancestors_and_kinds() {
    let tree = class_tree();
    let x = tree.find_node(SyntaxKind::VariableDeclarator, "x");
    let kinds: Vec<_> = tree.ancestors(x).filter_map(|a| tree.kind(a)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::FieldDeclaration,
            SyntaxKind::ClassDeclaration,
            SyntaxKind::CompilationUnit
        ]
    );
    let class = tree.ancestor_or_self_of_kind(x, SyntaxKind::ClassDeclaration);
    assert!(tree.is_self_or_descendant_of(x, class));
    assert_eq!(tree.node_text(tree.identifier_token(class)), "C");
    assert_eq!(tree.node_text(facts::open_brace(&tree, class)), "{");
}

#[test]
fn test_field_type_is_type_only_context() {
    let tree = class_tree();
    let int = tree.find_node(SyntaxKind::PredefinedType, "int");
    assert!(facts::is_in_type_only_context(&tree, int));
    assert_eq!(facts::type_child(&tree, tree.parent(int)), int);
}

#[test]
fn test_empty_tree() {
    let tree = TreeBuilder::new(TreeId(3)).finish();
    assert_eq!(tree.text(), "");
    assert_eq!(tree.full_span(tree.root()).len(), 0);
    assert_eq!(tree.find_token(0), tree.end_of_file());
    assert_ne!(tree.root(), NodeIndex::NONE);
}
