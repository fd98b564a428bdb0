//! Syntactic facts the semantic layer asks about a node's surroundings.
//!
//! All functions here look only at the tree; none of them bind anything.

use crate::kind::SyntaxKind;
use crate::tree::{NodeIndex, SyntaxTree};

/// The type child of a declaration-like node: the first child node that is
/// name syntax. Modifiers and declared identifiers are tokens, so the first
/// name child of a parameter, local, field, property, method, cast, or
/// object creation is its type.
#[must_use]
pub fn type_child(tree: &SyntaxTree, node: NodeIndex) -> NodeIndex {
    tree.child_nodes(node)
        .find(|&c| tree.kind(c).is_some_and(SyntaxKind::is_name))
        .unwrap_or(NodeIndex::NONE)
}

/// Climb from a name to the outermost enclosing qualified name.
#[must_use]
pub fn outermost_qualified_name(tree: &SyntaxTree, node: NodeIndex) -> NodeIndex {
    let mut current = node;
    for parent in tree.ancestors(node) {
        if tree.kind(parent) == Some(SyntaxKind::QualifiedName) {
            current = parent;
        } else {
            break;
        }
    }
    current
}

/// True if `node` sits where only a type (never a value) may appear:
/// a type argument, a base list entry, a `typeof` operand, or the declared
/// type of a parameter, local, field, property, method, cast, or creation.
#[must_use]
pub fn is_in_type_only_context(tree: &SyntaxTree, node: NodeIndex) -> bool {
    let name = outermost_qualified_name(tree, node);
    let parent = tree.parent(name);
    match tree.kind(parent) {
        Some(
            SyntaxKind::TypeArgumentList
            | SyntaxKind::BaseList
            | SyntaxKind::TypeOfExpression
            | SyntaxKind::TypeParameter,
        ) => true,
        Some(
            SyntaxKind::Parameter
            | SyntaxKind::LocalDeclarationStatement
            | SyntaxKind::FieldDeclaration
            | SyntaxKind::EventFieldDeclaration
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::IndexerDeclaration
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::OperatorDeclaration
            | SyntaxKind::CastExpression
            | SyntaxKind::ObjectCreation
            | SyntaxKind::CatchClause,
        ) => type_child(tree, parent) == name,
        _ => false,
    }
}

/// True if `node` is inside the `name` attribute of a documentation
/// `<param name="..."/>`-style element.
#[must_use]
pub fn is_in_xml_name_attribute(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.ancestor_or_self_of_kind(node, SyntaxKind::XmlNameAttribute).is_some()
}

/// True if `node` is inside a documentation comment other than a cref or
/// name attribute (structured trivia with no semantic meaning).
#[must_use]
pub fn is_in_plain_documentation(tree: &SyntaxTree, node: NodeIndex) -> bool {
    let mut in_doc = false;
    for a in std::iter::once(node).chain(tree.ancestors(node)) {
        match tree.kind(a) {
            Some(k) if k.is_cref() || k == SyntaxKind::XmlNameAttribute => return false,
            Some(SyntaxKind::DocumentationComment) => in_doc = true,
            _ => {}
        }
    }
    in_doc
}

/// True if `invocation` is a `nameof(...)` invocation.
#[must_use]
pub fn is_nameof_invocation(tree: &SyntaxTree, invocation: NodeIndex) -> bool {
    if tree.kind(invocation) != Some(SyntaxKind::Invocation) {
        return false;
    }
    let callee = invoked_expression(tree, invocation);
    tree.kind(callee) == Some(SyntaxKind::IdentifierName) && tree.node_text(callee) == "nameof"
}

/// True if `node` is inside the argument list of a `nameof(...)` invocation.
#[must_use]
pub fn is_inside_nameof(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.ancestors(node).any(|a| {
        tree.kind(a) == Some(SyntaxKind::ArgumentList) && is_nameof_invocation(tree, tree.parent(a))
    })
}

/// The expression being invoked (or indexed) by an invocation / element access.
#[must_use]
pub fn invoked_expression(tree: &SyntaxTree, node: NodeIndex) -> NodeIndex {
    match tree.kind(node) {
        Some(SyntaxKind::Invocation | SyntaxKind::ElementAccess) => {
            tree.child_nodes(node).next().unwrap_or(NodeIndex::NONE)
        }
        _ => NodeIndex::NONE,
    }
}

/// True if an invocation, element access, or object creation has an argument list.
#[must_use]
pub fn has_argument_list(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.child_nodes(node).any(|c| {
        matches!(
            tree.kind(c),
            Some(SyntaxKind::ArgumentList | SyntaxKind::BracketedArgumentList)
        )
    })
}

/// True if a cref has an explicit parameter list (`M(int)`).
#[must_use]
pub fn cref_has_parameter_list(tree: &SyntaxTree, cref: NodeIndex) -> bool {
    let mut current = cref;
    while tree.kind(current) == Some(SyntaxKind::QualifiedCref) {
        match tree.child_nodes(current).last() {
            Some(member) => current = member,
            None => return false,
        }
    }
    tree.child_nodes(current)
        .any(|c| tree.kind(c) == Some(SyntaxKind::CrefParameterList))
}

/// True if `node` is the name in a named argument (`f(name: value)`).
#[must_use]
pub fn is_named_argument_name(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.kind(node) == Some(SyntaxKind::IdentifierName)
        && tree.kind(tree.parent(node)) == Some(SyntaxKind::NameColon)
        && tree.kind(tree.parent(tree.parent(node))) == Some(SyntaxKind::Argument)
}

/// True if `node` is the alias name of `using A = ...;`.
#[must_use]
pub fn is_using_alias_name(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.kind(node) == Some(SyntaxKind::IdentifierName)
        && tree.kind(tree.parent(node)) == Some(SyntaxKind::NameEquals)
        && tree.kind(tree.parent(tree.parent(node))) == Some(SyntaxKind::UsingDirective)
}

/// Walk up through parentheses: the outermost `((node))`.
#[must_use]
pub fn walk_up_parentheses(tree: &SyntaxTree, node: NodeIndex) -> NodeIndex {
    let mut current = node;
    for parent in tree.ancestors(node) {
        if tree.kind(parent) == Some(SyntaxKind::ParenthesizedExpression) {
            current = parent;
        } else {
            break;
        }
    }
    current
}

/// Strip parentheses downward: the innermost expression of `((node))`.
#[must_use]
pub fn skip_parentheses(tree: &SyntaxTree, node: NodeIndex) -> NodeIndex {
    let mut current = node;
    while tree.kind(current) == Some(SyntaxKind::ParenthesizedExpression) {
        match tree.child_nodes(current).next() {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// The opening `{` of a type declaration, if present.
#[must_use]
pub fn open_brace(tree: &SyntaxTree, decl: NodeIndex) -> NodeIndex {
    tree.child_token(decl, "{")
}
