//! Syntax kinds for tokens and nodes.

use serde::{Deserialize, Serialize};

/// Kind of a syntax node or token.
///
/// Tokens are the leaves of the tree (`*Token` variants); every other kind
/// is an interior node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    // Tokens
    IdentifierToken,
    KeywordToken,
    NumericLiteralToken,
    StringLiteralToken,
    PunctuationToken,
    EndOfFileToken,

    // Declarations
    CompilationUnit,
    UsingDirective,
    NameEquals,
    NamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    ExtensionBlock,
    BaseList,
    MethodDeclaration,
    ConstructorDeclaration,
    OperatorDeclaration,
    PropertyDeclaration,
    IndexerDeclaration,
    FieldDeclaration,
    EventFieldDeclaration,
    ParameterList,
    Parameter,
    TypeParameterList,
    TypeParameter,
    AttributeList,
    Attribute,

    // Statements
    Block,
    LocalDeclarationStatement,
    VariableDeclarator,
    ExpressionStatement,
    ReturnStatement,
    LabeledStatement,
    GotoStatement,
    TryStatement,
    CatchClause,

    // Queries
    QueryExpression,
    FromClause,
    WhereClause,
    SelectClause,

    // Names and types
    IdentifierName,
    GenericName,
    QualifiedName,
    PredefinedType,
    TypeArgumentList,
    OmittedTypeArgument,

    // Expressions
    SimpleMemberAccess,
    Invocation,
    ArgumentList,
    Argument,
    NameColon,
    ElementAccess,
    BracketedArgumentList,
    ObjectCreation,
    BinaryExpression,
    PrefixUnary,
    PostfixUnary,
    SimpleAssignment,
    CompoundAssignment,
    ParenthesizedExpression,
    LiteralExpression,
    ThisExpression,
    BaseExpression,
    CastExpression,
    ConditionalExpression,
    TypeOfExpression,
    LambdaExpression,
    IsPatternExpression,
    RecursivePattern,
    Subpattern,
    CollectionInitializer,
    ObjectInitializer,
    ComplexElementInitializer,
    CollectionExpression,
    TupleExpression,
    RefExpression,

    // Documentation comments
    DocumentationComment,
    NameMemberCref,
    QualifiedCref,
    CrefParameterList,
    XmlNameAttribute,
}

/// Reserved words recognised by [`SyntaxKind::classify_token`].
const KEYWORDS: &[&str] = &[
    "abstract", "base", "bool", "catch", "class", "dynamic", "else", "event", "extension",
    "false", "from", "goto", "if", "interface", "internal", "int", "is", "namespace", "new",
    "null", "object", "operator", "override", "private", "protected", "public", "return",
    "sealed", "select", "static", "string", "struct", "this", "true", "try", "typeof", "using",
    "var", "virtual", "void", "where",
];

impl SyntaxKind {
    /// Classify raw token text the way the scanner would.
    #[must_use]
    pub fn classify_token(text: &str) -> SyntaxKind {
        let Some(first) = text.chars().next() else {
            return SyntaxKind::PunctuationToken;
        };
        if first.is_ascii_digit() {
            SyntaxKind::NumericLiteralToken
        } else if first == '"' {
            SyntaxKind::StringLiteralToken
        } else if first == '_' || first.is_alphabetic() || first == '@' {
            if KEYWORDS.contains(&text) {
                SyntaxKind::KeywordToken
            } else {
                SyntaxKind::IdentifierToken
            }
        } else {
            SyntaxKind::PunctuationToken
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierToken
                | SyntaxKind::KeywordToken
                | SyntaxKind::NumericLiteralToken
                | SyntaxKind::StringLiteralToken
                | SyntaxKind::PunctuationToken
                | SyntaxKind::EndOfFileToken
        )
    }

    #[must_use]
    pub const fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::ExtensionBlock
        )
    }

    /// Members whose bodies introduce a method-body scope.
    #[must_use]
    pub const fn is_method_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration
                | SyntaxKind::OperatorDeclaration
        )
    }

    /// Name syntax: anything that may denote a type, namespace, or value by name.
    #[must_use]
    pub const fn is_name(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::QualifiedName
                | SyntaxKind::PredefinedType
        )
    }

    #[must_use]
    pub const fn is_cref(self) -> bool {
        matches!(self, SyntaxKind::NameMemberCref | SyntaxKind::QualifiedCref)
    }

    /// Expression syntax (including names, which are expressions in value
    /// position).
    #[must_use]
    pub const fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::QualifiedName
                | SyntaxKind::PredefinedType
                | SyntaxKind::OmittedTypeArgument
                | SyntaxKind::SimpleMemberAccess
                | SyntaxKind::Invocation
                | SyntaxKind::ElementAccess
                | SyntaxKind::ObjectCreation
                | SyntaxKind::BinaryExpression
                | SyntaxKind::PrefixUnary
                | SyntaxKind::PostfixUnary
                | SyntaxKind::SimpleAssignment
                | SyntaxKind::CompoundAssignment
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::LiteralExpression
                | SyntaxKind::ThisExpression
                | SyntaxKind::BaseExpression
                | SyntaxKind::CastExpression
                | SyntaxKind::ConditionalExpression
                | SyntaxKind::TypeOfExpression
                | SyntaxKind::LambdaExpression
                | SyntaxKind::IsPatternExpression
                | SyntaxKind::CollectionInitializer
                | SyntaxKind::ObjectInitializer
                | SyntaxKind::ComplexElementInitializer
                | SyntaxKind::CollectionExpression
                | SyntaxKind::TupleExpression
                | SyntaxKind::RefExpression
                | SyntaxKind::QueryExpression
        )
    }

    /// Query clauses carry symbols of their own (the query operator method).
    #[must_use]
    pub const fn is_query_clause(self) -> bool {
        matches!(
            self,
            SyntaxKind::FromClause | SyntaxKind::WhereClause | SyntaxKind::SelectClause
        )
    }
}
