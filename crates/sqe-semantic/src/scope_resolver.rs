//! Scope resolution: from a normalized position to the binder chain
//! active there, plus the syntactic context lookups need.

use sqe_bound::{ScopeFlags, ScopeId, TreeData};
use sqe_symbols::{AccessContext, SymbolId};
use sqe_syntax::{NodeIndex, SyntaxKind, facts};
use tracing::trace;

use crate::error::Result;
use crate::model::SemanticModel;
use crate::position::NormalizedPosition;

/// The scope at a position and the syntactic facts about it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScopeContext {
    pub scope: ScopeId,
    pub token: NodeIndex,
    pub position: u32,
    /// Union of the flags of the scope chain.
    pub flags: ScopeFlags,
    pub in_typeof: bool,
    pub in_cref: bool,
    pub in_nameof: bool,
    /// The token's name sits where only a type may appear.
    pub type_only: bool,
    pub in_xml_name: bool,
    /// The token's parent is expression syntax.
    pub in_expression: bool,
}

impl ScopeContext {
    #[inline]
    pub fn in_method_body(&self) -> bool {
        self.flags.contains(ScopeFlags::IN_METHOD_BODY)
    }
}

impl SemanticModel<'_> {
    /// Normalize `position` and resolve its scope.
    pub(crate) fn scope_context_at(&self, position: u32) -> Result<ScopeContext> {
        let at = self.normalize_position(position)?;
        Ok(self.resolve_scope(at))
    }

    /// Scope context at the start of `node`.
    pub(crate) fn scope_of_node(&self, node: NodeIndex) -> ScopeContext {
        let mut token = self.tree.first_token(node);
        if token.is_none() {
            token = self.tree.find_token(self.tree.span(node).start);
        }
        self.resolve_scope(NormalizedPosition {
            position: self.tree.span(node).start,
            token,
        })
    }

    pub(crate) fn resolve_scope(&self, at: NormalizedPosition) -> ScopeContext {
        let scope = match (self.speculative, self.data) {
            (Some(origin), _) => origin.scope,
            (None, Some(data)) => self.scope_in_tree(data, at),
            (None, None) => ScopeId::NONE,
        };
        let flags = self.compilation.scopes.chain_flags(scope);
        let tree = self.tree;
        let token = at.token;
        let parent = tree.parent(token);
        let in_typeof = token.is_some() && tree.ancestors(token).any(|a| tree.kind(a) == Some(SyntaxKind::TypeOfExpression));
        let in_cref = flags.contains(ScopeFlags::IN_CREF)
            || (token.is_some() && tree.ancestors(token).any(|a| tree.kind(a).is_some_and(SyntaxKind::is_cref)));
        let in_nameof = flags.contains(ScopeFlags::INSIDE_NAMEOF) || (token.is_some() && facts::is_inside_nameof(tree, token));
        let parent_kind = tree.kind(parent);
        let cx = ScopeContext {
            scope,
            token,
            position: at.position,
            flags,
            in_typeof,
            in_cref,
            in_nameof,
            type_only: parent_kind.is_some_and(SyntaxKind::is_name) && facts::is_in_type_only_context(tree, parent),
            in_xml_name: token.is_some() && facts::is_in_xml_name_attribute(tree, token),
            in_expression: parent_kind.is_some_and(SyntaxKind::is_expression),
        };
        trace!(position = at.position, scope = scope.0, ?flags, "resolved scope");
        cx
    }

    /// The scope of the innermost scope-introducing ancestor of the token.
    ///
    /// A position inside a declaration's attribute list binds in the
    /// scope outside that declaration.
    fn scope_in_tree(&self, data: &TreeData, at: NormalizedPosition) -> ScopeId {
        if at.token.is_none() {
            return data.root_scope;
        }
        for node in std::iter::once(at.token).chain(self.tree.ancestors(at.token)) {
            let Some(&scope) = data.node_scopes.get(&node) else {
                continue;
            };
            if self.in_attribute_list_of(node, at.position) {
                continue;
            }
            return scope;
        }
        data.root_scope
    }

    fn in_attribute_list_of(&self, node: NodeIndex, position: u32) -> bool {
        self.tree.child_nodes(node).any(|child| {
            self.tree.kind(child) == Some(SyntaxKind::AttributeList) && self.tree.span(child).contains(position)
        })
    }

    pub(crate) fn access_context(&self, cx: &ScopeContext) -> AccessContext {
        AccessContext::new(self.compilation.scopes.containing_type(cx.scope))
            .with_base_access(cx.flags.contains(ScopeFlags::BASE_ACCESS))
    }

    pub(crate) fn is_accessible_from(&self, cx: &ScopeContext, symbol: SymbolId, through_type: SymbolId) -> bool {
        self.options.ignore_accessibility
            || self
                .access_context(cx)
                .is_accessible(&self.compilation.symbols, symbol, through_type)
    }
}
