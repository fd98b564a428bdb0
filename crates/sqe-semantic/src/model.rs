//! The semantic model: the public query surface over one syntax tree.
//!
//! A `SemanticModel` borrows an immutable [`Compilation`] and answers
//! symbol, type, member-group, and lookup queries for one of its trees. It
//! never writes to the compilation. Symbols it has to invent (built-in
//! operators, reduced extension methods, `this` parameters) live in a store
//! owned by the model and shared with the speculative models it creates, so
//! equal entities compare equal across all of them. Locals declared by
//! speculative syntax belong to the speculative model alone.

use std::borrow::Cow;
use std::sync::Arc;

use sqe_bound::{
    Binder, BindingMode, BoundKind, BoundTree, Compilation, ConstantValue, ScopeId, TreeData,
};
use sqe_common::CancellationToken;
use sqe_symbols::{Symbol, SymbolId, SymbolRef, SynthId};
use sqe_syntax::{NodeIndex, SyntaxKind, SyntaxTree, TreeId, facts};
use tracing::{debug, debug_span};

use crate::error::{Result, SemanticError};
use crate::info::{QueryClauseInfo, SymbolInfo, TypeInfo};
use crate::options::{LookupOptions, SemanticModelOptions, SymbolInfoOptions};
use crate::position::{NormalizedPosition, normalize_position};
use crate::synthesized::{SpeculativeLocals, SynthesizedStore, SynthesizedSymbol};

/// Where a speculative model was created from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeculativeOrigin {
    /// Adjusted position in the original tree.
    pub position: u32,
    /// Scope at that position.
    pub scope: ScopeId,
}

/// A symbol answer resolved to its record.
#[derive(Clone, Debug)]
pub enum SymbolData<'a> {
    Declared(&'a Symbol),
    Synthesized(Arc<SynthesizedSymbol>),
}

impl SymbolData<'_> {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SymbolData::Declared(symbol) => &symbol.name,
            SymbolData::Synthesized(symbol) => &symbol.name,
        }
    }
}

pub struct SemanticModel<'c> {
    pub(crate) compilation: &'c Compilation,
    pub(crate) tree: &'c SyntaxTree,
    pub(crate) bound: Cow<'c, BoundTree>,
    /// Binding results of the tree; `None` for speculative trees.
    pub(crate) data: Option<&'c TreeData>,
    pub(crate) binder: Option<&'c dyn Binder>,
    pub(crate) options: SemanticModelOptions,
    pub(crate) synthesized: Arc<SynthesizedStore>,
    /// Locals the binder declared for a speculative tree.
    pub(crate) locals: SpeculativeLocals,
    pub(crate) speculative: Option<SpeculativeOrigin>,
}

impl<'c> SemanticModel<'c> {
    /// Create a model for a tree of the compilation.
    pub fn new(compilation: &'c Compilation, tree: TreeId) -> Result<Self> {
        let data = compilation
            .tree_data(tree)
            .ok_or(SemanticError::UnknownTree(tree.0))?;
        debug!(tree = tree.0, bound_nodes = data.bound.len(), "created semantic model");
        Ok(Self {
            compilation,
            tree: &data.tree,
            bound: Cow::Borrowed(&data.bound),
            data: Some(data),
            binder: None,
            options: SemanticModelOptions::default(),
            synthesized: Arc::new(SynthesizedStore::new()),
            locals: SpeculativeLocals::new(),
            speculative: None,
        })
    }

    /// Attach the binder used for speculative queries and crefs.
    #[must_use]
    pub fn with_binder(mut self, binder: &'c dyn Binder) -> Self {
        self.binder = Some(binder);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: SemanticModelOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    #[must_use]
    pub fn compilation(&self) -> &'c Compilation {
        self.compilation
    }

    #[inline]
    #[must_use]
    pub fn tree(&self) -> &'c SyntaxTree {
        self.tree
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &SemanticModelOptions {
        &self.options
    }

    #[inline]
    #[must_use]
    pub fn is_speculative(&self) -> bool {
        self.speculative.is_some()
    }

    #[inline]
    #[must_use]
    pub fn speculative_origin(&self) -> Option<SpeculativeOrigin> {
        self.speculative
    }

    /// The engine-wide store of interned synthesized symbols.
    #[inline]
    #[must_use]
    pub fn synthesized_store(&self) -> &SynthesizedStore {
        &self.synthesized
    }

    /// Resolve a symbol answer to its record.
    #[must_use]
    pub fn symbol_data(&self, symbol: SymbolRef) -> Option<SymbolData<'c>> {
        match symbol {
            SymbolRef::Declared(id) => self.compilation.symbols.get(id).map(SymbolData::Declared),
            SymbolRef::Synthesized(id) => self.synthesized_symbol(id).map(SymbolData::Synthesized),
        }
    }

    pub(crate) fn synthesized_symbol(&self, id: SynthId) -> Option<Arc<SynthesizedSymbol>> {
        if SpeculativeLocals::is_local_id(id) {
            self.locals.get(id)
        } else {
            self.synthesized.get(id)
        }
    }

    /// Display form of a symbol answer: the qualified name of declared
    /// symbols, the signature of synthesized ones.
    #[must_use]
    pub fn display(&self, symbol: SymbolRef) -> String {
        match symbol {
            SymbolRef::Declared(id) => self.compilation.symbols.qualified_name(id),
            SymbolRef::Synthesized(id) => self.synthesized_symbol(id).map_or_else(String::new, |s| {
                s.display(&self.compilation.symbols, self.synthesized.operator(id))
            }),
        }
    }

    /// Normalize a position against the tree root.
    pub fn normalize_position(&self, position: u32) -> Result<NormalizedPosition> {
        normalize_position(self.tree, self.tree.root(), position)
    }

    pub(crate) fn check_node(&self, node: NodeIndex) -> Result<()> {
        if self.tree.contains_node(node) {
            Ok(())
        } else {
            Err(SemanticError::NodeNotInTree)
        }
    }

    /// True if `node` is a kind of syntax that can carry symbol or type
    /// information.
    #[must_use]
    pub fn can_get_semantic_info(&self, node: NodeIndex) -> bool {
        let Some(kind) = self.tree.kind(node) else {
            return false;
        };
        if self.tree.is_missing(node) || kind.is_token() {
            return false;
        }
        if matches!(
            kind,
            SyntaxKind::CollectionInitializer
                | SyntaxKind::ObjectInitializer
                | SyntaxKind::ComplexElementInitializer
        ) {
            return false;
        }
        if facts::is_using_alias_name(self.tree, node) || facts::is_in_plain_documentation(self.tree, node) {
            return false;
        }
        kind.is_expression()
            || kind.is_cref()
            || kind.is_query_clause()
            || matches!(
                kind,
                SyntaxKind::Attribute | SyntaxKind::RecursivePattern | SyntaxKind::Subpattern
            )
    }

    // =========================================================================
    // Symbol queries
    // =========================================================================

    /// Symbol info for `node` with [`SymbolInfoOptions::DEFAULT`].
    pub fn symbol_info(&self, node: NodeIndex, cancel: &CancellationToken) -> Result<SymbolInfo> {
        self.symbol_info_with_options(node, SymbolInfoOptions::DEFAULT, cancel)
    }

    pub fn symbol_info_with_options(
        &self,
        node: NodeIndex,
        options: SymbolInfoOptions,
        cancel: &CancellationToken,
    ) -> Result<SymbolInfo> {
        let _span = debug_span!("symbol_info", node = node.0).entered();
        self.check_node(node)?;
        cancel.check()?;
        if !self.can_get_semantic_info(node) {
            return Ok(SymbolInfo::no_information());
        }
        if self.tree.kind(node).is_some_and(SyntaxKind::is_cref) {
            return self.cref_symbol_info(node, options, cancel);
        }
        if facts::is_named_argument_name(self.tree, node) {
            return self.named_argument_symbol_info(node, cancel);
        }
        let target = facts::skip_parentheses(self.tree, node);
        let info = self.symbol_info_for_syntax(target, options, cancel)?;
        debug!(kind = %info.result_kind(), count = info.all_symbols().len(), "symbol info");
        Ok(info)
    }

    /// The `Add` method a collection initializer element calls.
    ///
    /// `element` is an expression directly inside a collection initializer,
    /// or a `{ a, b }` complex element initializer. Anything else carries no
    /// such information.
    pub fn collection_initializer_symbol_info(
        &self,
        element: NodeIndex,
        cancel: &CancellationToken,
    ) -> Result<SymbolInfo> {
        let _span = debug_span!("collection_initializer_symbol_info", node = element.0).entered();
        self.check_node(element)?;
        cancel.check()?;
        if self.tree.kind(self.tree.parent(element)) != Some(SyntaxKind::CollectionInitializer) {
            return Ok(SymbolInfo::no_information());
        }
        let Some(add) = self.bound.element_initializer(element) else {
            return Ok(SymbolInfo::none());
        };
        let out = self.extract(add, None, SymbolInfoOptions::DEFAULT, cancel)?;
        Ok(self.finish_symbols(out.symbols, out.kind, out.dynamic, SymbolInfoOptions::DEFAULT))
    }

    /// The parameter a named argument (`f(name: value)`) refers to.
    pub fn named_argument_symbol_info(&self, name: NodeIndex, cancel: &CancellationToken) -> Result<SymbolInfo> {
        self.check_node(name)?;
        cancel.check()?;
        if !facts::is_named_argument_name(self.tree, name) {
            return Ok(SymbolInfo::no_information());
        }
        // name -> NameColon -> Argument -> ArgumentList -> invocation
        let argument = self.tree.parent(self.tree.parent(name));
        let invocation = self.tree.parent(self.tree.parent(argument));
        if invocation.is_none() {
            return Ok(SymbolInfo::none());
        }
        let invoked = self.symbol_info_for_syntax(invocation, SymbolInfoOptions::DEFAULT, cancel)?;
        let text = self.tree.node_text(name);
        let mut parameters = Vec::new();
        for &candidate in invoked.all_symbols() {
            cancel.check()?;
            parameters.extend(self.parameters_named(candidate, text));
        }
        let kind = if invoked.symbol().is_some() {
            sqe_symbols::ResultKind::Viable
        } else {
            sqe_symbols::ResultKind::OverloadResolutionFailure
        };
        Ok(SymbolInfo::create(parameters, kind, false))
    }

    fn parameters_named(&self, method: SymbolRef, name: &str) -> Vec<SymbolRef> {
        let arena = &self.compilation.symbols;
        let (declared, skip) = match method {
            SymbolRef::Declared(id) => (id, 0),
            SymbolRef::Synthesized(id) => match self.synthesized_symbol(id) {
                Some(s) => {
                    let skip = usize::from(s.method_kind == sqe_symbols::MethodKind::ReducedExtension);
                    (s.origin.unwrap_or(SymbolId::NONE), skip)
                }
                None => return Vec::new(),
            },
        };
        arena
            .get(declared)
            .map(|m| {
                m.parameters
                    .iter()
                    .skip(skip)
                    .filter(|&&p| arena.name(p) == name)
                    .map(|&p| SymbolRef::Declared(p))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Static type, converted type, and conversion of an expression.
    pub fn type_info(&self, node: NodeIndex, cancel: &CancellationToken) -> Result<TypeInfo> {
        let _span = debug_span!("type_info", node = node.0).entered();
        self.check_node(node)?;
        cancel.check()?;
        if !self.can_get_semantic_info(node) {
            return Ok(TypeInfo::none());
        }
        Ok(self.type_info_for_syntax(facts::skip_parentheses(self.tree, node)))
    }

    /// Every method or property the expression could denote before
    /// overload resolution, with overridden and hidden members removed.
    pub fn member_group(&self, node: NodeIndex, cancel: &CancellationToken) -> Result<Vec<SymbolRef>> {
        let _span = debug_span!("member_group", node = node.0).entered();
        self.check_node(node)?;
        cancel.check()?;
        if !self.can_get_semantic_info(node) {
            return Ok(Vec::new());
        }
        self.member_group_for_syntax(facts::skip_parentheses(self.tree, node), cancel)
    }

    /// Indexers applicable to an expression of the receiver's type.
    pub fn indexer_group(&self, receiver: NodeIndex, cancel: &CancellationToken) -> Result<Vec<SymbolRef>> {
        let _span = debug_span!("indexer_group", node = receiver.0).entered();
        self.check_node(receiver)?;
        cancel.check()?;
        let target = facts::skip_parentheses(self.tree, receiver);
        let Some(ty) = self.type_info_for_syntax(target).ty else {
            return Ok(Vec::new());
        };
        self.indexers_of(target, ty, cancel)
    }

    /// The alias a type or namespace name was written with, if any.
    pub fn alias_info(&self, node: NodeIndex, cancel: &CancellationToken) -> Result<Option<SymbolId>> {
        self.check_node(node)?;
        cancel.check()?;
        Ok(self.alias_for_syntax(facts::skip_parentheses(self.tree, node)))
    }

    /// The binder's compile-time constant for an expression.
    pub fn constant_value(&self, node: NodeIndex, cancel: &CancellationToken) -> Result<Option<ConstantValue>> {
        self.check_node(node)?;
        cancel.check()?;
        Ok(self.constant_for_syntax(facts::skip_parentheses(self.tree, node)))
    }

    /// The symbol a declaration introduces.
    pub fn declared_symbol(&self, declaration: NodeIndex, cancel: &CancellationToken) -> Result<Option<SymbolRef>> {
        self.check_node(declaration)?;
        cancel.check()?;
        if let Some(&symbol) = self.data.and_then(|d| d.declarations.get(&declaration)) {
            return Ok(Some(SymbolRef::Declared(symbol)));
        }
        let defined = self.bound.nodes_for(declaration).iter().find_map(|&id| {
            match self.bound.get(id).map(|n| &n.kind) {
                Some(BoundKind::QueryClause { defined, .. }) => *defined,
                _ => None,
            }
        });
        Ok(defined)
    }

    /// Symbols of a query clause.
    pub fn query_clause_info(&self, clause: NodeIndex, cancel: &CancellationToken) -> Result<QueryClauseInfo> {
        self.check_node(clause)?;
        cancel.check()?;
        let mut info = QueryClauseInfo {
            operation: SymbolInfo::none(),
            cast: SymbolInfo::none(),
        };
        for &id in self.bound.nodes_for(clause) {
            if let Some(BoundKind::QueryClause { operation, cast, .. }) = self.bound.get(id).map(|n| &n.kind) {
                let kind = self.bound.get(id).map_or(sqe_symbols::ResultKind::Viable, |n| n.result_kind);
                info.operation = self.finish_symbols(operation.iter().copied().collect(), kind, false, SymbolInfoOptions::DEFAULT);
                info.cast = self.finish_symbols(cast.iter().copied().collect(), kind, false, SymbolInfoOptions::DEFAULT);
            }
        }
        Ok(info)
    }

    /// The innermost symbol containing `position`: a member, lambda, type,
    /// or namespace.
    pub fn enclosing_symbol(&self, position: u32, cancel: &CancellationToken) -> Result<Option<SymbolId>> {
        cancel.check()?;
        let cx = self.scope_context_at(position)?;
        Ok(self
            .compilation
            .scopes
            .chain(cx.scope)
            .take(self.options.max_scope_walk)
            .map(|(_, scope)| scope.container)
            .find(|container| container.is_some()))
    }

    /// The innermost scope at `position`.
    pub fn enclosing_scope(&self, position: u32, cancel: &CancellationToken) -> Result<Option<ScopeId>> {
        cancel.check()?;
        let cx = self.scope_context_at(position)?;
        Ok(cx.scope.is_some().then_some(cx.scope))
    }

    /// Is `symbol` accessible from `position`?
    pub fn is_accessible(&self, position: u32, symbol: SymbolRef, cancel: &CancellationToken) -> Result<bool> {
        cancel.check()?;
        let cx = self.scope_context_at(position)?;
        let declared = match symbol {
            SymbolRef::Declared(id) => id,
            SymbolRef::Synthesized(id) => match self.synthesized_symbol(id).and_then(|s| s.origin) {
                Some(origin) => origin,
                None => return Ok(true),
            },
        };
        Ok(self.is_accessible_from(&cx, declared, SymbolId::NONE))
    }

    // =========================================================================
    // Speculative queries
    // =========================================================================

    /// Bind `node` of a foreign tree as if it appeared at `position`, and
    /// report its symbol info.
    pub fn speculative_symbol_info(
        &self,
        position: u32,
        foreign: &SyntaxTree,
        node: NodeIndex,
        mode: BindingMode,
        cancel: &CancellationToken,
    ) -> Result<SymbolInfo> {
        let _span = debug_span!("speculative_symbol_info", position, node = node.0).entered();
        self.check_speculation(foreign, node)?;
        if foreign.kind(node).is_some_and(SyntaxKind::is_cref) {
            return self.speculative_cref_info(position, foreign, node, SymbolInfoOptions::DEFAULT, cancel);
        }
        match self.speculate(position, foreign, node, mode, cancel)? {
            Some(model) => model.symbol_info(node, cancel),
            None => Ok(SymbolInfo::no_information()),
        }
    }

    pub fn speculative_type_info(
        &self,
        position: u32,
        foreign: &SyntaxTree,
        node: NodeIndex,
        mode: BindingMode,
        cancel: &CancellationToken,
    ) -> Result<TypeInfo> {
        let _span = debug_span!("speculative_type_info", position, node = node.0).entered();
        self.check_speculation(foreign, node)?;
        match self.speculate(position, foreign, node, mode, cancel)? {
            Some(model) => model.type_info(node, cancel),
            None => Ok(TypeInfo::none()),
        }
    }

    pub fn speculative_alias_info(
        &self,
        position: u32,
        foreign: &SyntaxTree,
        node: NodeIndex,
        cancel: &CancellationToken,
    ) -> Result<Option<SymbolId>> {
        self.check_speculation(foreign, node)?;
        match self.speculate(position, foreign, node, BindingMode::TypeOrNamespace, cancel)? {
            Some(model) => model.alias_info(node, cancel),
            None => Ok(None),
        }
    }

    /// A model answering queries about the foreign `node` as if it appeared
    /// at `position`. Returns `None` when the binder has nothing to bind.
    pub fn try_speculative_model<'s>(
        &'s self,
        position: u32,
        foreign: &'s SyntaxTree,
        node: NodeIndex,
        cancel: &CancellationToken,
    ) -> Result<Option<SemanticModel<'s>>> {
        let _span = debug_span!("try_speculative_model", position, node = node.0).entered();
        self.check_speculation(foreign, node)?;
        self.speculate(position, foreign, node, BindingMode::Expression, cancel)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Symbols visible at `position`, optionally restricted to members of
    /// `container` and to one `name`.
    pub fn lookup_symbols(
        &self,
        position: u32,
        container: Option<SymbolId>,
        name: Option<&str>,
        options: LookupOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        let _span = debug_span!("lookup_symbols", position, name = name.unwrap_or("")).entered();
        self.lookup(position, container, name, options, cancel)
    }

    /// Members of the containing type's base type, with protected members
    /// accessible as through `base.`.
    pub fn lookup_base_members(
        &self,
        position: u32,
        name: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        self.lookup_symbols(position, None, name, LookupOptions::BASE_MEMBERS, cancel)
    }

    pub fn lookup_static_members(
        &self,
        position: u32,
        container: Option<SymbolId>,
        name: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        self.lookup_symbols(position, container, name, LookupOptions::STATIC_ONLY, cancel)
    }

    pub fn lookup_namespaces_and_types(
        &self,
        position: u32,
        container: Option<SymbolId>,
        name: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<SymbolRef>> {
        self.lookup_symbols(position, container, name, LookupOptions::NAMESPACES_AND_TYPES, cancel)
    }

    pub fn lookup_labels(&self, position: u32, name: Option<&str>, cancel: &CancellationToken) -> Result<Vec<SymbolRef>> {
        self.lookup_symbols(position, None, name, LookupOptions::LABELS_ONLY, cancel)
    }
}

impl std::fmt::Debug for SemanticModel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticModel")
            .field("tree", &self.tree.id())
            .field("bound_nodes", &self.bound.len())
            .field("speculative", &self.speculative)
            .field("synthesized", &self.synthesized.len())
            .field("locals", &self.locals.len())
            .finish_non_exhaustive()
    }
}
