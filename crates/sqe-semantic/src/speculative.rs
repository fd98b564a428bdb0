//! Speculative binding: answering queries about syntax that is not part of
//! the compilation, as if it appeared at a position of this tree.
//!
//! The foreign node is bound by the [`Binder`](sqe_bound::Binder) into a
//! throwaway bound tree. The compilation is never touched; locals the
//! binder declares live in the speculative model and go away with it.

use std::borrow::Cow;
use std::sync::Arc;

use sqe_bound::{BindingMode, SpeculativeContext};
use sqe_common::CancellationToken;
use sqe_syntax::{NodeIndex, SyntaxTree};
use tracing::debug;

use crate::error::{Result, SemanticError};
use crate::info::SymbolInfo;
use crate::model::{SemanticModel, SpeculativeOrigin};
use crate::options::SymbolInfoOptions;
use crate::synthesized::SpeculativeLocals;

impl<'c> SemanticModel<'c> {
    /// Reject speculation that would mix trees or stack speculative models.
    pub(crate) fn check_speculation(&self, foreign: &SyntaxTree, node: NodeIndex) -> Result<()> {
        if self.speculative.is_some() {
            return Err(SemanticError::InvalidSpeculation(
                "cannot speculate from a speculative model".to_string(),
            ));
        }
        if self.compilation.contains_tree(foreign.id()) {
            return Err(SemanticError::InvalidSpeculation(format!(
                "tree {} is part of the compilation",
                foreign.id().0
            )));
        }
        if !foreign.contains_node(node) {
            return Err(SemanticError::NodeNotInTree);
        }
        Ok(())
    }

    /// Bind `node` at `position` and wrap the result in a speculative model.
    ///
    /// Returns `None` without a binder, or when the binder has nothing to
    /// bind.
    pub(crate) fn speculate<'s>(
        &'s self,
        position: u32,
        foreign: &'s SyntaxTree,
        node: NodeIndex,
        mode: BindingMode,
        cancel: &CancellationToken,
    ) -> Result<Option<SemanticModel<'s>>> {
        cancel.check()?;
        let cx = self.scope_context_at(position)?;
        let Some(binder) = self.binder else {
            debug!("no binder attached, nothing to speculate with");
            return Ok(None);
        };
        let locals = SpeculativeLocals::new();
        let request = SpeculativeContext {
            compilation: self.compilation,
            scope: cx.scope,
            position: cx.position,
            mode,
            in_typeof: cx.in_typeof,
            in_cref: cx.in_cref,
            locals: &locals,
        };
        let Some(bound) = binder.bind_speculative(&request, foreign, node) else {
            debug!(position = cx.position, "binder produced nothing");
            return Ok(None);
        };
        cancel.check()?;
        debug!(
            position = cx.position,
            scope = cx.scope.0,
            bound_nodes = bound.len(),
            locals = locals.len(),
            ?mode,
            "speculative model"
        );
        Ok(Some(SemanticModel {
            compilation: self.compilation,
            tree: foreign,
            bound: Cow::Owned(bound),
            data: None,
            binder: self.binder,
            options: self.options.clone(),
            synthesized: Arc::clone(&self.synthesized),
            locals,
            speculative: Some(SpeculativeOrigin {
                position: cx.position,
                scope: cx.scope,
            }),
        }))
    }

    /// Bind a foreign documentation cross-reference at `position`.
    pub(crate) fn speculative_cref_info(
        &self,
        position: u32,
        foreign: &SyntaxTree,
        cref: NodeIndex,
        options: SymbolInfoOptions,
        cancel: &CancellationToken,
    ) -> Result<SymbolInfo> {
        cancel.check()?;
        let cx = self.scope_context_at(position)?;
        let Some(binder) = self.binder else {
            return Ok(SymbolInfo::no_information());
        };
        let request = SpeculativeContext {
            compilation: self.compilation,
            scope: cx.scope,
            position: cx.position,
            mode: BindingMode::TypeOrNamespace,
            in_typeof: cx.in_typeof,
            in_cref: true,
            locals: &SpeculativeLocals::new(),
        };
        let symbols = binder.bind_cref(&request, foreign, cref);
        Ok(self.cref_result(foreign, cref, symbols, options))
    }
}
