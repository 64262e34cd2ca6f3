//! Recursive rendering of criterion trees.
//!
//! Rules:
//! - The first rendered entry of a clause or group drops its connector; every later
//!   entry renders `<connector> <fragment>`, defaulting to `and`.
//! - A criterion whose predicate does not render is skipped together with all of its
//!   sub-criteria.
//! - A criterion with surviving sub-criteria renders `(<predicate> <connector> <sub> ...)`.
//! - A group renders its surviving entries, parenthesized only when two or more survive.

use crate::criterion::{Connector, Criterion, Predicate, WhereModel};
use crate::error::{ClauseKind, RenderError, RenderResult};
use crate::fragment::{FragmentAndParameters, FragmentCollector};
use crate::render::context::{AliasMode, RenderingContext};

/// Walks criterion trees and renders them against one context.
#[derive(Debug, Clone, Copy)]
pub struct CriterionRenderer<'a> {
    ctx: &'a RenderingContext,
    mode: AliasMode,
}

/// Joined text of a criterion and how many entries went into it.
struct Body {
    fragment: FragmentAndParameters,
    entries: usize,
}

impl Body {
    fn wrapped(self) -> FragmentAndParameters {
        if self.entries > 1 {
            self.fragment.map_fragment(|f| format!("({f})"))
        } else {
            self.fragment
        }
    }
}

impl<'a> CriterionRenderer<'a> {
    pub fn new(ctx: &'a RenderingContext, mode: AliasMode) -> Self {
        Self { ctx, mode }
    }

    /// Render one criterion; `None` when it elides.
    pub fn render(&self, criterion: &Criterion) -> RenderResult<Option<FragmentAndParameters>> {
        Ok(self.render_body(criterion)?.map(Body::wrapped))
    }

    /// Render a list of sibling criteria without enclosing parentheses.
    pub fn render_list(&self, criteria: &[Criterion]) -> RenderResult<Option<FragmentAndParameters>> {
        Ok(self.render_group_body(criteria)?.map(|body| body.fragment))
    }

    /// Render `where ...` / `having ...`.
    ///
    /// An empty model renders nothing. A non-empty model whose criteria all elide
    /// renders nothing if the statement allows it, otherwise fails with
    /// [`RenderError::NonRenderingClause`].
    pub fn render_clause(
        &self,
        kind: ClauseKind,
        model: &WhereModel,
    ) -> RenderResult<Option<FragmentAndParameters>> {
        if model.is_empty() {
            return Ok(None);
        }
        match self.render_list(model.criteria())? {
            Some(rendered) => Ok(Some(
                rendered.map_fragment(|f| format!("{} {f}", kind.keyword())),
            )),
            None if self.ctx.config().is_non_rendering_where_clause_allowed() => {
                #[cfg(feature = "tracing")]
                tracing::trace!(target: "dynsql.render", clause = %kind, "clause elided");
                Ok(None)
            }
            None => Err(RenderError::NonRenderingClause(kind)),
        }
    }

    fn render_body(&self, criterion: &Criterion) -> RenderResult<Option<Body>> {
        let head = match criterion.predicate() {
            Predicate::Group => return self.render_group_body(criterion.sub_criteria()),
            Predicate::Condition { column, condition } => {
                if !condition.should_render(self.ctx.config()) {
                    return Ok(None);
                }
                condition.render(column, self.ctx, self.mode)?
            }
            Predicate::Not(inner) => match self.render_body(inner)? {
                Some(body) => body.fragment.map_fragment(|f| format!("not ({f})")),
                None => return Ok(None),
            },
            Predicate::Exists { select, negated } => {
                let keyword = if *negated { "not exists" } else { "exists" };
                select
                    .render_nested(self.ctx)?
                    .map_fragment(|f| format!("{keyword} ({f})"))
            }
        };

        let mut collector = FragmentCollector::new();
        collector.add(head);
        for (connector, fragment) in self.render_entries(criterion.sub_criteria())? {
            collector.add_text(connector.unwrap_or(Connector::And).keyword());
            collector.add(fragment);
        }
        let entries = (collector.len() + 1) / 2;
        Ok(Some(Body {
            fragment: collector.join(" "),
            entries,
        }))
    }

    fn render_group_body(&self, criteria: &[Criterion]) -> RenderResult<Option<Body>> {
        let rendered = self.render_entries(criteria)?;
        if rendered.is_empty() {
            return Ok(None);
        }
        let entries = rendered.len();
        let mut collector = FragmentCollector::new();
        for (i, (connector, fragment)) in rendered.into_iter().enumerate() {
            if i > 0 {
                collector.add_text(connector.unwrap_or(Connector::And).keyword());
            }
            collector.add(fragment);
        }
        Ok(Some(Body {
            fragment: collector.join(" "),
            entries,
        }))
    }

    fn render_entries(
        &self,
        criteria: &[Criterion],
    ) -> RenderResult<Vec<(Option<Connector>, FragmentAndParameters)>> {
        let mut rendered = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            if let Some(fragment) = self.render(criterion)? {
                rendered.push((criterion.connector(), fragment));
            }
        }
        Ok(rendered)
    }
}
