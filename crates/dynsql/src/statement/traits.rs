//! Traits shared by statement models and builders.

use crate::column::{BasicColumn, SqlColumn};
use crate::condition::Condition;
use crate::config::StatementConfiguration;
use crate::criterion::{Connector, Criterion, WhereModel};
use crate::error::{RenderResult, StatementKind};
use crate::mapping::{ColumnMapping, MappingKind};
use crate::render::{MapperRenderingStrategy, RenderingContext, RenderingStrategy};
use crate::statement::{RenderedStatement, SelectModel};
use crate::value::Value;
use std::sync::Arc;

/// Base trait for built statements.
pub trait RenderStatement {
    fn statement_kind(&self) -> StatementKind;

    /// Configuration captured when the statement was built.
    fn statement_configuration(&self) -> &StatementConfiguration;

    /// Render into an existing context.
    ///
    /// The context's parameter sequence keeps advancing, so the same context must not
    /// be reused for another statement.
    fn render_in(&self, ctx: &RenderingContext) -> RenderResult<RenderedStatement>;

    /// Render with `strategy` in a fresh context.
    fn render(&self, strategy: impl RenderingStrategy + 'static) -> RenderResult<RenderedStatement> {
        let ctx = RenderingContext::new(Arc::new(strategy), self.statement_configuration().clone());
        self.render_in(&ctx)
    }

    /// Debug helper: the statement text under the mapper strategy.
    fn to_sql(&self) -> RenderResult<String> {
        Ok(self.render(MapperRenderingStrategy)?.into_parts().0)
    }
}

/// WHERE clause construction for builders.
///
/// The first criterion added never renders a connector; later ones default to `and`.
pub trait WhereSupport: Sized {
    fn where_model_mut(&mut self) -> &mut WhereModel;

    /// Add `column <condition>` to the WHERE clause.
    fn where_(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.where_criterion(Criterion::new(column, condition))
    }

    /// Add any criterion (group, not, exists, ...) to the WHERE clause.
    fn where_criterion(mut self, criterion: Criterion) -> Self {
        self.where_model_mut().push(None, criterion);
        self
    }

    /// Add several criteria at once, keeping their own connectors.
    fn where_criteria(mut self, criteria: impl IntoIterator<Item = Criterion>) -> Self {
        let model = self.where_model_mut();
        for criterion in criteria {
            model.push(None, criterion);
        }
        self
    }

    fn and(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.and_criterion(Criterion::new(column, condition))
    }

    fn or(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.or_criterion(Criterion::new(column, condition))
    }

    fn and_criterion(mut self, criterion: Criterion) -> Self {
        self.where_model_mut().push(Some(Connector::And), criterion);
        self
    }

    fn or_criterion(mut self, criterion: Criterion) -> Self {
        self.where_model_mut().push(Some(Connector::Or), criterion);
        self
    }
}

/// Column assignment for INSERT and UPDATE builders.
pub trait MappingSupport: Sized {
    fn push_mapping(&mut self, mapping: ColumnMapping);

    fn set(mut self, column: &SqlColumn, kind: MappingKind) -> Self {
        self.push_mapping(ColumnMapping::new(column, kind));
        self
    }

    fn set_null(self, column: &SqlColumn) -> Self {
        self.set(column, MappingKind::Null)
    }

    fn set_constant(self, column: &SqlColumn, constant: impl Into<String>) -> Self {
        self.set(column, MappingKind::Constant(constant.into()))
    }

    fn set_string_constant(self, column: &SqlColumn, value: impl Into<String>) -> Self {
        self.set(column, MappingKind::StringConstant(value.into()))
    }

    fn set_value(self, column: &SqlColumn, value: impl Into<Value>) -> Self {
        self.set(column, MappingKind::Value(value.into()))
    }

    /// Assign `value`, or leave the column out when it is null.
    fn set_value_when_present(self, column: &SqlColumn, value: impl Into<Value>) -> Self {
        self.set(column, MappingKind::ValueWhenPresent(value.into()))
    }

    fn set_column(self, column: &SqlColumn, other: impl Into<BasicColumn>) -> Self {
        self.set(column, MappingKind::Column(other.into()))
    }

    fn set_sub_select(self, column: &SqlColumn, select: SelectModel) -> Self {
        self.set(column, MappingKind::SubSelect(Box::new(select)))
    }
}
