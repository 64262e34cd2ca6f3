//! Per-statement render session.

use crate::column::SqlColumn;
use crate::config::StatementConfiguration;
use crate::fragment::FragmentAndParameters;
use crate::render::alias::TableAliasCalculator;
use crate::render::strategy::{ParameterKey, RenderingStrategy};
use crate::table::SqlTable;
use crate::value::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Whether column references carry their table alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasMode {
    /// `alias.column` whenever the scope knows an alias for the table.
    #[default]
    Qualified,
    /// Bare `column`, for clauses where qualifiers are not allowed.
    Unqualified,
}

/// State shared by everything rendered for one statement.
///
/// The parameter sequence is shared by reference: contexts derived with
/// [`with_child_table_alias_calculator`](Self::with_child_table_alias_calculator)
/// (joins, sub-selects) keep numbering where the parent left off, so keys stay unique
/// across the whole statement. Use a fresh context for each statement render.
#[derive(Debug, Clone)]
pub struct RenderingContext {
    sequence: Arc<AtomicUsize>,
    table_alias_calculator: TableAliasCalculator,
    strategy: Arc<dyn RenderingStrategy>,
    parameter_prefix: String,
    config: StatementConfiguration,
}

impl RenderingContext {
    /// Start a render session with the strategy's default parameter prefix.
    pub fn new(strategy: Arc<dyn RenderingStrategy>, config: StatementConfiguration) -> Self {
        let parameter_prefix = strategy.default_parameter_prefix().to_string();
        Self {
            sequence: Arc::new(AtomicUsize::new(0)),
            table_alias_calculator: TableAliasCalculator::Empty,
            strategy,
            parameter_prefix,
            config,
        }
    }

    /// Override the parameter prefix.
    pub fn with_parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parameter_prefix = prefix.into();
        self
    }

    /// Replace the alias calculator of this scope.
    pub fn with_table_alias_calculator(mut self, calculator: TableAliasCalculator) -> Self {
        self.table_alias_calculator = calculator;
        self
    }

    /// A context for a nested scope: `child` aliases win over this scope's,
    /// the parameter sequence is shared.
    pub fn with_child_table_alias_calculator(&self, child: TableAliasCalculator) -> Self {
        Self {
            sequence: Arc::clone(&self.sequence),
            table_alias_calculator: TableAliasCalculator::compose(
                child,
                self.table_alias_calculator.clone(),
            ),
            strategy: Arc::clone(&self.strategy),
            parameter_prefix: self.parameter_prefix.clone(),
            config: self.config.clone(),
        }
    }

    /// Advance the sequence and return the new key.
    pub fn next_parameter_key(&self) -> ParameterKey {
        let index = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        ParameterKey::new(index, self.strategy.format_parameter_map_key(index))
    }

    /// Number of parameter keys handed out so far.
    pub fn parameter_count(&self) -> usize {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Render a placeholder for `value` and record it under a new key.
    ///
    /// With a column, the column's metadata reaches the strategy and the column's own
    /// strategy (if any) formats the placeholder.
    pub fn bind(&self, value: Value, column: Option<&SqlColumn>) -> FragmentAndParameters {
        let key = self.next_parameter_key();
        let placeholder = match column {
            Some(column) => {
                let strategy = column.rendering_strategy().unwrap_or(&self.strategy);
                strategy.format_placeholder_for_column(column, &self.parameter_prefix, &key)
            }
            None => self
                .strategy
                .format_placeholder(&self.parameter_prefix, &key),
        };
        FragmentAndParameters::new(placeholder).with_parameter(key.name(), value)
    }

    pub fn alias_for(&self, table: &SqlTable) -> Option<String> {
        self.table_alias_calculator.alias_for(table)
    }

    /// `alias.column` or `column`.
    pub fn render_column(&self, column: &SqlColumn, mode: AliasMode) -> String {
        match mode {
            AliasMode::Qualified => match self.alias_for(column.table()) {
                Some(alias) => format!("{alias}.{}", column.name()),
                None => column.name().to_string(),
            },
            AliasMode::Unqualified => column.name().to_string(),
        }
    }

    pub fn table_alias_calculator(&self) -> &TableAliasCalculator {
        &self.table_alias_calculator
    }

    pub fn strategy(&self) -> &Arc<dyn RenderingStrategy> {
        &self.strategy
    }

    pub fn parameter_prefix(&self) -> &str {
        &self.parameter_prefix
    }

    pub fn config(&self) -> &StatementConfiguration {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalConfiguration;
    use crate::render::strategy::{MapperRenderingStrategy, NamedParameterRenderingStrategy};
    use std::collections::HashMap;

    fn context() -> RenderingContext {
        RenderingContext::new(
            Arc::new(MapperRenderingStrategy),
            GlobalConfiguration::default().statement_configuration(),
        )
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let ctx = context();
        assert_eq!(ctx.next_parameter_key().name(), "p1");
        assert_eq!(ctx.next_parameter_key().name(), "p2");
        assert_eq!(ctx.parameter_count(), 2);
    }

    #[test]
    fn test_child_context_shares_sequence() {
        let ctx = context();
        ctx.next_parameter_key();
        let child = ctx.with_child_table_alias_calculator(TableAliasCalculator::empty());
        assert_eq!(child.next_parameter_key().name(), "p2");
        assert_eq!(ctx.next_parameter_key().name(), "p3");
    }

    #[test]
    fn test_bind_uses_column_metadata() {
        let ctx = context();
        let table = SqlTable::new("person");
        let id = table.column("id").with_type_tag("INTEGER");

        let bound = ctx.bind(Value::Int(3), Some(&id));
        assert_eq!(bound.fragment(), "#{parameters.p1,jdbcType=INTEGER}");
        assert_eq!(bound.parameters().get("p1"), Some(&Value::Int(3)));

        let bound = ctx.bind(Value::from("x"), None);
        assert_eq!(bound.fragment(), "#{parameters.p2}");
    }

    #[test]
    fn test_column_strategy_override() {
        let ctx = context();
        let table = SqlTable::new("person");
        let name = table.column("name").with_rendering_strategy(NamedParameterRenderingStrategy);
        let bound = ctx.bind(Value::from("Fred"), Some(&name));
        assert_eq!(bound.fragment(), ":parameters.p1");
    }

    #[test]
    fn test_render_column_modes() {
        let table = SqlTable::new("person");
        let id = table.column("id");
        let ctx = context().with_table_alias_calculator(TableAliasCalculator::explicit(
            HashMap::from([(table.id(), "a".to_string())]),
        ));
        assert_eq!(ctx.render_column(&id, AliasMode::Qualified), "a.id");
        assert_eq!(ctx.render_column(&id, AliasMode::Unqualified), "id");
    }
}
