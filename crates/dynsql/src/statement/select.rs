//! SELECT statements.

use crate::column::{BasicColumn, SortSpecification};
use crate::condition::Condition;
use crate::config::StatementConfiguration;
use crate::criterion::{Connector, Criterion, WhereModel};
use crate::error::{ClauseKind, RenderError, RenderResult, StatementKind};
use crate::fragment::{FragmentAndParameters, FragmentCollector};
use crate::render::{AliasMode, CriterionRenderer, RenderingContext, TableAliasCalculator};
use crate::statement::traits::{RenderStatement, WhereSupport};
use crate::statement::{
    Paging, RenderedStatement, check_build_error, collect_order_by, finish, render_order_by,
};
use crate::table::SqlTable;
use std::collections::HashMap;

/// A table or derived table in FROM / JOIN.
#[derive(Debug, Clone)]
pub enum TableExpression {
    Table(SqlTable),
    SubQuery(Box<SelectModel>),
}

impl TableExpression {
    fn render(&self, ctx: &RenderingContext) -> RenderResult<FragmentAndParameters> {
        match self {
            TableExpression::Table(table) => Ok(FragmentAndParameters::new(table.runtime_name())),
            TableExpression::SubQuery(select) => Ok(select
                .render_nested(ctx)?
                .map_fragment(|s| format!("({s})"))),
        }
    }
}

impl From<&SqlTable> for TableExpression {
    fn from(table: &SqlTable) -> Self {
        TableExpression::Table(table.clone())
    }
}

impl From<SelectModel> for TableExpression {
    fn from(select: SelectModel) -> Self {
        TableExpression::SubQuery(Box::new(select))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "join",
            JoinType::Left => "left join",
            JoinType::Right => "right join",
            JoinType::Full => "full join",
        }
    }
}

/// One JOIN with its ON criteria.
#[derive(Debug, Clone)]
pub struct Join {
    join_type: JoinType,
    table: TableExpression,
    alias: Option<String>,
    on: Vec<Criterion>,
}

impl Join {
    fn render(&self, ctx: &RenderingContext) -> RenderResult<FragmentAndParameters> {
        let mut collector = FragmentCollector::new();
        collector.add_text(self.join_type.keyword());
        collector.add(render_table(&self.table, self.alias.as_deref(), ctx)?);
        let on = CriterionRenderer::new(ctx, AliasMode::Qualified)
            .render_list(&self.on)?
            .ok_or_else(|| RenderError::elided_to_nothing("join on"))?;
        collector.add_text("on");
        collector.add(on);
        Ok(collector.join(" "))
    }
}

fn render_table(
    table: &TableExpression,
    alias: Option<&str>,
    ctx: &RenderingContext,
) -> RenderResult<FragmentAndParameters> {
    let rendered = table.render(ctx)?;
    Ok(match alias {
        Some(alias) => rendered.map_fragment(|t| format!("{t} {alias}")),
        None => rendered,
    })
}

/// One `select ... from ...` block; unions chain several.
#[derive(Debug, Clone)]
pub struct QueryExpression {
    connector: Option<&'static str>,
    distinct: bool,
    columns: Vec<BasicColumn>,
    from: TableExpression,
    from_alias: Option<String>,
    joins: Vec<Join>,
    where_model: WhereModel,
    group_by: Vec<BasicColumn>,
    having: WhereModel,
}

impl QueryExpression {
    /// Explicit aliases of this block's tables; guaranteed when the block joins.
    ///
    /// A joining block registers its un-aliased tables under their names so that
    /// correlated sub-selects still qualify references to them.
    fn table_alias_calculator(&self) -> TableAliasCalculator {
        let joined = !self.joins.is_empty();
        let mut aliases = HashMap::new();
        let tables = std::iter::once((&self.from, &self.from_alias))
            .chain(self.joins.iter().map(|j| (&j.table, &j.alias)));
        for (table, alias) in tables {
            match (table, alias) {
                (TableExpression::Table(table), Some(alias)) => {
                    aliases.insert(table.id(), alias.clone());
                }
                (TableExpression::Table(table), None) if joined => {
                    aliases.insert(table.id(), table.runtime_name());
                }
                _ => {}
            }
        }
        if joined {
            TableAliasCalculator::guaranteed(aliases)
        } else if aliases.is_empty() {
            TableAliasCalculator::empty()
        } else {
            TableAliasCalculator::explicit(aliases)
        }
    }

    fn render(&self, parent: &RenderingContext) -> RenderResult<FragmentAndParameters> {
        let ctx = parent.with_child_table_alias_calculator(self.table_alias_calculator());
        let mut collector = FragmentCollector::new();

        if let Some(connector) = self.connector {
            collector.add_text(connector);
        }
        collector.add_text(if self.distinct { "select distinct" } else { "select" });
        let columns: FragmentCollector = self
            .columns
            .iter()
            .map(|c| c.render_select_item(&ctx))
            .collect::<RenderResult<_>>()?;
        collector.add(columns.join(", "));

        collector.add_text("from");
        collector.add(render_table(&self.from, self.from_alias.as_deref(), &ctx)?);
        for join in &self.joins {
            collector.add(join.render(&ctx)?);
        }

        let renderer = CriterionRenderer::new(&ctx, AliasMode::Qualified);
        if let Some(clause) = renderer.render_clause(ClauseKind::Where, &self.where_model)? {
            collector.add(clause);
        }
        if !self.group_by.is_empty() {
            let group_by: FragmentCollector = self
                .group_by
                .iter()
                .map(|c| c.render(&ctx, AliasMode::Qualified))
                .collect::<RenderResult<_>>()?;
            collector.add(group_by.join_wrapped(", ", "group by ", ""));
        }
        if let Some(clause) = renderer.render_clause(ClauseKind::Having, &self.having)? {
            collector.add(clause);
        }
        Ok(collector.join(" "))
    }
}

/// A built SELECT statement.
#[derive(Debug, Clone)]
pub struct SelectModel {
    query_expressions: Vec<QueryExpression>,
    order_by: Vec<SortSpecification>,
    paging: Paging,
    config: StatementConfiguration,
}

impl SelectModel {
    pub fn query_expressions(&self) -> &[QueryExpression] {
        &self.query_expressions
    }

    /// Render as part of an enclosing statement, sharing its parameter sequence.
    ///
    /// Each query block resolves aliases in its own scope composed over `ctx`'s, so
    /// correlated references to outer tables keep their outer aliases.
    pub fn render_nested(&self, ctx: &RenderingContext) -> RenderResult<FragmentAndParameters> {
        let mut collector = FragmentCollector::new();
        for expression in &self.query_expressions {
            collector.add(expression.render(ctx)?);
        }
        if let Some(order_by) = render_order_by(&self.order_by) {
            collector.add(order_by);
        }
        if let Some(paging) = self.paging.render(ctx) {
            collector.add(paging);
        }
        Ok(collector.join(" "))
    }
}

impl RenderStatement for SelectModel {
    fn statement_kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn statement_configuration(&self) -> &StatementConfiguration {
        &self.config
    }

    fn render_in(&self, ctx: &RenderingContext) -> RenderResult<RenderedStatement> {
        Ok(finish(self.statement_kind(), self.render_nested(ctx)?))
    }
}

/// Builds a [`SelectModel`].
///
/// # Example
/// ```ignore
/// use dynsql::prelude::*;
///
/// let model = select([&id, &name])
///     .from_as(&person, "p")
///     .left_join_as(&address, "a", [on(&person_address_id, Condition::is_equal_to_column(&address_id))])
///     .where_(&id, Condition::is_greater_than(10))
///     .and(&name, Condition::is_like_when_present(filter))
///     .order_by([&name])
///     .limit(20)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct SelectBuilder {
    completed: Vec<QueryExpression>,
    connector: Option<&'static str>,
    distinct: bool,
    columns: Vec<BasicColumn>,
    from: Option<(TableExpression, Option<String>)>,
    joins: Vec<Join>,
    where_model: WhereModel,
    group_by: Vec<BasicColumn>,
    having: WhereModel,
    order_by: Vec<SortSpecification>,
    paging: Paging,
    config: StatementConfiguration,
    build_error: Option<String>,
}

impl SelectBuilder {
    pub fn new<I, C>(distinct: bool, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<BasicColumn>,
    {
        let mut builder = Self {
            completed: Vec::new(),
            connector: None,
            distinct,
            columns: columns.into_iter().map(Into::into).collect(),
            from: None,
            joins: Vec::new(),
            where_model: WhereModel::new(),
            group_by: Vec::new(),
            having: WhereModel::new(),
            order_by: Vec::new(),
            paging: Paging::default(),
            config: StatementConfiguration::default(),
            build_error: None,
        };
        if builder.columns.is_empty() {
            builder.fail("select requires at least one column");
        }
        builder
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.build_error.get_or_insert_with(|| message.into());
    }

    // ==================== FROM / JOIN ====================

    pub fn from(self, table: &SqlTable) -> Self {
        self.from_table(table.into(), None)
    }

    pub fn from_as(self, table: &SqlTable, alias: impl Into<String>) -> Self {
        self.from_table(table.into(), Some(alias.into()))
    }

    /// `from (select ...) alias`
    pub fn from_sub_query(self, select: SelectModel, alias: impl Into<String>) -> Self {
        self.from_table(select.into(), Some(alias.into()))
    }

    fn from_table(mut self, table: TableExpression, alias: Option<String>) -> Self {
        if self.from.is_some() {
            self.fail("from specified twice");
        }
        self.from = Some((table, alias));
        self
    }

    pub fn join(self, table: &SqlTable, on: impl IntoIterator<Item = Criterion>) -> Self {
        self.join_with(JoinType::Inner, table.into(), None, on)
    }

    pub fn join_as(
        self,
        table: &SqlTable,
        alias: impl Into<String>,
        on: impl IntoIterator<Item = Criterion>,
    ) -> Self {
        self.join_with(JoinType::Inner, table.into(), Some(alias.into()), on)
    }

    pub fn left_join(self, table: &SqlTable, on: impl IntoIterator<Item = Criterion>) -> Self {
        self.join_with(JoinType::Left, table.into(), None, on)
    }

    pub fn left_join_as(
        self,
        table: &SqlTable,
        alias: impl Into<String>,
        on: impl IntoIterator<Item = Criterion>,
    ) -> Self {
        self.join_with(JoinType::Left, table.into(), Some(alias.into()), on)
    }

    pub fn right_join(self, table: &SqlTable, on: impl IntoIterator<Item = Criterion>) -> Self {
        self.join_with(JoinType::Right, table.into(), None, on)
    }

    pub fn full_join(self, table: &SqlTable, on: impl IntoIterator<Item = Criterion>) -> Self {
        self.join_with(JoinType::Full, table.into(), None, on)
    }

    /// Add a join of any type over a table or derived table.
    pub fn join_with(
        mut self,
        join_type: JoinType,
        table: TableExpression,
        alias: Option<String>,
        on: impl IntoIterator<Item = Criterion>,
    ) -> Self {
        let on: Vec<Criterion> = on.into_iter().collect();
        if on.is_empty() {
            self.fail("join requires at least one on criterion");
        }
        self.joins.push(Join {
            join_type,
            table,
            alias,
            on,
        });
        self
    }

    // ==================== GROUP BY / HAVING ====================

    pub fn group_by<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<BasicColumn>,
    {
        self.group_by = columns.into_iter().map(Into::into).collect();
        if self.group_by.is_empty() {
            self.fail("group by requires at least one column");
        }
        self
    }

    pub fn having(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.having_criterion(Criterion::new(column, condition))
    }

    pub fn having_criterion(mut self, criterion: Criterion) -> Self {
        self.having.push(None, criterion);
        self
    }

    pub fn and_having(mut self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.having
            .push(Some(Connector::And), Criterion::new(column, condition));
        self
    }

    pub fn or_having(mut self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.having
            .push(Some(Connector::Or), Criterion::new(column, condition));
        self
    }

    // ==================== UNION ====================

    /// `... union select ...`
    pub fn union(self, other: SelectBuilder) -> Self {
        self.union_with("union", other)
    }

    /// `... union all select ...`
    pub fn union_all(self, other: SelectBuilder) -> Self {
        self.union_with("union all", other)
    }

    fn union_with(mut self, connector: &'static str, other: SelectBuilder) -> Self {
        if !other.order_by.is_empty() || !other.paging.is_empty() {
            self.fail("order by and paging belong to the outer select of a union");
        }
        let mut expressions = match other.into_query_expressions() {
            Ok(expressions) => expressions,
            Err(message) => {
                self.fail(message);
                return self;
            }
        };
        match self.take_query_expression() {
            Ok(current) => self.completed.push(current),
            Err(message) => {
                self.fail(message);
                return self;
            }
        }
        if let Some(first) = expressions.first_mut() {
            first.connector = Some(connector);
        }
        // the last block stays open for further where/group by calls
        if let Some(last) = expressions.pop() {
            self.completed.extend(expressions);
            self.reset_from(last);
        }
        self
    }

    /// Make `expression` the block currently being built.
    fn reset_from(&mut self, expression: QueryExpression) {
        self.connector = expression.connector;
        self.distinct = expression.distinct;
        self.columns = expression.columns;
        self.from = Some((expression.from, expression.from_alias));
        self.joins = expression.joins;
        self.where_model = expression.where_model;
        self.group_by = expression.group_by;
        self.having = expression.having;
    }

    fn take_query_expression(&mut self) -> Result<QueryExpression, String> {
        let (from, from_alias) = self
            .from
            .take()
            .ok_or_else(|| "select requires a from clause".to_string())?;
        Ok(QueryExpression {
            connector: self.connector.take(),
            distinct: self.distinct,
            columns: std::mem::take(&mut self.columns),
            from,
            from_alias,
            joins: std::mem::take(&mut self.joins),
            where_model: std::mem::take(&mut self.where_model),
            group_by: std::mem::take(&mut self.group_by),
            having: std::mem::take(&mut self.having),
        })
    }

    fn into_query_expressions(mut self) -> Result<Vec<QueryExpression>, String> {
        if let Some(message) = self.build_error.take() {
            return Err(message);
        }
        let current = self.take_query_expression()?;
        let mut expressions = std::mem::take(&mut self.completed);
        expressions.push(current);
        Ok(expressions)
    }

    // ==================== ORDER BY / paging ====================

    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SortSpecification>,
    {
        self.order_by = collect_order_by(columns, &mut self.build_error);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.paging.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.paging.offset = Some(offset);
        self
    }

    pub fn fetch_first(mut self, rows: i64) -> Self {
        self.paging.fetch_first = Some(rows);
        self
    }

    /// Adjust this statement's configuration.
    pub fn configure_statement(mut self, f: impl FnOnce(&mut StatementConfiguration)) -> Self {
        f(&mut self.config);
        self
    }

    /// Get any build error recorded so far.
    pub fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    pub fn build(mut self) -> RenderResult<SelectModel> {
        if let Err(message) = self.paging.validate() {
            self.fail(message);
        }
        let order_by = std::mem::take(&mut self.order_by);
        let paging = self.paging;
        let config = self.config.clone();
        check_build_error(self.build_error.take())?;
        let query_expressions = self
            .into_query_expressions()
            .map_err(RenderError::invalid_sql)?;
        Ok(SelectModel {
            query_expressions,
            order_by,
            paging,
            config,
        })
    }
}

impl WhereSupport for SelectBuilder {
    fn where_model_mut(&mut self) -> &mut WhereModel {
        &mut self.where_model
    }
}
