//! UPDATE statements.

use crate::column::SortSpecification;
use crate::config::StatementConfiguration;
use crate::criterion::WhereModel;
use crate::error::{ClauseKind, RenderError, RenderResult, StatementKind};
use crate::fragment::FragmentCollector;
use crate::mapping::{ColumnMapping, ColumnMappingVisitor, UpdateMappingVisitor};
use crate::render::{AliasMode, CriterionRenderer, RenderingContext, TableAliasCalculator};
use crate::statement::traits::{MappingSupport, RenderStatement, WhereSupport};
use crate::statement::{
    Paging, RenderedStatement, check_build_error, collect_order_by, finish, render_order_by,
};
use crate::table::SqlTable;
use std::collections::HashMap;

/// A built `update t set ... where ...`.
#[derive(Debug, Clone)]
pub struct UpdateModel {
    table: SqlTable,
    alias: Option<String>,
    mappings: Vec<ColumnMapping>,
    where_model: WhereModel,
    order_by: Vec<SortSpecification>,
    limit: Option<i64>,
    config: StatementConfiguration,
}

/// Alias scope of a single-table statement.
pub(crate) fn single_table_calculator(table: &SqlTable, alias: Option<&str>) -> TableAliasCalculator {
    match alias {
        Some(alias) => TableAliasCalculator::explicit(HashMap::from([(table.id(), alias.to_string())])),
        None => TableAliasCalculator::empty(),
    }
}

pub(crate) fn table_with_alias(table: &SqlTable, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("{} {alias}", table.runtime_name()),
        None => table.runtime_name(),
    }
}

impl RenderStatement for UpdateModel {
    fn statement_kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn statement_configuration(&self) -> &StatementConfiguration {
        &self.config
    }

    fn render_in(&self, parent: &RenderingContext) -> RenderResult<RenderedStatement> {
        let ctx = parent.with_child_table_alias_calculator(single_table_calculator(
            &self.table,
            self.alias.as_deref(),
        ));
        let visitor = UpdateMappingVisitor::new(&ctx);
        let mut set = FragmentCollector::new();
        for mapping in &self.mappings {
            if let Some(assignment) = visitor.visit(mapping)? {
                set.add(assignment);
            }
        }
        if set.is_empty() {
            return Err(RenderError::elided_to_nothing("update set"));
        }

        let mut collector = FragmentCollector::new();
        collector.add_text(format!(
            "update {}",
            table_with_alias(&self.table, self.alias.as_deref())
        ));
        collector.add(set.join_wrapped(", ", "set ", ""));
        if let Some(clause) = CriterionRenderer::new(&ctx, AliasMode::Qualified)
            .render_clause(ClauseKind::Where, &self.where_model)?
        {
            collector.add(clause);
        }
        if let Some(order_by) = render_order_by(&self.order_by) {
            collector.add(order_by);
        }
        let paging = Paging {
            limit: self.limit,
            ..Paging::default()
        };
        if let Some(limit) = paging.render(&ctx) {
            collector.add(limit);
        }
        Ok(finish(self.statement_kind(), collector.join(" ")))
    }
}

/// Builds an [`UpdateModel`].
#[derive(Debug)]
pub struct UpdateBuilder {
    table: SqlTable,
    alias: Option<String>,
    mappings: Vec<ColumnMapping>,
    where_model: WhereModel,
    order_by: Vec<SortSpecification>,
    limit: Option<i64>,
    config: StatementConfiguration,
    build_error: Option<String>,
}

impl UpdateBuilder {
    pub fn new(table: &SqlTable, alias: Option<String>) -> Self {
        Self {
            table: table.clone(),
            alias,
            mappings: Vec::new(),
            where_model: WhereModel::new(),
            order_by: Vec::new(),
            limit: None,
            config: StatementConfiguration::default(),
            build_error: None,
        }
    }

    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SortSpecification>,
    {
        self.order_by = collect_order_by(columns, &mut self.build_error);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        if limit < 0 {
            self.build_error
                .get_or_insert_with(|| "limit must not be negative".to_string());
        }
        self.limit = Some(limit);
        self
    }

    pub fn configure_statement(mut self, f: impl FnOnce(&mut StatementConfiguration)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn build(self) -> RenderResult<UpdateModel> {
        check_build_error(self.build_error)?;
        if self.mappings.is_empty() {
            return Err(RenderError::invalid_sql("update requires at least one set mapping"));
        }
        Ok(UpdateModel {
            table: self.table,
            alias: self.alias,
            mappings: self.mappings,
            where_model: self.where_model,
            order_by: self.order_by,
            limit: self.limit,
            config: self.config,
        })
    }
}

impl MappingSupport for UpdateBuilder {
    fn push_mapping(&mut self, mapping: ColumnMapping) {
        self.mappings.push(mapping);
    }
}

impl WhereSupport for UpdateBuilder {
    fn where_model_mut(&mut self) -> &mut WhereModel {
        &mut self.where_model
    }
}
