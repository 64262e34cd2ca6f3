//! DELETE statements.

use crate::column::SortSpecification;
use crate::config::StatementConfiguration;
use crate::criterion::WhereModel;
use crate::error::{ClauseKind, RenderResult, StatementKind};
use crate::fragment::FragmentCollector;
use crate::render::{AliasMode, CriterionRenderer, RenderingContext};
use crate::statement::traits::{RenderStatement, WhereSupport};
use crate::statement::update::{single_table_calculator, table_with_alias};
use crate::statement::{
    Paging, RenderedStatement, check_build_error, collect_order_by, finish, render_order_by,
};
use crate::table::SqlTable;

/// A built `delete from t where ...`.
#[derive(Debug, Clone)]
pub struct DeleteModel {
    table: SqlTable,
    alias: Option<String>,
    where_model: WhereModel,
    order_by: Vec<SortSpecification>,
    limit: Option<i64>,
    config: StatementConfiguration,
}

impl RenderStatement for DeleteModel {
    fn statement_kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn statement_configuration(&self) -> &StatementConfiguration {
        &self.config
    }

    fn render_in(&self, parent: &RenderingContext) -> RenderResult<RenderedStatement> {
        let ctx = parent.with_child_table_alias_calculator(single_table_calculator(
            &self.table,
            self.alias.as_deref(),
        ));
        let mut collector = FragmentCollector::new();
        collector.add_text(format!(
            "delete from {}",
            table_with_alias(&self.table, self.alias.as_deref())
        ));
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

/// Builds a [`DeleteModel`].
#[derive(Debug)]
pub struct DeleteBuilder {
    table: SqlTable,
    alias: Option<String>,
    where_model: WhereModel,
    order_by: Vec<SortSpecification>,
    limit: Option<i64>,
    config: StatementConfiguration,
    build_error: Option<String>,
}

impl DeleteBuilder {
    pub fn new(table: &SqlTable, alias: Option<String>) -> Self {
        Self {
            table: table.clone(),
            alias,
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

    pub fn build(self) -> RenderResult<DeleteModel> {
        check_build_error(self.build_error)?;
        Ok(DeleteModel {
            table: self.table,
            alias: self.alias,
            where_model: self.where_model,
            order_by: self.order_by,
            limit: self.limit,
            config: self.config,
        })
    }
}

impl WhereSupport for DeleteBuilder {
    fn where_model_mut(&mut self) -> &mut WhereModel {
        &mut self.where_model
    }
}
