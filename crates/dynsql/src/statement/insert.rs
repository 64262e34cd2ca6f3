//! INSERT statements.

use crate::column::SqlColumn;
use crate::config::StatementConfiguration;
use crate::error::{RenderError, RenderResult, StatementKind};
use crate::fragment::{FragmentAndParameters, FragmentCollector};
use crate::mapping::{ColumnMapping, ColumnMappingVisitor, InsertMappingVisitor};
use crate::render::RenderingContext;
use crate::statement::select::SelectModel;
use crate::statement::traits::{MappingSupport, RenderStatement};
use crate::statement::{RenderedStatement, finish};
use crate::table::SqlTable;

/// A built `insert into t (cols) values (...)`.
#[derive(Debug, Clone)]
pub struct InsertModel {
    table: SqlTable,
    mappings: Vec<ColumnMapping>,
    config: StatementConfiguration,
}

impl InsertModel {
    pub fn table(&self) -> &SqlTable {
        &self.table
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }
}

impl RenderStatement for InsertModel {
    fn statement_kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn statement_configuration(&self) -> &StatementConfiguration {
        &self.config
    }

    fn render_in(&self, ctx: &RenderingContext) -> RenderResult<RenderedStatement> {
        let visitor = InsertMappingVisitor::new(ctx);
        let mut fields = Vec::with_capacity(self.mappings.len());
        let mut values = FragmentCollector::new();
        for mapping in &self.mappings {
            if let Some(field) = visitor.visit(mapping)? {
                fields.push(field.field);
                values.add(field.value);
            }
        }
        if fields.is_empty() {
            return Err(RenderError::elided_to_nothing("insert values"));
        }

        let mut collector = FragmentCollector::new();
        collector.add_text(format!(
            "insert into {} ({})",
            self.table.runtime_name(),
            fields.join(", ")
        ));
        collector.add(values.join_wrapped(", ", "values (", ")"));
        Ok(finish(self.statement_kind(), collector.join(" ")))
    }
}

/// Builds an [`InsertModel`], or an [`InsertSelectModel`] via [`select`](Self::select).
#[derive(Debug)]
pub struct InsertBuilder {
    table: SqlTable,
    mappings: Vec<ColumnMapping>,
    config: StatementConfiguration,
}

impl InsertBuilder {
    pub fn new(table: &SqlTable) -> Self {
        Self {
            table: table.clone(),
            mappings: Vec::new(),
            config: StatementConfiguration::default(),
        }
    }

    /// Switch to `insert into t (columns) select ...`.
    pub fn with_columns<'c>(self, columns: impl IntoIterator<Item = &'c SqlColumn>) -> InsertSelectBuilder {
        InsertSelectBuilder {
            table: self.table,
            columns: Some(columns.into_iter().cloned().collect()),
            select: None,
            config: self.config,
        }
    }

    /// Switch to `insert into t select ...` without a column list.
    pub fn select(self, select: SelectModel) -> InsertSelectBuilder {
        InsertSelectBuilder {
            table: self.table,
            columns: None,
            select: Some(select),
            config: self.config,
        }
    }

    pub fn configure_statement(mut self, f: impl FnOnce(&mut StatementConfiguration)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn build(self) -> RenderResult<InsertModel> {
        if self.mappings.is_empty() {
            return Err(RenderError::invalid_sql("insert requires at least one column mapping"));
        }
        Ok(InsertModel {
            table: self.table,
            mappings: self.mappings,
            config: self.config,
        })
    }
}

impl MappingSupport for InsertBuilder {
    fn push_mapping(&mut self, mapping: ColumnMapping) {
        self.mappings.push(mapping);
    }
}

/// A built `insert into t (cols) select ...`.
#[derive(Debug, Clone)]
pub struct InsertSelectModel {
    table: SqlTable,
    columns: Option<Vec<SqlColumn>>,
    select: SelectModel,
    config: StatementConfiguration,
}

impl RenderStatement for InsertSelectModel {
    fn statement_kind(&self) -> StatementKind {
        StatementKind::InsertSelect
    }

    fn statement_configuration(&self) -> &StatementConfiguration {
        &self.config
    }

    fn render_in(&self, ctx: &RenderingContext) -> RenderResult<RenderedStatement> {
        let mut head = format!("insert into {}", self.table.runtime_name());
        if let Some(columns) = &self.columns {
            let names: Vec<&str> = columns.iter().map(SqlColumn::name).collect();
            head.push_str(&format!(" ({})", names.join(", ")));
        }
        let mut collector = FragmentCollector::new();
        collector.add(FragmentAndParameters::new(head));
        collector.add(self.select.render_nested(ctx)?);
        Ok(finish(self.statement_kind(), collector.join(" ")))
    }
}

/// Builds an [`InsertSelectModel`].
#[derive(Debug)]
pub struct InsertSelectBuilder {
    table: SqlTable,
    columns: Option<Vec<SqlColumn>>,
    select: Option<SelectModel>,
    config: StatementConfiguration,
}

impl InsertSelectBuilder {
    pub fn select(mut self, select: SelectModel) -> Self {
        self.select = Some(select);
        self
    }

    pub fn configure_statement(mut self, f: impl FnOnce(&mut StatementConfiguration)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn build(self) -> RenderResult<InsertSelectModel> {
        if self.columns.as_ref().is_some_and(Vec::is_empty) {
            return Err(RenderError::invalid_sql(
                "insert select column list must not be empty",
            ));
        }
        let select = self
            .select
            .ok_or_else(|| RenderError::invalid_sql("insert select requires a select statement"))?;
        Ok(InsertSelectModel {
            table: self.table,
            columns: self.columns,
            select,
            config: self.config,
        })
    }
}
