//! Column references.
//!
//! [`SqlColumn`] is a schema-level column: immutable, cheap to clone, and shared by
//! every criterion that mentions it. [`BasicColumn`] is anything that can stand where
//! a column stands: in a select list, on the left side of a criterion, as the value
//! of an update mapping.

use crate::case::CaseExpression;
use crate::error::RenderResult;
use crate::fragment::{FragmentAndParameters, quote_string_literal};
use crate::function::{Aggregate, Function};
use crate::render::{AliasMode, RenderingContext, RenderingStrategy};
use crate::table::SqlTable;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
struct ColumnInner {
    table: SqlTable,
    name: String,
    type_tag: Option<String>,
    type_handler: Option<String>,
    rendering_strategy: Option<Arc<dyn RenderingStrategy>>,
    alias: Option<String>,
}

/// A column of a [`SqlTable`].
#[derive(Clone)]
pub struct SqlColumn(Arc<ColumnInner>);

impl SqlColumn {
    pub(crate) fn new(table: SqlTable, name: impl Into<String>) -> Self {
        Self(Arc::new(ColumnInner {
            table,
            name: name.into(),
            type_tag: None,
            type_handler: None,
            rendering_strategy: None,
            alias: None,
        }))
    }

    fn derive(&self, f: impl FnOnce(&mut ColumnInner)) -> Self {
        let mut inner = (*self.0).clone();
        f(&mut inner);
        Self(Arc::new(inner))
    }

    pub fn table(&self) -> &SqlTable {
        &self.0.table
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Backend type tag (e.g. `INTEGER`, `VARCHAR`) passed to placeholder strategies.
    pub fn type_tag(&self) -> Option<&str> {
        self.0.type_tag.as_deref()
    }

    /// Type handler hint passed to placeholder strategies.
    pub fn type_handler(&self) -> Option<&str> {
        self.0.type_handler.as_deref()
    }

    /// Strategy that overrides the statement's strategy for this column's parameters.
    pub fn rendering_strategy(&self) -> Option<&Arc<dyn RenderingStrategy>> {
        self.0.rendering_strategy.as_ref()
    }

    /// Select-list alias.
    pub fn alias(&self) -> Option<&str> {
        self.0.alias.as_deref()
    }

    /// Copy of this column carrying a backend type tag.
    pub fn with_type_tag(&self, type_tag: impl Into<String>) -> Self {
        let type_tag = type_tag.into();
        self.derive(|c| c.type_tag = Some(type_tag))
    }

    /// Copy of this column carrying a type handler hint.
    pub fn with_type_handler(&self, type_handler: impl Into<String>) -> Self {
        let type_handler = type_handler.into();
        self.derive(|c| c.type_handler = Some(type_handler))
    }

    /// Copy of this column whose parameters are formatted by `strategy`.
    pub fn with_rendering_strategy(&self, strategy: impl RenderingStrategy + 'static) -> Self {
        let strategy: Arc<dyn RenderingStrategy> = Arc::new(strategy);
        self.derive(|c| c.rendering_strategy = Some(strategy))
    }

    /// Copy of this column with a select-list alias.
    pub fn as_(&self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.derive(|c| c.alias = Some(alias))
    }

    /// Descending sort on this column.
    pub fn descending(&self) -> SortSpecification {
        SortSpecification::from(self).descending()
    }
}

impl fmt::Debug for SqlColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlColumn")
            .field("table", &self.0.table)
            .field("name", &self.0.name)
            .field("type_tag", &self.0.type_tag)
            .field("alias", &self.0.alias)
            .finish_non_exhaustive()
    }
}

/// Anything that renders where a column may appear.
#[derive(Debug, Clone)]
pub enum BasicColumn {
    /// A table column.
    Column(SqlColumn),
    /// Literal SQL text, rendered as-is.
    Constant { value: String, alias: Option<String> },
    /// A string literal, rendered single-quoted.
    StringConstant { value: String, alias: Option<String> },
    /// A bound parameter.
    Value { value: Value, alias: Option<String> },
    Function {
        function: Box<Function>,
        alias: Option<String>,
    },
    Aggregate {
        aggregate: Box<Aggregate>,
        alias: Option<String>,
    },
    Case {
        case: Box<CaseExpression>,
        alias: Option<String>,
    },
}

impl BasicColumn {
    /// Copy with a select-list alias.
    pub fn as_(self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        match self {
            BasicColumn::Column(c) => BasicColumn::Column(c.as_(alias)),
            BasicColumn::Constant { value, .. } => BasicColumn::Constant {
                value,
                alias: Some(alias),
            },
            BasicColumn::StringConstant { value, .. } => BasicColumn::StringConstant {
                value,
                alias: Some(alias),
            },
            BasicColumn::Value { value, .. } => BasicColumn::Value {
                value,
                alias: Some(alias),
            },
            BasicColumn::Function { function, .. } => BasicColumn::Function {
                function,
                alias: Some(alias),
            },
            BasicColumn::Aggregate { aggregate, .. } => BasicColumn::Aggregate {
                aggregate,
                alias: Some(alias),
            },
            BasicColumn::Case { case, .. } => BasicColumn::Case {
                case,
                alias: Some(alias),
            },
        }
    }

    /// Select-list alias, if any.
    pub fn alias(&self) -> Option<&str> {
        match self {
            BasicColumn::Column(c) => c.alias(),
            BasicColumn::Constant { alias, .. }
            | BasicColumn::StringConstant { alias, .. }
            | BasicColumn::Value { alias, .. }
            | BasicColumn::Function { alias, .. }
            | BasicColumn::Aggregate { alias, .. }
            | BasicColumn::Case { alias, .. } => alias.as_deref(),
        }
    }

    /// The table column whose metadata applies to values compared against this column.
    ///
    /// Functions and value-preserving aggregates forward their first argument's column.
    pub fn sql_column(&self) -> Option<&SqlColumn> {
        match self {
            BasicColumn::Column(c) => Some(c),
            BasicColumn::Function { function, .. } => function.sql_column(),
            BasicColumn::Aggregate { aggregate, .. } => aggregate.sql_column(),
            _ => None,
        }
    }

    /// Render the column expression (without its alias).
    pub fn render(
        &self,
        ctx: &RenderingContext,
        mode: AliasMode,
    ) -> RenderResult<FragmentAndParameters> {
        match self {
            BasicColumn::Column(c) => Ok(FragmentAndParameters::new(ctx.render_column(c, mode))),
            BasicColumn::Constant { value, .. } => Ok(FragmentAndParameters::new(value.clone())),
            BasicColumn::StringConstant { value, .. } => {
                Ok(FragmentAndParameters::new(quote_string_literal(value)))
            }
            BasicColumn::Value { value, .. } => Ok(ctx.bind(value.clone(), None)),
            BasicColumn::Function { function, .. } => function.render(ctx, mode),
            BasicColumn::Aggregate { aggregate, .. } => aggregate.render(ctx, mode),
            BasicColumn::Case { case, .. } => case.render(ctx, mode),
        }
    }

    /// Render for a select list: the expression followed by `as alias` when aliased.
    pub fn render_select_item(
        &self,
        ctx: &RenderingContext,
    ) -> RenderResult<FragmentAndParameters> {
        let rendered = self.render(ctx, AliasMode::Qualified)?;
        Ok(match self.alias() {
            Some(alias) => rendered.map_fragment(|f| format!("{f} as {alias}")),
            None => rendered,
        })
    }
}

impl From<SqlColumn> for BasicColumn {
    fn from(column: SqlColumn) -> Self {
        BasicColumn::Column(column)
    }
}

impl From<&SqlColumn> for BasicColumn {
    fn from(column: &SqlColumn) -> Self {
        BasicColumn::Column(column.clone())
    }
}

impl From<Function> for BasicColumn {
    fn from(function: Function) -> Self {
        BasicColumn::Function {
            function: Box::new(function),
            alias: None,
        }
    }
}

impl From<Aggregate> for BasicColumn {
    fn from(aggregate: Aggregate) -> Self {
        BasicColumn::Aggregate {
            aggregate: Box::new(aggregate),
            alias: None,
        }
    }
}

impl From<CaseExpression> for BasicColumn {
    fn from(case: CaseExpression) -> Self {
        BasicColumn::Case {
            case: Box::new(case),
            alias: None,
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpecification {
    name: String,
    descending: bool,
}

impl SortSpecification {
    /// Sort by a column name or select-list alias.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: false,
        }
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub(crate) fn render(&self) -> String {
        if self.descending {
            format!("{} DESC", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl From<&SqlColumn> for SortSpecification {
    fn from(column: &SqlColumn) -> Self {
        Self::new(column.alias().unwrap_or(column.name()))
    }
}

impl From<SqlColumn> for SortSpecification {
    fn from(column: SqlColumn) -> Self {
        Self::from(&column)
    }
}
