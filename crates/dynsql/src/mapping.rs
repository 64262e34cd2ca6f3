//! Column assignments for INSERT and UPDATE.
//!
//! Each statement kind renders mappings through its own [`ColumnMappingVisitor`].
//! A visitor only overrides the variants its statement supports; the rest fail with
//! [`RenderError::UnsupportedMapping`].

use crate::column::{BasicColumn, SqlColumn};
use crate::error::{RenderError, RenderResult, StatementKind};
use crate::fragment::FragmentAndParameters;
use crate::render::{AliasMode, RenderingContext};
use crate::statement::SelectModel;
use crate::value::Value;

/// What a column is set to.
#[derive(Debug, Clone)]
pub enum MappingKind {
    /// `null`
    Null,
    /// Literal SQL text.
    Constant(String),
    /// Quoted string literal.
    StringConstant(String),
    /// Bound parameter.
    Value(Value),
    /// Bound parameter; the mapping is skipped when the value is null.
    ValueWhenPresent(Value),
    /// Another column or expression.
    Column(BasicColumn),
    /// `(select ...)`
    SubSelect(Box<SelectModel>),
}

/// One target column and its assignment.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    column: SqlColumn,
    kind: MappingKind,
}

impl ColumnMapping {
    pub fn new(column: &SqlColumn, kind: MappingKind) -> Self {
        Self {
            column: column.clone(),
            kind,
        }
    }

    pub fn column(&self) -> &SqlColumn {
        &self.column
    }

    pub fn kind(&self) -> &MappingKind {
        &self.kind
    }
}

/// Per-statement handler for every mapping variant.
pub trait ColumnMappingVisitor {
    type Output;

    fn statement_kind(&self) -> StatementKind;

    fn unsupported(&self, mapping: &'static str) -> RenderError {
        RenderError::unsupported_mapping(self.statement_kind(), mapping)
    }

    fn visit_null(&self, column: &SqlColumn) -> RenderResult<Self::Output> {
        let _ = column;
        Err(self.unsupported("null"))
    }

    fn visit_constant(&self, column: &SqlColumn, constant: &str) -> RenderResult<Self::Output> {
        let _ = (column, constant);
        Err(self.unsupported("constant"))
    }

    fn visit_string_constant(&self, column: &SqlColumn, value: &str) -> RenderResult<Self::Output> {
        let _ = (column, value);
        Err(self.unsupported("string constant"))
    }

    fn visit_value(&self, column: &SqlColumn, value: &Value) -> RenderResult<Self::Output> {
        let _ = (column, value);
        Err(self.unsupported("value"))
    }

    fn visit_value_when_present(
        &self,
        column: &SqlColumn,
        value: &Value,
    ) -> RenderResult<Self::Output> {
        let _ = (column, value);
        Err(self.unsupported("value when present"))
    }

    fn visit_column(&self, column: &SqlColumn, other: &BasicColumn) -> RenderResult<Self::Output> {
        let _ = (column, other);
        Err(self.unsupported("column"))
    }

    fn visit_sub_select(
        &self,
        column: &SqlColumn,
        select: &SelectModel,
    ) -> RenderResult<Self::Output> {
        let _ = (column, select);
        Err(self.unsupported("sub-select"))
    }

    /// Dispatch `mapping` to its handler.
    fn visit(&self, mapping: &ColumnMapping) -> RenderResult<Self::Output> {
        let column = mapping.column();
        match mapping.kind() {
            MappingKind::Null => self.visit_null(column),
            MappingKind::Constant(c) => self.visit_constant(column, c),
            MappingKind::StringConstant(s) => self.visit_string_constant(column, s),
            MappingKind::Value(v) => self.visit_value(column, v),
            MappingKind::ValueWhenPresent(v) => self.visit_value_when_present(column, v),
            MappingKind::Column(other) => self.visit_column(column, other),
            MappingKind::SubSelect(select) => self.visit_sub_select(column, select),
        }
    }
}

/// A column name and the fragment for its VALUES entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAndValue {
    pub field: String,
    pub value: FragmentAndParameters,
}

impl FieldAndValue {
    fn new(column: &SqlColumn, value: FragmentAndParameters) -> Self {
        Self {
            field: column.name().to_string(),
            value,
        }
    }
}

/// Renders general INSERT mappings. `None` means the column is left out.
#[derive(Debug, Clone, Copy)]
pub struct InsertMappingVisitor<'a> {
    ctx: &'a RenderingContext,
}

impl<'a> InsertMappingVisitor<'a> {
    pub fn new(ctx: &'a RenderingContext) -> Self {
        Self { ctx }
    }
}

impl ColumnMappingVisitor for InsertMappingVisitor<'_> {
    type Output = Option<FieldAndValue>;

    fn statement_kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn visit_null(&self, column: &SqlColumn) -> RenderResult<Self::Output> {
        Ok(Some(FieldAndValue::new(column, FragmentAndParameters::new("null"))))
    }

    fn visit_constant(&self, column: &SqlColumn, constant: &str) -> RenderResult<Self::Output> {
        Ok(Some(FieldAndValue::new(column, FragmentAndParameters::new(constant))))
    }

    fn visit_string_constant(&self, column: &SqlColumn, value: &str) -> RenderResult<Self::Output> {
        let literal = BasicColumn::StringConstant {
            value: value.to_string(),
            alias: None,
        };
        Ok(Some(FieldAndValue::new(
            column,
            literal.render(self.ctx, AliasMode::Unqualified)?,
        )))
    }

    fn visit_value(&self, column: &SqlColumn, value: &Value) -> RenderResult<Self::Output> {
        Ok(Some(FieldAndValue::new(
            column,
            self.ctx.bind(value.clone(), Some(column)),
        )))
    }

    fn visit_value_when_present(
        &self,
        column: &SqlColumn,
        value: &Value,
    ) -> RenderResult<Self::Output> {
        if value.is_null() {
            return Ok(None);
        }
        self.visit_value(column, value)
    }
}

/// Renders UPDATE `set` entries: `column = <value>`. `None` means the column is left out.
#[derive(Debug, Clone, Copy)]
pub struct UpdateMappingVisitor<'a> {
    ctx: &'a RenderingContext,
}

impl<'a> UpdateMappingVisitor<'a> {
    pub fn new(ctx: &'a RenderingContext) -> Self {
        Self { ctx }
    }

    fn assign(&self, column: &SqlColumn, value: FragmentAndParameters) -> Option<FragmentAndParameters> {
        let target = self.ctx.render_column(column, AliasMode::Unqualified);
        Some(value.map_fragment(|v| format!("{target} = {v}")))
    }
}

impl ColumnMappingVisitor for UpdateMappingVisitor<'_> {
    type Output = Option<FragmentAndParameters>;

    fn statement_kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn visit_null(&self, column: &SqlColumn) -> RenderResult<Self::Output> {
        Ok(self.assign(column, FragmentAndParameters::new("null")))
    }

    fn visit_constant(&self, column: &SqlColumn, constant: &str) -> RenderResult<Self::Output> {
        Ok(self.assign(column, FragmentAndParameters::new(constant)))
    }

    fn visit_string_constant(&self, column: &SqlColumn, value: &str) -> RenderResult<Self::Output> {
        let literal = BasicColumn::StringConstant {
            value: value.to_string(),
            alias: None,
        };
        Ok(self.assign(column, literal.render(self.ctx, AliasMode::Unqualified)?))
    }

    fn visit_value(&self, column: &SqlColumn, value: &Value) -> RenderResult<Self::Output> {
        Ok(self.assign(column, self.ctx.bind(value.clone(), Some(column))))
    }

    fn visit_value_when_present(
        &self,
        column: &SqlColumn,
        value: &Value,
    ) -> RenderResult<Self::Output> {
        if value.is_null() {
            return Ok(None);
        }
        self.visit_value(column, value)
    }

    fn visit_column(&self, column: &SqlColumn, other: &BasicColumn) -> RenderResult<Self::Output> {
        Ok(self.assign(column, other.render(self.ctx, AliasMode::Qualified)?))
    }

    fn visit_sub_select(
        &self,
        column: &SqlColumn,
        select: &SelectModel,
    ) -> RenderResult<Self::Output> {
        let rendered = select.render_nested(self.ctx)?;
        Ok(self.assign(column, rendered.map_fragment(|s| format!("({s})"))))
    }
}
