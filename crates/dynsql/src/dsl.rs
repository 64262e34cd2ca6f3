//! Free-function entry points for building statements.
//!
//! # Example
//! ```ignore
//! use dynsql::dsl::*;
//! use dynsql::{MapperRenderingStrategy, RenderStatement, SqlTable, WhereSupport};
//!
//! let person = SqlTable::new("person");
//! let id = person.column("id");
//! let first_name = person.column("first_name");
//! let last_name = person.column("last_name");
//!
//! let model = select([&id, &first_name])
//!     .from(&person)
//!     .where_(&id, is_equal_to(3))
//!     .and_criterion(group([
//!         on(&first_name, is_equal_to("Fred")),
//!         or(&last_name, is_like_when_present(None::<String>)),
//!     ]))
//!     .build()?;
//!
//! let rendered = model.render(MapperRenderingStrategy)?;
//! // select id, first_name from person where id = #{parameters.p1} and first_name = #{parameters.p2}
//! ```

use crate::case::{SearchedCaseBuilder, SimpleCaseBuilder};
use crate::column::BasicColumn;
use crate::condition::Condition;
use crate::criterion::{Connector, Criterion};
use crate::function::{Aggregate, Function};
use crate::statement::{DeleteBuilder, InsertBuilder, SelectBuilder, SelectModel, UpdateBuilder};
use crate::table::SqlTable;
use crate::value::Value;

// ==================== Statements ====================

pub fn select<I, C>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = C>,
    C: Into<BasicColumn>,
{
    SelectBuilder::new(false, columns)
}

pub fn select_distinct<I, C>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = C>,
    C: Into<BasicColumn>,
{
    SelectBuilder::new(true, columns)
}

/// `select count(*) from table`
pub fn count_from(table: &SqlTable) -> SelectBuilder {
    select([Aggregate::CountAll]).from(table)
}

pub fn insert_into(table: &SqlTable) -> InsertBuilder {
    InsertBuilder::new(table)
}

pub fn update(table: &SqlTable) -> UpdateBuilder {
    UpdateBuilder::new(table, None)
}

pub fn update_as(table: &SqlTable, alias: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder::new(table, Some(alias.into()))
}

pub fn delete_from(table: &SqlTable) -> DeleteBuilder {
    DeleteBuilder::new(table, None)
}

pub fn delete_from_as(table: &SqlTable, alias: impl Into<String>) -> DeleteBuilder {
    DeleteBuilder::new(table, Some(alias.into()))
}

// ==================== Criteria ====================

/// A criterion without connector; starts a join's ON list or a group.
pub fn on(column: impl Into<BasicColumn>, condition: Condition) -> Criterion {
    Criterion::new(column, condition)
}

pub fn and(column: impl Into<BasicColumn>, condition: Condition) -> Criterion {
    Criterion::new(column, condition).with_connector(Connector::And)
}

pub fn or(column: impl Into<BasicColumn>, condition: Condition) -> Criterion {
    Criterion::new(column, condition).with_connector(Connector::Or)
}

pub fn group(criteria: impl IntoIterator<Item = Criterion>) -> Criterion {
    Criterion::group(criteria)
}

pub fn not(criterion: Criterion) -> Criterion {
    Criterion::not(criterion)
}

pub fn exists(select: SelectModel) -> Criterion {
    Criterion::exists(select)
}

pub fn not_exists(select: SelectModel) -> Criterion {
    Criterion::not_exists(select)
}

// ==================== Conditions ====================

pub fn is_null() -> Condition {
    Condition::is_null()
}

pub fn is_not_null() -> Condition {
    Condition::is_not_null()
}

pub fn is_equal_to(value: impl Into<Value>) -> Condition {
    Condition::is_equal_to(value)
}

pub fn is_not_equal_to(value: impl Into<Value>) -> Condition {
    Condition::is_not_equal_to(value)
}

pub fn is_greater_than(value: impl Into<Value>) -> Condition {
    Condition::is_greater_than(value)
}

pub fn is_greater_than_or_equal_to(value: impl Into<Value>) -> Condition {
    Condition::is_greater_than_or_equal_to(value)
}

pub fn is_less_than(value: impl Into<Value>) -> Condition {
    Condition::is_less_than(value)
}

pub fn is_less_than_or_equal_to(value: impl Into<Value>) -> Condition {
    Condition::is_less_than_or_equal_to(value)
}

pub fn is_like(pattern: impl Into<Value>) -> Condition {
    Condition::is_like(pattern)
}

pub fn is_not_like(pattern: impl Into<Value>) -> Condition {
    Condition::is_not_like(pattern)
}

pub fn is_between(first: impl Into<Value>, second: impl Into<Value>) -> Condition {
    Condition::is_between(first, second)
}

pub fn is_not_between(first: impl Into<Value>, second: impl Into<Value>) -> Condition {
    Condition::is_not_between(first, second)
}

pub fn is_in<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::is_in(values)
}

pub fn is_not_in<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::is_not_in(values)
}

pub fn is_equal_to_when_present(value: impl Into<Value>) -> Condition {
    Condition::is_equal_to_when_present(value)
}

pub fn is_like_when_present(pattern: impl Into<Value>) -> Condition {
    Condition::is_like_when_present(pattern)
}

pub fn is_in_when_present<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::is_in_when_present(values)
}

pub fn is_equal_to_column(other: impl Into<BasicColumn>) -> Condition {
    Condition::is_equal_to_column(other)
}

pub fn is_in_sub_select(select: SelectModel) -> Condition {
    Condition::is_in_sub_select(select)
}

pub fn is_not_in_sub_select(select: SelectModel) -> Condition {
    Condition::is_not_in_sub_select(select)
}

// ==================== Columns, functions, aggregates ====================

/// Literal SQL text in a select list or expression.
pub fn constant(value: impl Into<String>) -> BasicColumn {
    BasicColumn::Constant {
        value: value.into(),
        alias: None,
    }
}

/// A quoted string literal.
pub fn string_constant(value: impl Into<String>) -> BasicColumn {
    BasicColumn::StringConstant {
        value: value.into(),
        alias: None,
    }
}

/// A bound parameter usable as an expression.
pub fn value(value: impl Into<Value>) -> BasicColumn {
    BasicColumn::Value {
        value: value.into(),
        alias: None,
    }
}

pub fn add(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Function {
    Function::add(a, b)
}

pub fn subtract(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Function {
    Function::subtract(a, b)
}

pub fn multiply(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Function {
    Function::multiply(a, b)
}

pub fn divide(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Function {
    Function::divide(a, b)
}

pub fn concatenate(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Function {
    Function::concatenate(a, b)
}

pub fn concat(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Function {
    Function::concat(a, b)
}

pub fn lower(column: impl Into<BasicColumn>) -> Function {
    Function::lower(column)
}

pub fn upper(column: impl Into<BasicColumn>) -> Function {
    Function::upper(column)
}

pub fn substring(column: impl Into<BasicColumn>, offset: i64, length: i64) -> Function {
    Function::substring(column, offset, length)
}

pub fn cast(column: impl Into<BasicColumn>, target_type: impl Into<String>) -> Function {
    Function::cast(column, target_type)
}

pub fn count_all() -> Aggregate {
    Aggregate::CountAll
}

pub fn count(column: impl Into<BasicColumn>) -> Aggregate {
    Aggregate::Count(column.into())
}

pub fn count_distinct(column: impl Into<BasicColumn>) -> Aggregate {
    Aggregate::CountDistinct(column.into())
}

pub fn max(column: impl Into<BasicColumn>) -> Aggregate {
    Aggregate::Max(column.into())
}

pub fn min(column: impl Into<BasicColumn>) -> Aggregate {
    Aggregate::Min(column.into())
}

pub fn avg(column: impl Into<BasicColumn>) -> Aggregate {
    Aggregate::Avg(column.into())
}

pub fn sum(column: impl Into<BasicColumn>) -> Aggregate {
    Aggregate::Sum(column.into())
}

// ==================== CASE ====================

/// `case when ... then ... end`
pub fn case() -> SearchedCaseBuilder {
    SearchedCaseBuilder::new()
}

/// `case column when ... then ... end`
pub fn simple_case(column: impl Into<BasicColumn>) -> SimpleCaseBuilder {
    SimpleCaseBuilder::new(column)
}
