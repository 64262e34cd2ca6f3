//! `case` expressions.
//!
//! ```ignore
//! use dynsql::dsl::*;
//!
//! // case when p.age < #{p1} then 'minor' else 'adult' end
//! let stage = case()
//!     .when(&age, Condition::is_less_than(18)).then(string_constant("minor"))
//!     .else_(string_constant("adult"))
//!     .end()?;
//!
//! // case p.status when #{p1}, #{p2} then 1 else 0 end
//! let open = simple_case(&status)
//!     .when(["new", "active"]).then(constant("1"))
//!     .else_(constant("0"))
//!     .end()?;
//! ```

use crate::column::{BasicColumn, SqlColumn};
use crate::condition::Condition;
use crate::criterion::{Connector, Criterion};
use crate::error::{RenderError, RenderResult};
use crate::fragment::{FragmentAndParameters, FragmentCollector};
use crate::render::{AliasMode, CriterionRenderer, RenderingContext};
use crate::value::Value;

/// A `case` expression.
#[derive(Debug, Clone)]
pub enum CaseExpression {
    Searched(SearchedCase),
    Simple(SimpleCase),
}

#[derive(Debug, Clone)]
pub struct SearchedCase {
    whens: Vec<SearchedWhen>,
    else_value: Option<BasicColumn>,
}

#[derive(Debug, Clone)]
struct SearchedWhen {
    criteria: Vec<Criterion>,
    then: BasicColumn,
}

#[derive(Debug, Clone)]
pub struct SimpleCase {
    column: BasicColumn,
    whens: Vec<SimpleWhen>,
    else_value: Option<BasicColumn>,
}

#[derive(Debug, Clone)]
struct SimpleWhen {
    values: Vec<Value>,
    then: BasicColumn,
}

impl CaseExpression {
    pub fn render(
        &self,
        ctx: &RenderingContext,
        mode: AliasMode,
    ) -> RenderResult<FragmentAndParameters> {
        let mut collector = FragmentCollector::new();
        let else_value = match self {
            CaseExpression::Searched(case) => {
                collector.add_text("case");
                let renderer = CriterionRenderer::new(ctx, mode);
                for when in &case.whens {
                    let condition = renderer
                        .render_list(&when.criteria)?
                        .ok_or_else(|| RenderError::elided_to_nothing("case when"))?;
                    collector.add_text("when");
                    collector.add(condition);
                    collector.add_text("then");
                    collector.add(when.then.render(ctx, mode)?);
                }
                &case.else_value
            }
            CaseExpression::Simple(case) => {
                collector.add_text("case");
                collector.add(case.column.render(ctx, mode)?);
                let meta = case.column.sql_column();
                for when in &case.whens {
                    let values: FragmentCollector = when
                        .values
                        .iter()
                        .map(|v| ctx.bind(v.clone(), meta))
                        .collect();
                    collector.add_text("when");
                    collector.add(values.join(", "));
                    collector.add_text("then");
                    collector.add(when.then.render(ctx, mode)?);
                }
                &case.else_value
            }
        };
        if let Some(else_value) = else_value {
            collector.add_text("else");
            collector.add(else_value.render(ctx, mode)?);
        }
        collector.add_text("end");
        Ok(collector.join(" "))
    }

    /// Column metadata of a simple case's subject.
    pub fn sql_column(&self) -> Option<&SqlColumn> {
        match self {
            CaseExpression::Simple(case) => case.column.sql_column(),
            CaseExpression::Searched(_) => None,
        }
    }
}

/// Builds a searched `case when <criteria> then ...`.
#[derive(Debug, Default)]
pub struct SearchedCaseBuilder {
    whens: Vec<SearchedWhen>,
    pending: Option<Vec<Criterion>>,
    else_value: Option<BasicColumn>,
    build_error: Option<String>,
}

impl SearchedCaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a `when` branch.
    pub fn when(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.when_criterion(Criterion::new(column, condition))
    }

    /// Start a `when` branch from an arbitrary criterion.
    pub fn when_criterion(mut self, criterion: Criterion) -> Self {
        if self.pending.is_some() {
            self.fail("case: when without then");
        }
        self.pending = Some(vec![criterion]);
        self
    }

    pub fn and(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.extend(Criterion::new(column, condition).with_connector(Connector::And))
    }

    pub fn or(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.extend(Criterion::new(column, condition).with_connector(Connector::Or))
    }

    fn extend(mut self, criterion: Criterion) -> Self {
        match self.pending.as_mut() {
            Some(criteria) => criteria.push(criterion),
            None => self.fail("case: and/or before when"),
        }
        self
    }

    /// Finish the pending `when` branch.
    pub fn then(mut self, value: impl Into<BasicColumn>) -> Self {
        match self.pending.take() {
            Some(criteria) => self.whens.push(SearchedWhen {
                criteria,
                then: value.into(),
            }),
            None => self.fail("case: then without when"),
        }
        self
    }

    pub fn else_(mut self, value: impl Into<BasicColumn>) -> Self {
        self.else_value = Some(value.into());
        self
    }

    fn fail(&mut self, message: &str) {
        self.build_error.get_or_insert_with(|| message.to_string());
    }

    /// Finish the expression.
    pub fn end(self) -> RenderResult<BasicColumn> {
        if let Some(message) = self.build_error {
            return Err(RenderError::invalid_sql(message));
        }
        if self.pending.is_some() {
            return Err(RenderError::invalid_sql("case: when without then"));
        }
        if self.whens.is_empty() {
            return Err(RenderError::invalid_sql("case expression requires at least one when"));
        }
        Ok(CaseExpression::Searched(SearchedCase {
            whens: self.whens,
            else_value: self.else_value,
        })
        .into())
    }
}

/// Builds a simple `case <column> when <values> then ...`.
#[derive(Debug)]
pub struct SimpleCaseBuilder {
    column: BasicColumn,
    whens: Vec<SimpleWhen>,
    pending: Option<Vec<Value>>,
    else_value: Option<BasicColumn>,
    build_error: Option<String>,
}

impl SimpleCaseBuilder {
    pub fn new(column: impl Into<BasicColumn>) -> Self {
        Self {
            column: column.into(),
            whens: Vec::new(),
            pending: None,
            else_value: None,
            build_error: None,
        }
    }

    /// Start a `when` branch matching any of `values`.
    pub fn when<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if self.pending.is_some() {
            self.fail("case: when without then");
        }
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.fail("case: when requires at least one value");
        }
        self.pending = Some(values);
        self
    }

    pub fn then(mut self, value: impl Into<BasicColumn>) -> Self {
        match self.pending.take() {
            Some(values) => self.whens.push(SimpleWhen {
                values,
                then: value.into(),
            }),
            None => self.fail("case: then without when"),
        }
        self
    }

    pub fn else_(mut self, value: impl Into<BasicColumn>) -> Self {
        self.else_value = Some(value.into());
        self
    }

    fn fail(&mut self, message: &str) {
        self.build_error.get_or_insert_with(|| message.to_string());
    }

    pub fn end(self) -> RenderResult<BasicColumn> {
        if let Some(message) = self.build_error {
            return Err(RenderError::invalid_sql(message));
        }
        if self.pending.is_some() {
            return Err(RenderError::invalid_sql("case: when without then"));
        }
        if self.whens.is_empty() {
            return Err(RenderError::invalid_sql("case expression requires at least one when"));
        }
        Ok(CaseExpression::Simple(SimpleCase {
            column: self.column,
            whens: self.whens,
            else_value: self.else_value,
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalConfiguration;
    use crate::render::MapperRenderingStrategy;
    use crate::table::SqlTable;
    use std::sync::Arc;

    fn ctx() -> RenderingContext {
        RenderingContext::new(
            Arc::new(MapperRenderingStrategy),
            GlobalConfiguration::default().statement_configuration(),
        )
    }

    fn text(value: &str) -> BasicColumn {
        BasicColumn::StringConstant {
            value: value.to_string(),
            alias: None,
        }
    }

    #[test]
    fn test_searched_case() {
        let person = SqlTable::new("person");
        let age = person.column("age");
        let case = SearchedCaseBuilder::new()
            .when(&age, Condition::is_less_than(13))
            .then(text("child"))
            .when(&age, Condition::is_between(13, 19))
            .or(&age, Condition::is_null())
            .then(text("teen"))
            .else_(text("adult"))
            .end()
            .unwrap()
            .as_("stage");

        let rendered = case.render_select_item(&ctx()).unwrap();
        assert_eq!(
            rendered.fragment(),
            "case when age < #{parameters.p1} then 'child' \
             when age between #{parameters.p2} and #{parameters.p3} or age is null then 'teen' \
             else 'adult' end as stage"
        );
        assert_eq!(rendered.parameters().len(), 3);
    }

    #[test]
    fn test_simple_case_binds_with_column_metadata() {
        let person = SqlTable::new("person");
        let status = person.column("status").with_type_tag("VARCHAR");
        let case = SimpleCaseBuilder::new(&status)
            .when(["new", "active"])
            .then(text("open"))
            .end()
            .unwrap();

        let rendered = case.render(&ctx(), AliasMode::Qualified).unwrap();
        assert_eq!(
            rendered.fragment(),
            "case status when #{parameters.p1,jdbcType=VARCHAR}, #{parameters.p2,jdbcType=VARCHAR} then 'open' end"
        );
    }

    #[test]
    fn test_case_without_when_is_invalid() {
        let err = SearchedCaseBuilder::new().else_(text("x")).end().unwrap_err();
        assert!(err.is_invalid_sql());

        let person = SqlTable::new("person");
        let err = SimpleCaseBuilder::new(person.column("a")).end().unwrap_err();
        assert!(err.is_invalid_sql());
    }

    #[test]
    fn test_then_without_when_is_invalid() {
        let err = SearchedCaseBuilder::new().then(text("x")).end().unwrap_err();
        assert!(err.is_invalid_sql());
    }

    #[test]
    fn test_elided_when_fails_render() {
        let person = SqlTable::new("person");
        let case = SearchedCaseBuilder::new()
            .when(person.column("a"), Condition::is_equal_to(None::<i32>).when_present())
            .then(text("x"))
            .end()
            .unwrap();
        let err = case.render(&ctx(), AliasMode::Qualified).unwrap_err();
        assert!(!err.is_build_error());
        assert!(matches!(err, RenderError::ElidedToNothing { what: "case when" }));
    }
}
