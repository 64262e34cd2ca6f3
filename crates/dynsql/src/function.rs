//! Scalar functions and aggregates usable wherever a column is.

use crate::column::{BasicColumn, SqlColumn};
use crate::error::RenderResult;
use crate::fragment::{FragmentAndParameters, FragmentCollector};
use crate::render::{AliasMode, RenderingContext};

/// A scalar function over one or more columns.
#[derive(Debug, Clone)]
pub enum Function {
    /// `(a + b + ...)`, `(a - b)`, `(a * b)`, `(a / b)`, `(a || b)`
    Operator {
        operator: &'static str,
        operands: Vec<BasicColumn>,
    },
    /// `concat(a, b, ...)`
    Concat(Vec<BasicColumn>),
    /// `lower(c)`
    Lower(BasicColumn),
    /// `upper(c)`
    Upper(BasicColumn),
    /// `substring(c, offset, length)`
    Substring {
        column: BasicColumn,
        offset: i64,
        length: i64,
    },
    /// `cast(c as type)`
    Cast {
        column: BasicColumn,
        target_type: String,
    },
    /// `name(args...)` for functions without a dedicated variant.
    Applied {
        name: String,
        args: Vec<BasicColumn>,
    },
}

fn operator(operator: &'static str, a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Function {
    Function::Operator {
        operator,
        operands: vec![a.into(), b.into()],
    }
}

impl Function {
    pub fn add(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Self {
        operator("+", a, b)
    }

    pub fn subtract(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Self {
        operator("-", a, b)
    }

    pub fn multiply(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Self {
        operator("*", a, b)
    }

    pub fn divide(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Self {
        operator("/", a, b)
    }

    /// `(a || b)`
    pub fn concatenate(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Self {
        operator("||", a, b)
    }

    pub fn concat(a: impl Into<BasicColumn>, b: impl Into<BasicColumn>) -> Self {
        Function::Concat(vec![a.into(), b.into()])
    }

    pub fn lower(column: impl Into<BasicColumn>) -> Self {
        Function::Lower(column.into())
    }

    pub fn upper(column: impl Into<BasicColumn>) -> Self {
        Function::Upper(column.into())
    }

    pub fn substring(column: impl Into<BasicColumn>, offset: i64, length: i64) -> Self {
        Function::Substring {
            column: column.into(),
            offset,
            length,
        }
    }

    pub fn cast(column: impl Into<BasicColumn>, target_type: impl Into<String>) -> Self {
        Function::Cast {
            column: column.into(),
            target_type: target_type.into(),
        }
    }

    pub fn applied<I, C>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<BasicColumn>,
    {
        Function::Applied {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append another operand to an operator, `concat` or applied function.
    ///
    /// `add(a, b).then(c)` renders `(a + b + c)`. Other functions are returned unchanged.
    pub fn then(mut self, operand: impl Into<BasicColumn>) -> Self {
        match &mut self {
            Function::Operator { operands, .. }
            | Function::Concat(operands)
            | Function::Applied { args: operands, .. } => operands.push(operand.into()),
            _ => {}
        }
        self
    }

    /// Metadata source for values compared against this function.
    pub fn sql_column(&self) -> Option<&SqlColumn> {
        match self {
            Function::Operator { operands, .. }
            | Function::Concat(operands)
            | Function::Applied { args: operands, .. } => {
                operands.first().and_then(BasicColumn::sql_column)
            }
            Function::Lower(column) | Function::Upper(column) => column.sql_column(),
            Function::Substring { column, .. } => column.sql_column(),
            Function::Cast { .. } => None,
        }
    }

    pub fn render(
        &self,
        ctx: &RenderingContext,
        mode: AliasMode,
    ) -> RenderResult<FragmentAndParameters> {
        match self {
            Function::Operator { operator, operands } => {
                Ok(render_all(operands, ctx, mode)?.join_wrapped(&format!(" {operator} "), "(", ")"))
            }
            Function::Concat(operands) => {
                Ok(render_all(operands, ctx, mode)?.join_wrapped(", ", "concat(", ")"))
            }
            Function::Lower(column) => Ok(column
                .render(ctx, mode)?
                .map_fragment(|f| format!("lower({f})"))),
            Function::Upper(column) => Ok(column
                .render(ctx, mode)?
                .map_fragment(|f| format!("upper({f})"))),
            Function::Substring {
                column,
                offset,
                length,
            } => Ok(column
                .render(ctx, mode)?
                .map_fragment(|f| format!("substring({f}, {offset}, {length})"))),
            Function::Cast {
                column,
                target_type,
            } => Ok(column
                .render(ctx, mode)?
                .map_fragment(|f| format!("cast({f} as {target_type})"))),
            Function::Applied { name, args } => {
                Ok(render_all(args, ctx, mode)?.join_wrapped(", ", &format!("{name}("), ")"))
            }
        }
    }
}

fn render_all(
    columns: &[BasicColumn],
    ctx: &RenderingContext,
    mode: AliasMode,
) -> RenderResult<FragmentCollector> {
    columns.iter().map(|c| c.render(ctx, mode)).collect()
}

/// An aggregate function.
#[derive(Debug, Clone)]
pub enum Aggregate {
    CountAll,
    Count(BasicColumn),
    CountDistinct(BasicColumn),
    Max(BasicColumn),
    Min(BasicColumn),
    Avg(BasicColumn),
    Sum(BasicColumn),
}

impl Aggregate {
    /// Metadata source for values compared against this aggregate.
    ///
    /// Only aggregates that keep their argument's type forward it.
    pub fn sql_column(&self) -> Option<&SqlColumn> {
        match self {
            Aggregate::Max(c) | Aggregate::Min(c) | Aggregate::Sum(c) => c.sql_column(),
            _ => None,
        }
    }

    pub fn render(
        &self,
        ctx: &RenderingContext,
        mode: AliasMode,
    ) -> RenderResult<FragmentAndParameters> {
        let (name, column) = match self {
            Aggregate::CountAll => return Ok(FragmentAndParameters::new("count(*)")),
            Aggregate::Count(c) => ("count", c),
            Aggregate::CountDistinct(c) => {
                return Ok(c
                    .render(ctx, mode)?
                    .map_fragment(|f| format!("count(distinct {f})")));
            }
            Aggregate::Max(c) => ("max", c),
            Aggregate::Min(c) => ("min", c),
            Aggregate::Avg(c) => ("avg", c),
            Aggregate::Sum(c) => ("sum", c),
        };
        Ok(column
            .render(ctx, mode)?
            .map_fragment(|f| format!("{name}({f})")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalConfiguration;
    use crate::render::{MapperRenderingStrategy, TableAliasCalculator};
    use crate::table::SqlTable;
    use crate::value::Value;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn ctx() -> RenderingContext {
        RenderingContext::new(
            Arc::new(MapperRenderingStrategy),
            GlobalConfiguration::default().statement_configuration(),
        )
    }

    #[test]
    fn test_operators() {
        let t = SqlTable::new("t");
        let (a, b, c) = (t.column("a"), t.column("b"), t.column("c"));
        let f = Function::add(&a, &b).then(&c);
        assert_eq!(f.render(&ctx(), AliasMode::Qualified).unwrap().fragment(), "(a + b + c)");
        let f = Function::concatenate(&a, BasicColumn::StringConstant {
            value: "-".into(),
            alias: None,
        });
        assert_eq!(f.render(&ctx(), AliasMode::Qualified).unwrap().fragment(), "(a || '-')");
    }

    #[test]
    fn test_functions_with_alias() {
        let t = SqlTable::new("person");
        let name = t.column("name");
        let ctx = ctx().with_table_alias_calculator(TableAliasCalculator::explicit(
            HashMap::from([(t.id(), "p".to_string())]),
        ));
        let upper = Function::upper(Function::substring(&name, 1, 3));
        assert_eq!(
            upper.render(&ctx, AliasMode::Qualified).unwrap().fragment(),
            "upper(substring(p.name, 1, 3))"
        );
        assert_eq!(
            Function::cast(&name, "varchar(10)")
                .render(&ctx, AliasMode::Unqualified)
                .unwrap()
                .fragment(),
            "cast(name as varchar(10))"
        );
    }

    #[test]
    fn test_value_operand_is_bound() {
        let t = SqlTable::new("t");
        let f = Function::multiply(t.column("price"), BasicColumn::Value {
            value: Value::Int(2),
            alias: None,
        });
        let rendered = f.render(&ctx(), AliasMode::Qualified).unwrap();
        assert_eq!(rendered.fragment(), "(price * #{parameters.p1})");
        assert_eq!(rendered.parameters().len(), 1);
    }

    #[test]
    fn test_aggregates() {
        let t = SqlTable::new("t");
        let id = t.column("id").with_type_tag("INTEGER");
        let render = |a: Aggregate| a.render(&ctx(), AliasMode::Qualified).unwrap().fragment().to_string();
        assert_eq!(render(Aggregate::CountAll), "count(*)");
        assert_eq!(render(Aggregate::CountDistinct((&id).into())), "count(distinct id)");
        assert_eq!(render(Aggregate::Avg((&id).into())), "avg(id)");

        assert!(Aggregate::Max((&id).into()).sql_column().is_some());
        assert!(Aggregate::Count((&id).into()).sql_column().is_none());
    }
}
