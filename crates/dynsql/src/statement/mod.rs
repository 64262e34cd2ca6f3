//! Statement models, their builders and the final rendered output.
//!
//! - `select`: SELECT with joins, grouping, unions and paging
//! - `insert`: general INSERT and INSERT ... SELECT
//! - `update`: UPDATE ... SET
//! - `delete`: DELETE FROM
//!
//! Builders are consuming and record the first structural error they meet; it is
//! reported by `build()` as [`RenderError::InvalidSql`](crate::RenderError::InvalidSql).
//! Built models are immutable and can be rendered any number of times, each render
//! with its own [`RenderingContext`].

mod delete;
mod insert;
mod select;
mod traits;
mod update;


pub use delete::{DeleteBuilder, DeleteModel};
pub use insert::{InsertBuilder, InsertModel, InsertSelectBuilder, InsertSelectModel};
pub use select::{Join, JoinType, QueryExpression, SelectBuilder, SelectModel, TableExpression};
pub use traits::{MappingSupport, RenderStatement, WhereSupport};
pub use update::{UpdateBuilder, UpdateModel};

use crate::column::SortSpecification;
use crate::error::{RenderError, RenderResult, StatementKind};
use crate::fragment::{FragmentAndParameters, FragmentCollector, Parameters};
use crate::render::RenderingContext;
use crate::value::Value;
use serde::Serialize;

/// A complete statement and the parameters it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedStatement {
    statement: String,
    parameters: Parameters,
}

impl RenderedStatement {
    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn into_parts(self) -> (String, Parameters) {
        (self.statement, self.parameters)
    }

    /// Statement text and its parameter values in placeholder order.
    ///
    /// Pairs with [`PositionalRenderingStrategy`](crate::render::PositionalRenderingStrategy),
    /// whose `$n` placeholders follow the same order.
    pub fn into_positional(self) -> (String, Vec<Value>) {
        (self.statement, self.parameters.into_values().collect())
    }

    /// Parameters as references for `tokio-postgres`, in placeholder order.
    #[cfg(feature = "postgres")]
    pub fn params_ref(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.parameters
            .values()
            .map(|v| v as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect()
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn finish(kind: StatementKind, rendered: FragmentAndParameters) -> RenderedStatement {
    let (statement, parameters) = rendered.into_parts();
    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "dynsql.render",
        statement_kind = %kind,
        sql = %statement,
        params = parameters.len(),
        "rendered statement"
    );
    RenderedStatement {
        statement,
        parameters,
    }
}

/// LIMIT / OFFSET / FETCH FIRST, bound as parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Paging {
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) fetch_first: Option<i64>,
}

impl Paging {
    pub(crate) fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none() && self.fetch_first.is_none()
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.limit.is_some() && self.fetch_first.is_some() {
            return Err("limit and fetch first cannot be combined".to_string());
        }
        for (name, n) in [
            ("limit", self.limit),
            ("offset", self.offset),
            ("fetch first", self.fetch_first),
        ] {
            if n.is_some_and(|n| n < 0) {
                return Err(format!("{name} must not be negative"));
            }
        }
        Ok(())
    }

    /// `limit #{p} offset #{p}`, or `offset #{p} rows fetch first #{p} rows only`.
    pub(crate) fn render(&self, ctx: &RenderingContext) -> Option<FragmentAndParameters> {
        if self.is_empty() {
            return None;
        }
        let mut collector = FragmentCollector::new();
        let bind = |n: i64| ctx.bind(Value::Int(n), None);
        if let Some(limit) = self.limit {
            collector.add_text("limit");
            collector.add(bind(limit));
            if let Some(offset) = self.offset {
                collector.add_text("offset");
                collector.add(bind(offset));
            }
        } else {
            if let Some(offset) = self.offset {
                collector.add_text("offset");
                collector.add(bind(offset));
                collector.add_text("rows");
            }
            if let Some(fetch_first) = self.fetch_first {
                collector.add_text("fetch first");
                collector.add(bind(fetch_first));
                collector.add_text("rows only");
            }
        }
        Some(collector.join(" "))
    }
}

/// `order by a, b DESC`
pub(crate) fn render_order_by(order_by: &[SortSpecification]) -> Option<FragmentAndParameters> {
    if order_by.is_empty() {
        return None;
    }
    let items: Vec<String> = order_by.iter().map(SortSpecification::render).collect();
    Some(FragmentAndParameters::new(format!(
        "order by {}",
        items.join(", ")
    )))
}

/// Collect sort specifications, recording an error for an empty list.
pub(crate) fn collect_order_by<I, S>(columns: I, build_error: &mut Option<String>) -> Vec<SortSpecification>
where
    I: IntoIterator<Item = S>,
    S: Into<SortSpecification>,
{
    let order_by: Vec<SortSpecification> = columns.into_iter().map(Into::into).collect();
    if order_by.is_empty() {
        build_error.get_or_insert_with(|| "order by requires at least one column".to_string());
    }
    order_by
}

pub(crate) fn check_build_error(build_error: Option<String>) -> RenderResult<()> {
    match build_error {
        Some(message) => Err(RenderError::invalid_sql(message)),
        None => Ok(()),
    }
}
