//! Predicate operators and their bound values.
//!
//! A [`Condition`] is independent of the column it is applied to; the criterion
//! renderer supplies the column at render time. Conditions are immutable: methods such
//! as [`Condition::when_present`] return a derived copy.
//!
//! # Example
//! ```ignore
//! use dynsql::Condition;
//!
//! Condition::is_equal_to(3);
//! Condition::is_between(1, 10);
//! Condition::is_in([1, 2, 3]);
//! Condition::is_equal_to(name).when_present();   // skipped when `name` is None
//! Condition::is_like(pattern).map_values(|v| v); // transform before binding
//! ```

use crate::column::BasicColumn;
use crate::config::StatementConfiguration;
use crate::error::{RenderError, RenderResult};
use crate::fragment::{FragmentAndParameters, FragmentCollector};
use crate::render::{AliasMode, RenderingContext};
use crate::statement::SelectModel;
use crate::value::Value;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Render-time predicate over a condition's captured values.
#[derive(Clone)]
pub struct RenderWhen(Arc<dyn Fn(&[Value]) -> bool + Send + Sync>);

impl RenderWhen {
    pub fn new(predicate: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn test(&self, values: &[Value]) -> bool {
        (self.0)(values)
    }

    fn and(self, next: RenderWhen) -> Self {
        Self::new(move |values| self.test(values) && next.test(values))
    }
}

impl fmt::Debug for RenderWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderWhen(..)")
    }
}

/// The column an empty `in`/`not in` list was applied to.
///
/// The column is rendered (and its parameters bound) only when the callback asks for it.
pub struct EmptyListTarget<'a> {
    column: &'a BasicColumn,
    ctx: &'a RenderingContext,
    mode: AliasMode,
    negated: bool,
}

impl EmptyListTarget<'_> {
    pub fn column(&self) -> &BasicColumn {
        self.column
    }

    /// `true` for `not in`.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn render_column(&self) -> RenderResult<FragmentAndParameters> {
        self.column.render(self.ctx, self.mode)
    }
}

type EmptyListFn =
    dyn Fn(&EmptyListTarget<'_>) -> RenderResult<FragmentAndParameters> + Send + Sync;

/// Renders the predicate used in place of `column in ()`.
#[derive(Clone)]
pub struct EmptyListCallback(Arc<EmptyListFn>);

impl fmt::Debug for EmptyListCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EmptyListCallback(..)")
    }
}

/// What an `in`/`not in` condition does when its list is empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyListPolicy {
    /// Render a constant predicate: `1=0` for `in`, `1=1` for `not in`.
    #[default]
    Constant,
    /// Do not render the condition (the enclosing criterion is elided).
    Skip,
    /// Fail the render with [`RenderError::EmptyList`].
    Error,
    /// Render whatever the callback returns.
    #[serde(skip)]
    Callback(EmptyListCallback),
}

impl EmptyListPolicy {
    pub fn callback(
        f: impl Fn(&EmptyListTarget<'_>) -> RenderResult<FragmentAndParameters>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self::Callback(EmptyListCallback(Arc::new(f)))
    }
}

/// A predicate operator together with the values it binds.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `column is null`, `column is not null`
    NoValue {
        operator: &'static str,
        when: Option<RenderWhen>,
    },
    /// `column = value`, `column like value`, ...
    SingleValue {
        operator: &'static str,
        value: Value,
        when: Option<RenderWhen>,
    },
    /// `column between first and second`
    TwoValue {
        operator: &'static str,
        values: [Value; 2],
        when: Option<RenderWhen>,
    },
    /// `column in (values...)`
    ListValue {
        operator: &'static str,
        negated: bool,
        values: Vec<Value>,
        when: Option<RenderWhen>,
        on_empty: Option<EmptyListPolicy>,
    },
    /// `column = other_column`
    Column {
        operator: &'static str,
        column: BasicColumn,
        when: Option<RenderWhen>,
    },
    /// `column in (select ...)`
    SubSelect {
        operator: &'static str,
        select: Box<SelectModel>,
        when: Option<RenderWhen>,
    },
}

fn single(operator: &'static str, value: impl Into<Value>) -> Condition {
    Condition::SingleValue {
        operator,
        value: value.into(),
        when: None,
    }
}

fn list<I, V>(operator: &'static str, negated: bool, values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::ListValue {
        operator,
        negated,
        values: values.into_iter().map(Into::into).collect(),
        when: None,
        on_empty: None,
    }
}

fn column(operator: &'static str, other: impl Into<BasicColumn>) -> Condition {
    Condition::Column {
        operator,
        column: other.into(),
        when: None,
    }
}

fn sub_select(operator: &'static str, select: SelectModel) -> Condition {
    Condition::SubSelect {
        operator,
        select: Box::new(select),
        when: None,
    }
}

impl Condition {
    // ==================== No value ====================

    pub fn is_null() -> Self {
        Condition::NoValue {
            operator: "is null",
            when: None,
        }
    }

    pub fn is_not_null() -> Self {
        Condition::NoValue {
            operator: "is not null",
            when: None,
        }
    }

    // ==================== Single value ====================

    pub fn is_equal_to(value: impl Into<Value>) -> Self {
        single("=", value)
    }

    pub fn is_not_equal_to(value: impl Into<Value>) -> Self {
        single("<>", value)
    }

    pub fn is_greater_than(value: impl Into<Value>) -> Self {
        single(">", value)
    }

    pub fn is_greater_than_or_equal_to(value: impl Into<Value>) -> Self {
        single(">=", value)
    }

    pub fn is_less_than(value: impl Into<Value>) -> Self {
        single("<", value)
    }

    pub fn is_less_than_or_equal_to(value: impl Into<Value>) -> Self {
        single("<=", value)
    }

    pub fn is_like(pattern: impl Into<Value>) -> Self {
        single("like", pattern)
    }

    pub fn is_not_like(pattern: impl Into<Value>) -> Self {
        single("not like", pattern)
    }

    /// `= value`, skipped when the value is null / `None`.
    pub fn is_equal_to_when_present(value: impl Into<Value>) -> Self {
        Self::is_equal_to(value).when_present()
    }

    /// `<> value`, skipped when the value is null / `None`.
    pub fn is_not_equal_to_when_present(value: impl Into<Value>) -> Self {
        Self::is_not_equal_to(value).when_present()
    }

    /// `like pattern`, skipped when the pattern is null / `None`.
    pub fn is_like_when_present(pattern: impl Into<Value>) -> Self {
        Self::is_like(pattern).when_present()
    }

    // ==================== Two values ====================

    pub fn is_between(first: impl Into<Value>, second: impl Into<Value>) -> Self {
        Condition::TwoValue {
            operator: "between",
            values: [first.into(), second.into()],
            when: None,
        }
    }

    pub fn is_not_between(first: impl Into<Value>, second: impl Into<Value>) -> Self {
        Condition::TwoValue {
            operator: "not between",
            values: [first.into(), second.into()],
            when: None,
        }
    }

    // ==================== Lists ====================

    pub fn is_in<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        list("in", false, values)
    }

    pub fn is_not_in<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        list("not in", true, values)
    }

    /// `in (...)` over the non-null values; skipped when none remain.
    pub fn is_in_when_present<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::is_in(values).when_present()
    }

    /// `not in (...)` over the non-null values; skipped when none remain.
    pub fn is_not_in_when_present<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::is_not_in(values).when_present()
    }

    // ==================== Columns ====================

    pub fn is_equal_to_column(other: impl Into<BasicColumn>) -> Self {
        column("=", other)
    }

    pub fn is_not_equal_to_column(other: impl Into<BasicColumn>) -> Self {
        column("<>", other)
    }

    pub fn is_greater_than_column(other: impl Into<BasicColumn>) -> Self {
        column(">", other)
    }

    pub fn is_greater_than_or_equal_to_column(other: impl Into<BasicColumn>) -> Self {
        column(">=", other)
    }

    pub fn is_less_than_column(other: impl Into<BasicColumn>) -> Self {
        column("<", other)
    }

    pub fn is_less_than_or_equal_to_column(other: impl Into<BasicColumn>) -> Self {
        column("<=", other)
    }

    // ==================== Sub-selects ====================

    pub fn is_in_sub_select(select: SelectModel) -> Self {
        sub_select("in", select)
    }

    pub fn is_not_in_sub_select(select: SelectModel) -> Self {
        sub_select("not in", select)
    }

    pub fn is_equal_to_sub_select(select: SelectModel) -> Self {
        sub_select("=", select)
    }

    pub fn is_not_equal_to_sub_select(select: SelectModel) -> Self {
        sub_select("<>", select)
    }

    pub fn is_greater_than_sub_select(select: SelectModel) -> Self {
        sub_select(">", select)
    }

    pub fn is_less_than_sub_select(select: SelectModel) -> Self {
        sub_select("<", select)
    }

    // ==================== Derivation ====================

    /// Values captured by this condition.
    pub fn values(&self) -> &[Value] {
        match self {
            Condition::SingleValue { value, .. } => std::slice::from_ref(value),
            Condition::TwoValue { values, .. } => values,
            Condition::ListValue { values, .. } => values,
            _ => &[],
        }
    }

    fn when_slot(&mut self) -> &mut Option<RenderWhen> {
        match self {
            Condition::NoValue { when, .. }
            | Condition::SingleValue { when, .. }
            | Condition::TwoValue { when, .. }
            | Condition::ListValue { when, .. }
            | Condition::Column { when, .. }
            | Condition::SubSelect { when, .. } => when,
        }
    }

    /// Copy that renders only when `predicate` holds for the captured values.
    ///
    /// Predicates accumulate: every predicate added must hold. Conditions without
    /// values (null checks, column and sub-select comparisons) pass an empty slice.
    pub fn when(mut self, predicate: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> Self {
        let next = RenderWhen::new(predicate);
        let slot = self.when_slot();
        *slot = Some(match slot.take() {
            Some(existing) => existing.and(next),
            None => next,
        });
        self
    }

    /// Copy that is skipped when its value is null.
    ///
    /// List conditions drop null elements instead and are skipped when no element
    /// remains. Conditions without values are unaffected.
    pub fn when_present(self) -> Self {
        match self {
            Condition::SingleValue { .. } | Condition::TwoValue { .. } => {
                self.when(|values| values.iter().all(|v| !v.is_null()))
            }
            Condition::ListValue { .. } => self
                .filter_values(|v| !v.is_null())
                .on_empty(EmptyListPolicy::Skip),
            other => other,
        }
    }

    /// Keep only list elements matching `predicate`.
    ///
    /// For single and two-value conditions the condition is skipped unless every
    /// value matches.
    pub fn filter_values(self, predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        match self {
            Condition::ListValue {
                operator,
                negated,
                values,
                when,
                on_empty,
            } => Condition::ListValue {
                operator,
                negated,
                values: values.into_iter().filter(|v| predicate(v)).collect(),
                when,
                on_empty,
            },
            other => other.when(move |values| values.iter().all(&predicate)),
        }
    }

    /// Copy with every captured value transformed by `f`.
    pub fn map_values(self, f: impl Fn(Value) -> Value) -> Self {
        match self {
            Condition::SingleValue {
                operator,
                value,
                when,
            } => Condition::SingleValue {
                operator,
                value: f(value),
                when,
            },
            Condition::TwoValue {
                operator,
                values,
                when,
            } => Condition::TwoValue {
                operator,
                values: values.map(f),
                when,
            },
            Condition::ListValue {
                operator,
                negated,
                values,
                when,
                on_empty,
            } => Condition::ListValue {
                operator,
                negated,
                values: values.into_iter().map(f).collect(),
                when,
                on_empty,
            },
            other => other,
        }
    }

    /// Copy with an explicit empty list policy. Ignored by non-list conditions.
    pub fn on_empty(self, policy: EmptyListPolicy) -> Self {
        match self {
            Condition::ListValue {
                operator,
                negated,
                values,
                when,
                ..
            } => Condition::ListValue {
                operator,
                negated,
                values,
                when,
                on_empty: Some(policy),
            },
            other => other,
        }
    }

    fn empty_list_policy<'a>(
        &'a self,
        config: &'a StatementConfiguration,
    ) -> Option<&'a EmptyListPolicy> {
        match self {
            Condition::ListValue {
                values, on_empty, ..
            } if values.is_empty() => Some(on_empty.as_ref().unwrap_or(config.empty_list_policy())),
            _ => None,
        }
    }

    /// Whether this condition renders under `config`.
    ///
    /// Evaluated at render time; a condition that does not render elides its whole
    /// criterion.
    pub fn should_render(&self, config: &StatementConfiguration) -> bool {
        let when = match self {
            Condition::NoValue { when, .. }
            | Condition::SingleValue { when, .. }
            | Condition::TwoValue { when, .. }
            | Condition::ListValue { when, .. }
            | Condition::Column { when, .. }
            | Condition::SubSelect { when, .. } => when,
        };
        when.as_ref().is_none_or(|w| w.test(self.values()))
            && !matches!(self.empty_list_policy(config), Some(EmptyListPolicy::Skip))
    }

    /// Render `column <operator> <values>`.
    ///
    /// Call only after [`should_render`](Self::should_render) returned true.
    pub fn render(
        &self,
        column: &BasicColumn,
        ctx: &RenderingContext,
        mode: AliasMode,
    ) -> RenderResult<FragmentAndParameters> {
        if let Some(policy) = self.empty_list_policy(ctx.config()) {
            return self.render_empty_list(policy, column, ctx, mode);
        }

        let meta = column.sql_column();
        let mut collector = FragmentCollector::new();
        collector.add(column.render(ctx, mode)?);

        match self {
            Condition::NoValue { operator, .. } => collector.add_text(*operator),
            Condition::SingleValue {
                operator, value, ..
            } => {
                collector.add_text(*operator);
                collector.add(ctx.bind(value.clone(), meta));
            }
            Condition::TwoValue {
                operator,
                values: [first, second],
                ..
            } => {
                collector.add_text(*operator);
                collector.add(ctx.bind(first.clone(), meta));
                collector.add_text("and");
                collector.add(ctx.bind(second.clone(), meta));
            }
            Condition::ListValue {
                operator, values, ..
            } => {
                let placeholders: FragmentCollector = values
                    .iter()
                    .map(|v| ctx.bind(v.clone(), meta))
                    .collect();
                collector.add_text(*operator);
                collector.add(placeholders.join_wrapped(", ", "(", ")"));
            }
            Condition::Column {
                operator,
                column: other,
                ..
            } => {
                collector.add_text(*operator);
                collector.add(other.render(ctx, mode)?);
            }
            Condition::SubSelect {
                operator, select, ..
            } => {
                collector.add_text(*operator);
                collector.add(
                    select
                        .render_nested(ctx)?
                        .map_fragment(|f| format!("({f})")),
                );
            }
        }

        Ok(collector.join(" "))
    }

    fn render_empty_list(
        &self,
        policy: &EmptyListPolicy,
        column: &BasicColumn,
        ctx: &RenderingContext,
        mode: AliasMode,
    ) -> RenderResult<FragmentAndParameters> {
        let negated = matches!(self, Condition::ListValue { negated: true, .. });
        match policy {
            EmptyListPolicy::Constant | EmptyListPolicy::Skip => Ok(FragmentAndParameters::new(
                if negated { "1=1" } else { "1=0" },
            )),
            EmptyListPolicy::Error => Err(RenderError::EmptyList {
                column: column.render(ctx, mode)?.fragment().to_string(),
            }),
            EmptyListPolicy::Callback(callback) => (callback.0)(&EmptyListTarget {
                column,
                ctx,
                mode,
                negated,
            }),
        }
    }
}
