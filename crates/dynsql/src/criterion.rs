//! Boolean predicate trees for WHERE, HAVING, ON and CASE WHEN.
//!
//! A [`Criterion`] is one node: an optional connector joining it to the previous
//! sibling, a predicate, and nested sub-criteria. Trees are immutable once built and
//! may be rendered any number of times.

use crate::column::BasicColumn;
use crate::condition::Condition;
use crate::statement::SelectModel;
use std::fmt;

/// `and` / `or` joining a criterion to its preceding sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn keyword(self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// What a criterion tests.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `column <condition>`
    Condition {
        column: BasicColumn,
        condition: Condition,
    },
    /// No predicate of its own: parenthesizes the sub-criteria.
    Group,
    /// `not (criterion)`
    Not(Box<Criterion>),
    /// `exists (select ...)` / `not exists (select ...)`
    Exists {
        select: Box<SelectModel>,
        negated: bool,
    },
}

/// One node of a predicate tree.
#[derive(Debug, Clone)]
pub struct Criterion {
    connector: Option<Connector>,
    predicate: Predicate,
    sub_criteria: Vec<Criterion>,
}

impl Criterion {
    /// `column <condition>` without connector or sub-criteria.
    pub fn new(column: impl Into<BasicColumn>, condition: Condition) -> Self {
        Self::from_predicate(Predicate::Condition {
            column: column.into(),
            condition,
        })
    }

    /// A group over `criteria`. Their connectors apply inside the group.
    pub fn group(criteria: impl IntoIterator<Item = Criterion>) -> Self {
        Self {
            connector: None,
            predicate: Predicate::Group,
            sub_criteria: criteria.into_iter().collect(),
        }
    }

    pub fn not(criterion: Criterion) -> Self {
        Self::from_predicate(Predicate::Not(Box::new(criterion)))
    }

    pub fn exists(select: SelectModel) -> Self {
        Self::from_predicate(Predicate::Exists {
            select: Box::new(select),
            negated: false,
        })
    }

    pub fn not_exists(select: SelectModel) -> Self {
        Self::from_predicate(Predicate::Exists {
            select: Box::new(select),
            negated: true,
        })
    }

    fn from_predicate(predicate: Predicate) -> Self {
        Self {
            connector: None,
            predicate,
            sub_criteria: Vec::new(),
        }
    }

    /// Append `and column <condition>` as a sub-criterion.
    pub fn and(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.and_criterion(Criterion::new(column, condition))
    }

    /// Append `or column <condition>` as a sub-criterion.
    pub fn or(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.or_criterion(Criterion::new(column, condition))
    }

    /// Append a sub-criterion joined with `and`.
    pub fn and_criterion(self, criterion: Criterion) -> Self {
        self.push(criterion.with_connector(Connector::And))
    }

    /// Append a sub-criterion joined with `or`.
    pub fn or_criterion(self, criterion: Criterion) -> Self {
        self.push(criterion.with_connector(Connector::Or))
    }

    fn push(mut self, criterion: Criterion) -> Self {
        self.sub_criteria.push(criterion);
        self
    }

    /// Copy with its connector replaced.
    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn connector(&self) -> Option<Connector> {
        self.connector
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn sub_criteria(&self) -> &[Criterion] {
        &self.sub_criteria
    }
}

/// The criteria of one WHERE or HAVING clause, or of a join's ON.
#[derive(Debug, Clone, Default)]
pub struct WhereModel {
    criteria: Vec<Criterion>,
}

impl WhereModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a criterion. The first criterion's connector is never rendered.
    pub fn push(&mut self, connector: Option<Connector>, criterion: Criterion) {
        self.criteria.push(match connector {
            Some(connector) => criterion.with_connector(connector),
            None => criterion,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }
}

impl FromIterator<Criterion> for WhereModel {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}
