//! Error types for dynsql

use std::fmt;
use thiserror::Error;

/// Result type alias for dynsql operations
pub type RenderResult<T> = Result<T, RenderError>;

/// The clause a criteria list was rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Where,
    Having,
}

impl ClauseKind {
    /// SQL keyword that introduces the clause.
    pub fn keyword(self) -> &'static str {
        match self {
            ClauseKind::Where => "where",
            ClauseKind::Having => "having",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The kind of statement being built or rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    InsertSelect,
    Update,
    Delete,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::InsertSelect => "insert select",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        })
    }
}

/// Error types for statement construction and rendering
#[derive(Debug, Error)]
pub enum RenderError {
    /// The statement is structurally invalid SQL (empty column list, JOIN without ON, ...)
    #[error("Invalid SQL: {0}")]
    InvalidSql(String),

    /// A WHERE/HAVING clause rendered no criteria and the statement forbids that
    #[error("Non-rendering {0} clause is not allowed for this statement")]
    NonRenderingClause(ClauseKind),

    /// A render-time element that must produce SQL rendered nothing
    /// (all insert/update mappings skipped, join ON or CASE WHEN criteria elided)
    #[error("Nothing rendered for {what}")]
    ElidedToNothing { what: &'static str },

    /// A list condition was rendered over an empty list under the `Error` policy
    #[error("Empty value list for in/not in condition on '{column}'")]
    EmptyList { column: String },

    /// A column mapping was dispatched to a statement kind that cannot render it
    #[error("Internal error: {mapping} mapping is not supported in {statement} statements")]
    UnsupportedMapping {
        statement: StatementKind,
        mapping: &'static str,
    },

    /// Configuration loading error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RenderError {
    /// Create an invalid SQL error
    pub fn invalid_sql(message: impl Into<String>) -> Self {
        Self::InvalidSql(message.into())
    }

    /// Create an elided-to-nothing error
    pub fn elided_to_nothing(what: &'static str) -> Self {
        Self::ElidedToNothing { what }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an unsupported mapping error
    pub fn unsupported_mapping(statement: StatementKind, mapping: &'static str) -> Self {
        Self::UnsupportedMapping { statement, mapping }
    }

    /// Check if this is an invalid SQL error
    pub fn is_invalid_sql(&self) -> bool {
        matches!(self, Self::InvalidSql(_))
    }

    /// Check if this is a non-rendering clause error
    pub fn is_non_rendering_clause(&self) -> bool {
        matches!(self, Self::NonRenderingClause(_))
    }

    /// Check if this error reports a required element that rendered nothing
    pub fn is_elided_to_nothing(&self) -> bool {
        matches!(self, Self::ElidedToNothing { .. })
    }

    /// Check if this error reports a broken internal invariant rather than caller misuse
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::UnsupportedMapping { .. })
    }

    /// Check if this error is raised while building a statement (before rendering)
    pub fn is_build_error(&self) -> bool {
        self.is_invalid_sql()
    }
}
