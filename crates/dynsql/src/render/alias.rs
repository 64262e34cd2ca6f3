//! Table alias resolution for a render scope.
//!
//! Scopes nest: a join, a correlated sub-select or a derived table renders with a
//! calculator composed over its parent's. Lookup order is the explicit aliases of the
//! innermost scope, then those of each enclosing scope, then (only for a guaranteed
//! innermost scope) the table's runtime name.

use crate::table::{SqlTable, TableId};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves the alias of a table in the current render scope.
#[derive(Debug, Clone, Default)]
pub enum TableAliasCalculator {
    /// No aliases.
    #[default]
    Empty,
    /// Registered aliases only.
    Explicit(Arc<HashMap<TableId, String>>),
    /// Registered aliases, else the table's runtime name.
    Guaranteed(Arc<HashMap<TableId, String>>),
    /// A child scope over its parent scope.
    Composed {
        child: Arc<TableAliasCalculator>,
        parent: Arc<TableAliasCalculator>,
    },
}

impl TableAliasCalculator {
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Calculator resolving only the given aliases.
    pub fn explicit(aliases: HashMap<TableId, String>) -> Self {
        Self::Explicit(Arc::new(aliases))
    }

    /// Calculator that always yields an alias, using the table name when none is registered.
    pub fn guaranteed(aliases: HashMap<TableId, String>) -> Self {
        Self::Guaranteed(Arc::new(aliases))
    }

    /// Compose `child` over `parent`. Neither input is modified.
    ///
    /// Only the child decides whether unregistered tables fall back to their name.
    pub fn compose(child: TableAliasCalculator, parent: TableAliasCalculator) -> Self {
        match (child, parent) {
            (child, Self::Empty) => child,
            (Self::Empty, parent) if !parent.is_guaranteed() => parent,
            (child, parent) => Self::Composed {
                child: Arc::new(child),
                parent: Arc::new(parent),
            },
        }
    }

    /// Alias of `table` in this scope.
    pub fn alias_for(&self, table: &SqlTable) -> Option<String> {
        self.registered_alias(table.id())
            .map(str::to_string)
            .or_else(|| self.is_guaranteed().then(|| table.runtime_name()))
    }

    fn registered_alias(&self, id: TableId) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Explicit(aliases) | Self::Guaranteed(aliases) => {
                aliases.get(&id).map(String::as_str)
            }
            Self::Composed { child, parent } => child
                .registered_alias(id)
                .or_else(|| parent.registered_alias(id)),
        }
    }

    fn is_guaranteed(&self) -> bool {
        match self {
            Self::Guaranteed(_) => true,
            Self::Composed { child, .. } => child.is_guaranteed(),
            _ => false,
        }
    }
}
