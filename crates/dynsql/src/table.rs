//! Table identities.
//!
//! A [`SqlTable`] is created once when the schema is described and shared by every
//! column and statement that refers to it. Two tables are the same table only if
//! they come from the same [`SqlTable::new`] call, so a self-join can use two
//! distinct tables with the same runtime name.

use crate::column::SqlColumn;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`SqlTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u64);

#[derive(Clone)]
enum TableName {
    Fixed(String),
    Supplied(Arc<dyn Fn() -> String + Send + Sync>),
}

struct TableInner {
    id: TableId,
    name: TableName,
}

/// A database table.
#[derive(Clone)]
pub struct SqlTable(Arc<TableInner>);

impl SqlTable {
    /// Create a table with a fixed name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_name(TableName::Fixed(name.into()))
    }

    /// Create a table whose name is computed each time a statement is rendered.
    ///
    /// Useful for sharded or tenant-qualified tables.
    pub fn with_name_supplier(supplier: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::with_name(TableName::Supplied(Arc::new(supplier)))
    }

    fn with_name(name: TableName) -> Self {
        let id = TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed));
        Self(Arc::new(TableInner { id, name }))
    }

    /// Identity of this table.
    pub fn id(&self) -> TableId {
        self.0.id
    }

    /// The table name as it should appear in SQL right now.
    pub fn runtime_name(&self) -> String {
        match &self.0.name {
            TableName::Fixed(name) => name.clone(),
            TableName::Supplied(supplier) => supplier(),
        }
    }

    /// Define a column of this table.
    pub fn column(&self, name: impl Into<String>) -> SqlColumn {
        SqlColumn::new(self.clone(), name)
    }
}

impl PartialEq for SqlTable {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for SqlTable {}

impl fmt::Debug for SqlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlTable")
            .field("id", &self.0.id)
            .field("name", &self.runtime_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_identity_is_per_instance() {
        let a = SqlTable::new("person");
        let b = SqlTable::new("person");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.runtime_name(), b.runtime_name());
    }

    #[test]
    fn test_name_supplier_evaluated_at_render() {
        let shard = Arc::new(AtomicUsize::new(1));
        let current = shard.clone();
        let table =
            SqlTable::with_name_supplier(move || format!("orders_{}", current.load(Ordering::SeqCst)));
        assert_eq!(table.runtime_name(), "orders_1");
        shard.store(2, Ordering::SeqCst);
        assert_eq!(table.runtime_name(), "orders_2");
    }
}
