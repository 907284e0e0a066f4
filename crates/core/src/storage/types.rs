use std::fmt;

/// The four tables of the store. Used as the pub/sub channel key for
/// change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Books,
    Wishlist,
    Cart,
    Comments,
}

impl Table {
    /// Every table, in schema order.
    pub const ALL: [Table; 4] = [Table::Books, Table::Wishlist, Table::Cart, Table::Comments];

    /// Returns the SQL table name.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Books => "books",
            Table::Wishlist => "wishlist",
            Table::Cart => "cart",
            Table::Comments => "comments",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Invalidation event published after a committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableChange {
    pub table: Table,
    /// Process-wide, strictly increasing mutation sequence number.
    pub seq: u64,
}

impl TableChange {
    pub fn new(table: Table, seq: u64) -> Self {
        Self { table, seq }
    }
}

/// What happened to the schema when the store was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// No schema marker was found; tables were created.
    Created,
    /// The persisted schema matches the current version.
    Current,
    /// The persisted version differed; all tables were dropped and recreated
    /// empty.
    Reset { from: i64, to: i64 },
}

impl SchemaStatus {
    /// Returns true when opening the store discarded persisted data.
    pub fn is_destructive(&self) -> bool {
        matches!(self, SchemaStatus::Reset { .. })
    }
}
