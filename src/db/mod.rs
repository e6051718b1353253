/// Database layer
///
/// SQLite persistence for the live shopping list and the append-only change
/// history. The pool is shared behind an Arc so background tasks can hold a
/// handle while the session keeps working.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::{Database, DatabaseStats};
pub use models::{ChangeAction, ChangeRecord, HistoryEntry, StoredItem};
