/// Core list engine
///
/// Pure list logic: intent validation, reconciliation, search, and the
/// controller state machine that ties them together. Nothing in here does
/// I/O; persistence and Gemini live behind the session.

pub mod controller;
pub mod intent;
pub mod item;
pub mod notification;
pub mod reconciler;
pub mod search;
pub mod validator;

pub use controller::{ListChange, ListController, SubmitOutcome, ViewMode};
pub use intent::{Intent, ItemIntent, PriceRange, SearchFilters, SearchIntent};
pub use item::ShoppingItem;
pub use notification::{Notification, NotificationKind};
