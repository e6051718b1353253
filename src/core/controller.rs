// The list controller: one state machine per session
//
// Routes validated intents to reconciliation or search and owns the
// authoritative list, the view mode, and the active notification. All the
// durable-store and recommendation work happens outside, driven by the
// outcome this hands back.

use crate::core::intent::{Intent, ItemIntent, SearchIntent, NOT_A_COMMAND};
use crate::core::item::{name_key, ShoppingItem};
use crate::core::notification::{Notification, NotificationKind};
use crate::core::{reconciler, search, validator};
use crate::db::models::{ChangeAction, ChangeRecord};
use serde_json::Value;
use std::time::Instant;

/// What the user is currently looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Listing,
    Searching,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Listing
    }
}

/// How a submitted command altered the live list, for collaborators that
/// mirror it into the store
#[derive(Debug, Clone, PartialEq)]
pub enum ListChange {
    /// Nothing to mirror
    None,
    /// This entry is now on the list (inserted or merged)
    Upserted(ShoppingItem),
    /// The entry under this identity key was dropped
    Deleted(String),
}

/// Everything a frontend and its collaborators need after one command
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub list: Vec<ShoppingItem>,
    pub view: ViewMode,
    pub notification: Notification,
    pub change: ListChange,
    /// History row to append, present when the list actually changed
    pub record: Option<ChangeRecord>,
}

/// Orchestrates validation, reconciliation, and search over the one list
#[derive(Debug, Default)]
pub struct ListController {
    list: Vec<ShoppingItem>,
    view: ViewMode,
    search_results: Vec<ShoppingItem>,
    notification: Option<Notification>,
}

impl ListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the list from the store at session start
    pub fn hydrate(&mut self, items: Vec<ShoppingItem>) {
        self.list = items;
    }

    /// Validate a raw extraction payload and run it
    ///
    /// Validation failures never escape: they become warning outcomes with
    /// the list and view left untouched.
    pub fn submit_raw(&mut self, raw: &Value) -> SubmitOutcome {
        match validator::normalize(raw) {
            Ok(intent) => self.submit(intent),
            Err(e) => self.warn(e.user_message()),
        }
    }

    /// Run one validated intent to completion
    pub fn submit(&mut self, intent: Intent) -> SubmitOutcome {
        match intent {
            Intent::NotAShoppingCommand => self.warn(NOT_A_COMMAND.to_string()),
            Intent::SearchItem(search_intent) => self.run_search(&search_intent),
            Intent::AddToList(item_intent) => self.run_add(item_intent),
            Intent::RemoveFromList(item_intent) => self.run_remove(item_intent),
        }
    }

    /// Raise a warning without touching the list or the view
    ///
    /// Also used by the session when a collaborator fails before an intent
    /// ever reaches the controller.
    pub fn warn(&mut self, message: String) -> SubmitOutcome {
        let notification = Notification::new(NotificationKind::Warning, message);
        self.notification = Some(notification.clone());
        self.outcome(notification, ListChange::None, None)
    }

    fn run_search(&mut self, intent: &SearchIntent) -> SubmitOutcome {
        let matches = search::search(&self.list, &intent.term);
        self.view = ViewMode::Searching;

        let notification = if matches.is_empty() {
            Notification::new(NotificationKind::SearchMiss, "No matching items found.")
        } else {
            Notification::new(
                NotificationKind::SearchHit,
                format!("Found {} item(s) matching \"{}\"", matches.len(), intent.term),
            )
        };

        self.search_results = matches;
        self.notification = Some(notification.clone());
        self.outcome(notification, ListChange::None, None)
    }

    fn run_add(&mut self, intent: ItemIntent) -> SubmitOutcome {
        self.leave_search();

        let (list, notification) = reconciler::apply_add(std::mem::take(&mut self.list), &intent);
        self.list = list;

        // An add always leaves the merged entry on the list
        let key = name_key(&intent.item);
        let change = match self.list.iter().find(|entry| entry.key() == key) {
            Some(entry) => ListChange::Upserted(entry.clone()),
            None => ListChange::None,
        };

        let record = ChangeRecord::from_intent(ChangeAction::Added, &intent);
        self.notification = Some(notification.clone());
        self.outcome(notification, change, Some(record))
    }

    fn run_remove(&mut self, intent: ItemIntent) -> SubmitOutcome {
        self.leave_search();

        let key = name_key(&intent.item);
        let existed = self.list.iter().any(|entry| entry.key() == key);

        let (list, notification) =
            reconciler::apply_remove(std::mem::take(&mut self.list), &intent);
        self.list = list;

        // Removing something that was never there changes nothing, so there
        // is nothing to persist either; the notification still goes out.
        let (change, record) = if existed {
            let record = ChangeRecord::from_intent(ChangeAction::Removed, &intent);
            let change = match self.list.iter().find(|entry| entry.key() == key) {
                Some(entry) => ListChange::Upserted(entry.clone()),
                None => ListChange::Deleted(key),
            };
            (change, Some(record))
        } else {
            (ListChange::None, None)
        };

        self.notification = Some(notification.clone());
        self.outcome(notification, change, record)
    }

    /// Adds and removes dismiss any active search
    fn leave_search(&mut self) {
        self.view = ViewMode::Listing;
        self.search_results.clear();
    }

    fn outcome(
        &self,
        notification: Notification,
        change: ListChange,
        record: Option<ChangeRecord>,
    ) -> SubmitOutcome {
        SubmitOutcome {
            list: self.list.clone(),
            view: self.view,
            notification,
            change,
            record,
        }
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.list
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn search_results(&self) -> &[ShoppingItem] {
        &self.search_results
    }

    /// What the frontend should render right now
    pub fn visible_items(&self) -> &[ShoppingItem] {
        match self.view {
            ViewMode::Listing => &self.list,
            ViewMode::Searching => &self.search_results,
        }
    }

    /// The active notification, unless its display window has elapsed
    pub fn current_notification_at(&self, now: Instant) -> Option<&Notification> {
        self.notification
            .as_ref()
            .filter(|notification| !notification.is_expired_at(now))
    }
}
