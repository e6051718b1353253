/// One interactive session over the shopping list
///
/// Wires the controller to the store and to Gemini. The in-memory list is
/// the source of truth while the session runs: store writes happen after
/// the change is applied and a failed write is reported, never rolled back.
/// Suggestion refreshes run on background tasks so a slow Gemini call can't
/// hold up the next command.

use crate::core::{ListChange, ListController, SubmitOutcome};
use crate::db::{Database, HistoryEntry};
use crate::error::{CartError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Turns one utterance into a raw intent payload
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    async fn extract(&self, utterance: &str) -> Result<Value>;
}

/// Produces buy-again suggestions from recent history
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, history: &[HistoryEntry]) -> Result<Vec<String>>;
}

/// Where utterances come from
///
/// The binary reads stdin; tests feed scripted lines. Speech-to-text lives
/// behind this seam too, it just hands over finished transcripts.
pub trait UtteranceSource {
    fn produce_utterance(&mut self) -> Option<String>;
}

/// Results from background work, delivered between turns
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Recommendations(Vec<String>),
    Warning(String),
}

/// Everything one utterance produced
#[derive(Debug)]
pub struct TurnReport {
    pub outcome: SubmitOutcome,
    /// Persistence trouble the user should hear about, empty on clean turns
    pub notices: Vec<String>,
}

pub struct Session {
    controller: ListController,
    db: Arc<Database>,
    extractor: Arc<dyn IntentExtractor>,
    recommender: Arc<dyn Recommender>,
    history_window: i64,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    refresh: Option<JoinHandle<()>>,
    recommendations: Vec<String>,
}

impl Session {
    pub fn new(
        db: Arc<Database>,
        extractor: Arc<dyn IntentExtractor>,
        recommender: Arc<dyn Recommender>,
        history_window: i64,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            controller: ListController::new(),
            db,
            extractor,
            recommender,
            history_window,
            events_tx,
            events_rx,
            refresh: None,
            recommendations: Vec::new(),
        }
    }

    /// Load the saved list and kick off the first suggestion refresh
    pub async fn start(&mut self) -> Result<()> {
        let items = self.db.load_items().await?;
        debug!(count = items.len(), "hydrated saved list");
        self.controller.hydrate(items);
        self.spawn_refresh();

        Ok(())
    }

    /// Run one utterance through extract, submit, persist
    ///
    /// An extraction failure becomes a warning outcome with the list
    /// untouched. A store write failure lands in the notices while the
    /// in-memory change stands.
    pub async fn handle_utterance(&mut self, utterance: &str) -> TurnReport {
        let payload = match self.extractor.extract(utterance).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "intent extraction failed");
                return TurnReport {
                    outcome: self.controller.warn(e.user_message()),
                    notices: Vec::new(),
                };
            }
        };

        let outcome = self.controller.submit_raw(&payload);
        let mut notices = Vec::new();

        if let Err(e) = self.persist(&outcome).await {
            warn!(error = %e, "persisting list change failed");
            notices.push(CartError::PersistenceWriteFailed(e.to_string()).user_message());
        } else if outcome.change != ListChange::None {
            debug!("list change persisted");
        }

        // Only actual list changes are worth new suggestions
        if outcome.change != ListChange::None {
            self.spawn_refresh();
        }

        TurnReport { outcome, notices }
    }

    /// Mirror one outcome into the store
    async fn persist(&self, outcome: &SubmitOutcome) -> Result<()> {
        match &outcome.change {
            ListChange::Upserted(item) => self.db.upsert_item(item).await?,
            ListChange::Deleted(key) => self.db.remove_item(key).await?,
            ListChange::None => {}
        }

        if let Some(record) = &outcome.record {
            self.db.append_history(record).await?;
        }

        Ok(())
    }

    // Refresh suggestions on a background task. Replacing the handle detaches
    // any older refresh; its event still arrives through the channel.
    fn spawn_refresh(&mut self) {
        let db = Arc::clone(&self.db);
        let recommender = Arc::clone(&self.recommender);
        let tx = self.events_tx.clone();
        let window = self.history_window;

        self.refresh = Some(tokio::spawn(async move {
            let event = match refresh_once(&db, recommender.as_ref(), window).await {
                Ok(suggestions) => SessionEvent::Recommendations(suggestions),
                Err(e) => {
                    warn!(error = %e, "suggestion refresh failed");
                    SessionEvent::Warning(e.user_message())
                }
            };

            // The receiver lives as long as the session; a send failure just
            // means the whole session is already gone.
            let _ = tx.send(event);
        }));
    }

    /// Drain pending background events, folding suggestions into the session
    pub fn poll_events(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        while let Ok(event) = self.events_rx.try_recv() {
            if let SessionEvent::Recommendations(suggestions) = &event {
                self.recommendations = suggestions.clone();
            }
            events.push(event);
        }

        events
    }

    /// Wait for the in-flight refresh, then drain events
    ///
    /// One-shot commands call this before exiting so the background result
    /// isn't dropped on the floor.
    pub async fn settle(&mut self) -> Vec<SessionEvent> {
        if let Some(handle) = self.refresh.take() {
            let _ = handle.await;
        }

        self.poll_events()
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn controller(&self) -> &ListController {
        &self.controller
    }
}

async fn refresh_once(
    db: &Database,
    recommender: &dyn Recommender,
    window: i64,
) -> Result<Vec<String>> {
    let history = db.recent_history(window).await?;
    recommender.recommend(&history).await
}
