/// Transient user-facing status messages
///
/// Every submitted command produces exactly one of these. A notification
/// stays visible for a fixed window; expiry is checked against a clock the
/// caller supplies so state transitions never depend on the timer.

use std::time::{Duration, Instant};

/// How long a notification stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// What kind of outcome the message reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Added,
    Removed,
    SearchHit,
    SearchMiss,
    Warning,
}

impl NotificationKind {
    /// Marker the CLI prefixes messages with
    pub fn emoji(&self) -> &'static str {
        match self {
            NotificationKind::Added => "✅",
            NotificationKind::Removed => "❌",
            NotificationKind::SearchHit => "✅",
            NotificationKind::SearchMiss => "🔍",
            NotificationKind::Warning => "⚠️",
        }
    }
}

/// One status message plus the moment it was raised
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    raised_at: Instant,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    /// True once the display window has elapsed at `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) >= NOTIFICATION_TTL
    }

    pub fn raised_at(&self) -> Instant {
        self.raised_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_notification_is_visible() {
        let n = Notification::new(NotificationKind::Added, "Added 2 rice(s)");
        assert!(!n.is_expired_at(n.raised_at()));
        assert!(!n.is_expired_at(n.raised_at() + Duration::from_secs(2)));
    }

    #[test]
    fn test_notification_expires_after_ttl() {
        let n = Notification::new(NotificationKind::Warning, "Not a shopping command.");
        assert!(n.is_expired_at(n.raised_at() + NOTIFICATION_TTL));
        assert!(n.is_expired_at(n.raised_at() + Duration::from_secs(10)));
    }

    #[test]
    fn test_kind_markers() {
        assert_eq!(NotificationKind::Added.emoji(), "✅");
        assert_eq!(NotificationKind::Warning.emoji(), "⚠️");
    }
}
