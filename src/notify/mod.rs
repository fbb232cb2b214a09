//! In-app notifications.
//!
//! Components that raise notifications hold a cloned [`Notifier`]; the UI
//! owns the single [`NotificationCenter`] and pumps it once per tick.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
    Warning,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Error => write!(f, "error"),
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Assigned by the [`Notifier`] on send.
    pub id: u64,
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    /// `None` stays until dismissed.
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: 0,
            level,
            title: title.into(),
            message: message.into(),
            duration: Some(DEFAULT_DURATION),
        }
    }

    pub fn sticky(mut self) -> Self {
        self.duration = None;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Cheap, cloneable sending half.
#[derive(Clone)]
pub struct Notifier {
    tx: UnboundedSender<Notification>,
    next_id: Arc<AtomicU64>,
}

impl Notifier {
    /// Send a notification, returning the id it was given.
    pub fn notify(&self, mut notification: Notification) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        notification.id = id;
        if self.tx.send(notification).is_err() {
            tracing::debug!(id, "Notification center gone, dropping notification");
        }
        id
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.notify(Notification::new(NotificationLevel::Success, title, message))
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.notify(Notification::new(NotificationLevel::Error, title, message))
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.notify(Notification::new(NotificationLevel::Info, title, message))
    }

    pub fn warning(&self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.notify(Notification::new(NotificationLevel::Warning, title, message))
    }
}

struct Shown {
    notification: Notification,
    since: Instant,
}

impl Shown {
    fn expired(&self, now: Instant) -> bool {
        match self.notification.duration {
            Some(d) => now.saturating_duration_since(self.since) >= d,
            None => false,
        }
    }
}

/// Receiving half: the list of notifications currently on screen.
pub struct NotificationCenter {
    rx: UnboundedReceiver<Notification>,
    shown: Vec<Shown>,
    enabled: bool,
}

/// Create a connected notifier/center pair.
pub fn channel() -> (Notifier, NotificationCenter) {
    let (tx, rx) = mpsc::unbounded_channel();
    let notifier = Notifier {
        tx,
        next_id: Arc::new(AtomicU64::new(0)),
    };
    let center = NotificationCenter {
        rx,
        shown: Vec::new(),
        enabled: true,
    };
    (notifier, center)
}

impl NotificationCenter {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// While disabled, incoming notifications are discarded on pump.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Take queued notifications and expire timed ones. Returns how many
    /// were added.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut added = 0;
        while let Ok(notification) = self.rx.try_recv() {
            if !self.enabled {
                tracing::debug!(id = notification.id, "Notifications disabled, dropping");
                continue;
            }
            self.shown.push(Shown {
                notification,
                since: now,
            });
            added += 1;
        }
        self.shown.retain(|s| !s.expired(now));
        added
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.shown.len();
        self.shown.retain(|s| s.notification.id != id);
        self.shown.len() != before
    }

    pub fn clear(&mut self) {
        self.shown.clear();
    }

    /// Oldest first.
    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.shown.iter().map(|s| &s.notification)
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.shown.last().map(|s| &s.notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_across_clones() {
        let (notifier, _center) = channel();
        let other = notifier.clone();
        let a = notifier.info("a", "");
        let b = other.info("b", "");
        assert!(b > a);
    }

    #[test]
    fn test_pump_collects_in_order() {
        let (notifier, mut center) = channel();
        notifier.success("Saved", "Preferences saved");
        notifier.error("Oops", "Something broke");

        let now = Instant::now();
        assert_eq!(center.pump(now), 2);
        let titles: Vec<&str> = center.active().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Saved", "Oops"]);
        assert_eq!(center.latest().unwrap().level, NotificationLevel::Error);
    }

    #[test]
    fn test_timed_notifications_expire() {
        let (notifier, mut center) = channel();
        notifier.info("timed", "");
        notifier.notify(Notification::new(NotificationLevel::Warning, "sticky", "").sticky());
        notifier.notify(
            Notification::new(NotificationLevel::Info, "short", "").with_duration(Duration::from_secs(1)),
        );

        let start = Instant::now();
        center.pump(start);
        assert_eq!(center.active().count(), 3);

        center.pump(start + Duration::from_secs(2));
        let titles: Vec<&str> = center.active().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["timed", "sticky"]);

        center.pump(start + DEFAULT_DURATION);
        let titles: Vec<&str> = center.active().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["sticky"]);
    }

    #[test]
    fn test_disabled_center_drops_incoming() {
        let (notifier, mut center) = channel();
        center.set_enabled(false);
        notifier.info("ignored", "");
        assert_eq!(center.pump(Instant::now()), 0);

        center.set_enabled(true);
        assert_eq!(center.active().count(), 0);
        notifier.info("shown", "");
        assert_eq!(center.pump(Instant::now()), 1);
    }

    #[test]
    fn test_dismiss_and_clear() {
        let (notifier, mut center) = channel();
        let id = notifier.notify(Notification::new(NotificationLevel::Info, "one", "").sticky());
        notifier.notify(Notification::new(NotificationLevel::Info, "two", "").sticky());
        center.pump(Instant::now());

        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert_eq!(center.active().count(), 1);

        center.clear();
        assert!(center.latest().is_none());
    }

    #[test]
    fn test_send_after_center_dropped() {
        let (notifier, center) = channel();
        drop(center);
        assert_eq!(notifier.info("late", ""), 1);
    }
}
