//! In-memory reminder storage.
//!
//! The store is created once at startup and shared by handle
//! (`Arc<ReminderStore>`) with the router and the heartbeat. Records are
//! append-only: nothing is edited after insertion, and the only removal is a
//! bulk [`clear`](ReminderStore::clear). Nothing is persisted.
//!
//! Listing is global. Each record keeps the id of the conversation that
//! created it, but [`list`](ReminderStore::list) does not filter on it, so
//! every conversation sees every reminder.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::ExtractedReminder;

/// Reminder identifier: creation time in Unix milliseconds, bumped forward
/// when needed so ids strictly increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(pub u64);

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub id: ReminderId,
    /// Conversation the reminder came from.
    pub conversation_id: String,
    pub task: String,
    /// Free text, or `"not specified"`.
    pub time: String,
    /// Free text, or `"today"`.
    pub date: String,
    /// The message the reminder was extracted from, verbatim.
    pub original_text: String,
    pub created_at: DateTime<Utc>,
}

impl ReminderRecord {
    /// Build a record from a successful extraction, stamped with the current
    /// time.
    pub fn from_extraction(
        id: ReminderId,
        conversation_id: impl Into<String>,
        extracted: ExtractedReminder,
        original_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            conversation_id: conversation_id.into(),
            task: extracted.task,
            time: extracted.time,
            date: extracted.date,
            original_text: original_text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Ordered, append-only reminder collection safe for concurrent use.
///
/// Id allocation and the push happen under the same lock, so list order and
/// id order always agree. The lock is only held for a single append, clone,
/// or take; no operation awaits while holding it.
#[derive(Debug, Default)]
pub struct ReminderStore {
    state: Mutex<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<ReminderRecord>,
    /// Survives [`ReminderStore::clear`] so ids are never reused.
    last_id: u64,
}

impl StoreState {
    fn next_id(&mut self) -> ReminderId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last_id = now.max(self.last_id + 1);
        ReminderId(self.last_id)
    }
}

impl ReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Allocate a fresh id, build the record with it, and append it at the
    /// end. Returns a copy of the stored record.
    pub fn append(&self, build: impl FnOnce(ReminderId) -> ReminderRecord) -> ReminderRecord {
        let mut state = self.lock();
        let id = state.next_id();
        let record = build(id);
        debug!(
            id = %record.id,
            conversation = %record.conversation_id,
            "Storing reminder #{}",
            state.records.len() + 1
        );
        state.records.push(record.clone());
        record
    }

    /// Snapshot of all records in insertion order. Later mutations of the
    /// store do not affect the returned vector.
    pub fn list(&self) -> Vec<ReminderRecord> {
        self.lock().records.clone()
    }

    /// Remove every record. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let removed = std::mem::take(&mut self.lock().records);
        debug!("Cleared {} reminder(s)", removed.len());
        removed.len()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn add(store: &ReminderStore, conversation: &str, task: &str) -> ReminderRecord {
        store.append(|id| {
            ReminderRecord::from_extraction(
                id,
                conversation,
                ExtractedReminder {
                    task: task.into(),
                    time: "not specified".into(),
                    date: "today".into(),
                },
                format!("remind me to {task}"),
            )
        })
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = ReminderStore::new();
        for task in ["a", "b", "c"] {
            add(&store, "chat", task);
        }
        let tasks: Vec<String> = store.list().into_iter().map(|r| r.task).collect();
        assert_eq!(tasks, vec!["a", "b", "c"]);
    }

    #[test]
    fn list_is_a_snapshot() {
        let store = ReminderStore::new();
        add(&store, "chat", "a");
        let snapshot = store.list();
        add(&store, "chat", "b");
        store.clear();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].task, "a");
    }

    #[test]
    fn clear_empties_store() {
        let store = ReminderStore::new();
        for i in 0..5 {
            add(&store, "chat", &format!("task {i}"));
        }
        assert_eq!(store.clear(), 5);
        assert!(store.list().is_empty());
        assert!(store.is_empty());
        assert_eq!(store.clear(), 0);
    }

    #[test]
    fn ids_strictly_increase_across_clear() {
        let store = ReminderStore::new();
        let a = add(&store, "chat", "a").id;
        let b = add(&store, "chat", "b").id;
        store.clear();
        let c = add(&store, "chat", "c").id;
        assert!(a < b && b < c, "{a} < {b} < {c}");
    }

    #[test]
    fn record_keeps_conversation_and_original_text() {
        let store = ReminderStore::new();
        let r = add(&store, "alice@c.us", "call mom");
        assert_eq!(store.list(), vec![r.clone()]);
        assert_eq!(r.conversation_id, "alice@c.us");
        assert_eq!(r.original_text, "remind me to call mom");
        assert_eq!(r.time, "not specified");
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let store = Arc::new(ReminderStore::new());
        std::thread::scope(|s| {
            for t in 0..8 {
                let store = store.clone();
                s.spawn(move || {
                    for i in 0..500 {
                        add(&store, &format!("chat-{t}"), &format!("{t}-{i}"));
                    }
                });
            }
        });
        let all = store.list();
        assert_eq!(all.len(), 4000);
        let ids: HashSet<ReminderId> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 4000, "ids must be unique");
        let out_of_order = all.windows(2).filter(|w| w[0].id >= w[1].id).count();
        assert_eq!(out_of_order, 0, "ids must increase in list order");
    }
}
