use tokio::sync::RwLock;

use crate::reminder::{Reminder, ReminderId};

/// Shared registry of pending reminders.
///
/// The scheduler loop never iterates the live collection; it works from
/// `snapshot` copies, so additions and removals racing a scan can only make
/// a reminder wait for the next tick.
#[derive(Default)]
pub struct ReminderStore {
    entries: RwLock<Vec<Reminder>>,
}

impl ReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, reminder: Reminder) {
        self.entries.write().await.push(reminder);
    }

    /// Removes the first entry with the given id. Returns false if no such
    /// reminder is pending.
    pub async fn remove(&self, id: ReminderId) -> bool {
        let mut entries = self.entries.write().await;
        match entries.iter().position(|r| r.id() == id) {
            Some(index) => {
                entries.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Clears the live collection without waiting. Returns false when the
    /// lock is currently contended, leaving the entries untouched.
    pub fn try_remove_all(&self) -> bool {
        match self.entries.try_write() {
            Ok(mut entries) => {
                entries.clear();
                true
            }
            Err(_) => false,
        }
    }

    /// Independent copy of the current entries for scan iteration.
    pub async fn snapshot(&self) -> Vec<Reminder> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
