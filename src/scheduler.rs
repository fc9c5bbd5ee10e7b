use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};
use tokio::task::{self, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::dispatch::NotificationDispatcher;
use crate::reminder::{Reminder, ReminderDraft};
use crate::signal::{StatusEvent, StatusSignal};
use crate::store::ReminderStore;

/// Coarser than a minute so every minute boundary is observed at least once
/// without busy-spinning.
const TICK_INTERVAL: Duration = Duration::from_secs(13);

const CANCEL_ALL_RETRY_DELAY: Duration = Duration::from_millis(200);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

struct LoopTask {
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl LoopTask {
    async fn cancel(self, timeout: Duration) {
        self.cancellation_token.cancel();
        let _ = tokio::time::timeout(timeout, self.task_handle).await;
    }
}

/// Owns the reminder registry and the perpetual notification loop.
///
/// Construct one per process and pass the reference to every collaborator
/// that submits or cancels reminders; all callers observe the same store.
pub struct TaskScheduler {
    store: Arc<ReminderStore>,
    next_id: AtomicU64,
    loop_task: LoopTask,
}

impl TaskScheduler {
    /// Starts the notification loop immediately. It runs until the process
    /// exits or `shutdown` is called.
    pub fn start(
        dispatcher: Arc<dyn NotificationDispatcher>,
        signal: Arc<dyn StatusSignal>,
    ) -> Self {
        let store = Arc::new(ReminderStore::new());
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        let loop_store = Arc::clone(&store);
        let task_handle = task::spawn(async move {
            run_loop(loop_store, dispatcher, signal, task_cancellation_token).await;
        });

        Self {
            store,
            next_id: AtomicU64::new(1),
            loop_task: LoopTask {
                task_handle,
                cancellation_token,
            },
        }
    }

    /// Creates a reminder from parsed fields and registers it for
    /// notification. Fails only on an unparseable schedule date/time; a
    /// malformed offset degrades to notifying at the start time itself.
    pub async fn schedule(&self, draft: ReminderDraft) -> anyhow::Result<Reminder> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let reminder = Reminder::from_draft(id, draft)?;

        log::info!(
            "Scheduled reminder. [reminder_id = {}, notification_at = {}]",
            id,
            reminder.notification_at()
        );

        self.store.add(reminder.clone()).await;
        Ok(reminder)
    }

    /// Removes a pending reminder so it never fires. Returns false when it
    /// already fired or was cancelled before.
    pub async fn cancel(&self, reminder: &Reminder) -> bool {
        let removed = self.store.remove(reminder.id()).await;
        if removed {
            log::info!("Cancelled reminder. [reminder_id = {}]", reminder.id());
        } else {
            log::warn!(
                "Reminder to cancel was not pending. [reminder_id = {}]",
                reminder.id()
            );
        }
        removed
    }

    /// Clears every pending reminder. Retries once after a short delay if
    /// the first attempt loses the race against a scan, then gives up and
    /// reports failure.
    pub async fn cancel_all(&self) -> bool {
        if self.store.try_remove_all() {
            return true;
        }

        tokio::time::sleep(CANCEL_ALL_RETRY_DELAY).await;
        let cleared = self.store.try_remove_all();
        if !cleared {
            log::warn!("Could not clear pending reminders, store stayed contended");
        }
        cleared
    }

    pub async fn pending(&self) -> usize {
        self.store.len().await
    }

    /// Stops the notification loop. Pending reminders are dropped with it;
    /// nothing is persisted.
    pub async fn shutdown(self) {
        self.loop_task.cancel(SHUTDOWN_TIMEOUT).await;
    }
}

async fn run_loop(
    store: Arc<ReminderStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    signal: Arc<dyn StatusSignal>,
    cancellation_token: CancellationToken,
) {
    log::info!("Notification loop started");
    loop {
        scan(&store, &dispatcher, &signal).await;

        tokio::select! {
            _ = cancellation_token.cancelled() => {
                log::info!("Notification loop shutting down");
                break;
            }
            _ = tokio::time::sleep(TICK_INTERVAL) => {}
        }
    }
}

/// One tick: compare every snapshot entry against the current minute and
/// hand the due ones to the dispatcher. Each dispatch runs in its own task;
/// removal follows the dispatch hand-off, never precedes it.
async fn scan(
    store: &Arc<ReminderStore>,
    dispatcher: &Arc<dyn NotificationDispatcher>,
    signal: &Arc<dyn StatusSignal>,
) {
    let snapshot = store.snapshot().await;
    let now = current_minute();

    for reminder in snapshot {
        if !reminder.is_due(now) {
            continue;
        }

        let id = reminder.id();
        log::info!("Reminder is due. [reminder_id = {}]", id);

        spawn_dispatch(reminder, Arc::clone(dispatcher), Arc::clone(signal));
        store.remove(id).await;
    }
}

fn spawn_dispatch(
    reminder: Reminder,
    dispatcher: Arc<dyn NotificationDispatcher>,
    signal: Arc<dyn StatusSignal>,
) {
    task::spawn(async move {
        emit(Arc::clone(&signal), StatusEvent::NotificationFired);

        let message = reminder.notification_text();
        if let Err(error) = dispatcher.send(&message, reminder.phone_number()).await {
            log::error!(
                "Failed to dispatch notification. [reminder_id = {}, error = {}]",
                reminder.id(),
                error
            );
            emit(signal, StatusEvent::SendFailed);
        }
    });
}

/// Observer calls run detached so indicator latency never reaches the loop.
fn emit(signal: Arc<dyn StatusSignal>, event: StatusEvent) {
    task::spawn(async move {
        signal.emit(event).await;
    });
}

fn current_minute() -> NaiveDateTime {
    truncate_to_minute(Local::now().naive_local())
}

fn truncate_to_minute(datetime: NaiveDateTime) -> NaiveDateTime {
    datetime
        .with_second(0)
        .expect("Zero seconds is always valid.")
        .with_nanosecond(0)
        .expect("Zero nanoseconds is always valid.")
}
