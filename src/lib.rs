pub mod appsettings;
pub mod dispatch;
pub mod offset;
pub mod reminder;
pub mod scheduler;
pub mod signal;
pub mod store;

pub use dispatch::{DispatchError, NotificationDispatcher, SmsRelayDispatcher};
pub use reminder::{Reminder, ReminderDraft, ReminderId};
pub use scheduler::TaskScheduler;
pub use signal::{LogStatusSignal, StatusEvent, StatusSignal};
pub use store::ReminderStore;
