use std::fmt;

use anyhow::Context;
use chrono::NaiveDateTime;

use crate::offset;

pub type ReminderId = u64;

/// Format shared with the message-parsing collaborator for `start_date` plus
/// `task_time`, e.g. `06/01/25 14:00`.
pub const SCHEDULE_FORMAT: &str = "%m/%d/%y %H:%M";

const COMPACT_DESCRIPTION_LIMIT: usize = 60;

/// Field tuple handed over by the ingestion collaborator after it has parsed
/// a user message.
#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub title: String,
    pub start_date: String,
    pub task_time: String,
    pub notification_offset: String,
    pub description: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Reminder {
    id: ReminderId,
    title: String,
    start_date: String,
    task_time: String,
    notification_offset_raw: String,
    scheduled_at: NaiveDateTime,
    notification_at: NaiveDateTime,
    description: String,
    phone_number: Option<String>,
}

impl Reminder {
    /// Parses the draft's date and time and fixes the notification instant.
    /// Temporal fields never change after this point.
    pub fn from_draft(id: ReminderId, draft: ReminderDraft) -> anyhow::Result<Self> {
        let raw_datetime = format!("{} {}", draft.start_date, draft.task_time);
        let scheduled_at = NaiveDateTime::parse_from_str(&raw_datetime, SCHEDULE_FORMAT)
            .with_context(|| format!("Invalid schedule date/time: {raw_datetime}"))?;

        let notification_at = offset::resolve(scheduled_at, &draft.notification_offset);

        Ok(Self {
            id,
            title: draft.title,
            start_date: draft.start_date,
            task_time: draft.task_time,
            notification_offset_raw: draft.notification_offset,
            scheduled_at,
            notification_at,
            description: draft.description,
            phone_number: draft.phone_number,
        })
    }

    pub fn id(&self) -> ReminderId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn notification_offset_raw(&self) -> &str {
        &self.notification_offset_raw
    }

    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.scheduled_at
    }

    pub fn notification_at(&self) -> NaiveDateTime {
        self.notification_at
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn is_due(&self, current_minute: NaiveDateTime) -> bool {
        self.notification_at == current_minute
    }

    /// Message body handed to the SMS relay.
    pub fn notification_text(&self) -> String {
        format!(
            "{} starts on {} at {}.\n\n {}",
            self.title, self.start_date, self.task_time, self.description
        )
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self.description.char_indices().nth(COMPACT_DESCRIPTION_LIMIT) {
            Some((cut, _)) => &self.description[..cut],
            None => &self.description,
        };
        write!(
            f,
            "Title:        {}\
             \nStart Date:  {}\
             \nTask Time:   {}\
             \nNotif. Time: {}\
             \nDescription: {}",
            self.title, self.start_date, self.task_time, self.notification_at, description
        )
    }
}
