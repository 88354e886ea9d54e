//! Roadmap task and calendar event models.
//!
//! # Responsibility
//! - Define the two flat planner collections behind the template views.
//! - Define draft types for creation and patch types for partial updates.
//! - Pair calendar tags with their display colors.
//!
//! # Invariants
//! - Neither collection holds cross-entity references.
//! - `RoadmapTask::status` and `RoadmapTask::progress` are coupled only by
//!   the roadmap board's status entry point, never by plain patches.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable roadmap task identifier.
pub type TaskId = Uuid;

/// Stable calendar event identifier.
pub type EventId = Uuid;

/// Work stream a roadmap task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Planning,
    Design,
    Development,
}

/// Roadmap task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Progress value the roadmap board snaps to when this status is picked
    /// from the status dropdown. Direct progress edits bypass this mapping.
    pub fn implied_progress(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::InProgress => 50,
            Self::Completed => 100,
        }
    }
}

/// A milestone row on the roadmap board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapTask {
    /// Stable task id.
    pub uuid: TaskId,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    /// Calendar-date string, `YYYY-MM-DD`.
    pub start_date: String,
    /// Calendar-date string, `YYYY-MM-DD`.
    pub end_date: String,
    /// Completion percentage, 0–100.
    pub progress: u8,
    pub status: TaskStatus,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

/// Creation draft for a roadmap task; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoadmapTask {
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub start_date: String,
    pub end_date: String,
    pub progress: u8,
    pub status: TaskStatus,
}

/// Field subset applied by `update_roadmap_task`. Set-only merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadmapTaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub progress: Option<u8>,
    pub status: Option<TaskStatus>,
}

impl RoadmapTaskPatch {
    /// Returns whether the patch sets no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.progress.is_none()
            && self.status.is_none()
    }
}

/// A scheduled entry on the calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Stable event id.
    pub uuid: EventId,
    pub title: String,
    /// Calendar-date string, `YYYY-MM-DD`.
    pub date: String,
    /// Wall-clock string, `HH:MM`.
    pub time: String,
    /// Category label; paired with `color` by the catalog below.
    pub tag: String,
    /// Display color token carried verbatim for the rendering surface.
    pub color: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

/// Creation draft for a calendar event; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    pub tag: String,
    pub color: String,
}

/// Field subset applied by `update_calendar_event`. Set-only merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEventPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub tag: Option<String>,
    pub color: Option<String>,
}

impl CalendarEventPatch {
    /// Returns whether the patch sets no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.tag.is_none()
            && self.color.is_none()
    }
}

/// Tag/color pairing offered by the calendar event form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTag {
    pub name: &'static str,
    pub color: &'static str,
}

/// Tag catalog in the order the event form lists them.
pub const EVENT_TAGS: [EventTag; 5] = [
    EventTag {
        name: "Meeting",
        color: "bg-blue-500",
    },
    EventTag {
        name: "Review",
        color: "bg-green-500",
    },
    EventTag {
        name: "Planning",
        color: "bg-purple-500",
    },
    EventTag {
        name: "Deadline",
        color: "bg-red-500",
    },
    EventTag {
        name: "Personal",
        color: "bg-yellow-500",
    },
];

/// Looks up the display color paired with a tag name.
pub fn tag_color(name: &str) -> Option<&'static str> {
    EVENT_TAGS
        .iter()
        .find(|tag| tag.name == name)
        .map(|tag| tag.color)
}

#[cfg(test)]
mod tests {
    use super::{tag_color, TaskStatus};

    #[test]
    fn status_snaps_to_expected_progress() {
        assert_eq!(TaskStatus::NotStarted.implied_progress(), 0);
        assert_eq!(TaskStatus::InProgress.implied_progress(), 50);
        assert_eq!(TaskStatus::Completed.implied_progress(), 100);
    }

    #[test]
    fn tag_color_resolves_known_tags_only() {
        assert_eq!(tag_color("Meeting"), Some("bg-blue-500"));
        assert_eq!(tag_color("Deadline"), Some("bg-red-500"));
        assert_eq!(tag_color("Unknown"), None);
    }
}
