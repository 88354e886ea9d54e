//! Roadmap and calendar use-case services.
//!
//! # Responsibility
//! - Provide flat CRUD entry points for the two planner collections.
//! - Host the roadmap board's status entry point, which is the only place
//!   that couples `status` to `progress`.
//!
//! # Invariants
//! - Plain patches never touch fields the caller did not set; the
//!   status/progress coupling exists solely in `change_task_status`.

use crate::model::planner::{
    CalendarEvent, CalendarEventPatch, EventId, NewCalendarEvent, NewRoadmapTask, RoadmapTask,
    RoadmapTaskPatch, TaskId, TaskStatus,
};
use crate::repo::planner_repo::{EventRepository, PlannerRepoError, TaskRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from planner service operations.
#[derive(Debug)]
pub enum PlannerServiceError {
    /// Target roadmap task does not exist.
    TaskNotFound(TaskId),
    /// Target calendar event does not exist.
    EventNotFound(EventId),
    /// Repository-level failure.
    Repo(PlannerRepoError),
}

impl Display for PlannerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "roadmap task not found: {id}"),
            Self::EventNotFound(id) => write!(f, "calendar event not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlannerRepoError> for PlannerServiceError {
    fn from(value: PlannerRepoError) -> Self {
        match value {
            PlannerRepoError::TaskNotFound(task_uuid) => Self::TaskNotFound(task_uuid),
            PlannerRepoError::EventNotFound(event_uuid) => Self::EventNotFound(event_uuid),
            other => Self::Repo(other),
        }
    }
}

/// Roadmap board service facade.
pub struct RoadmapService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> RoadmapService<R> {
    /// Creates a service from a repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one roadmap task from a draft.
    pub fn create_task(&self, draft: &NewRoadmapTask) -> Result<RoadmapTask, PlannerServiceError> {
        self.repo.create_task(draft).map_err(Into::into)
    }

    /// Loads one task by id.
    pub fn get_task(&self, task_uuid: TaskId) -> Result<Option<RoadmapTask>, PlannerServiceError> {
        self.repo.get_task(task_uuid).map_err(Into::into)
    }

    /// Lists every task.
    pub fn list_tasks(&self) -> Result<Vec<RoadmapTask>, PlannerServiceError> {
        self.repo.list_tasks().map_err(Into::into)
    }

    /// Applies a set-only field patch to one task. No coupling: a `status`
    /// patch leaves `progress` alone and vice versa.
    pub fn update_task(
        &self,
        task_uuid: TaskId,
        patch: &RoadmapTaskPatch,
    ) -> Result<(), PlannerServiceError> {
        self.repo.update_task(task_uuid, patch).map_err(Into::into)
    }

    /// Sets a task's status the way the roadmap board's dropdown does:
    /// progress snaps to the status's implied value.
    pub fn change_task_status(
        &self,
        task_uuid: TaskId,
        status: TaskStatus,
    ) -> Result<(), PlannerServiceError> {
        let patch = RoadmapTaskPatch {
            status: Some(status),
            progress: Some(status.implied_progress()),
            ..RoadmapTaskPatch::default()
        };
        self.repo.update_task(task_uuid, &patch).map_err(Into::into)
    }

    /// Deletes one task.
    pub fn delete_task(&self, task_uuid: TaskId) -> Result<(), PlannerServiceError> {
        self.repo.delete_task(task_uuid).map_err(Into::into)
    }
}

/// Calendar grid service facade.
pub struct CalendarService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> CalendarService<R> {
    /// Creates a service from a repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one calendar event from a draft.
    pub fn create_event(
        &self,
        draft: &NewCalendarEvent,
    ) -> Result<CalendarEvent, PlannerServiceError> {
        self.repo.create_event(draft).map_err(Into::into)
    }

    /// Loads one event by id.
    pub fn get_event(
        &self,
        event_uuid: EventId,
    ) -> Result<Option<CalendarEvent>, PlannerServiceError> {
        self.repo.get_event(event_uuid).map_err(Into::into)
    }

    /// Lists every event.
    pub fn list_events(&self) -> Result<Vec<CalendarEvent>, PlannerServiceError> {
        self.repo.list_events().map_err(Into::into)
    }

    /// Applies a set-only field patch to one event.
    pub fn update_event(
        &self,
        event_uuid: EventId,
        patch: &CalendarEventPatch,
    ) -> Result<(), PlannerServiceError> {
        self.repo.update_event(event_uuid, patch).map_err(Into::into)
    }

    /// Deletes one event.
    pub fn delete_event(&self, event_uuid: EventId) -> Result<(), PlannerServiceError> {
        self.repo.delete_event(event_uuid).map_err(Into::into)
    }
}
