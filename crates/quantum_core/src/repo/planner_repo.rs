//! Roadmap task and calendar event repositories.
//!
//! Both collections are flat CRUD over generated ids with patch-merge
//! updates; they share one error type because their shapes are identical.
//!
//! # Invariants
//! - Updates bump `updated_at` only when at least one field is set.
//! - Zero-row updates/deletes surface as semantic `*NotFound` errors.

use crate::db::DbError;
use crate::model::planner::{
    CalendarEvent, CalendarEventPatch, EventId, NewCalendarEvent, NewRoadmapTask, RoadmapTask,
    RoadmapTaskPatch, TaskCategory, TaskId, TaskStatus,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    task_uuid,
    title,
    description,
    category,
    start_date,
    end_date,
    progress,
    status,
    created_at,
    updated_at
FROM roadmap_tasks";

const EVENT_SELECT_SQL: &str = "SELECT
    event_uuid,
    title,
    date,
    time,
    tag,
    color,
    created_at,
    updated_at
FROM calendar_events";

pub type PlannerRepoResult<T> = Result<T, PlannerRepoError>;

/// Errors from planner repository operations.
#[derive(Debug)]
pub enum PlannerRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target roadmap task does not exist.
    TaskNotFound(TaskId),
    /// Target calendar event does not exist.
    EventNotFound(EventId),
    /// Stored data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for PlannerRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "roadmap task not found: {id}"),
            Self::EventNotFound(id) => write!(f, "calendar event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid planner data: {message}"),
        }
    }
}

impl Error for PlannerRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for PlannerRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PlannerRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for roadmap task CRUD.
pub trait TaskRepository {
    fn create_task(&self, draft: &NewRoadmapTask) -> PlannerRepoResult<RoadmapTask>;
    fn get_task(&self, task_uuid: TaskId) -> PlannerRepoResult<Option<RoadmapTask>>;
    fn list_tasks(&self) -> PlannerRepoResult<Vec<RoadmapTask>>;
    fn update_task(&self, task_uuid: TaskId, patch: &RoadmapTaskPatch) -> PlannerRepoResult<()>;
    fn delete_task(&self, task_uuid: TaskId) -> PlannerRepoResult<()>;
}

/// Repository interface for calendar event CRUD.
pub trait EventRepository {
    fn create_event(&self, draft: &NewCalendarEvent) -> PlannerRepoResult<CalendarEvent>;
    fn get_event(&self, event_uuid: EventId) -> PlannerRepoResult<Option<CalendarEvent>>;
    fn list_events(&self) -> PlannerRepoResult<Vec<CalendarEvent>>;
    fn update_event(
        &self,
        event_uuid: EventId,
        patch: &CalendarEventPatch,
    ) -> PlannerRepoResult<()>;
    fn delete_event(&self, event_uuid: EventId) -> PlannerRepoResult<()>;
}

/// SQLite-backed roadmap task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, draft: &NewRoadmapTask) -> PlannerRepoResult<RoadmapTask> {
        let task_uuid = Uuid::now_v7();
        self.conn.execute(
            "INSERT INTO roadmap_tasks (
                task_uuid,
                title,
                description,
                category,
                start_date,
                end_date,
                progress,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task_uuid.to_string(),
                draft.title.as_str(),
                draft.description.as_str(),
                category_to_db(draft.category),
                draft.start_date.as_str(),
                draft.end_date.as_str(),
                i64::from(draft.progress),
                status_to_db(draft.status),
            ],
        )?;

        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE task_uuid = ?1;"))?;
        let mut rows = stmt.query([task_uuid.to_string()])?;
        match rows.next()? {
            Some(row) => parse_task_row(row),
            None => Err(PlannerRepoError::TaskNotFound(task_uuid)),
        }
    }

    fn get_task(&self, task_uuid: TaskId) -> PlannerRepoResult<Option<RoadmapTask>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE task_uuid = ?1;"))?;
        let mut rows = stmt.query([task_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self) -> PlannerRepoResult<Vec<RoadmapTask>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY created_at ASC, task_uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn update_task(&self, task_uuid: TaskId, patch: &RoadmapTaskPatch) -> PlannerRepoResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sql =
            String::from("UPDATE roadmap_tasks SET updated_at = (strftime('%s', 'now') * 1000)");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = &patch.title {
            sql.push_str(", title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(description) = &patch.description {
            sql.push_str(", description = ?");
            bind_values.push(Value::Text(description.clone()));
        }
        if let Some(category) = patch.category {
            sql.push_str(", category = ?");
            bind_values.push(Value::Text(category_to_db(category).to_string()));
        }
        if let Some(start_date) = &patch.start_date {
            sql.push_str(", start_date = ?");
            bind_values.push(Value::Text(start_date.clone()));
        }
        if let Some(end_date) = &patch.end_date {
            sql.push_str(", end_date = ?");
            bind_values.push(Value::Text(end_date.clone()));
        }
        if let Some(progress) = patch.progress {
            sql.push_str(", progress = ?");
            bind_values.push(Value::Integer(i64::from(progress)));
        }
        if let Some(status) = patch.status {
            sql.push_str(", status = ?");
            bind_values.push(Value::Text(status_to_db(status).to_string()));
        }

        sql.push_str(" WHERE task_uuid = ?;");
        bind_values.push(Value::Text(task_uuid.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(PlannerRepoError::TaskNotFound(task_uuid));
        }
        Ok(())
    }

    fn delete_task(&self, task_uuid: TaskId) -> PlannerRepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM roadmap_tasks WHERE task_uuid = ?1;",
            [task_uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(PlannerRepoError::TaskNotFound(task_uuid));
        }
        Ok(())
    }
}

/// SQLite-backed calendar event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, draft: &NewCalendarEvent) -> PlannerRepoResult<CalendarEvent> {
        let event_uuid = Uuid::now_v7();
        self.conn.execute(
            "INSERT INTO calendar_events (
                event_uuid,
                title,
                date,
                time,
                tag,
                color
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                event_uuid.to_string(),
                draft.title.as_str(),
                draft.date.as_str(),
                draft.time.as_str(),
                draft.tag.as_str(),
                draft.color.as_str(),
            ],
        )?;

        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE event_uuid = ?1;"))?;
        let mut rows = stmt.query([event_uuid.to_string()])?;
        match rows.next()? {
            Some(row) => parse_event_row(row),
            None => Err(PlannerRepoError::EventNotFound(event_uuid)),
        }
    }

    fn get_event(&self, event_uuid: EventId) -> PlannerRepoResult<Option<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE event_uuid = ?1;"))?;
        let mut rows = stmt.query([event_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn list_events(&self) -> PlannerRepoResult<Vec<CalendarEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL} ORDER BY created_at ASC, event_uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn update_event(
        &self,
        event_uuid: EventId,
        patch: &CalendarEventPatch,
    ) -> PlannerRepoResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sql =
            String::from("UPDATE calendar_events SET updated_at = (strftime('%s', 'now') * 1000)");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = &patch.title {
            sql.push_str(", title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(date) = &patch.date {
            sql.push_str(", date = ?");
            bind_values.push(Value::Text(date.clone()));
        }
        if let Some(time) = &patch.time {
            sql.push_str(", time = ?");
            bind_values.push(Value::Text(time.clone()));
        }
        if let Some(tag) = &patch.tag {
            sql.push_str(", tag = ?");
            bind_values.push(Value::Text(tag.clone()));
        }
        if let Some(color) = &patch.color {
            sql.push_str(", color = ?");
            bind_values.push(Value::Text(color.clone()));
        }

        sql.push_str(" WHERE event_uuid = ?;");
        bind_values.push(Value::Text(event_uuid.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(PlannerRepoError::EventNotFound(event_uuid));
        }
        Ok(())
    }

    fn delete_event(&self, event_uuid: EventId) -> PlannerRepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM calendar_events WHERE event_uuid = ?1;",
            [event_uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(PlannerRepoError::EventNotFound(event_uuid));
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> PlannerRepoResult<RoadmapTask> {
    let task_uuid_text: String = row.get("task_uuid")?;
    let task_uuid = parse_uuid(&task_uuid_text, "roadmap_tasks.task_uuid")?;

    let category_text: String = row.get("category")?;
    let category = parse_category(&category_text).ok_or_else(|| {
        PlannerRepoError::InvalidData(format!(
            "invalid category `{category_text}` in roadmap_tasks.category"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        PlannerRepoError::InvalidData(format!(
            "invalid status `{status_text}` in roadmap_tasks.status"
        ))
    })?;

    let progress_raw: i64 = row.get("progress")?;
    let progress = u8::try_from(progress_raw).map_err(|_| {
        PlannerRepoError::InvalidData(format!(
            "invalid progress value `{progress_raw}` in roadmap_tasks.progress"
        ))
    })?;

    Ok(RoadmapTask {
        uuid: task_uuid,
        title: row.get("title")?,
        description: row.get("description")?,
        category,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        progress,
        status,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_event_row(row: &Row<'_>) -> PlannerRepoResult<CalendarEvent> {
    let event_uuid_text: String = row.get("event_uuid")?;
    let event_uuid = parse_uuid(&event_uuid_text, "calendar_events.event_uuid")?;

    Ok(CalendarEvent {
        uuid: event_uuid,
        title: row.get("title")?,
        date: row.get("date")?,
        time: row.get("time")?,
        tag: row.get("tag")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn category_to_db(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Planning => "planning",
        TaskCategory::Design => "design",
        TaskCategory::Development => "development",
    }
}

fn parse_category(value: &str) -> Option<TaskCategory> {
    match value {
        "planning" => Some(TaskCategory::Planning),
        "design" => Some(TaskCategory::Design),
        "development" => Some(TaskCategory::Development),
        _ => None,
    }
}

fn status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::NotStarted => "not_started",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
    }
}

fn parse_status(value: &str) -> Option<TaskStatus> {
    match value {
        "not_started" => Some(TaskStatus::NotStarted),
        "in_progress" => Some(TaskStatus::InProgress),
        "completed" => Some(TaskStatus::Completed),
        _ => None,
    }
}

fn parse_uuid(value: &str, column: &'static str) -> PlannerRepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| PlannerRepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
