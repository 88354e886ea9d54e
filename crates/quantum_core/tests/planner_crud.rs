use quantum_core::db::open_store_db;
use quantum_core::repo::planner_repo::{SqliteEventRepository, SqliteTaskRepository};
use quantum_core::service::planner_service::{
    CalendarService, PlannerServiceError, RoadmapService,
};
use quantum_core::{
    CalendarEventPatch, NewCalendarEvent, NewRoadmapTask, RoadmapTaskPatch, TaskCategory,
    TaskStatus,
};
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_store_db().unwrap()
}

fn roadmap(conn: &rusqlite::Connection) -> RoadmapService<SqliteTaskRepository<'_>> {
    RoadmapService::new(SqliteTaskRepository::new(conn))
}

fn calendar(conn: &rusqlite::Connection) -> CalendarService<SqliteEventRepository<'_>> {
    CalendarService::new(SqliteEventRepository::new(conn))
}

fn draft_task() -> NewRoadmapTask {
    NewRoadmapTask {
        title: "Ship milestone".to_string(),
        description: "Cut the release".to_string(),
        category: TaskCategory::Development,
        start_date: "2025-03-01".to_string(),
        end_date: "2025-03-14".to_string(),
        progress: 0,
        status: TaskStatus::NotStarted,
    }
}

#[test]
fn task_create_and_read_back() {
    let conn = setup();
    let service = roadmap(&conn);

    let task = service.create_task(&draft_task()).unwrap();
    let loaded = service.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(loaded, task);
    assert_eq!(loaded.category, TaskCategory::Development);
    assert_eq!(loaded.status, TaskStatus::NotStarted);
    assert_eq!(loaded.progress, 0);
}

#[test]
fn task_patch_merges_only_set_fields() {
    let conn = setup();
    let service = roadmap(&conn);

    let task = service.create_task(&draft_task()).unwrap();
    service
        .update_task(
            task.uuid,
            &RoadmapTaskPatch {
                title: Some("Ship milestone v2".to_string()),
                progress: Some(25),
                ..RoadmapTaskPatch::default()
            },
        )
        .unwrap();

    let loaded = service.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "Ship milestone v2");
    assert_eq!(loaded.progress, 25);
    assert_eq!(loaded.description, task.description);
    assert_eq!(loaded.status, task.status);
    assert_eq!(loaded.start_date, task.start_date);
}

#[test]
fn empty_task_patch_is_observably_a_noop() {
    let conn = setup();
    let service = roadmap(&conn);

    let task = service.create_task(&draft_task()).unwrap();
    let before = service.get_task(task.uuid).unwrap().unwrap();
    service
        .update_task(task.uuid, &RoadmapTaskPatch::default())
        .unwrap();
    let after = service.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(before, after);
}

#[test]
fn status_entry_point_snaps_progress() {
    let conn = setup();
    let service = roadmap(&conn);

    let task = service.create_task(&draft_task()).unwrap();

    service
        .change_task_status(task.uuid, TaskStatus::InProgress)
        .unwrap();
    let mid = service.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(mid.status, TaskStatus::InProgress);
    assert_eq!(mid.progress, 50);

    service
        .change_task_status(task.uuid, TaskStatus::Completed)
        .unwrap();
    let done = service.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
    assert_eq!(done.progress, 100);
}

#[test]
fn direct_progress_edit_does_not_move_status() {
    let conn = setup();
    let service = roadmap(&conn);

    let task = service.create_task(&draft_task()).unwrap();
    service
        .update_task(
            task.uuid,
            &RoadmapTaskPatch {
                progress: Some(100),
                ..RoadmapTaskPatch::default()
            },
        )
        .unwrap();

    let loaded = service.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(loaded.progress, 100);
    // A slider drag to 100% leaves the status column alone.
    assert_eq!(loaded.status, TaskStatus::NotStarted);
}

#[test]
fn direct_status_patch_does_not_snap_progress() {
    let conn = setup();
    let service = roadmap(&conn);

    let task = service.create_task(&draft_task()).unwrap();
    service
        .update_task(
            task.uuid,
            &RoadmapTaskPatch {
                status: Some(TaskStatus::Completed),
                ..RoadmapTaskPatch::default()
            },
        )
        .unwrap();

    let loaded = service.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(loaded.status, TaskStatus::Completed);
    // A task can sit at Completed with stale progress via this path.
    assert_eq!(loaded.progress, 0);
}

#[test]
fn task_delete_removes_and_unknown_id_errors() {
    let conn = setup();
    let service = roadmap(&conn);

    let task = service.create_task(&draft_task()).unwrap();
    service.delete_task(task.uuid).unwrap();
    assert!(service.get_task(task.uuid).unwrap().is_none());
    assert!(service.list_tasks().unwrap().is_empty());

    let unknown = Uuid::now_v7();
    let err = service.delete_task(unknown).unwrap_err();
    assert!(matches!(
        err,
        PlannerServiceError::TaskNotFound(task_uuid) if task_uuid == unknown
    ));
}

#[test]
fn event_crud_round_trip() {
    let conn = setup();
    let service = calendar(&conn);

    let event = service
        .create_event(&NewCalendarEvent {
            title: "Standup".to_string(),
            date: "2025-03-03".to_string(),
            time: "09:30".to_string(),
            tag: "Meeting".to_string(),
            color: "bg-blue-500".to_string(),
        })
        .unwrap();

    service
        .update_event(
            event.uuid,
            &CalendarEventPatch {
                time: Some("10:00".to_string()),
                tag: Some("Planning".to_string()),
                color: Some("bg-purple-500".to_string()),
                ..CalendarEventPatch::default()
            },
        )
        .unwrap();

    let loaded = service.get_event(event.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "Standup");
    assert_eq!(loaded.time, "10:00");
    assert_eq!(loaded.tag, "Planning");
    assert_eq!(loaded.color, "bg-purple-500");
    assert_eq!(loaded.date, event.date);

    service.delete_event(event.uuid).unwrap();
    assert!(service.list_events().unwrap().is_empty());
}

#[test]
fn empty_event_patch_is_observably_a_noop() {
    let conn = setup();
    let service = calendar(&conn);

    let event = service
        .create_event(&NewCalendarEvent {
            title: "Retro".to_string(),
            date: "2025-03-07".to_string(),
            time: "16:00".to_string(),
            tag: "Review".to_string(),
            color: "bg-green-500".to_string(),
        })
        .unwrap();

    let before = service.get_event(event.uuid).unwrap().unwrap();
    service
        .update_event(event.uuid, &CalendarEventPatch::default())
        .unwrap();
    let after = service.get_event(event.uuid).unwrap().unwrap();
    assert_eq!(before, after);
}

#[test]
fn unknown_event_update_errors_at_service_level() {
    let conn = setup();
    let service = calendar(&conn);
    let unknown = Uuid::now_v7();

    let err = service
        .update_event(
            unknown,
            &CalendarEventPatch {
                title: Some("ghost".to_string()),
                ..CalendarEventPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        PlannerServiceError::EventNotFound(event_uuid) if event_uuid == unknown
    ));
}
