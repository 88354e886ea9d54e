//! Sample workspace fixture.
//!
//! Populates a freshly opened store with the demo dataset: five pages in a
//! two-level hierarchy, nine blocks including one toggle group, six roadmap
//! tasks and three calendar events, with the welcome page selected. The
//! returned handle struct carries every generated id so demos and tests can
//! address individual fixtures.

use crate::model::block::{BlockId, BlockKind, BlockPatch};
use crate::model::page::PageId;
use crate::model::planner::{
    EventId, NewCalendarEvent, NewRoadmapTask, TaskCategory, TaskId, TaskStatus,
};
use crate::repo::block_repo::{BlockRepository, SqliteBlockRepository};
use crate::repo::page_repo::{PageRepository, SqlitePageRepository};
use crate::repo::planner_repo::{
    EventRepository, SqliteEventRepository, SqliteTaskRepository, TaskRepository,
};
use crate::store::{
    map_block_repo_err, map_page_repo_err, map_planner_repo_err, StoreError, WorkspaceStore,
};

/// Workspace name used by the sample fixture.
pub const SAMPLE_WORKSPACE_NAME: &str = "Quantum";

/// Generated ids of everything the sample fixture creates.
#[derive(Debug, Clone)]
pub struct SampleWorkspace {
    pub welcome_page: PageId,
    pub project_page: PageId,
    /// Child of `project_page`.
    pub task_list_page: PageId,
    /// Child of `project_page`.
    pub meeting_notes_page: PageId,
    pub resources_page: PageId,
    pub welcome_heading: BlockId,
    pub welcome_intro: BlockId,
    /// Toggle block owning `toggle_text` and `toggle_todo`.
    pub toggle_group: BlockId,
    pub toggle_text: BlockId,
    pub toggle_todo: BlockId,
    pub welcome_divider: BlockId,
    pub welcome_code: BlockId,
    pub project_heading: BlockId,
    pub project_overview: BlockId,
    pub task_uuids: Vec<TaskId>,
    pub event_uuids: Vec<EventId>,
}

/// Installs the sample dataset into an empty store and selects the welcome
/// page.
pub fn install_sample(store: &mut WorkspaceStore) -> Result<SampleWorkspace, StoreError> {
    let sample = {
        let conn = store.connection();
        let pages = SqlitePageRepository::new(conn);
        let blocks = SqliteBlockRepository::new(conn);
        let tasks = SqliteTaskRepository::new(conn);
        let events = SqliteEventRepository::new(conn);

        let welcome_page = seed_page(&pages, None, "Welcome Page", "👋", true)?;
        let project_page = seed_page(&pages, None, "Project A", "🚀", true)?;
        let task_list_page = seed_page(&pages, Some(project_page), "Task List", "✅", false)?;
        let meeting_notes_page =
            seed_page(&pages, Some(project_page), "Meeting Notes", "📝", false)?;
        let resources_page = seed_page(&pages, None, "Resources", "📚", false)?;

        let welcome_heading = seed_block(
            &blocks,
            welcome_page,
            None,
            BlockPatch {
                kind: Some(BlockKind::Heading),
                content: Some("Welcome to your enhanced workspace!".to_string()),
                ..BlockPatch::default()
            },
        )?;
        let welcome_intro = seed_block(
            &blocks,
            welcome_page,
            None,
            BlockPatch {
                content: Some(
                    "This block editor now supports rich content types. Try typing \"/\" to \
                     see all available block types."
                        .to_string(),
                ),
                ..BlockPatch::default()
            },
        )?;
        let toggle_group = seed_block(
            &blocks,
            welcome_page,
            None,
            BlockPatch {
                kind: Some(BlockKind::Toggle),
                content: Some("Click to expand this toggle block".to_string()),
                is_expanded: Some(false),
                ..BlockPatch::default()
            },
        )?;
        let toggle_text = seed_block(
            &blocks,
            welcome_page,
            Some(toggle_group),
            BlockPatch {
                content: Some("This is nested content inside the toggle block".to_string()),
                ..BlockPatch::default()
            },
        )?;
        let toggle_todo = seed_block(
            &blocks,
            welcome_page,
            Some(toggle_group),
            BlockPatch {
                kind: Some(BlockKind::Todo),
                content: Some("Try this nested todo item".to_string()),
                checked: Some(false),
                ..BlockPatch::default()
            },
        )?;
        let welcome_divider = seed_block(
            &blocks,
            welcome_page,
            None,
            BlockPatch {
                kind: Some(BlockKind::Divider),
                ..BlockPatch::default()
            },
        )?;
        let welcome_code = seed_block(
            &blocks,
            welcome_page,
            None,
            BlockPatch {
                kind: Some(BlockKind::Code),
                content: Some("console.log(\"Hello, World!\");".to_string()),
                language: Some("javascript".to_string()),
                ..BlockPatch::default()
            },
        )?;
        let project_heading = seed_block(
            &blocks,
            project_page,
            None,
            BlockPatch {
                kind: Some(BlockKind::Heading),
                content: Some("Project Overview".to_string()),
                ..BlockPatch::default()
            },
        )?;
        let project_overview = seed_block(
            &blocks,
            project_page,
            None,
            BlockPatch {
                content: Some(
                    "This project showcases a comprehensive block-based editor.".to_string(),
                ),
                ..BlockPatch::default()
            },
        )?;

        let mut task_uuids = Vec::new();
        for draft in sample_tasks() {
            let task = tasks.create_task(&draft).map_err(map_planner_repo_err)?;
            task_uuids.push(task.uuid);
        }

        let mut event_uuids = Vec::new();
        for draft in sample_events() {
            let event = events.create_event(&draft).map_err(map_planner_repo_err)?;
            event_uuids.push(event.uuid);
        }

        SampleWorkspace {
            welcome_page,
            project_page,
            task_list_page,
            meeting_notes_page,
            resources_page,
            welcome_heading,
            welcome_intro,
            toggle_group,
            toggle_text,
            toggle_todo,
            welcome_divider,
            welcome_code,
            project_heading,
            project_overview,
            task_uuids,
            event_uuids,
        }
    };

    store.select_page(sample.welcome_page)?;
    Ok(sample)
}

fn seed_page(
    pages: &SqlitePageRepository<'_>,
    parent_uuid: Option<PageId>,
    title: &str,
    icon: &str,
    expanded: bool,
) -> Result<PageId, StoreError> {
    let page = pages
        .create_page(parent_uuid, title, icon)
        .map_err(map_page_repo_err)?;
    if expanded {
        pages
            .set_page_expanded(page.uuid, true)
            .map_err(map_page_repo_err)?;
    }
    Ok(page.uuid)
}

fn seed_block(
    blocks: &SqliteBlockRepository<'_>,
    page_uuid: PageId,
    parent_uuid: Option<BlockId>,
    patch: BlockPatch,
) -> Result<BlockId, StoreError> {
    let block = blocks
        .insert_block(page_uuid, None, parent_uuid)
        .map_err(map_block_repo_err)?;
    blocks
        .update_block(block.uuid, &patch)
        .map_err(map_block_repo_err)?;
    Ok(block.uuid)
}

fn sample_tasks() -> Vec<NewRoadmapTask> {
    vec![
        NewRoadmapTask {
            title: "Project Planning & Research".to_string(),
            description: "Define project scope, research requirements, and plan initial \
                          architecture"
                .to_string(),
            category: TaskCategory::Planning,
            start_date: "2025-01-01".to_string(),
            end_date: "2025-01-15".to_string(),
            progress: 85,
            status: TaskStatus::InProgress,
        },
        NewRoadmapTask {
            title: "UI/UX Design".to_string(),
            description: "Create wireframes, design system, and user interface mockups"
                .to_string(),
            category: TaskCategory::Design,
            start_date: "2025-01-10".to_string(),
            end_date: "2025-01-25".to_string(),
            progress: 60,
            status: TaskStatus::InProgress,
        },
        NewRoadmapTask {
            title: "Frontend Development".to_string(),
            description: "Implement UI components and user interfaces".to_string(),
            category: TaskCategory::Development,
            start_date: "2025-01-20".to_string(),
            end_date: "2025-02-10".to_string(),
            progress: 0,
            status: TaskStatus::NotStarted,
        },
        NewRoadmapTask {
            title: "Backend Development".to_string(),
            description: "Build API endpoints and database structure".to_string(),
            category: TaskCategory::Development,
            start_date: "2025-01-25".to_string(),
            end_date: "2025-02-15".to_string(),
            progress: 0,
            status: TaskStatus::NotStarted,
        },
        NewRoadmapTask {
            title: "Testing & QA".to_string(),
            description: "Implement testing suite and quality assurance procedures".to_string(),
            category: TaskCategory::Development,
            start_date: "2025-02-10".to_string(),
            end_date: "2025-02-25".to_string(),
            progress: 0,
            status: TaskStatus::NotStarted,
        },
        NewRoadmapTask {
            title: "Deployment".to_string(),
            description: "Deploy application to production environment".to_string(),
            category: TaskCategory::Development,
            start_date: "2025-02-20".to_string(),
            end_date: "2025-02-28".to_string(),
            progress: 0,
            status: TaskStatus::NotStarted,
        },
    ]
}

fn sample_events() -> Vec<NewCalendarEvent> {
    vec![
        NewCalendarEvent {
            title: "Project Kickoff Meeting".to_string(),
            date: "2025-01-15".to_string(),
            time: "10:00".to_string(),
            tag: "Meeting".to_string(),
            color: "bg-blue-500".to_string(),
        },
        NewCalendarEvent {
            title: "Design Review".to_string(),
            date: "2025-01-22".to_string(),
            time: "14:00".to_string(),
            tag: "Review".to_string(),
            color: "bg-green-500".to_string(),
        },
        NewCalendarEvent {
            title: "Sprint Planning".to_string(),
            date: "2025-01-29".to_string(),
            time: "09:00".to_string(),
            tag: "Planning".to_string(),
            color: "bg-purple-500".to_string(),
        },
    ]
}
