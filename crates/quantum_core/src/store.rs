//! Workspace state store facade.
//!
//! # Responsibility
//! - Own the backing connection and the selection cursor.
//! - Expose the full accessor/mutator surface consumed by rendering
//!   surfaces (sidebar, block editor, roadmap board, calendar grid).
//!
//! # Invariants
//! - Exactly one of page/template selection is active at any time; both are
//!   empty only before the first selection. The single `Option<ViewTarget>`
//!   field makes this structural.
//! - Mutators addressing an unknown id change nothing and return `Ok`;
//!   rendering surfaces cannot distinguish "nothing to do" from "bad
//!   reference". The underlying layers still report `NotFound`, the facade
//!   absorbs it and logs at debug.
//! - Multi-entity effects (cascade deletes, selection fallback) are never
//!   partially observable.

use crate::db::{open_store_db, DbError};
use crate::model::block::{Block, BlockId, BlockPatch};
use crate::model::page::{Page, PageId};
use crate::model::planner::{
    CalendarEvent, CalendarEventPatch, EventId, NewCalendarEvent, NewRoadmapTask, RoadmapTask,
    RoadmapTaskPatch, TaskId, TaskStatus,
};
use crate::model::template::{self, Template};
use crate::model::workspace::Workspace;
use crate::repo::block_repo::{BlockRepoError, SqliteBlockRepository};
use crate::repo::page_repo::{PageRepoError, SqlitePageRepository};
use crate::repo::planner_repo::{PlannerRepoError, SqliteEventRepository, SqliteTaskRepository};
use crate::repo::workspace_repo::{
    SqliteWorkspaceRepository, WorkspaceRepoError, WorkspaceRepository,
};
use crate::seed::{self, SampleWorkspace};
use crate::service::block_service::{BlockService, BlockServiceError};
use crate::service::page_service::{PageService, PageServiceError};
use crate::service::planner_service::{CalendarService, PlannerServiceError, RoadmapService};
use log::{debug, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The currently active view: a page or a template, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    /// A page from the page forest.
    Page(PageId),
    /// A template catalog entry, by stable catalog id.
    Template(&'static str),
}

/// Errors surfaced by the store facade.
///
/// Unknown-id mutations are deliberately absent here: those return `Ok`
/// without effect. What remains is storage trouble, malformed rows, the
/// cycle guard, and the not-found cases of operations that must return data.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Stored data cannot be converted to a valid read model.
    InvalidData(String),
    /// Named page does not exist (block insert target, explicit lookups).
    PageNotFound(PageId),
    /// Named block does not exist.
    BlockNotFound(BlockId),
    /// Named roadmap task does not exist.
    TaskNotFound(TaskId),
    /// Named calendar event does not exist.
    EventNotFound(EventId),
    /// Page move would make a page its own ancestor.
    CycleDetected {
        page_uuid: PageId,
        parent_uuid: PageId,
    },
    /// Workspace singleton row is missing.
    WorkspaceMissing,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "{message}"),
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::BlockNotFound(id) => write!(f, "block not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "roadmap task not found: {id}"),
            Self::EventNotFound(id) => write!(f, "calendar event not found: {id}"),
            Self::CycleDetected {
                page_uuid,
                parent_uuid,
            } => write!(
                f,
                "move would create cycle: page {page_uuid} under parent {parent_uuid}"
            ),
            Self::WorkspaceMissing => write!(f, "workspace row missing"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

/// The workspace state store.
///
/// One instance owns all four entity collections plus the selection cursor.
/// All state is transient: dropping the store drops the data.
pub struct WorkspaceStore {
    conn: Connection,
    selection: Option<ViewTarget>,
}

impl WorkspaceStore {
    /// Opens an empty store with the given workspace name.
    pub fn open(workspace_name: impl AsRef<str>) -> Result<Self, StoreError> {
        let conn = open_store_db().map_err(StoreError::Db)?;
        let store = Self {
            conn,
            selection: None,
        };
        store
            .workspace_repo()
            .init_workspace(workspace_name.as_ref())
            .map_err(map_workspace_repo_err)?;
        info!("event=store_open module=store status=ok");
        Ok(store)
    }

    /// Opens a store populated with the sample fixture and returns the
    /// fixture's id handles alongside it.
    pub fn open_sample() -> Result<(Self, SampleWorkspace), StoreError> {
        let mut store = Self::open(seed::SAMPLE_WORKSPACE_NAME)?;
        let sample = seed::install_sample(&mut store)?;
        Ok((store, sample))
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    // ---- workspace ----

    /// Returns the workspace record.
    pub fn workspace(&self) -> Result<Workspace, StoreError> {
        self.workspace_repo()
            .get_workspace()
            .map_err(map_workspace_repo_err)
    }

    /// Sets the workspace display name.
    pub fn rename_workspace(&mut self, name: impl AsRef<str>) -> Result<(), StoreError> {
        self.workspace_repo()
            .rename_workspace(name.as_ref())
            .map_err(map_workspace_repo_err)
    }

    // ---- selection ----

    /// Returns the current selection cursor.
    pub fn selection(&self) -> Option<ViewTarget> {
        self.selection
    }

    /// Returns the selected page id, if a page is active.
    pub fn selected_page(&self) -> Option<PageId> {
        match self.selection {
            Some(ViewTarget::Page(page_uuid)) => Some(page_uuid),
            _ => None,
        }
    }

    /// Returns the selected template id, if a template is active.
    pub fn selected_template(&self) -> Option<&'static str> {
        match self.selection {
            Some(ViewTarget::Template(template_id)) => Some(template_id),
            _ => None,
        }
    }

    /// Selects a page, clearing any template selection. Unknown ids leave
    /// the cursor unchanged.
    pub fn select_page(&mut self, page_uuid: PageId) -> Result<(), StoreError> {
        if self
            .page_service()
            .get_page(page_uuid)
            .map_err(map_page_err)?
            .is_none()
        {
            debug!("event=unknown_id_noop module=store op=select_page id={page_uuid}");
            return Ok(());
        }
        self.selection = Some(ViewTarget::Page(page_uuid));
        Ok(())
    }

    /// Selects a template, clearing any page selection. Unknown ids leave
    /// the cursor unchanged.
    pub fn select_template(&mut self, template_id: &str) {
        match template::find(template_id) {
            Some(entry) => self.selection = Some(ViewTarget::Template(entry.id)),
            None => {
                debug!("event=unknown_id_noop module=store op=select_template id={template_id}")
            }
        }
    }

    // ---- pages ----

    /// Lists every page in collection order.
    pub fn pages(&self) -> Result<Vec<Page>, StoreError> {
        self.page_service().list_pages().map_err(map_page_err)
    }

    /// Loads one page by id.
    pub fn page(&self, page_uuid: PageId) -> Result<Option<Page>, StoreError> {
        self.page_service().get_page(page_uuid).map_err(map_page_err)
    }

    /// Creates a page under an optional parent and moves the selection to
    /// it. An unknown parent degrades to a root page.
    pub fn create_page(&mut self, parent_uuid: Option<PageId>) -> Result<Page, StoreError> {
        let service = self.page_service();
        let created = match service.create_page(parent_uuid) {
            Err(PageServiceError::ParentNotFound(parent_uuid)) => {
                debug!(
                    "event=unknown_parent_fallback module=store op=create_page parent={parent_uuid}"
                );
                service.create_page(None).map_err(map_page_err)?
            }
            other => other.map_err(map_page_err)?,
        };
        self.selection = Some(ViewTarget::Page(created.uuid));
        Ok(created)
    }

    /// Deletes a page, all its descendants and every block they own. If the
    /// selected page was removed, selection falls back to the first
    /// remaining page (or to nothing).
    pub fn delete_page(&mut self, page_uuid: PageId) -> Result<(), StoreError> {
        let cascade = match self.page_service().delete_page(page_uuid) {
            Err(PageServiceError::PageNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=delete_page id={id}");
                return Ok(());
            }
            other => other.map_err(map_page_err)?,
        };
        debug!(
            "event=page_cascade module=store removed_pages={} removed_blocks={}",
            cascade.removed_pages.len(),
            cascade.removed_blocks
        );

        if let Some(ViewTarget::Page(selected)) = self.selection {
            if cascade.removed_pages.contains(&selected) {
                self.selection = self
                    .page_service()
                    .first_page()
                    .map_err(map_page_err)?
                    .map(|page| ViewTarget::Page(page.uuid));
            }
        }
        Ok(())
    }

    /// Sets a page title. Unknown ids are a no-op.
    pub fn rename_page(
        &mut self,
        page_uuid: PageId,
        title: impl AsRef<str>,
    ) -> Result<(), StoreError> {
        match self.page_service().rename_page(page_uuid, title.as_ref()) {
            Err(PageServiceError::PageNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=rename_page id={id}");
                Ok(())
            }
            other => other.map_err(map_page_err),
        }
    }

    /// Sets a page icon. Unknown ids are a no-op.
    pub fn set_page_icon(
        &mut self,
        page_uuid: PageId,
        icon: impl AsRef<str>,
    ) -> Result<(), StoreError> {
        match self.page_service().set_page_icon(page_uuid, icon.as_ref()) {
            Err(PageServiceError::PageNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=set_page_icon id={id}");
                Ok(())
            }
            other => other.map_err(map_page_err),
        }
    }

    /// Flips a page's sidebar expansion flag. Unknown ids are a no-op.
    pub fn toggle_page_expansion(&mut self, page_uuid: PageId) -> Result<(), StoreError> {
        match self.page_service().toggle_page_expansion(page_uuid) {
            Err(PageServiceError::PageNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=toggle_page_expansion id={id}");
                Ok(())
            }
            other => other.map_err(map_page_err),
        }
    }

    /// Moves a page under a new parent (or to the root). Unknown ids are a
    /// no-op; a move that would create a cycle is an error.
    pub fn move_page(
        &mut self,
        page_uuid: PageId,
        new_parent_uuid: Option<PageId>,
    ) -> Result<(), StoreError> {
        match self.page_service().move_page(page_uuid, new_parent_uuid) {
            Err(PageServiceError::PageNotFound(id))
            | Err(PageServiceError::ParentNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=move_page id={id}");
                Ok(())
            }
            other => other.map_err(map_page_err),
        }
    }

    // ---- blocks ----

    /// Lists the whole block collection in collection order.
    pub fn blocks(&self) -> Result<Vec<Block>, StoreError> {
        self.block_service().list_blocks().map_err(map_block_err)
    }

    /// Loads one block by id.
    pub fn block(&self, block_uuid: BlockId) -> Result<Option<Block>, StoreError> {
        self.block_service()
            .get_block(block_uuid)
            .map_err(map_block_err)
    }

    /// Lists a page's top-level blocks in render order.
    pub fn page_blocks(&self, page_uuid: PageId) -> Result<Vec<Block>, StoreError> {
        self.block_service()
            .page_blocks(page_uuid)
            .map_err(map_block_err)
    }

    /// Lists a block's direct children in render order.
    pub fn child_blocks(&self, parent_uuid: BlockId) -> Result<Vec<Block>, StoreError> {
        self.block_service()
            .child_blocks(parent_uuid)
            .map_err(map_block_err)
    }

    /// Creates an empty text block on a page, spliced after the optional
    /// anchor and nested under the optional parent block. The page must
    /// exist.
    pub fn insert_block(
        &mut self,
        page_uuid: PageId,
        after_uuid: Option<BlockId>,
        parent_uuid: Option<BlockId>,
    ) -> Result<Block, StoreError> {
        self.block_service()
            .insert_block(page_uuid, after_uuid, parent_uuid)
            .map_err(map_block_err)
    }

    /// Merges a field patch into a block. Unknown ids are a no-op.
    pub fn update_block(
        &mut self,
        block_uuid: BlockId,
        patch: &BlockPatch,
    ) -> Result<(), StoreError> {
        match self.block_service().update_block(block_uuid, patch) {
            Err(BlockServiceError::BlockNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=update_block id={id}");
                Ok(())
            }
            other => other.map_err(map_block_err),
        }
    }

    /// Deletes a block together with every nested descendant. Unknown ids
    /// are a no-op.
    pub fn delete_block(&mut self, block_uuid: BlockId) -> Result<(), StoreError> {
        match self.block_service().delete_block(block_uuid) {
            Err(BlockServiceError::BlockNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=delete_block id={id}");
                Ok(())
            }
            Err(other) => Err(map_block_err(other)),
            Ok(removed) => {
                debug!(
                    "event=block_cascade module=store removed_blocks={}",
                    removed.len()
                );
                Ok(())
            }
        }
    }

    /// Flips a block's expansion flag. Unknown ids are a no-op.
    pub fn toggle_block_expansion(&mut self, block_uuid: BlockId) -> Result<(), StoreError> {
        match self.block_service().toggle_block_expansion(block_uuid) {
            Err(BlockServiceError::BlockNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=toggle_block_expansion id={id}");
                Ok(())
            }
            other => other.map_err(map_block_err),
        }
    }

    // ---- roadmap ----

    /// Lists every roadmap task.
    pub fn roadmap_tasks(&self) -> Result<Vec<RoadmapTask>, StoreError> {
        self.roadmap_service().list_tasks().map_err(map_planner_err)
    }

    /// Loads one roadmap task by id.
    pub fn roadmap_task(&self, task_uuid: TaskId) -> Result<Option<RoadmapTask>, StoreError> {
        self.roadmap_service()
            .get_task(task_uuid)
            .map_err(map_planner_err)
    }

    /// Creates a roadmap task from a draft.
    pub fn add_roadmap_task(&mut self, draft: NewRoadmapTask) -> Result<RoadmapTask, StoreError> {
        self.roadmap_service()
            .create_task(&draft)
            .map_err(map_planner_err)
    }

    /// Merges a field patch into a task. No status/progress coupling is
    /// applied. Unknown ids are a no-op.
    pub fn update_roadmap_task(
        &mut self,
        task_uuid: TaskId,
        patch: &RoadmapTaskPatch,
    ) -> Result<(), StoreError> {
        match self.roadmap_service().update_task(task_uuid, patch) {
            Err(PlannerServiceError::TaskNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=update_roadmap_task id={id}");
                Ok(())
            }
            other => other.map_err(map_planner_err),
        }
    }

    /// Sets a task's status with the roadmap board's progress snap.
    /// Unknown ids are a no-op.
    pub fn change_task_status(
        &mut self,
        task_uuid: TaskId,
        status: TaskStatus,
    ) -> Result<(), StoreError> {
        match self.roadmap_service().change_task_status(task_uuid, status) {
            Err(PlannerServiceError::TaskNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=change_task_status id={id}");
                Ok(())
            }
            other => other.map_err(map_planner_err),
        }
    }

    /// Deletes a roadmap task. Unknown ids are a no-op.
    pub fn delete_roadmap_task(&mut self, task_uuid: TaskId) -> Result<(), StoreError> {
        match self.roadmap_service().delete_task(task_uuid) {
            Err(PlannerServiceError::TaskNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=delete_roadmap_task id={id}");
                Ok(())
            }
            other => other.map_err(map_planner_err),
        }
    }

    // ---- calendar ----

    /// Lists every calendar event.
    pub fn calendar_events(&self) -> Result<Vec<CalendarEvent>, StoreError> {
        self.calendar_service()
            .list_events()
            .map_err(map_planner_err)
    }

    /// Loads one calendar event by id.
    pub fn calendar_event(&self, event_uuid: EventId) -> Result<Option<CalendarEvent>, StoreError> {
        self.calendar_service()
            .get_event(event_uuid)
            .map_err(map_planner_err)
    }

    /// Creates a calendar event from a draft.
    pub fn add_calendar_event(
        &mut self,
        draft: NewCalendarEvent,
    ) -> Result<CalendarEvent, StoreError> {
        self.calendar_service()
            .create_event(&draft)
            .map_err(map_planner_err)
    }

    /// Merges a field patch into an event. Unknown ids are a no-op.
    pub fn update_calendar_event(
        &mut self,
        event_uuid: EventId,
        patch: &CalendarEventPatch,
    ) -> Result<(), StoreError> {
        match self.calendar_service().update_event(event_uuid, patch) {
            Err(PlannerServiceError::EventNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=update_calendar_event id={id}");
                Ok(())
            }
            other => other.map_err(map_planner_err),
        }
    }

    /// Deletes a calendar event. Unknown ids are a no-op.
    pub fn delete_calendar_event(&mut self, event_uuid: EventId) -> Result<(), StoreError> {
        match self.calendar_service().delete_event(event_uuid) {
            Err(PlannerServiceError::EventNotFound(id)) => {
                debug!("event=unknown_id_noop module=store op=delete_calendar_event id={id}");
                Ok(())
            }
            other => other.map_err(map_planner_err),
        }
    }

    // ---- templates ----

    /// Returns the static template catalog.
    pub fn templates(&self) -> &'static [Template] {
        template::catalog()
    }

    // ---- wiring ----

    fn page_service(&self) -> PageService<SqlitePageRepository<'_>, SqliteBlockRepository<'_>> {
        PageService::new(
            SqlitePageRepository::new(&self.conn),
            SqliteBlockRepository::new(&self.conn),
        )
    }

    fn block_service(&self) -> BlockService<SqliteBlockRepository<'_>> {
        BlockService::new(SqliteBlockRepository::new(&self.conn))
    }

    fn roadmap_service(&self) -> RoadmapService<SqliteTaskRepository<'_>> {
        RoadmapService::new(SqliteTaskRepository::new(&self.conn))
    }

    fn calendar_service(&self) -> CalendarService<SqliteEventRepository<'_>> {
        CalendarService::new(SqliteEventRepository::new(&self.conn))
    }

    fn workspace_repo(&self) -> SqliteWorkspaceRepository<'_> {
        SqliteWorkspaceRepository::new(&self.conn)
    }
}

fn map_page_err(err: PageServiceError) -> StoreError {
    match err {
        PageServiceError::PageNotFound(id) | PageServiceError::ParentNotFound(id) => {
            StoreError::PageNotFound(id)
        }
        PageServiceError::CycleDetected {
            page_uuid,
            parent_uuid,
        } => StoreError::CycleDetected {
            page_uuid,
            parent_uuid,
        },
        PageServiceError::Repo(err) => map_page_repo_err(err),
        PageServiceError::Block(err) => map_block_repo_err(err),
    }
}

fn map_block_err(err: BlockServiceError) -> StoreError {
    match err {
        BlockServiceError::BlockNotFound(id) => StoreError::BlockNotFound(id),
        BlockServiceError::PageNotFound(id) => StoreError::PageNotFound(id),
        BlockServiceError::Repo(err) => map_block_repo_err(err),
    }
}

fn map_planner_err(err: PlannerServiceError) -> StoreError {
    match err {
        PlannerServiceError::TaskNotFound(id) => StoreError::TaskNotFound(id),
        PlannerServiceError::EventNotFound(id) => StoreError::EventNotFound(id),
        PlannerServiceError::Repo(err) => map_planner_repo_err(err),
    }
}

pub(crate) fn map_page_repo_err(err: PageRepoError) -> StoreError {
    match err {
        PageRepoError::Db(err) => StoreError::Db(err),
        PageRepoError::PageNotFound(id) => StoreError::PageNotFound(id),
        PageRepoError::InvalidData(message) => StoreError::InvalidData(message),
    }
}

pub(crate) fn map_block_repo_err(err: BlockRepoError) -> StoreError {
    match err {
        BlockRepoError::Db(err) => StoreError::Db(err),
        BlockRepoError::BlockNotFound(id) => StoreError::BlockNotFound(id),
        BlockRepoError::PageNotFound(id) => StoreError::PageNotFound(id),
        BlockRepoError::InvalidData(message) => StoreError::InvalidData(message),
    }
}

pub(crate) fn map_planner_repo_err(err: PlannerRepoError) -> StoreError {
    match err {
        PlannerRepoError::Db(err) => StoreError::Db(err),
        PlannerRepoError::TaskNotFound(id) => StoreError::TaskNotFound(id),
        PlannerRepoError::EventNotFound(id) => StoreError::EventNotFound(id),
        PlannerRepoError::InvalidData(message) => StoreError::InvalidData(message),
    }
}

pub(crate) fn map_workspace_repo_err(err: WorkspaceRepoError) -> StoreError {
    match err {
        WorkspaceRepoError::Db(err) => StoreError::Db(err),
        WorkspaceRepoError::WorkspaceMissing => StoreError::WorkspaceMissing,
        WorkspaceRepoError::InvalidData(message) => StoreError::InvalidData(message),
    }
}
