//! Core state store for the Quantum workspace editor.
//! This crate is the single source of truth for the page tree, the block
//! documents and the planner collections; rendering surfaces only consume
//! the store API.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{Block, BlockId, BlockKind, BlockPatch};
pub use model::icons::{search_icons, IconCategory, ICON_CATEGORIES};
pub use model::page::{Page, PageId, DEFAULT_PAGE_ICON, DEFAULT_PAGE_TITLE};
pub use model::planner::{
    tag_color, CalendarEvent, CalendarEventPatch, EventId, EventTag, NewCalendarEvent,
    NewRoadmapTask, RoadmapTask, RoadmapTaskPatch, TaskCategory, TaskId, TaskStatus, EVENT_TAGS,
};
pub use model::template::{catalog as template_catalog, Template, TemplateKind};
pub use model::workspace::{Workspace, WorkspaceId};
pub use seed::{install_sample, SampleWorkspace, SAMPLE_WORKSPACE_NAME};
pub use store::{StoreError, ViewTarget, WorkspaceStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
