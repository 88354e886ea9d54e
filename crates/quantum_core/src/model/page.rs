//! Page domain model.
//!
//! # Responsibility
//! - Define the page record used by the sidebar tree and the editor surface.
//!
//! # Invariants
//! - `parent_uuid = None` means the page is a root of the page forest.
//! - The parent graph is expected acyclic; re-parent operations must refuse
//!   moves that would break this.
//! - `position` is a store-wide insertion sequence, not a per-parent index.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable page identifier.
pub type PageId = Uuid;

/// Title assigned to pages created without user input.
pub const DEFAULT_PAGE_TITLE: &str = "Untitled";

/// Icon assigned to pages created without user input.
pub const DEFAULT_PAGE_ICON: &str = "📄";

/// A titled node in the page forest.
///
/// Pages own blocks (`Block::page_uuid`) and may own child pages through
/// `parent_uuid`. Both ownerships cascade on delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Stable page id.
    pub uuid: PageId,
    /// User-facing title. May be empty; form surfaces validate, the store
    /// does not.
    pub title: String,
    /// Parent page id. `None` means root-level page.
    pub parent_uuid: Option<PageId>,
    /// Emoji glyph shown next to the title.
    pub icon: String,
    /// Sidebar expansion flag. UI-only state, but kept here so every
    /// rendering surface sees the same value.
    pub is_expanded: bool,
    /// Store-wide insertion order key.
    pub position: i64,
    /// Epoch ms creation timestamp. Immutable after creation.
    pub created_at: i64,
}

impl Page {
    /// Returns whether this page sits at the root of the forest.
    pub fn is_root(&self) -> bool {
        self.parent_uuid.is_none()
    }
}
