//! Block domain model.
//!
//! # Responsibility
//! - Define the typed content unit rendered by the document editor.
//! - Define the partial-update patch applied by `update_block`.
//! - Carry per-kind display metadata for the slash-command menu.
//!
//! # Invariants
//! - A block belongs to exactly one page for its whole lifetime.
//! - `parent_uuid` is the single authoritative nesting link; there is no
//!   stored child-id list to keep in sync with it.
//! - `position` is a store-wide insertion sequence shared by all blocks.

use crate::model::page::PageId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable block identifier.
pub type BlockId = Uuid;

/// Content variant of a block. Closed set; each variant fixes which of the
/// optional `Block` fields are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Plain paragraph text.
    Text,
    /// Section heading.
    Heading,
    /// Checkable item; uses `checked`.
    Todo,
    /// Collapsible container for nested blocks; uses `is_expanded`.
    Toggle,
    /// Horizontal rule with no content.
    Divider,
    /// Code snippet; uses `language`.
    Code,
}

impl BlockKind {
    /// Every kind, in the order the slash-command menu lists them.
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Text,
        BlockKind::Heading,
        BlockKind::Todo,
        BlockKind::Toggle,
        BlockKind::Divider,
        BlockKind::Code,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Heading => "Heading",
            Self::Todo => "To-do list",
            Self::Toggle => "Toggle list",
            Self::Divider => "Divider",
            Self::Code => "Code",
        }
    }

    /// One-line menu description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Text => "Just start writing with plain text",
            Self::Heading => "Large section heading",
            Self::Todo => "Track tasks with a checkbox",
            Self::Toggle => "Collapsible list that hides nested content",
            Self::Divider => "Visually separate blocks",
            Self::Code => "Capture a code snippet",
        }
    }

    /// Menu glyph.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Text => "📝",
            Self::Heading => "🔠",
            Self::Todo => "☑️",
            Self::Toggle => "▶️",
            Self::Divider => "➖",
            Self::Code => "💻",
        }
    }
}

/// A typed content unit owned by one page, optionally nested under a parent
/// block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Stable block id.
    pub uuid: BlockId,
    /// Owning page. Immutable after creation.
    pub page_uuid: PageId,
    /// Parent block id for nested blocks. `None` means page top level.
    pub parent_uuid: Option<BlockId>,
    /// Content variant. Serialized as `type` to match the editor schema.
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// String body. Empty for dividers and freshly inserted blocks.
    pub content: String,
    /// Meaningful only when `kind == BlockKind::Todo`.
    pub checked: Option<bool>,
    /// Meaningful only when `kind == BlockKind::Toggle`, but flipped
    /// untyped by `toggle_block_expansion`.
    pub is_expanded: Option<bool>,
    /// Meaningful only when `kind == BlockKind::Code`.
    pub language: Option<String>,
    /// Store-wide insertion order key; render order within one owner.
    pub position: i64,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

/// Field subset applied by `update_block`.
///
/// Set-only merge: a `None` field leaves the stored value untouched, there
/// is no way to clear a field back to `NULL` through a patch. An empty
/// patch leaves the block observably unchanged, including `updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    pub kind: Option<BlockKind>,
    pub content: Option<String>,
    pub checked: Option<bool>,
    pub is_expanded: Option<bool>,
    pub language: Option<String>,
}

impl BlockPatch {
    /// Returns whether the patch sets no field at all.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.content.is_none()
            && self.checked.is_none()
            && self.is_expanded.is_none()
            && self.language.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockKind, BlockPatch};

    #[test]
    fn kind_serializes_as_snake_case_tag() {
        let tag = serde_json::to_string(&BlockKind::Todo).unwrap();
        assert_eq!(tag, "\"todo\"");
    }

    #[test]
    fn menu_metadata_covers_every_kind() {
        for kind in BlockKind::ALL {
            assert!(!kind.label().is_empty());
            assert!(!kind.description().is_empty());
            assert!(!kind.icon().is_empty());
        }
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(BlockPatch::default().is_empty());
        let patch = BlockPatch {
            content: Some("x".to_string()),
            ..BlockPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
