//! Page tree use-case service.
//!
//! # Responsibility
//! - Provide page create, delete, single-field update and move operations.
//! - Enforce hierarchy invariants above the repository layer.
//!
//! # Invariants
//! - A parent named on create must exist; it is auto-expanded so the new
//!   child is visible.
//! - Every new page starts with one empty text block.
//! - Move operations must not create parent-child cycles.

use crate::model::page::{Page, PageId, DEFAULT_PAGE_ICON, DEFAULT_PAGE_TITLE};
use crate::repo::block_repo::{BlockRepoError, BlockRepository};
use crate::repo::page_repo::{PageCascade, PageRepoError, PageRepository};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from page service operations.
#[derive(Debug)]
pub enum PageServiceError {
    /// Target page does not exist.
    PageNotFound(PageId),
    /// Named parent page does not exist.
    ParentNotFound(PageId),
    /// Move operation would make a page its own ancestor.
    CycleDetected {
        page_uuid: PageId,
        parent_uuid: PageId,
    },
    /// Page repository failure.
    Repo(PageRepoError),
    /// Block repository failure while creating the default block.
    Block(BlockRepoError),
}

impl Display for PageServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent page not found: {id}"),
            Self::CycleDetected {
                page_uuid,
                parent_uuid,
            } => write!(
                f,
                "move would create cycle: page {page_uuid} under parent {parent_uuid}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Block(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PageServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Block(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PageRepoError> for PageServiceError {
    fn from(value: PageRepoError) -> Self {
        match value {
            PageRepoError::PageNotFound(page_uuid) => Self::PageNotFound(page_uuid),
            other => Self::Repo(other),
        }
    }
}

impl From<BlockRepoError> for PageServiceError {
    fn from(value: BlockRepoError) -> Self {
        Self::Block(value)
    }
}

/// Page tree service facade.
pub struct PageService<P: PageRepository, B: BlockRepository> {
    pages: P,
    blocks: B,
}

impl<P: PageRepository, B: BlockRepository> PageService<P, B> {
    /// Creates a service from repository implementations.
    pub fn new(pages: P, blocks: B) -> Self {
        Self { pages, blocks }
    }

    /// Creates one page under an optional parent.
    ///
    /// The page gets the default title and icon, the parent (when given) is
    /// forced expanded, and one empty text block is created on the page.
    pub fn create_page(&self, parent_uuid: Option<PageId>) -> Result<Page, PageServiceError> {
        if let Some(parent_uuid) = parent_uuid {
            self.pages
                .get_page(parent_uuid)?
                .ok_or(PageServiceError::ParentNotFound(parent_uuid))?;
            self.pages.set_page_expanded(parent_uuid, true)?;
        }

        let page = self
            .pages
            .create_page(parent_uuid, DEFAULT_PAGE_TITLE, DEFAULT_PAGE_ICON)?;
        self.blocks.insert_block(page.uuid, None, None)?;
        Ok(page)
    }

    /// Deletes one page, its transitive descendants and every block owned
    /// by a removed page.
    pub fn delete_page(&self, page_uuid: PageId) -> Result<PageCascade, PageServiceError> {
        self.pages.delete_subtree(page_uuid).map_err(Into::into)
    }

    /// Sets one page's title.
    pub fn rename_page(
        &self,
        page_uuid: PageId,
        title: impl AsRef<str>,
    ) -> Result<(), PageServiceError> {
        self.pages
            .rename_page(page_uuid, title.as_ref())
            .map_err(Into::into)
    }

    /// Sets one page's icon.
    pub fn set_page_icon(
        &self,
        page_uuid: PageId,
        icon: impl AsRef<str>,
    ) -> Result<(), PageServiceError> {
        self.pages
            .set_page_icon(page_uuid, icon.as_ref())
            .map_err(Into::into)
    }

    /// Flips one page's sidebar expansion flag.
    pub fn toggle_page_expansion(&self, page_uuid: PageId) -> Result<(), PageServiceError> {
        self.pages
            .toggle_page_expansion(page_uuid)
            .map_err(Into::into)
    }

    /// Moves one page under an optional new parent, refusing cycles.
    pub fn move_page(
        &self,
        page_uuid: PageId,
        new_parent_uuid: Option<PageId>,
    ) -> Result<(), PageServiceError> {
        self.pages
            .get_page(page_uuid)?
            .ok_or(PageServiceError::PageNotFound(page_uuid))?;

        if let Some(parent_uuid) = new_parent_uuid {
            if parent_uuid == page_uuid {
                return Err(PageServiceError::CycleDetected {
                    page_uuid,
                    parent_uuid,
                });
            }
            self.pages
                .get_page(parent_uuid)?
                .ok_or(PageServiceError::ParentNotFound(parent_uuid))?;
            if self.would_create_cycle(page_uuid, parent_uuid)? {
                return Err(PageServiceError::CycleDetected {
                    page_uuid,
                    parent_uuid,
                });
            }
        }

        self.pages
            .set_page_parent(page_uuid, new_parent_uuid)
            .map_err(Into::into)
    }

    /// Loads one page by id.
    pub fn get_page(&self, page_uuid: PageId) -> Result<Option<Page>, PageServiceError> {
        self.pages.get_page(page_uuid).map_err(Into::into)
    }

    /// Lists every page in collection order.
    pub fn list_pages(&self) -> Result<Vec<Page>, PageServiceError> {
        self.pages.list_pages().map_err(Into::into)
    }

    /// Returns the first page in collection order, if any.
    pub fn first_page(&self) -> Result<Option<Page>, PageServiceError> {
        self.pages.first_page().map_err(Into::into)
    }

    fn would_create_cycle(
        &self,
        page_uuid: PageId,
        candidate_parent_uuid: PageId,
    ) -> Result<bool, PageServiceError> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent_uuid);
        while let Some(current) = cursor {
            if current == page_uuid {
                return Ok(true);
            }
            if !visited.insert(current) {
                return Ok(true);
            }

            let page = self
                .pages
                .get_page(current)?
                .ok_or(PageServiceError::ParentNotFound(current))?;
            cursor = page.parent_uuid;
        }
        Ok(false)
    }
}
