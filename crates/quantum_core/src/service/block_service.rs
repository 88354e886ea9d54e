//! Block editor use-case service.
//!
//! Thin facade over the block repository; the repository already owns
//! splice ordering and the descendant sweep.

use crate::model::block::{Block, BlockId, BlockPatch};
use crate::model::page::PageId;
use crate::repo::block_repo::{BlockRepoError, BlockRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from block service operations.
#[derive(Debug)]
pub enum BlockServiceError {
    /// Target block does not exist.
    BlockNotFound(BlockId),
    /// Owning page for an insert does not exist.
    PageNotFound(PageId),
    /// Repository-level failure.
    Repo(BlockRepoError),
}

impl Display for BlockServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlockNotFound(id) => write!(f, "block not found: {id}"),
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BlockServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BlockRepoError> for BlockServiceError {
    fn from(value: BlockRepoError) -> Self {
        match value {
            BlockRepoError::BlockNotFound(block_uuid) => Self::BlockNotFound(block_uuid),
            BlockRepoError::PageNotFound(page_uuid) => Self::PageNotFound(page_uuid),
            other => Self::Repo(other),
        }
    }
}

/// Block editor service facade.
pub struct BlockService<R: BlockRepository> {
    repo: R,
}

impl<R: BlockRepository> BlockService<R> {
    /// Creates a service from a repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one empty text block, spliced after the optional anchor and
    /// nested under the optional parent.
    pub fn insert_block(
        &self,
        page_uuid: PageId,
        after_uuid: Option<BlockId>,
        parent_uuid: Option<BlockId>,
    ) -> Result<Block, BlockServiceError> {
        self.repo
            .insert_block(page_uuid, after_uuid, parent_uuid)
            .map_err(Into::into)
    }

    /// Loads one block by id.
    pub fn get_block(&self, block_uuid: BlockId) -> Result<Option<Block>, BlockServiceError> {
        self.repo.get_block(block_uuid).map_err(Into::into)
    }

    /// Lists the whole block collection in collection order.
    pub fn list_blocks(&self) -> Result<Vec<Block>, BlockServiceError> {
        self.repo.list_blocks().map_err(Into::into)
    }

    /// Lists one page's top-level blocks in collection order.
    pub fn page_blocks(&self, page_uuid: PageId) -> Result<Vec<Block>, BlockServiceError> {
        self.repo.list_page_blocks(page_uuid).map_err(Into::into)
    }

    /// Lists one block's direct children in collection order.
    pub fn child_blocks(&self, parent_uuid: BlockId) -> Result<Vec<Block>, BlockServiceError> {
        self.repo.list_child_blocks(parent_uuid).map_err(Into::into)
    }

    /// Applies a set-only field patch to one block.
    pub fn update_block(
        &self,
        block_uuid: BlockId,
        patch: &BlockPatch,
    ) -> Result<(), BlockServiceError> {
        self.repo.update_block(block_uuid, patch).map_err(Into::into)
    }

    /// Deletes one block and every transitive descendant, returning the
    /// removed ids.
    pub fn delete_block(&self, block_uuid: BlockId) -> Result<Vec<BlockId>, BlockServiceError> {
        self.repo.delete_block(block_uuid).map_err(Into::into)
    }

    /// Flips one block's expansion flag.
    pub fn toggle_block_expansion(&self, block_uuid: BlockId) -> Result<(), BlockServiceError> {
        self.repo
            .toggle_block_expansion(block_uuid)
            .map_err(Into::into)
    }
}
