//! Block repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, splice-ordering and nesting APIs over the `blocks` table.
//! - Own the descendant sweep performed by block deletion.
//!
//! # Invariants
//! - Render order within one owner is `position ASC`; `position` is a
//!   store-wide insertion sequence shared by every block.
//! - Inserting after an anchor shifts every later position by one inside a
//!   transaction, so the splice is never partially visible.
//! - Child listings are derived from `parent_uuid` only.

use crate::db::DbError;
use crate::model::block::{Block, BlockId, BlockKind, BlockPatch};
use crate::model::page::PageId;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const BLOCK_SELECT_SQL: &str = "SELECT
    block_uuid,
    page_uuid,
    parent_uuid,
    kind,
    content,
    checked,
    is_expanded,
    language,
    position,
    created_at,
    updated_at
FROM blocks";

pub type BlockRepoResult<T> = Result<T, BlockRepoError>;

/// Errors from block repository operations.
#[derive(Debug)]
pub enum BlockRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target block does not exist.
    BlockNotFound(BlockId),
    /// Owning page for an insert does not exist.
    PageNotFound(PageId),
    /// Stored data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for BlockRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::BlockNotFound(id) => write!(f, "block not found: {id}"),
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid block data: {message}"),
        }
    }
}

impl Error for BlockRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for BlockRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BlockRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for block operations.
pub trait BlockRepository {
    /// Creates one empty text block on a page.
    ///
    /// With `after_uuid`, the new block is spliced immediately after the
    /// anchor's position; an unknown anchor degrades to an append. With
    /// `parent_uuid`, the block is nested under that parent.
    fn insert_block(
        &self,
        page_uuid: PageId,
        after_uuid: Option<BlockId>,
        parent_uuid: Option<BlockId>,
    ) -> BlockRepoResult<Block>;
    /// Loads one block by id.
    fn get_block(&self, block_uuid: BlockId) -> BlockRepoResult<Option<Block>>;
    /// Lists every block in collection order.
    fn list_blocks(&self) -> BlockRepoResult<Vec<Block>>;
    /// Lists one page's top-level blocks in collection order.
    fn list_page_blocks(&self, page_uuid: PageId) -> BlockRepoResult<Vec<Block>>;
    /// Lists one block's direct children in collection order.
    fn list_child_blocks(&self, parent_uuid: BlockId) -> BlockRepoResult<Vec<Block>>;
    /// Applies a set-only field patch to one block.
    fn update_block(&self, block_uuid: BlockId, patch: &BlockPatch) -> BlockRepoResult<()>;
    /// Deletes one block and every transitive descendant, returning the
    /// removed ids.
    fn delete_block(&self, block_uuid: BlockId) -> BlockRepoResult<Vec<BlockId>>;
    /// Flips the expansion flag; an unset flag flips to expanded.
    fn toggle_block_expansion(&self, block_uuid: BlockId) -> BlockRepoResult<()>;
}

/// SQLite-backed block repository.
pub struct SqliteBlockRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlockRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BlockRepository for SqliteBlockRepository<'_> {
    fn insert_block(
        &self,
        page_uuid: PageId,
        after_uuid: Option<BlockId>,
        parent_uuid: Option<BlockId>,
    ) -> BlockRepoResult<Block> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let page_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM pages WHERE page_uuid = ?1);",
            [page_uuid.to_string()],
            |row| row.get(0),
        )?;
        if page_exists == 0 {
            return Err(BlockRepoError::PageNotFound(page_uuid));
        }

        let position = match after_uuid {
            Some(after_uuid) => {
                let anchor: Option<i64> = tx
                    .query_row(
                        "SELECT position FROM blocks WHERE block_uuid = ?1;",
                        [after_uuid.to_string()],
                        |row| row.get(0),
                    )
                    .optional()?;
                match anchor {
                    Some(anchor_position) => {
                        tx.execute(
                            "UPDATE blocks SET position = position + 1 WHERE position > ?1;",
                            [anchor_position],
                        )?;
                        anchor_position + 1
                    }
                    None => next_position(&tx)?,
                }
            }
            None => next_position(&tx)?,
        };

        let block_uuid = Uuid::now_v7();
        tx.execute(
            "INSERT INTO blocks (
                block_uuid,
                page_uuid,
                parent_uuid,
                kind,
                content,
                position
            ) VALUES (?1, ?2, ?3, 'text', '', ?4);",
            params![
                block_uuid.to_string(),
                page_uuid.to_string(),
                parent_uuid.map(|value| value.to_string()),
                position,
            ],
        )?;

        let block = load_required_block(&tx, block_uuid)?;
        tx.commit()?;
        Ok(block)
    }

    fn get_block(&self, block_uuid: BlockId) -> BlockRepoResult<Option<Block>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BLOCK_SELECT_SQL} WHERE block_uuid = ?1;"))?;
        let mut rows = stmt.query([block_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_block_row(row)?));
        }
        Ok(None)
    }

    fn list_blocks(&self) -> BlockRepoResult<Vec<Block>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BLOCK_SELECT_SQL} ORDER BY position ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            blocks.push(parse_block_row(row)?);
        }
        Ok(blocks)
    }

    fn list_page_blocks(&self, page_uuid: PageId) -> BlockRepoResult<Vec<Block>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BLOCK_SELECT_SQL}
             WHERE page_uuid = ?1
               AND parent_uuid IS NULL
             ORDER BY position ASC;"
        ))?;
        let mut rows = stmt.query([page_uuid.to_string()])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            blocks.push(parse_block_row(row)?);
        }
        Ok(blocks)
    }

    fn list_child_blocks(&self, parent_uuid: BlockId) -> BlockRepoResult<Vec<Block>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BLOCK_SELECT_SQL}
             WHERE parent_uuid = ?1
             ORDER BY position ASC;"
        ))?;
        let mut rows = stmt.query([parent_uuid.to_string()])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            blocks.push(parse_block_row(row)?);
        }
        Ok(blocks)
    }

    fn update_block(&self, block_uuid: BlockId, patch: &BlockPatch) -> BlockRepoResult<()> {
        // An empty patch must not touch the row, `updated_at` included.
        if patch.is_empty() {
            return Ok(());
        }

        let mut sql = String::from("UPDATE blocks SET updated_at = (strftime('%s', 'now') * 1000)");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = patch.kind {
            sql.push_str(", kind = ?");
            bind_values.push(Value::Text(block_kind_to_db(kind).to_string()));
        }
        if let Some(content) = &patch.content {
            sql.push_str(", content = ?");
            bind_values.push(Value::Text(content.clone()));
        }
        if let Some(checked) = patch.checked {
            sql.push_str(", checked = ?");
            bind_values.push(Value::Integer(i64::from(checked)));
        }
        if let Some(is_expanded) = patch.is_expanded {
            sql.push_str(", is_expanded = ?");
            bind_values.push(Value::Integer(i64::from(is_expanded)));
        }
        if let Some(language) = &patch.language {
            sql.push_str(", language = ?");
            bind_values.push(Value::Text(language.clone()));
        }

        sql.push_str(" WHERE block_uuid = ?;");
        bind_values.push(Value::Text(block_uuid.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(BlockRepoError::BlockNotFound(block_uuid));
        }
        Ok(())
    }

    fn delete_block(&self, block_uuid: BlockId) -> BlockRepoResult<Vec<BlockId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed = collect_descendant_ids(&tx, block_uuid)?;
        if removed.is_empty() {
            return Err(BlockRepoError::BlockNotFound(block_uuid));
        }

        let id_texts: Vec<String> = removed.iter().map(|id| id.to_string()).collect();
        let placeholders = vec!["?"; id_texts.len()].join(", ");
        tx.execute(
            &format!("DELETE FROM blocks WHERE block_uuid IN ({placeholders});"),
            params_from_iter(id_texts.iter()),
        )?;

        tx.commit()?;
        Ok(removed)
    }

    fn toggle_block_expansion(&self, block_uuid: BlockId) -> BlockRepoResult<()> {
        // NULL flips to expanded, matching the untyped flag semantics.
        let changed = self.conn.execute(
            "UPDATE blocks
             SET is_expanded = CASE WHEN is_expanded = 1 THEN 0 ELSE 1 END,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE block_uuid = ?1;",
            [block_uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(BlockRepoError::BlockNotFound(block_uuid));
        }
        Ok(())
    }
}

fn collect_descendant_ids(conn: &Connection, block_uuid: BlockId) -> BlockRepoResult<Vec<BlockId>> {
    // UNION, not UNION ALL: deduplication terminates the walk even if a
    // malformed parent link ever forms a cycle.
    let mut stmt = conn.prepare(
        "WITH RECURSIVE subtree(block_uuid) AS (
            SELECT block_uuid FROM blocks WHERE block_uuid = ?1
            UNION
            SELECT child.block_uuid
            FROM blocks child
            INNER JOIN subtree parent ON child.parent_uuid = parent.block_uuid
        )
        SELECT block_uuid FROM subtree;",
    )?;
    let mut rows = stmt.query([block_uuid.to_string()])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.push(parse_uuid(&value, "blocks.block_uuid")?);
    }
    Ok(ids)
}

fn next_position(conn: &Connection) -> BlockRepoResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM blocks;",
        [],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn load_required_block(conn: &Connection, block_uuid: BlockId) -> BlockRepoResult<Block> {
    let mut stmt = conn.prepare(&format!("{BLOCK_SELECT_SQL} WHERE block_uuid = ?1;"))?;
    let mut rows = stmt.query([block_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_block_row(row);
    }
    Err(BlockRepoError::BlockNotFound(block_uuid))
}

fn parse_block_row(row: &Row<'_>) -> BlockRepoResult<Block> {
    let block_uuid_text: String = row.get("block_uuid")?;
    let block_uuid = parse_uuid(&block_uuid_text, "blocks.block_uuid")?;

    let page_uuid_text: String = row.get("page_uuid")?;
    let page_uuid = parse_uuid(&page_uuid_text, "blocks.page_uuid")?;

    let parent_uuid = row
        .get::<_, Option<String>>("parent_uuid")?
        .map(|value| parse_uuid(&value, "blocks.parent_uuid"))
        .transpose()?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_block_kind(&kind_text).ok_or_else(|| {
        BlockRepoError::InvalidData(format!("invalid block kind `{kind_text}` in blocks.kind"))
    })?;

    let checked = parse_optional_flag(row.get("checked")?, "blocks.checked")?;
    let is_expanded = parse_optional_flag(row.get("is_expanded")?, "blocks.is_expanded")?;

    Ok(Block {
        uuid: block_uuid,
        page_uuid,
        parent_uuid,
        kind,
        content: row.get("content")?,
        checked,
        is_expanded,
        language: row.get("language")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> BlockRepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| BlockRepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn parse_optional_flag(
    value: Option<i64>,
    column: &'static str,
) -> BlockRepoResult<Option<bool>> {
    match value {
        None => Ok(None),
        Some(0) => Ok(Some(false)),
        Some(1) => Ok(Some(true)),
        Some(other) => Err(BlockRepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn block_kind_to_db(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Text => "text",
        BlockKind::Heading => "heading",
        BlockKind::Todo => "todo",
        BlockKind::Toggle => "toggle",
        BlockKind::Divider => "divider",
        BlockKind::Code => "code",
    }
}

fn parse_block_kind(value: &str) -> Option<BlockKind> {
    match value {
        "text" => Some(BlockKind::Text),
        "heading" => Some(BlockKind::Heading),
        "todo" => Some(BlockKind::Todo),
        "toggle" => Some(BlockKind::Toggle),
        "divider" => Some(BlockKind::Divider),
        "code" => Some(BlockKind::Code),
        _ => None,
    }
}
