//! Page repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and hierarchy APIs over the `pages` table.
//! - Own the cascading subtree delete, including the owned-block sweep.
//!
//! # Invariants
//! - Page collection order is `position ASC`, a store-wide insertion
//!   sequence.
//! - `delete_subtree` removes every transitive descendant exactly once and
//!   never leaves a block owned by a removed page.

use crate::db::DbError;
use crate::model::page::{Page, PageId};
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PAGE_SELECT_SQL: &str = "SELECT
    page_uuid,
    title,
    parent_uuid,
    icon,
    is_expanded,
    position,
    created_at
FROM pages";

pub type PageRepoResult<T> = Result<T, PageRepoError>;

/// Errors from page repository operations.
#[derive(Debug)]
pub enum PageRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target page does not exist.
    PageNotFound(PageId),
    /// Stored data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for PageRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid page data: {message}"),
        }
    }
}

impl Error for PageRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for PageRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PageRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outcome of one cascading page delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCascade {
    /// The target page and every transitive descendant, in walk order.
    pub removed_pages: Vec<PageId>,
    /// Count of blocks owned by any removed page.
    pub removed_blocks: usize,
}

/// Repository interface for page tree operations.
pub trait PageRepository {
    /// Creates one page at the end of the collection order.
    fn create_page(
        &self,
        parent_uuid: Option<PageId>,
        title: &str,
        icon: &str,
    ) -> PageRepoResult<Page>;
    /// Loads one page by id.
    fn get_page(&self, page_uuid: PageId) -> PageRepoResult<Option<Page>>;
    /// Lists every page in collection order.
    fn list_pages(&self) -> PageRepoResult<Vec<Page>>;
    /// Returns the page with the lowest position, if any.
    fn first_page(&self) -> PageRepoResult<Option<Page>>;
    /// Sets the title of one page.
    fn rename_page(&self, page_uuid: PageId, title: &str) -> PageRepoResult<()>;
    /// Sets the icon of one page.
    fn set_page_icon(&self, page_uuid: PageId, icon: &str) -> PageRepoResult<()>;
    /// Sets the sidebar expansion flag of one page.
    fn set_page_expanded(&self, page_uuid: PageId, expanded: bool) -> PageRepoResult<()>;
    /// Flips the sidebar expansion flag of one page.
    fn toggle_page_expansion(&self, page_uuid: PageId) -> PageRepoResult<()>;
    /// Re-parents one page. Cycle checks live above this layer.
    fn set_page_parent(
        &self,
        page_uuid: PageId,
        parent_uuid: Option<PageId>,
    ) -> PageRepoResult<()>;
    /// Deletes the subtree rooted at the target page plus all blocks owned
    /// by any removed page.
    fn delete_subtree(&self, page_uuid: PageId) -> PageRepoResult<PageCascade>;
}

/// SQLite-backed page repository.
pub struct SqlitePageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePageRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PageRepository for SqlitePageRepository<'_> {
    fn create_page(
        &self,
        parent_uuid: Option<PageId>,
        title: &str,
        icon: &str,
    ) -> PageRepoResult<Page> {
        let page_uuid = Uuid::now_v7();
        let position = next_position(self.conn)?;
        self.conn.execute(
            "INSERT INTO pages (
                page_uuid,
                title,
                parent_uuid,
                icon,
                is_expanded,
                position
            ) VALUES (?1, ?2, ?3, ?4, 0, ?5);",
            params![
                page_uuid.to_string(),
                title,
                parent_uuid.map(|value| value.to_string()),
                icon,
                position,
            ],
        )?;
        load_required_page(self.conn, page_uuid)
    }

    fn get_page(&self, page_uuid: PageId) -> PageRepoResult<Option<Page>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAGE_SELECT_SQL} WHERE page_uuid = ?1;"))?;
        let mut rows = stmt.query([page_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_page_row(row)?));
        }
        Ok(None)
    }

    fn list_pages(&self) -> PageRepoResult<Vec<Page>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAGE_SELECT_SQL} ORDER BY position ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut pages = Vec::new();
        while let Some(row) = rows.next()? {
            pages.push(parse_page_row(row)?);
        }
        Ok(pages)
    }

    fn first_page(&self) -> PageRepoResult<Option<Page>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PAGE_SELECT_SQL} ORDER BY position ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_page_row(row)?));
        }
        Ok(None)
    }

    fn rename_page(&self, page_uuid: PageId, title: &str) -> PageRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pages SET title = ?2 WHERE page_uuid = ?1;",
            params![page_uuid.to_string(), title],
        )?;
        if changed == 0 {
            return Err(PageRepoError::PageNotFound(page_uuid));
        }
        Ok(())
    }

    fn set_page_icon(&self, page_uuid: PageId, icon: &str) -> PageRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pages SET icon = ?2 WHERE page_uuid = ?1;",
            params![page_uuid.to_string(), icon],
        )?;
        if changed == 0 {
            return Err(PageRepoError::PageNotFound(page_uuid));
        }
        Ok(())
    }

    fn set_page_expanded(&self, page_uuid: PageId, expanded: bool) -> PageRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pages SET is_expanded = ?2 WHERE page_uuid = ?1;",
            params![page_uuid.to_string(), i64::from(expanded)],
        )?;
        if changed == 0 {
            return Err(PageRepoError::PageNotFound(page_uuid));
        }
        Ok(())
    }

    fn toggle_page_expansion(&self, page_uuid: PageId) -> PageRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pages
             SET is_expanded = CASE WHEN is_expanded = 0 THEN 1 ELSE 0 END
             WHERE page_uuid = ?1;",
            [page_uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(PageRepoError::PageNotFound(page_uuid));
        }
        Ok(())
    }

    fn set_page_parent(
        &self,
        page_uuid: PageId,
        parent_uuid: Option<PageId>,
    ) -> PageRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pages SET parent_uuid = ?2 WHERE page_uuid = ?1;",
            params![
                page_uuid.to_string(),
                parent_uuid.map(|value| value.to_string()),
            ],
        )?;
        if changed == 0 {
            return Err(PageRepoError::PageNotFound(page_uuid));
        }
        Ok(())
    }

    fn delete_subtree(&self, page_uuid: PageId) -> PageRepoResult<PageCascade> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed_pages = collect_subtree_ids(&tx, page_uuid)?;
        if removed_pages.is_empty() {
            return Err(PageRepoError::PageNotFound(page_uuid));
        }

        let id_texts: Vec<String> = removed_pages.iter().map(|id| id.to_string()).collect();
        let placeholders = vec!["?"; id_texts.len()].join(", ");

        // Blocks first: they reference pages and must never outlive them.
        let removed_blocks = tx.execute(
            &format!("DELETE FROM blocks WHERE page_uuid IN ({placeholders});"),
            params_from_iter(id_texts.iter()),
        )?;
        tx.execute(
            &format!("DELETE FROM pages WHERE page_uuid IN ({placeholders});"),
            params_from_iter(id_texts.iter()),
        )?;

        tx.commit()?;
        Ok(PageCascade {
            removed_pages,
            removed_blocks,
        })
    }
}

fn collect_subtree_ids(conn: &Connection, page_uuid: PageId) -> PageRepoResult<Vec<PageId>> {
    // UNION, not UNION ALL: deduplication terminates the walk even if a
    // malformed parent link ever forms a cycle.
    let mut stmt = conn.prepare(
        "WITH RECURSIVE subtree(page_uuid) AS (
            SELECT page_uuid FROM pages WHERE page_uuid = ?1
            UNION
            SELECT child.page_uuid
            FROM pages child
            INNER JOIN subtree parent ON child.parent_uuid = parent.page_uuid
        )
        SELECT page_uuid FROM subtree;",
    )?;
    let mut rows = stmt.query([page_uuid.to_string()])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.push(parse_uuid(&value, "pages.page_uuid")?);
    }
    Ok(ids)
}

fn next_position(conn: &Connection) -> PageRepoResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM pages;",
        [],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn load_required_page(conn: &Connection, page_uuid: PageId) -> PageRepoResult<Page> {
    let mut stmt = conn.prepare(&format!("{PAGE_SELECT_SQL} WHERE page_uuid = ?1;"))?;
    let mut rows = stmt.query([page_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_page_row(row);
    }
    Err(PageRepoError::PageNotFound(page_uuid))
}

fn parse_page_row(row: &Row<'_>) -> PageRepoResult<Page> {
    let page_uuid_text: String = row.get("page_uuid")?;
    let page_uuid = parse_uuid(&page_uuid_text, "pages.page_uuid")?;

    let parent_uuid = row
        .get::<_, Option<String>>("parent_uuid")?
        .map(|value| parse_uuid(&value, "pages.parent_uuid"))
        .transpose()?;

    let is_expanded = match row.get::<_, i64>("is_expanded")? {
        0 => false,
        1 => true,
        other => {
            return Err(PageRepoError::InvalidData(format!(
                "invalid is_expanded value `{other}` in pages.is_expanded"
            )));
        }
    };

    Ok(Page {
        uuid: page_uuid,
        title: row.get("title")?,
        parent_uuid,
        icon: row.get("icon")?,
        is_expanded,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> PageRepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| PageRepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
