//! Workspace singleton repository.
//!
//! The `workspace` table holds exactly one row, written once when the store
//! opens. Only the display name is mutable afterwards.

use crate::db::DbError;
use crate::model::workspace::{Workspace, WorkspaceId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type WorkspaceRepoResult<T> = Result<T, WorkspaceRepoError>;

/// Errors from workspace repository operations.
#[derive(Debug)]
pub enum WorkspaceRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// The singleton row is missing; the store was not initialized.
    WorkspaceMissing,
    /// Stored data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for WorkspaceRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::WorkspaceMissing => write!(f, "workspace row missing"),
            Self::InvalidData(message) => write!(f, "invalid workspace data: {message}"),
        }
    }
}

impl Error for WorkspaceRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for WorkspaceRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for WorkspaceRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the workspace singleton.
pub trait WorkspaceRepository {
    /// Writes the singleton row. Called once per store lifetime.
    fn init_workspace(&self, name: &str) -> WorkspaceRepoResult<Workspace>;
    /// Loads the singleton row.
    fn get_workspace(&self) -> WorkspaceRepoResult<Workspace>;
    /// Sets the display name.
    fn rename_workspace(&self, name: &str) -> WorkspaceRepoResult<()>;
}

/// SQLite-backed workspace repository.
pub struct SqliteWorkspaceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkspaceRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl WorkspaceRepository for SqliteWorkspaceRepository<'_> {
    fn init_workspace(&self, name: &str) -> WorkspaceRepoResult<Workspace> {
        let workspace_uuid: WorkspaceId = Uuid::now_v7();
        self.conn.execute(
            "INSERT INTO workspace (workspace_uuid, name) VALUES (?1, ?2);",
            params![workspace_uuid.to_string(), name],
        )?;
        self.get_workspace()
    }

    fn get_workspace(&self) -> WorkspaceRepoResult<Workspace> {
        let mut stmt = self.conn.prepare(
            "SELECT workspace_uuid, name, created_at FROM workspace LIMIT 1;",
        )?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => parse_workspace_row(row),
            None => Err(WorkspaceRepoError::WorkspaceMissing),
        }
    }

    fn rename_workspace(&self, name: &str) -> WorkspaceRepoResult<()> {
        let changed = self
            .conn
            .execute("UPDATE workspace SET name = ?1;", params![name])?;
        if changed == 0 {
            return Err(WorkspaceRepoError::WorkspaceMissing);
        }
        Ok(())
    }
}

fn parse_workspace_row(row: &Row<'_>) -> WorkspaceRepoResult<Workspace> {
    let uuid_text: String = row.get("workspace_uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        WorkspaceRepoError::InvalidData(format!(
            "invalid uuid `{uuid_text}` in workspace.workspace_uuid"
        ))
    })?;

    Ok(Workspace {
        uuid,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
