//! Workspace singleton record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable workspace identifier.
pub type WorkspaceId = Uuid;

/// Top-level named container. Exactly one exists per store instance and it
/// lives for the whole process run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Stable workspace id.
    pub uuid: WorkspaceId,
    /// User-facing display name.
    pub name: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
}
