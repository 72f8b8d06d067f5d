//! Storage capability shared by every backend.

use crate::error::StoreResult;
use crate::types::ResponseRecord;
use async_trait::async_trait;

/// Primitive operations a response backend must provide.
///
/// Implementations enforce (guild, name) uniqueness in the storage layer
/// itself. Callers never check-then-insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseBackend: Send + Sync {
    /// Persist a new record. Fails with `DuplicateName` if (guild, name) is taken.
    async fn insert_unique(&self, record: &ResponseRecord) -> StoreResult<()>;

    /// Point lookup. Absence is `Ok(None)`.
    async fn get_by_name(&self, guild_id: &str, name: &str)
        -> StoreResult<Option<ResponseRecord>>;

    /// Remove one record. Fails with `NotFound` if nothing was removed.
    async fn delete_by_name(&self, guild_id: &str, name: &str) -> StoreResult<()>;

    /// Overwrite trigger and response. Fails with `NotFound` if absent.
    async fn update_by_name(
        &self,
        guild_id: &str,
        name: &str,
        trigger: &str,
        response: &str,
    ) -> StoreResult<()>;

    /// All records in a guild, newest first.
    async fn list_by_guild(&self, guild_id: &str) -> StoreResult<Vec<ResponseRecord>>;

    /// Cheap round-trip to the backend.
    async fn health_check(&self) -> bool {
        true
    }
}
