//! Guild-scoped response management.

use crate::backend::ResponseBackend;
use crate::error::{ResponseError, StoreError};
use crate::matching::first_match;
use crate::types::{MatchMode, ResponseRecord};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Sole consumer of the storage backend.
///
/// Holds no cache and no locks: every call goes to the backend, which is
/// responsible for atomic uniqueness.
#[derive(Clone)]
pub struct ResponsesManager {
    backend: Arc<dyn ResponseBackend>,
}

impl ResponsesManager {
    pub fn new(backend: Arc<dyn ResponseBackend>) -> Self {
        Self { backend }
    }

    /// Store a new named response.
    #[instrument(skip(self, trigger, response))]
    pub async fn add(
        &self,
        guild_id: &str,
        name: &str,
        trigger: &str,
        response: &str,
    ) -> Result<ResponseRecord, ResponseError> {
        let record = ResponseRecord::new(guild_id, name, trigger, response);

        match self.backend.insert_unique(&record).await {
            Ok(()) => {
                info!("Added response {} in guild {}", name, guild_id);
                Ok(record)
            }
            Err(StoreError::DuplicateName { .. }) => Err(ResponseError::AlreadyExists {
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the trigger and response of an existing entry.
    #[instrument(skip(self, trigger, response))]
    pub async fn edit(
        &self,
        guild_id: &str,
        name: &str,
        trigger: &str,
        response: &str,
    ) -> Result<(), ResponseError> {
        self.backend
            .update_by_name(guild_id, name, trigger, response)
            .await
            .map_err(|e| not_found_to_missing(e, name))?;

        info!("Edited response {} in guild {}", name, guild_id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, guild_id: &str, name: &str) -> Result<(), ResponseError> {
        self.backend
            .delete_by_name(guild_id, name)
            .await
            .map_err(|e| not_found_to_missing(e, name))?;

        info!("Removed response {} from guild {}", name, guild_id);
        Ok(())
    }

    pub async fn get(&self, guild_id: &str, name: &str) -> Result<Option<ResponseRecord>, ResponseError> {
        Ok(self.backend.get_by_name(guild_id, name).await?)
    }

    /// All responses in a guild, newest first.
    pub async fn list(&self, guild_id: &str) -> Result<Vec<ResponseRecord>, ResponseError> {
        Ok(self.backend.list_by_guild(guild_id).await?)
    }

    /// First response, newest first, whose trigger matches `text`.
    ///
    /// When several records share a matching trigger the most recently
    /// created one wins.
    #[instrument(skip(self, text))]
    pub async fn find_match(
        &self,
        guild_id: &str,
        text: &str,
        mode: MatchMode,
    ) -> Result<Option<ResponseRecord>, ResponseError> {
        let records = self.backend.list_by_guild(guild_id).await?;
        let found = first_match(&records, text, mode).cloned();

        if let Some(record) = &found {
            debug!("Trigger matched response {}", record.name);
        }
        Ok(found)
    }

    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }
}

fn not_found_to_missing(err: StoreError, name: &str) -> ResponseError {
    match err {
        StoreError::NotFound { .. } => ResponseError::NoSuchResponse {
            name: name.to_string(),
        },
        other => other.into(),
    }
}
