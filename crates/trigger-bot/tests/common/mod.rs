//! Common test utilities for integration tests.

use async_trait::async_trait;
use responses_store::{
    ResponseBackend, ResponseRecord, ResponsesManager, SqliteBackend, StoreError, StoreResult,
};
use signal_client::BotMessage;
use std::sync::Arc;
use trigger_bot::config::BotConfig;
use trigger_bot::dispatch::Dispatcher;

pub const BOT_NUMBER: &str = "+15555555555";
pub const USER_NUMBER: &str = "+14155551234";
pub const GROUP_ID: &str = "abc123==";

/// Manager over a fresh in-memory SQLite store.
pub fn memory_manager() -> ResponsesManager {
    let backend = SqliteBackend::open_in_memory().unwrap();
    ResponsesManager::new(Arc::new(backend))
}

pub fn dispatcher_with(manager: ResponsesManager, admins: &[&str]) -> Dispatcher {
    let bot = BotConfig {
        admins: admins.iter().map(|a| a.to_string()).collect(),
        ..BotConfig::default()
    };
    Dispatcher::new(manager, &bot)
}

pub fn group_message(text: &str) -> BotMessage {
    BotMessage {
        source: USER_NUMBER.into(),
        source_name: Some("Test User".into()),
        text: text.into(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        group_id: Some(GROUP_ID.into()),
        receiving_account: BOT_NUMBER.into(),
    }
}

pub fn direct_message(text: &str) -> BotMessage {
    BotMessage {
        group_id: None,
        ..group_message(text)
    }
}

/// Backend whose every call fails as if the database went away.
pub struct UnavailableBackend;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::BackendUnavailable("connection refused".into()))
}

#[async_trait]
impl ResponseBackend for UnavailableBackend {
    async fn insert_unique(&self, _record: &ResponseRecord) -> StoreResult<()> {
        down()
    }

    async fn get_by_name(&self, _guild_id: &str, _name: &str) -> StoreResult<Option<ResponseRecord>> {
        down()
    }

    async fn delete_by_name(&self, _guild_id: &str, _name: &str) -> StoreResult<()> {
        down()
    }

    async fn update_by_name(
        &self,
        _guild_id: &str,
        _name: &str,
        _trigger: &str,
        _response: &str,
    ) -> StoreResult<()> {
        down()
    }

    async fn list_by_guild(&self, _guild_id: &str) -> StoreResult<Vec<ResponseRecord>> {
        down()
    }

    async fn health_check(&self) -> bool {
        false
    }
}
