//! Backend selection made once at startup.

use crate::backend::ResponseBackend;
use crate::error::StoreResult;
use crate::mongo::MongoBackend;
use crate::sqlite::SqliteBackend;
use crate::types::ResponseRecord;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

const MONGO_SCHEMES: [&str; 2] = ["mongodb://", "mongodb+srv://"];

/// Where responses are stored, parsed from the configured target string.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// Directory holding the SQLite database file.
    Local(PathBuf),
    /// MongoDB connection string.
    Mongo(String),
}

impl StoreTarget {
    /// A MongoDB connection string selects MongoDB; anything else is a directory.
    pub fn parse(target: &str) -> Self {
        let target = target.trim();
        if MONGO_SCHEMES.iter().any(|scheme| target.starts_with(scheme)) {
            StoreTarget::Mongo(target.to_string())
        } else {
            StoreTarget::Local(PathBuf::from(target))
        }
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            StoreTarget::Local(_) => StoreKind::Local,
            StoreTarget::Mongo(_) => StoreKind::Mongo,
        }
    }
}

// Connection strings carry credentials.
impl fmt::Debug for StoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreTarget::Local(path) => f.debug_tuple("Local").field(path).finish(),
            StoreTarget::Mongo(_) => f.write_str("Mongo(<redacted>)"),
        }
    }
}

/// Backend type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Local,
    Mongo,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Local => f.write_str("local"),
            StoreKind::Mongo => f.write_str("mongo"),
        }
    }
}

/// The configured storage backend.
#[derive(Clone)]
pub enum Store {
    /// Embedded SQLite file
    Sqlite(SqliteBackend),
    /// Hosted MongoDB
    Mongo(MongoBackend),
}

impl Store {
    /// Open the backend named by `target`.
    ///
    /// `database` only applies to MongoDB. Any failure here means the bot
    /// has no working store and must not start.
    pub async fn connect(target: &StoreTarget, database: Option<&str>) -> StoreResult<Self> {
        match target {
            StoreTarget::Local(dir) => {
                info!("Initializing local storage at {}", dir.display());
                Ok(Store::Sqlite(SqliteBackend::open(dir).await?))
            }
            StoreTarget::Mongo(uri) => {
                info!("Initializing MongoDB storage");
                Ok(Store::Mongo(MongoBackend::connect(uri, database).await?))
            }
        }
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            Store::Sqlite(_) => StoreKind::Local,
            Store::Mongo(_) => StoreKind::Mongo,
        }
    }

    /// Release backend resources.
    pub async fn close(self) {
        match self {
            // The connection closes when the last handle drops.
            Store::Sqlite(_) => {}
            Store::Mongo(backend) => backend.shutdown().await,
        }
    }
}

#[async_trait]
impl ResponseBackend for Store {
    async fn insert_unique(&self, record: &ResponseRecord) -> StoreResult<()> {
        match self {
            Store::Sqlite(b) => b.insert_unique(record).await,
            Store::Mongo(b) => b.insert_unique(record).await,
        }
    }

    async fn get_by_name(&self, guild_id: &str, name: &str) -> StoreResult<Option<ResponseRecord>> {
        match self {
            Store::Sqlite(b) => b.get_by_name(guild_id, name).await,
            Store::Mongo(b) => b.get_by_name(guild_id, name).await,
        }
    }

    async fn delete_by_name(&self, guild_id: &str, name: &str) -> StoreResult<()> {
        match self {
            Store::Sqlite(b) => b.delete_by_name(guild_id, name).await,
            Store::Mongo(b) => b.delete_by_name(guild_id, name).await,
        }
    }

    async fn update_by_name(
        &self,
        guild_id: &str,
        name: &str,
        trigger: &str,
        response: &str,
    ) -> StoreResult<()> {
        match self {
            Store::Sqlite(b) => b.update_by_name(guild_id, name, trigger, response).await,
            Store::Mongo(b) => b.update_by_name(guild_id, name, trigger, response).await,
        }
    }

    async fn list_by_guild(&self, guild_id: &str) -> StoreResult<Vec<ResponseRecord>> {
        match self {
            Store::Sqlite(b) => b.list_by_guild(guild_id).await,
            Store::Mongo(b) => b.list_by_guild(guild_id).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            Store::Sqlite(b) => b.health_check().await,
            Store::Mongo(b) => b.health_check().await,
        }
    }
}
