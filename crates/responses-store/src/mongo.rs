//! Hosted MongoDB backend.

use crate::backend::ResponseBackend;
use crate::error::{StoreError, StoreResult};
use crate::types::ResponseRecord;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, FindOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info, instrument};

/// Collection holding every guild's responses.
pub const COLLECTION_NAME: &str = "responses";

/// Database used when neither the config nor the URI names one.
pub const DEFAULT_DATABASE: &str = "trigger_bot";

const UNIQUE_INDEX_NAME: &str = "guild_name";

/// MongoDB duplicate key error code.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed response store.
#[derive(Clone)]
pub struct MongoBackend {
    client: Client,
    collection: Collection<ResponseRecord>,
}

impl MongoBackend {
    /// Connect, verify the server answers, and ensure the unique index exists.
    ///
    /// Database name precedence: `database` argument, then the path of the
    /// connection string, then [`DEFAULT_DATABASE`].
    pub async fn connect(uri: &str, database: Option<&str>) -> StoreResult<Self> {
        let options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::BackendUnavailable(format!("invalid MongoDB URI: {}", e)))?;

        let db_name = database
            .map(String::from)
            .or_else(|| options.default_database.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(options)
            .map_err(|e| StoreError::BackendUnavailable(e.to_string()))?;
        let db = client.database(&db_name);

        db.run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| StoreError::BackendUnavailable(format!("MongoDB ping failed: {}", e)))?;

        let collection = db.collection::<ResponseRecord>(COLLECTION_NAME);

        // Re-creating an identical index is a no-op on the server.
        let index = IndexModel::builder()
            .keys(doc! { "guildId": 1, "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(UNIQUE_INDEX_NAME.to_string())
                    .build(),
            )
            .build();
        collection.create_index(index, None).await?;

        info!("MongoDB response store ready (database={})", db_name);

        Ok(Self { client, collection })
    }

    /// Close the driver's connection pool.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB connection closed");
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl ResponseBackend for MongoBackend {
    #[instrument(skip(self, record), fields(guild_id = %record.guild_id, name = %record.name))]
    async fn insert_unique(&self, record: &ResponseRecord) -> StoreResult<()> {
        match self.collection.insert_one(record, None).await {
            Ok(_) => {
                debug!("Inserted response");
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateName {
                guild_id: record.guild_id.clone(),
                name: record.name.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, guild_id: &str, name: &str) -> StoreResult<Option<ResponseRecord>> {
        let found = self
            .collection
            .find_one(doc! { "guildId": guild_id, "name": name }, None)
            .await?;
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn delete_by_name(&self, guild_id: &str, name: &str) -> StoreResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "guildId": guild_id, "name": name }, None)
            .await?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound {
                guild_id: guild_id.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self, trigger, response))]
    async fn update_by_name(
        &self,
        guild_id: &str,
        name: &str,
        trigger: &str,
        response: &str,
    ) -> StoreResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "guildId": guild_id, "name": name },
                doc! { "$set": { "trigger": trigger, "response": response } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                guild_id: guild_id.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_guild(&self, guild_id: &str) -> StoreResult<Vec<ResponseRecord>> {
        // ObjectIds grow with insertion time, so _id breaks createdAt ties.
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .build();
        let cursor = self
            .collection
            .find(doc! { "guildId": guild_id }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn health_check(&self) -> bool {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .is_ok()
    }
}
