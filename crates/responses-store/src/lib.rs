//! Per-guild trigger → response storage.
//!
//! Two interchangeable backends sit behind [`ResponseBackend`]: an embedded
//! SQLite file and a hosted MongoDB collection. [`Store::connect`] picks one
//! from the configured target once at startup, and [`ResponsesManager`]
//! exposes guild-scoped CRUD plus trigger matching on top of it.

mod backend;
mod error;
mod manager;
mod matching;
mod mongo;
mod sqlite;
mod store;
mod types;

pub use backend::ResponseBackend;
pub use error::{ResponseError, StoreError, StoreResult};
pub use manager::ResponsesManager;
pub use matching::{first_match, trigger_matches};
pub use mongo::MongoBackend;
pub use sqlite::SqliteBackend;
pub use store::{Store, StoreKind, StoreTarget};
pub use types::*;
