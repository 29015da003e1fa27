//! Common library for the Twitter API service
//!
//! This crate provides the record store engine: an ordered collection of
//! records of one kind, looked up linearly by identifier, with an in-memory
//! backend and a JSON file backend.

pub mod error;
pub mod json_file;
pub mod memory;
pub mod record;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::Record;
pub use store::RecordStore;

/// Example usage of the JSON file store
///
/// ```rust,no_run
/// use common::{JsonFileStore, Record, RecordStore};
/// use serde::{Deserialize, Serialize};
/// use uuid::Uuid;
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Bookmark {
///     id: Uuid,
///     url: String,
/// }
///
/// impl Record for Bookmark {
///     const KIND: &'static str = "bookmark";
///
///     fn id(&self) -> Uuid {
///         self.id
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = JsonFileStore::<Bookmark>::open("data/bookmarks.json").await?;
///     let saved = store
///         .append(Bookmark { id: Uuid::new_v4(), url: "https://example.com".into() })
///         .await?;
///     println!("Stored {} bookmarks", store.list_all().await?.len());
///     store.remove(saved.id).await?;
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
