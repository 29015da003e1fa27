//! Application state shared across handlers

use std::sync::Arc;

use common::{JsonFileStore, MemoryStore, RecordStore, StoreResult};
use tracing::info;

use crate::{
    models::{User, tweet::Tweet},
    repositories::{UserRepository, tweet::TweetRepository},
    settings::{StorageBackend, StorageSettings},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub tweet_repository: TweetRepository,
}

impl AppState {
    /// Wire repositories around the given stores
    pub fn new(users: Arc<dyn RecordStore<User>>, tweets: Arc<dyn RecordStore<Tweet>>) -> Self {
        let user_repository = UserRepository::new(users);
        let tweet_repository = TweetRepository::new(tweets, user_repository.clone());
        Self {
            user_repository,
            tweet_repository,
        }
    }

    /// Build the state with the storage backend chosen in settings
    pub async fn from_settings(storage: &StorageSettings) -> StoreResult<Self> {
        match storage.backend {
            StorageBackend::File => {
                info!("Using JSON file storage in {}", storage.data_dir.display());
                let users: JsonFileStore<User> = JsonFileStore::open(storage.users_path()).await?;
                let tweets: JsonFileStore<Tweet> = JsonFileStore::open(storage.tweets_path()).await?;
                Ok(Self::new(Arc::new(users), Arc::new(tweets)))
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
        }
    }

    /// State backed by empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::<User>::new()),
            Arc::new(MemoryStore::<Tweet>::new()),
        )
    }
}
