//! Tweet repository for record store operations

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use common::RecordStore;
use tracing::info;
use uuid::Uuid;

use super::UserRepository;
use crate::{
    error::{ApiError, ApiResult},
    models::{
        UserResponse,
        tweet::{NewTweetRequest, Tweet, TweetResponse, UpdateTweetRequest},
    },
    validation::ValidationErrors,
};

/// Tweet repository; joins every tweet with its author on the way out
#[derive(Clone)]
pub struct TweetRepository {
    store: Arc<dyn RecordStore<Tweet>>,
    users: UserRepository,
}

impl TweetRepository {
    /// Create a new tweet repository
    pub fn new(store: Arc<dyn RecordStore<Tweet>>, users: UserRepository) -> Self {
        Self { store, users }
    }

    /// Post a new tweet for an existing user
    pub async fn post(&self, payload: &NewTweetRequest) -> ApiResult<TweetResponse> {
        let author = match self.users.find_by_id(payload.author_id).await {
            Ok(user) => user,
            Err(ApiError::Store(e)) if e.is_not_found() => {
                let errors = ValidationErrors::single("author_id", "Author does not exist");
                return Err(errors.into());
            }
            Err(e) => return Err(e),
        };

        let tweet = Tweet {
            id: Uuid::new_v4(),
            content: payload.content.clone(),
            created_at: Utc::now(),
            updated_at: None,
            author_id: author.id,
        };
        let tweet = self.store.append(tweet).await?;

        info!("User {} posted tweet {}", author.id, tweet.id);
        Ok(TweetResponse::new(tweet, Some(author.into())))
    }

    /// Get all tweets in posting order
    pub async fn get_all(&self) -> ApiResult<Vec<TweetResponse>> {
        let tweets = self.store.list_all().await?;
        let authors: HashMap<Uuid, UserResponse> = self
            .users
            .get_all()
            .await?
            .into_iter()
            .map(|user| (user.id, user.into()))
            .collect();

        Ok(tweets
            .into_iter()
            .map(|tweet| {
                let author = authors.get(&tweet.author_id).cloned();
                TweetResponse::new(tweet, author)
            })
            .collect())
    }

    /// Find a tweet by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<TweetResponse> {
        let tweet = self.store.find_by_id(id).await?;
        self.join(tweet).await
    }

    /// Replace a tweet's content and return the updated tweet.
    ///
    /// The author and creation time never change.
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateTweetRequest,
    ) -> ApiResult<TweetResponse> {
        let current = self.store.find_by_id(id).await?;

        let updated = Tweet {
            content: payload.content.clone(),
            updated_at: Some(Utc::now()),
            ..current
        };
        self.store.replace(id, updated.clone()).await?;

        info!("Updated tweet {}", id);
        self.join(updated).await
    }

    /// Delete a tweet and return the removed tweet
    pub async fn delete(&self, id: Uuid) -> ApiResult<TweetResponse> {
        let removed = self.store.remove(id).await?;

        info!("Deleted tweet {}", id);
        self.join(removed).await
    }

    async fn join(&self, tweet: Tweet) -> ApiResult<TweetResponse> {
        let author = match self.users.find_by_id(tweet.author_id).await {
            Ok(user) => Some(user.into()),
            Err(ApiError::Store(e)) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        Ok(TweetResponse::new(tweet, author))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SignupRequest, User};
    use common::MemoryStore;

    async fn setup() -> (TweetRepository, UserRepository, Uuid) {
        let users = UserRepository::new(Arc::new(MemoryStore::<User>::new()));
        let author = users
            .signup(&SignupRequest {
                email: "a@b.com".to_string(),
                password: "password1".to_string(),
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                birth_date: None,
            })
            .await
            .unwrap();
        let tweets = TweetRepository::new(
            Arc::new(MemoryStore::<Tweet>::new()),
            users.clone(),
        );
        (tweets, users, author.id)
    }

    fn new_tweet(author_id: Uuid, content: &str) -> NewTweetRequest {
        NewTweetRequest {
            content: content.to_string(),
            author_id,
        }
    }

    #[tokio::test]
    async fn test_post_joins_author() {
        let (tweets, _, author_id) = setup().await;

        let posted = tweets.post(&new_tweet(author_id, "hello")).await.unwrap();

        assert_eq!(posted.author.as_ref().map(|a| a.id), Some(author_id));
        assert!(posted.updated_at.is_none());
        assert_eq!(tweets.find_by_id(posted.id).await.unwrap(), posted);
    }

    #[tokio::test]
    async fn test_post_for_unknown_author_is_rejected() {
        let (tweets, _, _) = setup().await;

        let err = tweets
            .post(&new_tweet(Uuid::new_v4(), "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(tweets.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_author_and_creation_time() {
        let (tweets, _, author_id) = setup().await;
        let posted = tweets.post(&new_tweet(author_id, "first")).await.unwrap();

        let updated = tweets
            .update(
                posted.id,
                &UpdateTweetRequest {
                    content: "second".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.content, "second");
        assert_eq!(updated.created_at, posted.created_at);
        assert_eq!(updated.author, posted.author);
        assert!(updated.updated_at.is_some());
        assert_eq!(tweets.find_by_id(posted.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_tweet_is_not_found() {
        let (tweets, _, _) = setup().await;

        let err = tweets
            .update(
                Uuid::new_v4(),
                &UpdateTweetRequest {
                    content: "nope".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Store(e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_deleted_author_reads_as_none() {
        let (tweets, users, author_id) = setup().await;
        let posted = tweets.post(&new_tweet(author_id, "orphan")).await.unwrap();

        users.delete(author_id).await.unwrap();

        assert!(tweets.find_by_id(posted.id).await.unwrap().author.is_none());
        assert!(tweets.get_all().await.unwrap()[0].author.is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_tweet() {
        let (tweets, _, author_id) = setup().await;
        let posted = tweets.post(&new_tweet(author_id, "bye")).await.unwrap();

        let removed = tweets.delete(posted.id).await.unwrap();

        assert_eq!(removed, posted);
        assert!(tweets.get_all().await.unwrap().is_empty());
    }
}
