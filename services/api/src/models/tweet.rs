//! Tweet models for the API service

use chrono::{DateTime, Utc};
use common::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserResponse;
use crate::validation::{Validate, ValidationErrors, Violations, validate_content};

/// Tweet record as persisted in the tweet store.
///
/// The author is kept as a reference and joined at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub author_id: Uuid,
}

impl Record for Tweet {
    const KIND: &'static str = "tweet";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Request for posting a tweet
#[derive(Debug, Deserialize)]
pub struct NewTweetRequest {
    pub content: String,
    pub author_id: Uuid,
}

impl Validate for NewTweetRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Violations::default();
        violations.check("content", validate_content(&self.content));
        violations.finish()
    }
}

/// Request replacing a tweet's content
#[derive(Debug, Deserialize)]
pub struct UpdateTweetRequest {
    pub content: String,
}

impl Validate for UpdateTweetRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Violations::default();
        violations.check("content", validate_content(&self.content));
        violations.finish()
    }
}

/// Tweet joined with its author.
///
/// `author` is `None` once the author's account has been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetResponse {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Option<UserResponse>,
}

impl TweetResponse {
    pub fn new(tweet: Tweet, author: Option<UserResponse>) -> Self {
        Self {
            id: tweet.id,
            content: tweet.content,
            created_at: tweet.created_at,
            updated_at: tweet.updated_at,
            author,
        }
    }
}
