//! Repositories composing the record stores

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::Utc;
use common::{RecordStore, StoreError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{SignupRequest, UpdateUserRequest, User},
};

pub mod tweet;

/// User repository over the user store
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn RecordStore<User>>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(store: Arc<dyn RecordStore<User>>) -> Self {
        Self { store }
    }

    /// Register a new user with a freshly generated id
    pub async fn signup(&self, payload: &SignupRequest) -> ApiResult<User> {
        info!("Creating new user: {}", payload.email);

        let user = User {
            id: Uuid::new_v4(),
            email: payload.email.clone(),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            birth_date: payload.birth_date,
            password_hash: hash_password(&payload.password)?,
            created_at: Utc::now(),
        };

        self.store.append(user).await.map_err(email_conflict)
    }

    /// Check a login attempt.
    ///
    /// Returns `None` both for an unknown email and for a wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> ApiResult<Option<User>> {
        let user = self
            .store
            .find_first(&|u: &User| u.email.eq_ignore_ascii_case(email))
            .await?;

        match user {
            Some(user) if verify_password(&user.password_hash, password) => Ok(Some(user)),
            _ => {
                warn!("Failed login attempt for {}", email);
                Ok(None)
            }
        }
    }

    /// Get all users
    pub async fn get_all(&self) -> ApiResult<Vec<User>> {
        Ok(self.store.list_all().await?)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<User> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Replace a user's profile and return the updated record
    pub async fn update(&self, id: Uuid, payload: &UpdateUserRequest) -> ApiResult<User> {
        let current = self.store.find_by_id(id).await?;

        let updated = User {
            email: payload.email.clone(),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            birth_date: payload.birth_date,
            ..current
        };

        self.store
            .replace(id, updated.clone())
            .await
            .map_err(email_conflict)?;

        info!("Updated user {}", id);
        Ok(updated)
    }

    /// Delete a user and return the removed record
    pub async fn delete(&self, id: Uuid) -> ApiResult<User> {
        let removed = self.store.remove(id).await?;
        info!("Deleted user {}", id);
        Ok(removed)
    }
}

fn email_conflict(e: StoreError) -> ApiError {
    if e.is_conflict() {
        ApiError::Conflict("Email is already registered".to_string())
    } else {
        ApiError::Store(e)
    }
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::InternalServerError(format!("Failed to hash password: {}", e)))
}

fn verify_password(password_hash: &str, password: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::MemoryStore;

    fn repository() -> UserRepository {
        UserRepository::new(Arc::new(MemoryStore::<User>::new()))
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: "password1".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            birth_date: None,
        }
    }

    #[tokio::test]
    async fn test_signup_stores_hash_not_password() {
        let repo = repository();
        let user = repo.signup(&signup_request("a@b.com")).await.unwrap();

        assert_ne!(user.password_hash, "password1");
        assert_eq!(repo.find_by_id(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = repository();
        repo.signup(&signup_request("a@b.com")).await.unwrap();

        let err = repo.signup(&signup_request("A@b.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let repo = repository();
        let user = repo.signup(&signup_request("a@b.com")).await.unwrap();

        let found = repo.authenticate("a@b.com", "password1").await.unwrap();
        assert_eq!(found, Some(user));

        assert!(repo.authenticate("a@b.com", "password2").await.unwrap().is_none());
        assert!(repo.authenticate("x@y.com", "password1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_identity_and_password() {
        let repo = repository();
        let user = repo.signup(&signup_request("a@b.com")).await.unwrap();

        let updated = repo
            .update(
                user.id,
                &UpdateUserRequest {
                    email: "new@b.com".to_string(),
                    first_name: "C".to_string(),
                    last_name: "D".to_string(),
                    birth_date: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.password_hash, user.password_hash);
        assert_eq!(updated.created_at, user.created_at);
        assert_eq!(repo.find_by_id(user.id).await.unwrap(), updated);
        assert!(repo.authenticate("new@b.com", "password1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_conflict() {
        let repo = repository();
        repo.signup(&signup_request("a@b.com")).await.unwrap();
        let other = repo.signup(&signup_request("c@d.com")).await.unwrap();

        let err = repo
            .update(
                other.id,
                &UpdateUserRequest {
                    email: "a@b.com".to_string(),
                    first_name: "C".to_string(),
                    last_name: "D".to_string(),
                    birth_date: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let repo = repository();
        let user = repo.signup(&signup_request("a@b.com")).await.unwrap();

        assert_eq!(repo.delete(user.id).await.unwrap(), user);
        let err = repo.find_by_id(user.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Store(e) if e.is_not_found()));
    }
}
