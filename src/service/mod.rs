//! Service layer between the RPC handlers and the repository.
//!
//! A single [`UserService`] carries the record conversions, password digests
//! and error translation. The capability scope parameter decides which
//! operations a given instantiation exposes:
//!
//! - [`AuthService`] can look users up and register them.
//! - [`SourceService`] can additionally update and delete them.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::encryption::digest;
use crate::repository::{entity, RepositoryError, UserRepository};

/// Wire-shaped user record.
pub mod dto;

/// Failure kinds surfaced to service callers.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No user matched the request.
    #[error("record not found")]
    RecordNotFound,

    /// The email is already registered.
    #[error("duplicate entry")]
    DuplicateEntry,

    /// Any other repository failure, tagged with the failing operation.
    #[error("error on calling {operation} on user repository: {source}")]
    Repository {
        /// Repository operation that failed.
        operation: &'static str,
        /// Underlying repository error.
        #[source]
        source: RepositoryError,
    },
}

impl ServiceError {
    fn from_repository(operation: &'static str, error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => Self::RecordNotFound,
            RepositoryError::DuplicateEntry => Self::DuplicateEntry,
            source => Self::Repository { operation, source },
        }
    }
}

/// Result alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Capability scope exposing lookup and registration.
#[derive(Clone, Copy, Debug)]
pub struct Auth;

/// Capability scope exposing the full record lifecycle.
#[derive(Clone, Copy, Debug)]
pub struct Source;

/// User service over repository `R`, restricted to the operations of scope `S`.
pub struct UserService<R: ?Sized, S> {
    repo: Arc<R>,
    scope: PhantomData<S>,
}

/// Service used by the authentication RPC handler.
pub type AuthService<R> = UserService<R, Auth>;

/// Service used by callers that own user records.
pub type SourceService<R> = UserService<R, Source>;

impl<R: UserRepository, S> UserService<R, S> {
    /// Creates a service that owns `repo`.
    pub fn new(repo: R) -> Self {
        Self::from_arc(Arc::new(repo))
    }
}

impl<R: UserRepository + ?Sized, S> UserService<R, S> {
    /// Creates a service sharing an existing repository handle.
    pub fn from_arc(repo: Arc<R>) -> Self {
        Self {
            repo,
            scope: PhantomData,
        }
    }

    /// Fetches the first user matching the set fields of `criteria`.
    ///
    /// A non-empty password is compared by digest.
    pub async fn find_by(&self, mut criteria: dto::User) -> Result<dto::User> {
        if !criteria.password.is_empty() {
            criteria.password = digest(&criteria.password);
        }

        self.repo
            .find_by(&entity::User::from(criteria))
            .await
            .map(dto::User::from)
            .map_err(|e| ServiceError::from_repository("find_by", e))
    }

    /// Registers a user, storing the digest of its password.
    pub async fn store(&self, mut user: dto::User) -> Result<dto::User> {
        user.password = digest(&user.password);

        self.repo
            .store(entity::User::from(user))
            .await
            .map(dto::User::from)
            .map_err(|e| ServiceError::from_repository("store", e))
    }
}

impl<R: UserRepository + ?Sized> UserService<R, Source> {
    /// Updates the set fields of the user identified by `user.id`.
    ///
    /// An empty password leaves the stored digest unchanged.
    pub async fn update(&self, mut user: dto::User) -> Result<()> {
        if !user.password.is_empty() {
            user.password = digest(&user.password);
        }

        self.repo
            .update(&entity::User::from(user))
            .await
            .map_err(|e| ServiceError::from_repository("update", e))
    }

    /// Deletes the user identified by `user.id`.
    pub async fn destroy(&self, user: dto::User) -> Result<()> {
        self.repo
            .destroy(&entity::User::from(user))
            .await
            .map_err(|e| ServiceError::from_repository("destroy", e))
    }
}

impl<R: ?Sized, S> Clone for UserService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            scope: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::repository::InMemoryUserRepository;

    fn ana() -> dto::User {
        dto::User {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            email: "ana@example.com".to_string(),
            password: "hunter2".to_string(),
            ..dto::User::default()
        }
    }

    fn by_email(email: &str) -> dto::User {
        dto::User {
            email: email.to_string(),
            ..dto::User::default()
        }
    }

    type RepoResult<T> = std::result::Result<T, RepositoryError>;

    struct BrokenRepository;

    #[async_trait]
    impl UserRepository for BrokenRepository {
        async fn find_by(&self, _: &entity::User) -> RepoResult<entity::User> {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn store(&self, _: entity::User) -> RepoResult<entity::User> {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn update(&self, _: &entity::User) -> RepoResult<()> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }

        async fn destroy(&self, _: &entity::User) -> RepoResult<()> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn store_digests_password() {
        let service = AuthService::new(InMemoryUserRepository::new());

        let stored = service.store(ana()).await.unwrap();

        assert_ne!(stored.id, 0);
        assert_ne!(stored.password, "hunter2");
        assert_eq!(stored.password, digest("hunter2"));
    }

    #[tokio::test]
    async fn store_reports_duplicate_email() {
        let service = AuthService::new(InMemoryUserRepository::new());
        service.store(ana()).await.unwrap();

        let result = service.store(ana()).await;
        assert!(matches!(result, Err(ServiceError::DuplicateEntry)));
    }

    #[tokio::test]
    async fn find_by_reports_missing_record() {
        let service = AuthService::new(InMemoryUserRepository::new());

        let result = service.find_by(by_email("nobody@example.com")).await;
        assert!(matches!(result, Err(ServiceError::RecordNotFound)));
    }

    #[tokio::test]
    async fn find_by_matches_plaintext_password_against_digest() {
        let service = AuthService::new(InMemoryUserRepository::new());
        let stored = service.store(ana()).await.unwrap();

        let mut criteria = by_email("ana@example.com");
        criteria.password = "hunter2".to_string();
        assert_eq!(service.find_by(criteria).await.unwrap(), stored);

        let mut criteria = by_email("ana@example.com");
        criteria.password = "wrong".to_string();
        assert!(matches!(
            service.find_by(criteria).await,
            Err(ServiceError::RecordNotFound)
        ));
    }

    #[tokio::test]
    async fn update_with_empty_password_keeps_digest() {
        let service = SourceService::new(InMemoryUserRepository::new());
        let stored = service.store(ana()).await.unwrap();

        service
            .update(dto::User {
                id: stored.id,
                last_name: "Park".to_string(),
                ..dto::User::default()
            })
            .await
            .unwrap();

        let updated = service.find_by(by_email("ana@example.com")).await.unwrap();
        assert_eq!(updated.last_name, "Park");
        assert_eq!(updated.password, digest("hunter2"));
    }

    #[tokio::test]
    async fn update_with_new_password_stores_its_digest() {
        let service = SourceService::new(InMemoryUserRepository::new());
        let stored = service.store(ana()).await.unwrap();

        service
            .update(dto::User {
                id: stored.id,
                password: "correct-horse".to_string(),
                ..dto::User::default()
            })
            .await
            .unwrap();

        let updated = service.find_by(by_email("ana@example.com")).await.unwrap();
        assert_eq!(updated.password, digest("correct-horse"));
    }

    #[tokio::test]
    async fn update_and_destroy_report_missing_record() {
        let service = SourceService::new(InMemoryUserRepository::new());
        let missing = dto::User {
            id: 404,
            ..dto::User::default()
        };

        assert!(matches!(
            service.update(missing.clone()).await,
            Err(ServiceError::RecordNotFound)
        ));
        assert!(matches!(
            service.destroy(missing).await,
            Err(ServiceError::RecordNotFound)
        ));
    }

    #[tokio::test]
    async fn destroy_removes_user() {
        let service = SourceService::new(InMemoryUserRepository::new());
        let stored = service.store(ana()).await.unwrap();

        service.destroy(stored).await.unwrap();

        assert!(matches!(
            service.find_by(by_email("ana@example.com")).await,
            Err(ServiceError::RecordNotFound)
        ));
    }

    #[tokio::test]
    async fn scopes_share_one_repository() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let auth = AuthService::from_arc(Arc::clone(&repo));
        let source = SourceService::from_arc(repo);

        let stored = auth.store(ana()).await.unwrap();
        source.destroy(stored).await.unwrap();

        assert!(matches!(
            auth.find_by(by_email("ana@example.com")).await,
            Err(ServiceError::RecordNotFound)
        ));
    }

    #[tokio::test]
    async fn other_repository_errors_are_wrapped_with_operation() {
        let service = SourceService::new(BrokenRepository);

        match service.find_by(by_email("ana@example.com")).await {
            Err(ServiceError::Repository { operation, .. }) => assert_eq!(operation, "find_by"),
            other => panic!("unexpected result: {other:?}"),
        }

        match service.update(ana()).await {
            Err(ServiceError::Repository { operation, source }) => {
                assert_eq!(operation, "update");
                assert!(matches!(source, RepositoryError::Database(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let message = service.store(ana()).await.unwrap_err().to_string();
        assert!(message.starts_with("error on calling store on user repository"));
    }
}
