use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use tokio::sync::RwLock;

use super::{RepositoryError, User, UserRepository};

/// In-memory user repository.
///
/// Records are kept in id order so lookups return the lowest matching id, the
/// same row a `ORDER BY id LIMIT 1` query would. Clones share the same storage.
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<u64, User>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns true when nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryUserRepository {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

/// Exact, case-sensitive comparison; the MySQL `email` column collates as `utf8mb4_bin`.
fn field_matches(criterion: &str, value: &str) -> bool {
    criterion.is_empty() || criterion == value
}

fn satisfies(record: &User, criteria: &User) -> bool {
    (criteria.id == 0 || criteria.id == record.id)
        && field_matches(&criteria.first_name, &record.first_name)
        && field_matches(&criteria.last_name, &record.last_name)
        && field_matches(&criteria.email, &record.email)
        && field_matches(&criteria.password, &record.password)
}

fn patch(target: &mut String, value: &str) {
    if !value.is_empty() {
        *target = value.to_string();
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by(&self, criteria: &User) -> Result<User, RepositoryError> {
        let users = self.users.read().await;
        users
            .values()
            .find(|record| satisfies(record, criteria))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn store(&self, mut record: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == record.email) {
            return Err(RepositoryError::DuplicateEntry);
        }

        let now = Utc::now().trunc_subsecs(0);
        record.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        record.created_at = Some(now);
        record.updated_at = Some(now);

        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }

        if !record.email.is_empty()
            && users
                .values()
                .any(|existing| existing.id != record.id && existing.email == record.email)
        {
            return Err(RepositoryError::DuplicateEntry);
        }

        let Some(existing) = users.get_mut(&record.id) else {
            return Err(RepositoryError::NotFound);
        };

        patch(&mut existing.first_name, &record.first_name);
        patch(&mut existing.last_name, &record.last_name);
        patch(&mut existing.email, &record.email);
        patch(&mut existing.password, &record.password);
        existing.updated_at = Some(Utc::now().trunc_subsecs(0));

        Ok(())
    }

    async fn destroy(&self, record: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        users
            .remove(&record.id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
