use chrono::{DateTime, Utc};

use crate::repository::entity;

/// Wire-shaped user record handled by the services.
///
/// `password` is plaintext on the way in and a digest on the way out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct User {
    /// Record identifier; zero when unknown.
    pub id: u64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Password (plaintext or digest, see above).
    pub password: String,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for entity::User {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<entity::User> for User {
    fn from(user: entity::User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
