use chrono::{DateTime, Utc};

/// A row of the `users` table.
///
/// `password` always holds a digest, never plaintext.
#[derive(Clone, Debug, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Auto-increment primary key; zero until stored.
    pub id: u64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique email address.
    pub email: String,
    /// Password digest.
    pub password: String,
    /// Insertion time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
}
