//! One-way digest applied to passwords before they are persisted.

use sha2::{Digest, Sha256};

/// Length in characters of every value returned by [`digest`].
pub const DIGEST_LEN: usize = 64;

/// Returns the lowercase hex SHA-256 digest of `plaintext`.
///
/// The output is deterministic and always [`DIGEST_LEN`] characters long.
///
/// This is a fast, unsalted hash so that stored passwords can be matched by
/// equality. It does not protect credentials against offline brute force if
/// the `users` table leaks.
///
/// # Examples
///
/// ```rust
/// use restaurant_user::encryption::{digest, DIGEST_LEN};
///
/// let stored = digest("hunter2");
/// assert_eq!(stored, digest("hunter2"));
/// assert_eq!(stored.len(), DIGEST_LEN);
/// ```
pub fn digest(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}
