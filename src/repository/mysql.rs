use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::{MySql, QueryBuilder};
use tracing::debug;

use super::{RepositoryError, User, UserRepository};

/// Column list shared across queries.
const COLUMNS: &str = "id, first_name, last_name, email, password, created_at, updated_at";

/// User repository backed by the MySQL `users` table.
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Opens a connection pool against `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self::from_pool(pool))
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn exists(&self, id: u64) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

/// Maps unique-key violations to [`RepositoryError::DuplicateEntry`].
fn map_write_error(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return RepositoryError::DuplicateEntry;
        }
    }
    RepositoryError::Database(error)
}

fn push_criteria(query: &mut QueryBuilder<'_, MySql>, criteria: &User) {
    query.push(" WHERE 1 = 1");

    if criteria.id != 0 {
        query.push(" AND id = ").push_bind(criteria.id);
    }

    let columns = [
        ("first_name", &criteria.first_name),
        ("last_name", &criteria.last_name),
        ("email", &criteria.email),
        ("password", &criteria.password),
    ];
    for (column, value) in columns {
        if !value.is_empty() {
            query
                .push(format!(" AND {column} = "))
                .push_bind(value.clone());
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by(&self, criteria: &User) -> Result<User, RepositoryError> {
        let mut query = QueryBuilder::<MySql>::new(format!("SELECT {COLUMNS} FROM users"));
        push_criteria(&mut query, criteria);
        query.push(" ORDER BY id LIMIT 1");

        query
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn store(&self, record: User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (first_name, last_name, email, password) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(&record.password)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        let id = result.last_insert_id();
        debug!(id, "stored user");

        self.find_by(&User {
            id,
            ..User::default()
        })
        .await
    }

    async fn update(&self, record: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET
                first_name = COALESCE(NULLIF(?, ''), first_name),
                last_name = COALESCE(NULLIF(?, ''), last_name),
                email = COALESCE(NULLIF(?, ''), email),
                password = COALESCE(NULLIF(?, ''), password),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(&record.password)
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        // MySQL counts changed rows, so an unchanged row also reports zero.
        if result.rows_affected() == 0 && !self.exists(record.id).await? {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn destroy(&self, record: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(record.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
