use crate::auth::repo_types::User;
use sqlx::SqlitePool;

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Whether a row with this exact email exists.
    pub async fn email_exists(db: &SqlitePool, email: &str) -> anyhow::Result<bool> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(db)
            .await?;
        Ok(id.is_some())
    }

    /// Whether a row matches both the email and the stored password hash.
    pub async fn matches_credentials(
        db: &SqlitePool,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<bool> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM users WHERE email = ?1 AND password_hash = ?2",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(db)
        .await?;
        Ok(id.is_some())
    }

    /// Insert a new user. Fails with a unique violation if the email is taken.
    pub async fn create(db: &SqlitePool, email: &str, password_hash: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES (?1, ?2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }
}
