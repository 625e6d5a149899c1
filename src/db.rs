use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Schema plus the demo-account seed. Each migration runs once per database
/// file, so the seed row is only inserted when the file is first created.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open (or create) the credential database and bring its schema up to date.
///
/// The pool holds a single connection: every store call is awaited to
/// completion before the next one starts.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    if let Some(parent) = database_path(database_url).and_then(|p| p.parent().map(PathBuf::from))
    {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&parent)
                .await
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }
    }

    let opts = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {database_url}"))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .context("connect to database")?;

    MIGRATOR.run(&pool).await.context("run migrations")?;
    tracing::debug!(url = %database_url, "database ready");
    Ok(pool)
}

/// In-memory database for tests. The connection is never recycled, since
/// dropping it would drop the whole database.
#[cfg(test)]
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// File path behind a `sqlite:` url, or `None` for in-memory databases.
fn database_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_strips_scheme_and_query() {
        assert_eq!(
            database_path("sqlite:data/login.db"),
            Some(PathBuf::from("data/login.db"))
        );
        assert_eq!(
            database_path("sqlite://data/login.db?mode=rwc"),
            Some(PathBuf::from("data/login.db"))
        );
        assert_eq!(database_path("sqlite::memory:"), None);
        assert_eq!(database_path("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn migrations_create_users_table_with_seed_row() {
        let pool = connect_in_memory().await.expect("open db");
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM users")
            .fetch_one(&pool)
            .await
            .expect("count users");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn reopening_file_does_not_reseed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite:{}", dir.path().join("nested/login.db").display());

        let pool = connect(&url).await.expect("first open");
        sqlx::query("INSERT INTO users (email, password_hash) VALUES ('a@b.cd', 'x')")
            .execute(&pool)
            .await
            .expect("insert");
        pool.close().await;

        let pool = connect(&url).await.expect("second open");
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM users")
            .fetch_one(&pool)
            .await
            .expect("count users");
        assert_eq!(count, 2);
        pool.close().await;
    }
}
