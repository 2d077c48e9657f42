use async_trait::async_trait;
use hsi_core::{Error, KeyValueStore, Result};
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use crate::backends::memory::{decode, encode};
use crate::StorageBackend;

const DEFAULT_URL: &str = "sqlite:hsi.db?mode=rwc";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

fn storage_error(context: &str, e: sqlx::Error) -> Error {
    Error::Storage(format!("{}: {}", context, e))
}

pub struct SQLiteStore {
    pool: SqlitePool,
}

impl SQLiteStore {
    pub async fn open(url: &str) -> Result<Self> {
        // In-memory databases are per connection, so keep a single one.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| storage_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| storage_error(&format!("Failed to run migration {}", i), e))?;
        }

        Ok(Self { pool })
    }
}

#[async_trait]
impl StorageBackend for SQLiteStore {
    fn get_error_message() -> &'static str {
        "SQLite database should be available at ./hsi.db"
    }

    async fn connect(url: Option<&str>) -> Result<Self> {
        Self::open(url.unwrap_or(DEFAULT_URL)).await
    }
}

#[async_trait]
impl KeyValueStore for SQLiteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to read key", e))?;

        Ok(row.map(|row| decode(row.get::<String, _>("value"))))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(encode(&value)?)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to write key", e))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete key", e))?;

        Ok(())
    }
}
