//! Database operations for Plume
//!
//! One SQLite file holds the monthly post counters and the fingerprints of
//! everything already published. Counters are only ever created or
//! incremented, never deleted.

use sha2::{Digest, Sha256};
use sqlx::sqlite::SqlitePool;
use std::path::Path;

use crate::error::{DbError, Result};
use crate::types::Period;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if necessary) the database at `db_path` and apply
    /// pending migrations.
    pub async fn new(db_path: &str) -> Result<Self> {
        let expanded_path = shellexpand::tilde(db_path).to_string();
        let path = Path::new(&expanded_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DbError::Io)?;
        }

        // Forward slashes work in SQLite URLs on both Windows and Unix;
        // mode=rwc creates the file on first use.
        let db_url = format!("sqlite://{}?mode=rwc", expanded_path.replace('\\', "/"));

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(DbError::Sqlx)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DbError::Migration)?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Post count for a period, 0 when no row exists yet
    pub async fn post_count(&self, period: &Period) -> Result<u32> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT count FROM post_counts WHERE period = ?
            "#,
        )
        .bind(period.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Sqlx)?;

        Ok(row.map(|r| r.0 as u32).unwrap_or(0))
    }

    /// Increment a period's post count, creating the row on first use.
    ///
    /// A single upsert statement, so overlapping invocations cannot lose
    /// updates.
    pub async fn increment_post_count(&self, period: &Period) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO post_counts (period, count) VALUES (?, 1)
            ON CONFLICT(period) DO UPDATE SET count = count + 1
            "#,
        )
        .bind(period.to_string())
        .execute(&self.pool)
        .await
        .map_err(DbError::Sqlx)?;

        Ok(())
    }

    /// Whether content with this fingerprint has been published before
    pub async fn already_published(&self, fingerprint: &str) -> Result<bool> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT 1 FROM published_posts WHERE fingerprint = ?
            "#,
        )
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Sqlx)?;

        Ok(row.is_some())
    }

    /// Record a successful publish for duplicate detection
    pub async fn record_published(
        &self,
        fingerprint: &str,
        post_id: &str,
        published_at: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO published_posts (fingerprint, post_id, published_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(fingerprint)
        .bind(post_id)
        .bind(published_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::Sqlx)?;

        Ok(())
    }

    /// Lifetime count of published posts
    pub async fn total_published(&self) -> Result<i64> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT COUNT(*) FROM published_posts
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Sqlx)?;

        Ok(row.0)
    }
}

/// Fingerprint of post content, used as the duplicate-detection key.
///
/// Whitespace at the edges is ignored so an edit that only pads the text
/// still counts as the same post.
pub fn content_fingerprint(content: &str) -> String {
    hex::encode(Sha256::digest(content.trim().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_test_db() -> (TempDir, Database) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Database::new(&db_path.to_string_lossy()).await.unwrap();
        (temp_dir, db)
    }

    #[tokio::test]
    async fn test_count_defaults_to_zero() {
        let (_temp, db) = setup_test_db().await;
        let period = Period::new(2026, 8);

        assert_eq!(db.post_count(&period).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_twice_adds_two() {
        let (_temp, db) = setup_test_db().await;
        let period = Period::new(2026, 8);

        db.increment_post_count(&period).await.unwrap();
        db.increment_post_count(&period).await.unwrap();

        assert_eq!(db.post_count(&period).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_periods_are_independent() {
        let (_temp, db) = setup_test_db().await;
        let august = Period::new(2026, 8);
        let september = Period::new(2026, 9);

        db.increment_post_count(&august).await.unwrap();
        db.increment_post_count(&august).await.unwrap();
        db.increment_post_count(&september).await.unwrap();

        assert_eq!(db.post_count(&august).await.unwrap(), 2);
        assert_eq!(db.post_count(&september).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counts_survive_reconnect() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let period = Period::new(2026, 8);

        {
            let db = Database::new(&db_path.to_string_lossy()).await.unwrap();
            db.increment_post_count(&period).await.unwrap();
        }

        let db = Database::new(&db_path.to_string_lossy()).await.unwrap();
        assert_eq!(db.post_count(&period).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_published_fingerprint_round_trip() {
        let (_temp, db) = setup_test_db().await;
        let fingerprint = content_fingerprint("Hello, world!");

        assert!(!db.already_published(&fingerprint).await.unwrap());

        db.record_published(&fingerprint, "1234567890", 1_754_000_000)
            .await
            .unwrap();

        assert!(db.already_published(&fingerprint).await.unwrap());
        assert_eq!(db.total_published().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_published_is_idempotent() {
        let (_temp, db) = setup_test_db().await;
        let fingerprint = content_fingerprint("Same post twice");

        db.record_published(&fingerprint, "111", 1_754_000_000)
            .await
            .unwrap();
        db.record_published(&fingerprint, "222", 1_754_000_001)
            .await
            .unwrap();

        assert_eq!(db.total_published().await.unwrap(), 1);
    }

    #[test]
    fn test_fingerprint_ignores_edge_whitespace() {
        assert_eq!(
            content_fingerprint("Ship it"),
            content_fingerprint("  Ship it \n")
        );
        assert_ne!(content_fingerprint("Ship it"), content_fingerprint("Ship It"));
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fingerprint = content_fingerprint("anything");
        assert_eq!(fingerprint.len(), 64);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
