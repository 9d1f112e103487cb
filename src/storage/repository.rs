//! Repository layer for the check history.
//!
//! Both tables are append-only. Ids come from SQLite's AUTOINCREMENT and
//! `checked_at` is stamped by the same INSERT statement, so the two orders
//! agree under SQLite's single-writer lock.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::domain::{NewPhoneCheck, NewUrlCheck, PhoneCheck, UrlCheck};
use crate::error::CheckResult;
use crate::storage::models::{PhoneCheckRow, UrlCheckRow};

/// Repository for all check history operations.
#[derive(Clone)]
pub struct CheckRepository {
    pool: SqlitePool,
}

impl CheckRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `url`.
    ///
    /// In-memory databases live inside a single connection, so they get a
    /// one-connection pool whose connection never expires.
    pub async fn connect(url: &str, max_connections: u32) -> CheckResult<SqlitePool> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        Ok(options.connect(url).await?)
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> CheckResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS url_checks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                is_safe INTEGER NOT NULL,
                result TEXT NOT NULL,
                checked_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_url_checks_checked_at ON url_checks(checked_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS phone_checks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                phone_number TEXT NOT NULL,
                is_safe INTEGER NOT NULL,
                country TEXT,
                carrier TEXT,
                line_type TEXT,
                risk_score INTEGER,
                details TEXT,
                checked_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_phone_checks_checked_at ON phone_checks(checked_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> CheckResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    // ==================== URL Checks ====================

    /// Append a URL check and return it with its id and timestamp.
    pub async fn append_url_check(&self, check: &NewUrlCheck) -> CheckResult<UrlCheck> {
        let row: UrlCheckRow = sqlx::query_as(
            r#"
            INSERT INTO url_checks (url, is_safe, result, checked_at)
            VALUES (?, ?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            RETURNING id, url, is_safe, result, checked_at
            "#,
        )
        .bind(&check.url)
        .bind(check.is_safe)
        .bind(&check.result)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Most recent URL checks first, at most `limit` of them.
    pub async fn recent_url_checks(&self, limit: u32) -> CheckResult<Vec<UrlCheck>> {
        let rows: Vec<UrlCheckRow> = sqlx::query_as(
            r#"
            SELECT id, url, is_safe, result, checked_at
            FROM url_checks
            ORDER BY checked_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    // ==================== Phone Checks ====================

    /// Append a phone check and return it with its id and timestamp.
    pub async fn append_phone_check(&self, check: &NewPhoneCheck) -> CheckResult<PhoneCheck> {
        let row: PhoneCheckRow = sqlx::query_as(
            r#"
            INSERT INTO phone_checks (
                phone_number, is_safe, country, carrier, line_type,
                risk_score, details, checked_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            RETURNING id, phone_number, is_safe, country, carrier, line_type,
                      risk_score, details, checked_at
            "#,
        )
        .bind(&check.phone_number)
        .bind(check.is_safe)
        .bind(&check.country)
        .bind(&check.carrier)
        .bind(&check.line_type)
        .bind(check.risk_score.map(i64::from))
        .bind(
            check
                .details
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
        )
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Most recent phone checks first, at most `limit` of them.
    pub async fn recent_phone_checks(&self, limit: u32) -> CheckResult<Vec<PhoneCheck>> {
        let rows: Vec<PhoneCheckRow> = sqlx::query_as(
            r#"
            SELECT id, phone_number, is_safe, country, carrier, line_type,
                   risk_score, details, checked_at
            FROM phone_checks
            ORDER BY checked_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
