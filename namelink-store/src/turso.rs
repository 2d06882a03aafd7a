//! Turso (libSQL) record store.
//!
//! Production backend speaking the hrana protocol to a Turso/sqld database.
//! The schema is created on connect, so a fresh database is usable
//! immediately and an unreachable one fails the boot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection};
use tracing::{debug, info, instrument};

use namelink_core::error::{CoreError, Result};
use namelink_core::traits::RecordStore;
use namelink_core::types::{MobileNumber, NameRecord, ResponseAudit};

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS name_records (
        mobile     TEXT PRIMARY KEY,
        name       TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS response_audits (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        ref_id        TEXT NOT NULL,
        mobile        TEXT NOT NULL,
        response_body TEXT NOT NULL,
        status_code   INTEGER NOT NULL,
        created_at    TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_records_created_at ON name_records(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_audits_mobile ON response_audits(mobile)",
];

/// Record store backed by Turso/libSQL.
///
/// The connection handle is internally synchronized and cheap to share;
/// the upsert is a single `INSERT .. ON CONFLICT` statement, so concurrent
/// writers for one number serialize inside the database and leave one row.
pub struct TursoStore {
    conn: Connection,
}

impl TursoStore {
    /// Connects to a remote database, creating the schema if needed.
    ///
    /// `auth_token` may be empty for servers that accept anonymous
    /// connections (local sqld).
    pub async fn connect(url: &str, auth_token: &str) -> Result<Self> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await
            .map_err(store_err)?;
        let conn = db.connect().map_err(store_err)?;

        let store = Self { conn };
        store.init_schema().await?;
        info!(url, "Connected to record store");
        Ok(store)
    }

    /// Opens a local database file (`:memory:` included). Test-only; the
    /// service always talks to a remote database.
    #[cfg(test)]
    async fn connect_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path).build().await.map_err(store_err)?;
        let conn = db.connect().map_err(store_err)?;

        let store = Self { conn };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            self.conn.execute(statement, ()).await.map_err(store_err)?;
        }
        debug!("Record store schema ready");
        Ok(())
    }

    /// Fetches the audit trail for one number, newest first.
    pub async fn audits_for(&self, mobile: &MobileNumber) -> Result<Vec<ResponseAudit>> {
        let mut rows = self
            .conn
            .query(
                "SELECT ref_id, mobile, response_body, status_code, created_at
                 FROM response_audits WHERE mobile = ?1 ORDER BY id DESC",
                libsql::params![mobile.as_str()],
            )
            .await
            .map_err(store_err)?;

        let mut audits = Vec::new();
        while let Some(row) = rows.next().await.map_err(store_err)? {
            let ref_id: String = row.get(0).map_err(store_err)?;
            let mobile_column: String = row.get(1).map_err(store_err)?;
            let response_body: String = row.get(2).map_err(store_err)?;
            let status_code: i64 = row.get(3).map_err(store_err)?;
            let created_at: String = row.get(4).map_err(store_err)?;

            audits.push(ResponseAudit {
                ref_id,
                mobile: parse_mobile_column(&mobile_column)?,
                response_body,
                status_code: u16::try_from(status_code).unwrap_or(0),
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(audits)
    }
}

#[async_trait]
impl RecordStore for TursoStore {
    #[instrument(skip(self), fields(mobile = %mobile))]
    async fn get(&self, mobile: &MobileNumber) -> Result<Option<NameRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT mobile, name, created_at, updated_at
                 FROM name_records WHERE mobile = ?1",
                libsql::params![mobile.as_str()],
            )
            .await
            .map_err(store_err)?;

        match rows.next().await.map_err(store_err)? {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    /// One-statement upsert: inserts keep both timestamps, updates keep
    /// `created_at` and refresh `updated_at`, the database resolves races.
    #[instrument(skip(self, name), fields(mobile = %mobile))]
    async fn upsert(&self, mobile: &MobileNumber, name: &str) -> Result<NameRecord> {
        let now = Utc::now().to_rfc3339();
        let mut rows = self
            .conn
            .query(
                "INSERT INTO name_records (mobile, name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(mobile) DO UPDATE SET
                     name = excluded.name,
                     updated_at = excluded.updated_at
                 RETURNING mobile, name, created_at, updated_at",
                libsql::params![mobile.as_str(), name, now.as_str()],
            )
            .await
            .map_err(store_err)?;

        match rows.next().await.map_err(store_err)? {
            Some(row) => {
                debug!(mobile = %mobile, "Stored record");
                row_to_record(&row)
            }
            None => Err(CoreError::StoreError(
                "upsert returned no row".to_string(),
            )),
        }
    }

    async fn count(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM name_records", ())
            .await
            .map_err(store_err)?;

        match rows.next().await.map_err(store_err)? {
            Some(row) => {
                let count: i64 = row.get(0).map_err(store_err)?;
                Ok(count as u64)
            }
            None => Ok(0),
        }
    }

    #[instrument(skip(self, audit), fields(mobile = %audit.mobile, ref_id = %audit.ref_id))]
    async fn log_response(&self, audit: &ResponseAudit) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO response_audits
                     (ref_id, mobile, response_body, status_code, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    audit.ref_id.as_str(),
                    audit.mobile.as_str(),
                    audit.response_body.as_str(),
                    i64::from(audit.status_code),
                    audit.created_at.to_rfc3339()
                ],
            )
            .await
            .map_err(store_err)?;
        Ok(())
    }
}

fn store_err(err: impl std::fmt::Display) -> CoreError {
    CoreError::StoreError(err.to_string())
}

fn parse_mobile_column(value: &str) -> Result<MobileNumber> {
    MobileNumber::parse(value)
        .map_err(|e| CoreError::StoreError(format!("corrupt mobile column '{value}': {e}")))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::StoreError(format!("corrupt timestamp '{value}': {e}")))
}

fn row_to_record(row: &libsql::Row) -> Result<NameRecord> {
    let mobile: String = row.get(0).map_err(store_err)?;
    let name: String = row.get(1).map_err(store_err)?;
    let created_at: String = row.get(2).map_err(store_err)?;
    let updated_at: String = row.get(3).map_err(store_err)?;

    Ok(NameRecord {
        mobile: parse_mobile_column(&mobile)?,
        name,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_test_store() -> TursoStore {
        TursoStore::connect_local(":memory:").await.unwrap()
    }

    fn number(digits: &str) -> MobileNumber {
        MobileNumber::parse(digits).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_store_is_empty() {
        let store = make_test_store().await;
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.get(&number("8318090007")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_then_get() {
        let store = make_test_store().await;
        let mobile = number("8318090007");

        let stored = store.upsert(&mobile, "JOHN DOE").await.unwrap();
        assert_eq!(stored.mobile, mobile);
        assert_eq!(stored.name, "JOHN DOE");

        let fetched = store.get(&mobile).await.unwrap().unwrap();
        assert_eq!(fetched.name, "JOHN DOE");
        assert_eq!(fetched.created_at, stored.created_at);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let store = make_test_store().await;
        let mobile = number("8318090007");

        let first = store.upsert(&mobile, "JOHN DOE").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.upsert(&mobile, "JANE DOE").await.unwrap();

        assert_eq!(second.name, "JANE DOE");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_leave_one_row() {
        use std::sync::Arc;
        use tokio::task::JoinSet;

        let store = Arc::new(make_test_store().await);
        let mut tasks = JoinSet::new();

        for i in 0..20u32 {
            let store = store.clone();
            tasks.spawn(async move {
                let name = if i % 2 == 0 { "JOHN DOE" } else { "JANE DOE" };
                store.upsert(&number("8318090007"), name).await.unwrap()
            });
        }

        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 1);
        let winner = store.get(&number("8318090007")).await.unwrap().unwrap();
        assert!(winner.name == "JOHN DOE" || winner.name == "JANE DOE");
    }

    #[tokio::test]
    async fn test_audit_roundtrip() {
        let store = make_test_store().await;
        let mobile = number("8318090007");

        store
            .log_response(&ResponseAudit::new(
                "REF-1",
                mobile.clone(),
                "{\"status\":\"success\"}",
                200,
            ))
            .await
            .unwrap();
        store
            .log_response(&ResponseAudit::new("REF-2", mobile.clone(), "oops", 502))
            .await
            .unwrap();

        let audits = store.audits_for(&mobile).await.unwrap();
        assert_eq!(audits.len(), 2);
        // Newest first
        assert_eq!(audits[0].ref_id, "REF-2");
        assert_eq!(audits[0].status_code, 502);
        assert_eq!(audits[1].response_body, "{\"status\":\"success\"}");

        let other = store.audits_for(&number("9818090007")).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_schema_init_is_idempotent() {
        let store = make_test_store().await;
        store.init_schema().await.unwrap();
        store.upsert(&number("8318090007"), "JOHN DOE").await.unwrap();
        store.init_schema().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
