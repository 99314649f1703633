//! leafscan-storage: SQLite persistence for analysis records and status
//! checks.
//!
//! Persistence is best-effort from the caller's perspective: a failed
//! write must never fail the analysis response. Callers log and move on.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tokio::sync::Mutex;

use leafscan_types::{AnalysisResult, Severity, StatusCheck};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Blocking task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Record encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS plant_analyses (
        id TEXT PRIMARY KEY,
        disease_name TEXT NOT NULL,
        confidence REAL NOT NULL,
        severity TEXT NOT NULL,
        symptoms TEXT NOT NULL,
        treatment TEXT NOT NULL,
        prevention TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_analyses_created
        ON plant_analyses(created_at DESC);

    CREATE TABLE IF NOT EXISTS status_checks (
        id TEXT PRIMARY KEY,
        client_name TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );";

/// SQLite-based storage for analysis records.
pub struct LeafscanStorage {
    conn: Arc<Mutex<Connection>>,
}

impl LeafscanStorage {
    /// Open (or create) the SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        tracing::info!("Storage opened: {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // ─── Analyses ───────────────────────────────────

    /// Persist one analysis record.
    pub async fn save_analysis(&self, result: &AnalysisResult) -> Result<()> {
        let conn = self.conn.clone();
        let result = result.clone();
        let symptoms = serde_json::to_string(&result.symptoms)?;
        let treatment = serde_json::to_string(&result.treatment)?;
        let prevention = serde_json::to_string(&result.prevention)?;
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT OR REPLACE INTO plant_analyses
                    (id, disease_name, confidence, severity, symptoms, treatment, prevention, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    result.id,
                    result.disease_name,
                    result.confidence,
                    result.severity.as_str(),
                    symptoms,
                    treatment,
                    prevention,
                    result.timestamp.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await?
    }

    /// List the most recent analyses, newest first.
    pub async fn recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisResult>> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let mut stmt = conn.prepare(
                "SELECT id, disease_name, confidence, severity, symptoms, treatment, prevention, created_at
                 FROM plant_analyses
                 ORDER BY created_at DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map([limit], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, i64>(7)?,
                ))
            })?;

            let mut results = Vec::new();
            for row in rows {
                let (id, disease_name, confidence, severity, symptoms, treatment, prevention, created_at) =
                    row?;
                results.push(AnalysisResult {
                    id,
                    disease_name,
                    confidence,
                    severity: Severity::parse(&severity),
                    symptoms: serde_json::from_str(&symptoms)?,
                    treatment: serde_json::from_str(&treatment)?,
                    prevention: serde_json::from_str(&prevention)?,
                    timestamp: millis_to_utc(created_at),
                });
            }
            Ok(results)
        })
        .await?
    }

    // ─── Status Checks ───────────────────────────────────

    /// Persist a client status check.
    pub async fn save_status_check(&self, check: &StatusCheck) -> Result<()> {
        let conn = self.conn.clone();
        let check = check.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT OR REPLACE INTO status_checks (id, client_name, created_at)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![
                    check.id,
                    check.client_name,
                    check.timestamp.timestamp_millis()
                ],
            )?;
            Ok(())
        })
        .await?
    }

    /// List status checks, newest first.
    pub async fn list_status_checks(&self, limit: usize) -> Result<Vec<StatusCheck>> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let mut stmt = conn.prepare(
                "SELECT id, client_name, created_at
                 FROM status_checks
                 ORDER BY created_at DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map([limit], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?;

            let mut checks = Vec::new();
            for row in rows {
                let (id, client_name, created_at) = row?;
                checks.push(StatusCheck {
                    id,
                    client_name,
                    timestamp: millis_to_utc(created_at),
                });
            }
            Ok(checks)
        })
        .await?
    }
}

fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis(name: &str) -> AnalysisResult {
        AnalysisResult::new(
            name.into(),
            0.9,
            Severity::Moderate,
            vec!["Yellowing leaves".into()],
            vec!["Apply fungicide".into()],
            vec!["Rotate crops".into()],
        )
    }

    #[tokio::test]
    async fn test_save_and_list_analyses() {
        let storage = LeafscanStorage::open_in_memory().unwrap();

        storage.save_analysis(&sample_analysis("Leaf rust")).await.unwrap();
        storage.save_analysis(&sample_analysis("Blight")).await.unwrap();

        let listed = storage.recent_analyses(100).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|a| a.disease_name == "Leaf rust"));
        let rust = listed.iter().find(|a| a.disease_name == "Leaf rust").unwrap();
        assert_eq!(rust.confidence, 0.9);
        assert_eq!(rust.severity, Severity::Moderate);
        assert_eq!(rust.symptoms, vec!["Yellowing leaves"]);
    }

    #[tokio::test]
    async fn test_recent_analyses_respects_limit() {
        let storage = LeafscanStorage::open_in_memory().unwrap();
        for i in 0..5 {
            storage
                .save_analysis(&sample_analysis(&format!("disease-{i}")))
                .await
                .unwrap();
        }
        let listed = storage.recent_analyses(3).await.unwrap();
        assert_eq!(listed.len(), 3);
    }

    #[tokio::test]
    async fn test_status_checks_round_trip() {
        let storage = LeafscanStorage::open_in_memory().unwrap();
        let check: StatusCheck = leafscan_types::StatusCheckCreate {
            client_name: "field-app".into(),
        }
        .into();

        storage.save_status_check(&check).await.unwrap();
        let listed = storage.list_status_checks(1000).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].client_name, "field-app");
        assert_eq!(listed[0].id, check.id);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let storage = LeafscanStorage::open_in_memory().unwrap();
        assert!(storage.recent_analyses(100).await.unwrap().is_empty());
        assert!(storage.list_status_checks(10).await.unwrap().is_empty());
    }
}
