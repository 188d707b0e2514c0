use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{RepositoryReport, RiskLevel};

/// One past analysis of a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub score: u8,
    pub risk_level: RiskLevel,
    pub analyzed_at: DateTime<Utc>,
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS repositories (
                id INTEGER PRIMARY KEY,
                full_name TEXT UNIQUE NOT NULL,
                last_analyzed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY,
                repository_id INTEGER NOT NULL REFERENCES repositories(id),
                score INTEGER NOT NULL,
                risk_level TEXT NOT NULL,
                tier TEXT NOT NULL,
                analyzed_at TEXT NOT NULL,
                report_json TEXT NOT NULL,
                UNIQUE(repository_id)
            );

            CREATE TABLE IF NOT EXISTS score_history (
                id INTEGER PRIMARY KEY,
                repository_id INTEGER NOT NULL REFERENCES repositories(id),
                score INTEGER NOT NULL,
                risk_level TEXT NOT NULL,
                analyzed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reports_repository_id ON reports(repository_id);
            CREATE INDEX IF NOT EXISTS idx_score_history_repository_id ON score_history(repository_id);
            "#,
        )?;

        Ok(())
    }

    /// Replaces the stored report for the repository and appends to its
    /// score history.
    pub fn save_report(&self, report: &RepositoryReport) -> Result<()> {
        let analyzed_at = report.analyzed_at.to_rfc3339();
        let result = &report.assessment.result;

        self.conn.execute(
            r#"
            INSERT INTO repositories (full_name, last_analyzed_at)
            VALUES (?1, ?2)
            ON CONFLICT(full_name) DO UPDATE SET
                last_analyzed_at = excluded.last_analyzed_at
            "#,
            params![report.repository, analyzed_at],
        )?;

        let repository_id: i64 = self.conn.query_row(
            "SELECT id FROM repositories WHERE full_name = ?1",
            params![report.repository],
            |row| row.get(0),
        )?;

        let report_json = serde_json::to_string(report)?;
        self.conn.execute(
            r#"
            INSERT INTO reports (repository_id, score, risk_level, tier, analyzed_at, report_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(repository_id) DO UPDATE SET
                score = excluded.score,
                risk_level = excluded.risk_level,
                tier = excluded.tier,
                analyzed_at = excluded.analyzed_at,
                report_json = excluded.report_json
            "#,
            params![
                repository_id,
                result.score,
                result.risk_level.as_str(),
                result.tier.to_string(),
                analyzed_at,
                report_json,
            ],
        )?;

        self.conn.execute(
            r#"
            INSERT INTO score_history (repository_id, score, risk_level, analyzed_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                repository_id,
                result.score,
                result.risk_level.as_str(),
                analyzed_at
            ],
        )?;

        tracing::debug!("Stored report for {} ({})", report.repository, result.score);
        Ok(())
    }

    pub fn get_report(&self, full_name: &str) -> Result<Option<RepositoryReport>> {
        let result = self.conn.query_row(
            r#"
            SELECT r.report_json
            FROM reports r
            JOIN repositories repo ON r.repository_id = repo.id
            WHERE repo.full_name = ?1
            "#,
            params![full_name],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(report_json) => Ok(Some(serde_json::from_str(&report_json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Full names of analysed repositories, most recently analysed first.
    pub fn list_repositories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT full_name FROM repositories ORDER BY last_analyzed_at DESC, id DESC",
        )?;

        let names = stmt.query_map([], |row| row.get(0))?;
        names.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Oldest first.
    pub fn score_history(&self, full_name: &str) -> Result<Vec<ScoreRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT h.score, h.risk_level, h.analyzed_at
            FROM score_history h
            JOIN repositories repo ON h.repository_id = repo.id
            WHERE repo.full_name = ?1
            ORDER BY h.analyzed_at ASC, h.id ASC
            "#,
        )?;

        let rows = stmt.query_map(params![full_name], |row| {
            Ok((
                row.get::<_, u8>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut history = Vec::new();
        for row in rows {
            let (score, risk_level, analyzed_at) = row?;
            history.push(ScoreRecord {
                score,
                risk_level: risk_level.parse().map_err(Error::ParseError)?,
                analyzed_at: DateTime::parse_from_rfc3339(&analyzed_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| Error::ParseError(e.to_string()))?,
            });
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{build_report, TrustEngine};
    use crate::models::RepositorySnapshot;
    use serde_json::json;

    fn report(name: &str, captured_at: &str, stars: u64) -> RepositoryReport {
        let snapshot = RepositorySnapshot::from_value(json!({
            "repository": name,
            "capturedAt": captured_at,
            "createdAt": "2021-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "stars": stars,
            "files": [{"name": "README.md"}]
        }))
        .unwrap();
        let assessment = TrustEngine::default().evaluate(&snapshot);
        build_report(&snapshot, assessment)
    }

    #[test]
    fn test_save_and_get_report() {
        let storage = Storage::in_memory().unwrap();
        let saved = report("acme/widgets", "2024-02-01T00:00:00Z", 10);
        storage.save_report(&saved).unwrap();

        let loaded = storage.get_report("acme/widgets").unwrap().unwrap();
        assert_eq!(loaded.repository, "acme/widgets");
        assert_eq!(loaded.analyzed_at, saved.analyzed_at);
        assert_eq!(loaded.assessment.result, saved.assessment.result);
        assert_eq!(loaded.warnings, saved.warnings);

        assert!(storage.get_report("acme/unknown").unwrap().is_none());
    }

    #[test]
    fn test_latest_report_wins_and_history_accumulates() {
        let storage = Storage::in_memory().unwrap();
        let first = report("acme/widgets", "2024-02-01T00:00:00Z", 10);
        let second = report("acme/widgets", "2024-03-01T00:00:00Z", 5000);
        storage.save_report(&first).unwrap();
        storage.save_report(&second).unwrap();

        let loaded = storage.get_report("acme/widgets").unwrap().unwrap();
        assert_eq!(loaded.analyzed_at, second.analyzed_at);

        let history = storage.score_history("acme/widgets").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].score, first.assessment.result.score);
        assert_eq!(history[1].score, second.assessment.result.score);
        assert_eq!(history[1].risk_level, second.assessment.result.risk_level);
        assert!(history[0].analyzed_at < history[1].analyzed_at);
    }

    #[test]
    fn test_list_repositories_most_recent_first() {
        let storage = Storage::in_memory().unwrap();
        storage
            .save_report(&report("acme/old", "2024-01-01T00:00:00Z", 1))
            .unwrap();
        storage
            .save_report(&report("acme/new", "2024-05-01T00:00:00Z", 1))
            .unwrap();

        assert_eq!(
            storage.list_repositories().unwrap(),
            vec!["acme/new".to_string(), "acme/old".to_string()]
        );
        assert!(storage.score_history("acme/none").unwrap().is_empty());
    }
}
