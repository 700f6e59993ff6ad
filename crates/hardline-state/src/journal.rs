//! SQLite-backed journal of applied fixes
//!
//! Every remediation records a `(prev_value, new_value)` pair before its
//! adapter call runs, so individual rules can be reverted later. The log
//! is append-only; the current state of a rule is its latest entry.

use chrono::Utc;
use hardline_core::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Default journal database filename in the working directory
pub const JOURNAL_FILE: &str = "hardening.db";

/// One journaled remediation
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub rule_id: String,
    pub rule_name: String,
    pub prev_value: String,
    pub new_value: String,
    pub timestamp: String,
}

/// Rollback journal backed by SQLite
#[derive(Clone)]
pub struct Journal {
    conn: Arc<Mutex<Connection>>,
}

impl Journal {
    /// Open or create the journal database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| Error::Journal(format!("Failed to open journal database: {}", e)))?;

        let journal = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        journal.init_schema()?;
        Ok(journal)
    }

    /// Create an in-memory journal (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Journal(format!("Failed to create in-memory journal: {}", e)))?;

        let journal = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        journal.init_schema()?;
        Ok(journal)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS rollback_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rule_id TEXT,
                rule_name TEXT,
                prev_value TEXT,
                new_value TEXT,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .map_err(|e| Error::Journal(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    /// Append one entry recording a remediation's before/after pair
    pub fn log_action(
        &self,
        rule_id: &str,
        rule_name: &str,
        prev_value: &str,
        new_value: &str,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO rollback_log (rule_id, rule_name, prev_value, new_value, timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                rule_id,
                rule_name,
                prev_value,
                new_value,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| Error::Journal(format!("Failed to log action: {}", e)))?;

        Ok(())
    }

    /// The most recent (prev_value, new_value) pair for a rule
    pub fn rule_history(&self, rule_id: &str) -> Result<Option<(String, String)>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT prev_value, new_value FROM rollback_log \
             WHERE rule_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT 1",
            [rule_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| Error::Journal(format!("Failed to query history: {}", e)))
    }

    /// The most recent previous value for a rule (the rollback target)
    pub fn rollback_data(&self, rule_id: &str) -> Result<Option<String>> {
        Ok(self.rule_history(rule_id)?.map(|(prev, _)| prev))
    }

    /// All entries for a rule, newest first
    pub fn entries_for(&self, rule_id: &str) -> Result<Vec<JournalEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT rule_id, rule_name, prev_value, new_value, timestamp \
                 FROM rollback_log WHERE rule_id = ?1 ORDER BY timestamp DESC, id DESC",
            )
            .map_err(|e| Error::Journal(e.to_string()))?;

        let rows = stmt
            .query_map([rule_id], |row| {
                Ok(JournalEntry {
                    rule_id: row.get(0)?,
                    rule_name: row.get(1)?,
                    prev_value: row.get(2)?,
                    new_value: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })
            .map_err(|e| Error::Journal(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| Error::Journal(e.to_string()))?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_journal_has_no_history() {
        let journal = Journal::in_memory().unwrap();
        assert!(journal.rule_history("LIN-1").unwrap().is_none());
        assert!(journal.rollback_data("LIN-1").unwrap().is_none());
    }

    #[test]
    fn test_log_and_fetch_history() {
        let journal = Journal::in_memory().unwrap();
        journal
            .log_action("LIN-1", "ASLR", "0", "kernel.randomize_va_space = 2")
            .unwrap();

        let (prev, new) = journal.rule_history("LIN-1").unwrap().unwrap();
        assert_eq!(prev, "0");
        assert_eq!(new, "kernel.randomize_va_space = 2");
        assert_eq!(journal.rollback_data("LIN-1").unwrap().unwrap(), "0");
    }

    #[test]
    fn test_latest_entry_wins() {
        let journal = Journal::in_memory().unwrap();
        journal.log_action("LIN-1", "ASLR", "0", "first").unwrap();
        journal.log_action("LIN-1", "ASLR", "first", "second").unwrap();

        let (prev, new) = journal.rule_history("LIN-1").unwrap().unwrap();
        assert_eq!(prev, "first");
        assert_eq!(new, "second");

        // Older entries are retained, never rewritten
        let entries = journal.entries_for("LIN-1").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].new_value, "first");
    }

    #[test]
    fn test_history_is_per_rule() {
        let journal = Journal::in_memory().unwrap();
        journal.log_action("LIN-1", "ASLR", "0", "2").unwrap();
        journal.log_action("LIN-2", "Forwarding", "1", "0").unwrap();

        assert_eq!(journal.rollback_data("LIN-1").unwrap().unwrap(), "0");
        assert_eq!(journal.rollback_data("LIN-2").unwrap().unwrap(), "1");
        assert!(journal.rollback_data("LIN-3").unwrap().is_none());
    }
}
