use anyhow::Result;
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

use crate::KeyValueStore;

/// Key/value table in a local SQLite file.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", &"WAL")?;
        conn.pragma_update(None, "synchronous", &"NORMAL")?;
        apply_migrations(&conn)?;
        tracing::debug!(path = %path.display(), "opened story database");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1 LIMIT 1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO kv(key, value, updated_at) VALUES(?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn apply_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("../migrations/V0001__kv.sql"))?;
    conn.execute(
        "INSERT OR IGNORE INTO migrations(name, applied_at) VALUES(?1, strftime('%s','now'))",
        params!["V0001__kv"],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("projects").unwrap(), None);
        store.set("projects", "[]").unwrap();
        store.set("projects", "[1]").unwrap();
        assert_eq!(store.get("projects").unwrap().as_deref(), Some("[1]"));
        store.remove("projects").unwrap();
        store.remove("projects").unwrap();
        assert_eq!(store.get("projects").unwrap(), None);
    }

    #[test]
    fn reopening_file_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("story.db");
        {
            let store = SqliteStore::open_or_create(&path).unwrap();
            store.set("project:a", "{}").unwrap();
        }
        let store = SqliteStore::open_or_create(&path).unwrap();
        assert_eq!(store.get("project:a").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.keys().unwrap(), vec!["project:a".to_string()]);
        assert_eq!(store.path(), Some(path.as_path()));
    }
}
