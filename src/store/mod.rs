//! SQLite storage — participants and the message log.
//!
//! All access is synchronous (rusqlite). Async callers use `spawn_blocking`.
//! A single connection behind a mutex serializes every storage call; that
//! per-call atomicity is the only consistency guarantee the service makes.

mod messages;
mod participants;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::model::Message;

/// Thread-safe wrapper around a SQLite connection.
/// All access is synchronous; use tokio::task::spawn_blocking from async code.
#[derive(Clone)]
pub struct ChatStore {
    conn: Arc<Mutex<Connection>>,
}

const SCHEMA_DDL: &str = "
    CREATE TABLE IF NOT EXISTS participants (
        name TEXT PRIMARY KEY,
        last_status INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender TEXT NOT NULL,
        recipient TEXT NOT NULL,
        text TEXT NOT NULL,
        kind TEXT NOT NULL,
        time TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_messages_kind ON messages(kind);
";

impl ChatStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Acquire the database connection, recovering from mutex poisoning.
    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_DDL)?;
        Ok(())
    }

    // ---- Eviction ----

    /// Remove participants whose `last_status` is older than `cutoff`
    /// (epoch milliseconds) and append one synthetic leave notice per
    /// removed participant. Returns the removed names.
    ///
    /// The stale query, the leave notices, and the delete run in one
    /// transaction against the same cutoff: a heartbeat cannot slip between
    /// the query and the delete, and a failed notice insert rolls the whole
    /// sweep back instead of losing the leave event.
    pub fn evict_inactive(&self, cutoff: i64) -> Result<Vec<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let evicted: Vec<String> = {
            let mut stmt = tx.prepare("SELECT name FROM participants WHERE last_status < ?1")?;
            let rows = stmt
                .query_map(params![cutoff], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        if !evicted.is_empty() {
            for name in &evicted {
                let notice = Message::left(name);
                tx.execute(
                    "INSERT INTO messages (sender, recipient, text, kind, time)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        notice.from,
                        notice.to,
                        notice.text,
                        notice.kind.as_str(),
                        notice.time
                    ],
                )?;
            }
            tx.execute(
                "DELETE FROM participants WHERE last_status < ?1",
                params![cutoff],
            )?;
        }

        tx.commit()?;
        Ok(evicted)
    }
}
