use rusqlite::{params, OptionalExtension};

use crate::error::{ChatError, Result};
use crate::model::{Message, Participant};

use super::ChatStore;

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<Participant> {
    Ok(Participant {
        name: row.get(0)?,
        last_status: row.get(1)?,
    })
}

impl ChatStore {
    // ---- Participant operations ----

    /// Register a participant and append their join notice in one
    /// transaction. Uniqueness comes from the `participants.name` primary
    /// key; a constraint violation maps to `DuplicateParticipant`.
    pub fn register_participant(&self, participant: &Participant) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO participants (name, last_status) VALUES (?1, ?2)",
            params![participant.name, participant.last_status],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ChatError::DuplicateParticipant {
                    name: participant.name.clone(),
                }
            }
            other => ChatError::Database(other),
        })?;

        let notice = Message::joined(&participant.name);
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

        tx.commit()?;
        Ok(())
    }

    pub fn get_participant(&self, name: &str) -> Result<Option<Participant>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT name, last_status FROM participants WHERE name = ?1",
            params![name],
            parse_participant_row,
        )
        .optional()
        .map_err(ChatError::from)
    }

    pub fn list_participants(&self) -> Result<Vec<Participant>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT name, last_status FROM participants")?;
        let rows = stmt
            .query_map([], parse_participant_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn participant_exists(&self, name: &str) -> Result<bool> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*) FROM participants WHERE name = ?1",
            params![name],
            |row| {
                let count: i64 = row.get(0)?;
                Ok(count > 0)
            },
        )
        .map_err(ChatError::from)
    }

    /// Refresh a participant's liveness timestamp.
    /// Fails with `UnknownParticipant` when no row matched.
    pub fn touch_participant(&self, name: &str, last_status: i64) -> Result<()> {
        let conn = self.conn();
        let updated = conn.execute(
            "UPDATE participants SET last_status = ?1 WHERE name = ?2",
            params![last_status, name],
        )?;
        if updated == 0 {
            return Err(ChatError::UnknownParticipant {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn participant_count(&self) -> Result<u64> {
        let conn = self.conn();
        conn.query_row("SELECT COUNT(*) FROM participants", [], |row| row.get(0))
            .map_err(ChatError::from)
    }
}
