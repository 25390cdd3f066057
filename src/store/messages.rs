use rusqlite::params;

use crate::error::{ChatError, Result};
use crate::model::{Message, MessageKind};

use super::ChatStore;

fn parse_message_row(row: &rusqlite::Row) -> rusqlite::Result<Message> {
    let kind_str: String = row.get(3)?;
    let kind = MessageKind::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown message kind '{kind_str}'").into(),
        )
    })?;
    Ok(Message {
        from: row.get(0)?,
        to: row.get(1)?,
        text: row.get(2)?,
        kind,
        time: row.get(4)?,
    })
}

impl ChatStore {
    // ---- Message operations ----

    pub fn insert_message(&self, msg: &Message) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO messages (sender, recipient, text, kind, time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![msg.from, msg.to, msg.text, msg.kind.as_str(), msg.time],
        )?;
        Ok(())
    }

    /// Messages visible to `viewer`, in chronological (insertion) order:
    /// public kinds (`message`, `status`) plus anything the viewer sent or
    /// received. With a limit, only the chronological tail is returned.
    pub fn visible_messages(&self, viewer: &str, limit: Option<u32>) -> Result<Vec<Message>> {
        let conn = self.conn();
        match limit {
            Some(n) => {
                let mut stmt = conn.prepare(
                    "SELECT sender, recipient, text, kind, time FROM messages
                     WHERE kind IN ('message', 'status') OR sender = ?1 OR recipient = ?1
                     ORDER BY id DESC
                     LIMIT ?2",
                )?;
                let mut rows = stmt
                    .query_map(params![viewer, n], parse_message_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                // the tail was read newest-first
                rows.reverse();
                Ok(rows)
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT sender, recipient, text, kind, time FROM messages
                     WHERE kind IN ('message', 'status') OR sender = ?1 OR recipient = ?1
                     ORDER BY id ASC",
                )?;
                let rows = stmt
                    .query_map(params![viewer], parse_message_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            }
        }
    }

    pub fn message_count(&self) -> Result<u64> {
        let conn = self.conn();
        conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .map_err(ChatError::from)
    }
}
