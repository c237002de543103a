use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_outcome, to_i64},
};
use crate::models::{EventEntry, Session};

const SESSION_COLUMNS: &str =
    "id, game_id, user_id, started_at, ended_at, outcome, final_score, metadata";

fn row_to_session(row: &Row) -> Result<Session> {
    let started_at: String = row.get("started_at")?;
    let ended_at: String = row.get("ended_at")?;
    let outcome: String = row.get("outcome")?;
    let metadata: String = row.get("metadata")?;

    Ok(Session {
        id: row.get("id")?,
        game_id: row.get("game_id")?,
        user_id: row.get("user_id")?,
        start_time: parse_datetime(&started_at, "started_at")?,
        end_time: parse_datetime(&ended_at, "ended_at")?,
        outcome: parse_outcome(&outcome)?,
        final_score: row.get("final_score")?,
        events: Vec::new(),
        metadata: serde_json::from_str::<Map<String, Value>>(&metadata)
            .context("failed to parse session metadata")?,
    })
}

fn load_events(conn: &Connection, session_id: &str) -> Result<Vec<EventEntry>> {
    let mut stmt = conn.prepare(
        "SELECT event_type, timestamp, value, is_correct
         FROM session_events
         WHERE session_id = ?1
         ORDER BY seq ASC",
    )?;

    let mut rows = stmt.query(params![session_id])?;
    let mut events = Vec::new();
    while let Some(row) = rows.next()? {
        let timestamp: String = row.get(1)?;
        let value: String = row.get(2)?;
        events.push(EventEntry {
            event_type: row.get(0)?,
            timestamp: parse_datetime(&timestamp, "timestamp")?,
            value: serde_json::from_str(&value).context("failed to parse event value")?,
            is_correct: row.get(3)?,
        });
    }
    Ok(events)
}

impl Database {
    /// Store a finished session and its event log atomically.
    pub async fn insert_session(&self, session: &Session) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO game_sessions (id, game_id, user_id, started_at, ended_at, outcome, final_score, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.game_id,
                    record.user_id,
                    record.start_time.to_rfc3339(),
                    record.end_time.to_rfc3339(),
                    record.outcome.as_str(),
                    record.final_score,
                    serde_json::to_string(&record.metadata)?,
                ],
            )
            .context("failed to insert session")?;

            {
                let mut stmt = tx.prepare(
                    "INSERT INTO session_events (session_id, seq, event_type, timestamp, value, is_correct)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for (seq, event) in record.events.iter().enumerate() {
                    stmt.execute(params![
                        record.id,
                        to_i64(seq as u64)?,
                        event.event_type,
                        event.timestamp.to_rfc3339(),
                        serde_json::to_string(&event.value)?,
                        event.is_correct,
                    ])
                    .with_context(|| format!("failed to insert event {seq}"))?;
                }
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let session = conn
                .query_row(
                    &format!("SELECT {SESSION_COLUMNS} FROM game_sessions WHERE id = ?1"),
                    params![session_id],
                    |row| Ok(row_to_session(row)),
                )
                .optional()?
                .transpose()?;

            match session {
                Some(mut session) => {
                    session.events = load_events(conn, &session.id)?;
                    Ok(Some(session))
                }
                None => Ok(None),
            }
        })
        .await
    }

    /// Sessions for one user, oldest first, without their event logs.
    pub async fn list_sessions_for_user(&self, user_id: &str) -> Result<Vec<Session>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM game_sessions
                 WHERE user_id = ?1
                 ORDER BY started_at ASC"
            ))?;

            let mut rows = stmt.query(params![user_id])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }
            Ok(sessions)
        })
        .await
    }

    /// Delete a session, its events and any analysis stored for it.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "DELETE FROM analysis_rounds WHERE session_id = ?1",
                params![session_id],
            )?;
            tx.execute(
                "DELETE FROM analysis_sessions WHERE session_id = ?1",
                params![session_id],
            )?;
            // session_events go with the session via ON DELETE CASCADE
            tx.execute("DELETE FROM game_sessions WHERE id = ?1", params![session_id])?;

            tx.commit()?;
            Ok(())
        })
        .await
    }
}
