use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_i64, to_u32},
};
use crate::metrics::MetricsRecord;
use crate::models::{AnalysisGameSession, Round};

fn row_to_analysis(row: &Row) -> Result<AnalysisGameSession> {
    let started_at: String = row.get("started_at")?;
    let ended_at: String = row.get("ended_at")?;
    let metrics: String = row.get("metrics")?;

    Ok(AnalysisGameSession {
        session_id: row.get("session_id")?,
        game_id: row.get("game_id")?,
        user_id: row.get("user_id")?,
        user_name: row.get("user_name")?,
        start_time: parse_datetime(&started_at, "started_at")?,
        end_time: parse_datetime(&ended_at, "ended_at")?,
        metrics: serde_json::from_str::<MetricsRecord>(&metrics)
            .context("failed to parse stored metrics")?,
        rounds: Vec::new(),
    })
}

fn load_rounds(conn: &Connection, session_id: &str) -> Result<Vec<Round>> {
    let mut stmt = conn.prepare(
        "SELECT level, attempt, is_correct, time_taken, started_at, ended_at, taps
         FROM analysis_rounds
         WHERE session_id = ?1
         ORDER BY seq ASC",
    )?;

    let mut rows = stmt.query(params![session_id])?;
    let mut rounds = Vec::new();
    while let Some(row) = rows.next()? {
        let started_at: String = row.get(4)?;
        let ended_at: String = row.get(5)?;
        let taps: String = row.get(6)?;
        rounds.push(Round {
            level: to_u32(row.get(0)?, "level")?,
            attempt: to_u32(row.get(1)?, "attempt")?,
            is_correct: row.get(2)?,
            time_taken: row.get(3)?,
            taps: serde_json::from_str(&taps).context("failed to parse round taps")?,
            start_time: parse_datetime(&started_at, "started_at")?,
            end_time: parse_datetime(&ended_at, "ended_at")?,
        });
    }
    Ok(rounds)
}

impl Database {
    /// Store an analysis record and its rounds, replacing any earlier record
    /// for the same session.
    pub async fn insert_analysis(&self, analysis: &AnalysisGameSession) -> Result<()> {
        let record = analysis.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "DELETE FROM analysis_rounds WHERE session_id = ?1",
                params![record.session_id],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO analysis_sessions (session_id, game_id, user_id, user_name, started_at, ended_at, metrics)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.session_id,
                    record.game_id,
                    record.user_id,
                    record.user_name,
                    record.start_time.to_rfc3339(),
                    record.end_time.to_rfc3339(),
                    serde_json::to_string(&record.metrics)?,
                ],
            )
            .context("failed to insert analysis session")?;

            {
                let mut stmt = tx.prepare(
                    "INSERT INTO analysis_rounds (session_id, seq, level, attempt, is_correct, time_taken, started_at, ended_at, taps)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )?;
                for (seq, round) in record.rounds.iter().enumerate() {
                    stmt.execute(params![
                        record.session_id,
                        to_i64(seq as u64)?,
                        round.level,
                        round.attempt,
                        round.is_correct,
                        round.time_taken,
                        round.start_time.to_rfc3339(),
                        round.end_time.to_rfc3339(),
                        serde_json::to_string(&round.taps)?,
                    ])
                    .with_context(|| format!("failed to insert round {seq}"))?;
                }
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    pub async fn get_analysis(&self, session_id: &str) -> Result<Option<AnalysisGameSession>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let analysis = conn
                .query_row(
                    "SELECT session_id, game_id, user_id, user_name, started_at, ended_at, metrics
                     FROM analysis_sessions
                     WHERE session_id = ?1",
                    params![session_id],
                    |row| Ok(row_to_analysis(row)),
                )
                .optional()?
                .transpose()?;

            match analysis {
                Some(mut analysis) => {
                    analysis.rounds = load_rounds(conn, &analysis.session_id)?;
                    Ok(Some(analysis))
                }
                None => Ok(None),
            }
        })
        .await
    }

    /// Analysis history for one user, oldest first, for progress tracking.
    /// Rounds are included.
    pub async fn list_analyses_for_user(&self, user_id: &str) -> Result<Vec<AnalysisGameSession>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT session_id, game_id, user_id, user_name, started_at, ended_at, metrics
                 FROM analysis_sessions
                 WHERE user_id = ?1
                 ORDER BY started_at ASC",
            )?;

            let mut rows = stmt.query(params![user_id])?;
            let mut analyses = Vec::new();
            while let Some(row) = rows.next()? {
                analyses.push(row_to_analysis(row)?);
            }
            for analysis in &mut analyses {
                analysis.rounds = load_rounds(conn, &analysis.session_id)?;
            }
            Ok(analyses)
        })
        .await
    }
}
