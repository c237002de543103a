//! Batch metrics over the rounds of one session.
//!
//! Each metric is an independent pure function of the round list; the engine
//! only bundles them into a `MetricsRecord`.

mod config;
pub mod pacing;
pub mod scoring;
mod types;

pub use config::MetricsConfig;
pub use types::{LevelSummary, MetricsRecord};

use chrono::{DateTime, Utc};

use crate::{
    log_debug,
    models::{AnalysisGameSession, Round, Session},
};

const ENABLE_LOGS: bool = true;

/// Stateless metric calculator. Construct one per caller; it holds only
/// configuration, so `compute` can run any number of times (e.g. for live
/// previews) with identical results for identical input.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Fold `rounds` into a metrics record. `as_of` closes the measured span
    /// that opened at `session_start`.
    pub fn compute(
        &self,
        rounds: &[Round],
        session_start: DateTime<Utc>,
        as_of: DateTime<Utc>,
    ) -> MetricsRecord {
        let all_taps = pacing::flatten_taps(rounds);
        let total_ms = (as_of - session_start).num_milliseconds().max(0);

        let record = MetricsRecord {
            max_span: scoring::max_span(rounds),
            total_session_time: total_ms as f64 / 1000.0,
            error_rate: scoring::error_rate(rounds),
            total_attempts: rounds.len(),
            successful_attempts: scoring::successful_attempts(rounds),
            persistence: scoring::persistence(rounds),
            cognitive_fluency: pacing::cognitive_fluency(rounds),
            self_correction_index: pacing::self_correction_index(&all_taps, &self.config),
            level_breakdown: scoring::level_breakdown(rounds),
            all_taps,
            rounds_data: rounds.to_vec(),
        };

        log_debug!(
            "Computed metrics over {} rounds: span {}, error rate {:.1}%, fluency {:.0}ms",
            record.total_attempts,
            record.max_span,
            record.error_rate,
            record.cognitive_fluency
        );

        record
    }

    /// Build the analytics record for a finished session, measuring over the
    /// session's own start and end.
    pub fn analyze(
        &self,
        session: &Session,
        user_name: impl Into<String>,
        rounds: Vec<Round>,
    ) -> AnalysisGameSession {
        let metrics = self.compute(&rounds, session.start_time, session.end_time);
        AnalysisGameSession {
            session_id: session.id.clone(),
            game_id: session.game_id.clone(),
            user_id: session.user_id.clone(),
            user_name: user_name.into(),
            start_time: session.start_time,
            end_time: session.end_time,
            metrics,
            rounds,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::round;
    use super::*;
    use crate::models::SessionOutcome;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::Map;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn empty_session_yields_zeroes() {
        let engine = MetricsEngine::default();
        let record = engine.compute(&[], start(), start());

        assert_eq!(record.max_span, 0);
        assert_eq!(record.error_rate, 0.0);
        assert_eq!(record.persistence, 0);
        assert_eq!(record.cognitive_fluency, 0.0);
        assert_eq!(record.self_correction_index, 0.0);
        assert_eq!(record.total_attempts, 0);
        assert!(record.all_taps.is_empty());
    }

    #[test]
    fn full_session_record() {
        let rounds = vec![
            round(3, 1, true, &[(0.0, true), (300.0, true), (700.0, true)]),
            round(4, 1, false, &[(1000.0, true), (1300.0, true), (1600.0, true), (1900.0, false)]),
            round(4, 2, true, &[(3000.0, true), (3500.0, true), (4000.0, true), (4500.0, true)]),
        ];
        let engine = MetricsEngine::default();
        let record = engine.compute(&rounds, start(), start() + chrono::Duration::seconds(95));

        assert_eq!(record.max_span, 4);
        assert_eq!(record.total_session_time, 95.0);
        assert!((record.error_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(record.total_attempts, 3);
        assert_eq!(record.successful_attempts, 2);
        assert_eq!(record.persistence, 1);
        // (300 + 400 + 500 * 3) / 5
        assert_eq!(record.cognitive_fluency, 440.0);
        assert_eq!(record.all_taps.len(), 11);
        assert_eq!(record.rounds_data, rounds);
        assert_eq!(record.level_breakdown.len(), 2);
    }

    #[test]
    fn session_time_never_negative() {
        let engine = MetricsEngine::default();
        let record = engine.compute(&[], start(), start() - chrono::Duration::seconds(5));
        assert_eq!(record.total_session_time, 0.0);
    }

    #[test]
    fn analyze_uses_session_bounds() {
        let session = Session {
            id: "session-1".into(),
            game_id: "digit-span".into(),
            user_id: "u-1".into(),
            start_time: start(),
            end_time: start() + chrono::Duration::seconds(30),
            outcome: SessionOutcome::Completed,
            final_score: 3.0,
            events: Vec::new(),
            metadata: Map::new(),
        };
        let rounds = vec![round(3, 1, true, &[(0.0, true), (300.0, true), (700.0, true)])];

        let analysis = MetricsEngine::default().analyze(&session, "Ada", rounds.clone());
        assert_eq!(analysis.session_id, "session-1");
        assert_eq!(analysis.user_name, "Ada");
        assert_eq!(analysis.metrics.total_session_time, 30.0);
        assert_eq!(analysis.metrics.max_span, 3);
        assert_eq!(analysis.rounds, rounds);
    }

    fn arb_round() -> impl Strategy<Value = Round> {
        (
            1u32..10,
            1u32..5,
            any::<bool>(),
            prop::collection::vec((0u32..2_000, any::<bool>()), 0..10),
        )
            .prop_map(|(level, attempt, is_correct, raw)| {
                let mut clock = 0.0;
                let taps: Vec<(f64, bool)> = raw
                    .into_iter()
                    .map(|(gap, ok)| {
                        clock += gap as f64;
                        (clock, ok)
                    })
                    .collect();
                round(level, attempt, is_correct, &taps)
            })
    }

    proptest! {
        #[test]
        fn prop_error_rate_is_a_percentage(rounds in prop::collection::vec(arb_round(), 0..20)) {
            let record = MetricsEngine::default().compute(&rounds, start(), start());
            prop_assert!((0.0..=100.0).contains(&record.error_rate));
        }

        #[test]
        fn prop_max_span_matches_best_success(rounds in prop::collection::vec(arb_round(), 0..20)) {
            let record = MetricsEngine::default().compute(&rounds, start(), start());
            let expected = rounds.iter().filter(|r| r.is_correct).map(|r| r.level).max().unwrap_or(0);
            prop_assert_eq!(record.max_span, expected);
        }

        #[test]
        fn prop_persistence_bounded_by_rounds(rounds in prop::collection::vec(arb_round(), 0..20)) {
            let record = MetricsEngine::default().compute(&rounds, start(), start());
            prop_assert_eq!(record.persistence, rounds.iter().filter(|r| r.attempt > 1).count());
            prop_assert!(record.persistence <= rounds.len());
        }

        #[test]
        fn prop_compute_is_idempotent(rounds in prop::collection::vec(arb_round(), 0..20)) {
            let engine = MetricsEngine::default();
            let end = start() + chrono::Duration::seconds(60);
            prop_assert_eq!(engine.compute(&rounds, start(), end), engine.compute(&rounds, start(), end));
        }

        #[test]
        fn prop_metrics_are_finite(rounds in prop::collection::vec(arb_round(), 0..20)) {
            let record = MetricsEngine::default().compute(&rounds, start(), start());
            prop_assert!(record.cognitive_fluency.is_finite());
            prop_assert!(record.self_correction_index.is_finite());
        }
    }
}
