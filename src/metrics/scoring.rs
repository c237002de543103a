use std::collections::BTreeMap;

use super::types::LevelSummary;
use crate::models::Round;

/// Highest level among successful rounds, or 0 when none succeeded.
pub fn max_span(rounds: &[Round]) -> u32 {
    rounds
        .iter()
        .filter(|round| round.is_correct)
        .map(|round| round.level)
        .max()
        .unwrap_or(0)
}

/// Percentage of failed rounds; 0 for an empty session.
pub fn error_rate(rounds: &[Round]) -> f64 {
    if rounds.is_empty() {
        return 0.0;
    }
    let failed = rounds.iter().filter(|round| !round.is_correct).count();
    100.0 * failed as f64 / rounds.len() as f64
}

/// Number of rounds that were retries at their level.
pub fn persistence(rounds: &[Round]) -> usize {
    rounds.iter().filter(|round| round.is_retry()).count()
}

pub fn successful_attempts(rounds: &[Round]) -> usize {
    rounds.iter().filter(|round| round.is_correct).count()
}

/// Attempts, successes and mean round time per level, ascending by level.
pub fn level_breakdown(rounds: &[Round]) -> Vec<LevelSummary> {
    let mut by_level: BTreeMap<u32, (usize, usize, f64)> = BTreeMap::new();
    for round in rounds {
        let entry = by_level.entry(round.level).or_insert((0, 0, 0.0));
        entry.0 += 1;
        if round.is_correct {
            entry.1 += 1;
        }
        entry.2 += round.time_taken;
    }

    by_level
        .into_iter()
        .map(|(level, (attempts, successes, total_time))| LevelSummary {
            level,
            attempts,
            successes,
            mean_time_taken: total_time / attempts as f64,
        })
        .collect()
}
