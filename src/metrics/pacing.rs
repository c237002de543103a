use super::config::MetricsConfig;
use crate::models::{Round, Tap};

/// All taps of all rounds, in round order.
pub fn flatten_taps(rounds: &[Round]) -> Vec<Tap> {
    rounds
        .iter()
        .flat_map(|round| round.taps.iter().cloned())
        .collect()
}

/// Mean interval between consecutive correct taps, pooled across successful
/// rounds. Intervals never span two rounds. 0 when fewer than two correct
/// taps exist in every successful round.
pub fn cognitive_fluency(rounds: &[Round]) -> f64 {
    let intervals: Vec<f64> = rounds
        .iter()
        .filter(|round| round.is_correct)
        .flat_map(|round| {
            let correct: Vec<f64> = round.correct_taps().map(|tap| tap.timestamp).collect();
            correct
                .windows(2)
                .map(|pair| pair[1] - pair[0])
                .collect::<Vec<_>>()
        })
        .collect();

    mean(&intervals).unwrap_or(0.0)
}

/// Mean percentage change in pace right after each error compared with the
/// pace leading into it. Positive means the user slowed down.
///
/// Errors too close to either end of the tap stream, or whose pre-error pace
/// averages exactly zero, are skipped. 0 when no error qualifies.
pub fn self_correction_index(all_taps: &[Tap], config: &MetricsConfig) -> f64 {
    let changes: Vec<f64> = all_taps
        .iter()
        .enumerate()
        .filter(|(idx, tap)| !tap.is_correct && qualifies(*idx, all_taps.len(), config))
        .filter_map(|(idx, _)| pace_change(all_taps, idx, config))
        .collect();

    mean(&changes).unwrap_or(0.0)
}

fn qualifies(idx: usize, len: usize, config: &MetricsConfig) -> bool {
    idx >= config.min_taps_before_error
        && idx
            .checked_add(config.min_taps_after_error)
            .map_or(false, |last| last < len)
}

fn pace_change(taps: &[Tap], idx: usize, config: &MetricsConfig) -> Option<f64> {
    let interval = |j: usize| taps[j].timestamp - taps[j - 1].timestamp;

    let pre_start = (idx + 1).saturating_sub(config.pre_error_window);
    let pre: Vec<f64> = (pre_start..=idx).filter(|&j| j > 0).map(interval).collect();

    let post_end = idx
        .saturating_add(config.post_error_window)
        .min(taps.len().saturating_sub(1));
    let post: Vec<f64> = (idx + 1..=post_end).map(interval).collect();

    let pre_avg = mean(&pre)?;
    let post_avg = mean(&post)?;
    // Round-relative timestamps can make a window that crosses a round
    // boundary negative; that still counts. Only a zero mean is undefined.
    if pre_avg == 0.0 {
        return None;
    }

    let change = (post_avg - pre_avg) / pre_avg * 100.0;
    change.is_finite().then_some(change)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
