use serde::{Deserialize, Serialize};

/// Window sizes for the self-correction index.
///
/// The defaults give three-interval windows on either side of an error and
/// skip errors with fewer than three taps before or after them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsConfig {
    /// Intervals ending at the error tap that form the pre-error pace.
    pub pre_error_window: usize,
    /// Intervals following the error tap that form the post-error pace.
    pub post_error_window: usize,
    /// Taps required before an error for it to qualify.
    pub min_taps_before_error: usize,
    /// Taps required after an error for it to qualify.
    pub min_taps_after_error: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            pre_error_window: 3,
            post_error_window: 3,
            min_taps_before_error: 3,
            min_taps_after_error: 3,
        }
    }
}
