use thiserror::Error;

/// Errors raised by session lifecycle misuse.
///
/// Metric computation never produces one of these; degenerate input resolves
/// to zeroed metrics instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
