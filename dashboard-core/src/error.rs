use thiserror::Error;

/// Typed errors raised by the dashboard core.
///
/// Transport and parse failures travel as `anyhow::Error` with context; these
/// variants cover the cases callers may want to match on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Invalid time '{0}': expected HH:MM in 24-hour format")]
    InvalidTime(String),

    #[error("{provider} returned no observations for {location}")]
    EmptyResponse { provider: String, location: String },
}
