use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum TopbarError {
    #[error("config error: {0}")]
    Config(String),

    /// A data source could not be found or opened at start-up.  The sampler
    /// that reports this is never retried.
    #[error("{sampler} unavailable: {reason}")]
    Unavailable {
        sampler: &'static str,
        reason: String,
    },

    /// The source answered this tick, but with data we cannot use.
    #[error("invalid {sampler} reading: {reason}")]
    InvalidReading {
        sampler: &'static str,
        reason: String,
    },

    #[error("value {value} out of range {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("mixer error: {0}")]
    Mixer(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TopbarError {
    pub fn unavailable(sampler: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            sampler,
            reason: reason.into(),
        }
    }

    pub fn invalid(sampler: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidReading {
            sampler,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = TopbarError> = std::result::Result<T, E>;
