//! Domain error types.

/// Top-level error type for indigrid.
#[derive(Debug, thiserror::Error)]
pub enum IndigridError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid indicator definition #{index}: {reason}")]
    Definition { index: usize, reason: String },

    #[error("invalid parameter {param} for {indicator}: {reason}")]
    InvalidParameter {
        indicator: String,
        param: String,
        reason: String,
    },

    #[error("malformed table {table}: {reason}")]
    MalformedTable { table: String, reason: String },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("invalid date {value:?}: expected dd.mm.yyyy")]
    DateParse { value: String },

    #[error("csv error: {reason}")]
    Csv { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IndigridError {
    pub(crate) fn invalid_parameter(indicator: &str, param: &str, reason: &str) -> Self {
        IndigridError::InvalidParameter {
            indicator: indicator.to_string(),
            param: param.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<csv::Error> for IndigridError {
    fn from(err: csv::Error) -> Self {
        IndigridError::Csv {
            reason: err.to_string(),
        }
    }
}

impl From<&IndigridError> for std::process::ExitCode {
    fn from(err: &IndigridError) -> Self {
        let code: u8 = match err {
            IndigridError::Io(_) | IndigridError::Csv { .. } => 1,
            IndigridError::ConfigParse { .. }
            | IndigridError::ConfigMissing { .. }
            | IndigridError::ConfigInvalid { .. } => 2,
            IndigridError::Definition { .. } | IndigridError::InvalidParameter { .. } => 3,
            IndigridError::MalformedTable { .. }
            | IndigridError::NoData { .. }
            | IndigridError::DateParse { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
