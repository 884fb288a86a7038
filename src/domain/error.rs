//! Domain error types.

/// Top-level error type for cryptoboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
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

    #[error("unknown asset: {symbol}")]
    UnknownAsset { symbol: String },

    #[error("unknown category: {name}")]
    UnknownCategory { name: String },

    #[error("no assets defined in configuration")]
    EmptyCatalog,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        DashboardError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        DashboardError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) | DashboardError::Csv(_) => 1,
            DashboardError::ConfigParse { .. }
            | DashboardError::ConfigMissing { .. }
            | DashboardError::ConfigInvalid { .. } => 2,
            DashboardError::UnknownAsset { .. } | DashboardError::UnknownCategory { .. } => 4,
            DashboardError::EmptyCatalog => 5,
        };
        std::process::ExitCode::from(code)
    }
}
