//! Error types for the ETL stages.

use std::path::PathBuf;

use film_ledger::LedgerError;

/// All errors that can stop an ETL stage.
///
/// Per-film fetch failures are not errors; they are reported through
/// [`crate::fetch::FetchOutcome`] and never abort a batch.
#[derive(thiserror::Error, Debug)]
pub enum EtlError {
    #[error("No OMDb API key: pass --api-key or set OMDB_API_KEY")]
    MissingApiKey,

    #[error("Invalid {name} URL '{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        source: url::ParseError,
    },

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Checkpoint {} is missing; run `{stage}` first", .path.display())]
    MissingCheckpoint { path: PathBuf, stage: &'static str },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Convenience result type.
pub type EtlResult<T> = Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_checkpoint_names_stage() {
        let err = EtlError::MissingCheckpoint {
            path: PathBuf::from("csv/kaggle_clean.csv"),
            stage: "clean-awards",
        };
        assert_eq!(
            err.to_string(),
            "Checkpoint csv/kaggle_clean.csv is missing; run `clean-awards` first"
        );
    }

    #[test]
    fn test_ledger_errors_pass_through() {
        let err: EtlError = LedgerError::InvalidYear {
            line: 4,
            value: "x".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Line 4: invalid year 'x'");
    }
}
