//! Errors raised while loading reference data and corpora.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("unknown gazetteer category '{0}'")]
    UnknownCategory(String),

    #[error("gazetteer contains no place names")]
    EmptyGazetteer,
}
