//! Tuning constants and pipeline configuration for the GeoCloud engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DataError;

// Corpus guard: fewer distinct cleaned texts than this yields the placeholder
pub const MIN_DISTINCT_TEXTS: usize = 5;

// Placeholder word-cloud entry for empty or undersized corpora
pub const PLACEHOLDER_TEXT: &str = "Empty";
pub const PLACEHOLDER_VALUE: u64 = 10;

// Collection window, both ends inclusive
pub const WINDOW_START: (i32, u32, u32) = (2018, 1, 1);
pub const WINDOW_END: (i32, u32, u32) = (2023, 1, 1);

// Hand-label codes accepted into the ranking corpus
pub const ALLOWED_LABELS: [&str; 5] = ["acad", "gov", "media", "other", "tourbiz"];

// Appended to the combined pure gazetteer
pub const FLORIDA_ABBREVIATIONS: [&str; 4] = ["fl", "florida", "swfl", "floridas"];

// Replacement for masked entity phrases
pub const MASK_TOKEN: &str = "na";

pub const RETWEET_MARKER: &str = "RT @";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub lemmatize: bool,
    pub min_distinct_texts: usize,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub exclude_retweets: bool,
    pub allowed_labels: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lemmatize: true,
            min_distinct_texts: MIN_DISTINCT_TEXTS,
            window_start: ymd(WINDOW_START),
            window_end: ymd(WINDOW_END),
            exclude_retweets: true,
            allowed_labels: ALLOWED_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml(content: &str) -> Result<Self, DataError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }
}

fn ymd((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
