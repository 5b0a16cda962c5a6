//! Tweet corpus ingestion, labeled-account join and corpus assembly.

use crate::config::{PipelineConfig, RETWEET_MARKER};
use crate::error::DataError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TweetRecord {
    pub id: String,
    pub username: String,
    pub text: String,
    #[serde(default)]
    pub text_with_display_links: String,
    pub created_at: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub retweet_count: u64,
    /// Hand label after the join; `None` when the account is unlabeled.
    #[serde(default)]
    pub label: Option<String>,
}

impl TweetRecord {
    pub fn new(id: &str, username: &str, text: &str, created_at: &str) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            text: text.to_string(),
            text_with_display_links: text.to_string(),
            created_at: created_at.to_string(),
            verified: false,
            retweet_count: 0,
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }

    /// Text the ranking works on; falls back to the raw text when the
    /// display-link variant is missing.
    pub fn display_text(&self) -> &str {
        if self.text_with_display_links.is_empty() {
            &self.text
        } else {
            &self.text_with_display_links
        }
    }

    pub fn is_retweet(&self) -> bool {
        self.text.starts_with(RETWEET_MARKER)
    }
}

#[derive(Debug, Deserialize)]
struct CorpusRow {
    id: String,
    username: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    text_with_display_links: String,
    #[serde(rename = "created_at.x", default)]
    created_at: String,
    #[serde(default)]
    verified: String,
    #[serde(rename = "public_metrics.x_retweet_count", default)]
    retweet_count: String,
}

impl From<CorpusRow> for TweetRecord {
    fn from(row: CorpusRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            text: row.text,
            text_with_display_links: row.text_with_display_links,
            created_at: row.created_at,
            verified: matches!(row.verified.trim().to_lowercase().as_str(), "true" | "1"),
            retweet_count: row.retweet_count.trim().parse::<f64>().map(|c| c as u64).unwrap_or(0),
            label: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LabelRow {
    username: String,
    #[serde(rename = "hand.label_simplified", default)]
    label: String,
}

/// username -> simplified hand label
#[derive(Clone, Debug, Default)]
pub struct AccountLabels {
    labels: IndexMap<String, String>,
}

impl AccountLabels {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut labels = AccountLabels::default();
        labels.extend_from_reader(reader)?;
        Ok(labels)
    }

    /// Appends rows; a username already present keeps its first label.
    pub fn extend_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, DataError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut added = 0;
        for result in rdr.deserialize::<LabelRow>() {
            let row = result?;
            let label = row.label.trim();
            if label.is_empty() || label.eq_ignore_ascii_case("na") {
                continue;
            }
            if !self.labels.contains_key(&row.username) {
                self.labels.insert(row.username, label.to_string());
                added += 1;
            }
        }
        Ok(added)
    }

    /// Loads every readable file in order. Unreadable files are logged and
    /// contribute nothing.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut labels = AccountLabels::default();
        for path in paths {
            let path = path.as_ref();
            let loaded = std::fs::File::open(path)
                .map_err(|source| DataError::Io {
                    path: path.to_path_buf(),
                    source,
                })
                .and_then(|file| labels.extend_from_reader(file));
            match loaded {
                Ok(added) => info!("Loaded {} account labels from {:?}", added, path),
                Err(e) => warn!("Skipping account labels {:?}: {}", path, e),
            }
        }
        labels
    }

    pub fn insert(&mut self, username: &str, label: &str) {
        self.labels
            .entry(username.to_string())
            .or_insert_with(|| label.to_string());
    }

    pub fn get(&self, username: &str) -> Option<&str> {
        self.labels.get(username).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub fn read_corpus<R: Read>(reader: R) -> Result<Vec<TweetRecord>, DataError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize::<CorpusRow>() {
        match result {
            Ok(row) => records.push(TweetRecord::from(row)),
            Err(e) => debug!("Skipping malformed corpus row: {}", e),
        }
    }
    Ok(records)
}

/// Concatenates the corpus files in order. Missing or unreadable files are
/// logged and skipped.
pub fn load_corpus<P: AsRef<Path>>(paths: &[P]) -> Vec<TweetRecord> {
    let mut records = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let loaded = std::fs::File::open(path)
            .map_err(|source| DataError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(read_corpus);
        match loaded {
            Ok(mut rows) => {
                info!("Found and processed {:?} ({} rows)", path, rows.len());
                records.append(&mut rows);
            }
            Err(e) => warn!("Skipping corpus file {:?}: {}", path, e),
        }
    }
    records
}

/// Left join: each record takes its account's label, or `None`.
pub fn join_labels(records: Vec<TweetRecord>, labels: &AccountLabels) -> Vec<TweetRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.label = labels.get(&record.username).map(str::to_string);
            record
        })
        .collect()
}

/// Keeps labeled, non-duplicate records with an accepted label, dated inside
/// the window (both ends inclusive) and, when configured, not retweets.
pub fn assemble_corpus(records: &[TweetRecord], config: &PipelineConfig) -> Vec<TweetRecord> {
    let start = config.window_start.and_hms_opt(0, 0, 0).unwrap_or_default();
    let end = config.window_end.and_hms_opt(0, 0, 0).unwrap_or_default();

    let unique: IndexSet<&TweetRecord> = records
        .iter()
        .filter(|r| match &r.label {
            Some(label) => config.allowed_labels.iter().any(|l| l == label),
            None => false,
        })
        .collect();

    unique
        .into_iter()
        .filter(|r| match r.timestamp() {
            Some(ts) => ts >= start && ts <= end,
            None => {
                debug!("Dropping record {} with unparseable timestamp '{}'", r.id, r.created_at);
                false
            }
        })
        .filter(|r| !(config.exclude_retweets && r.is_retweet()))
        .cloned()
        .collect()
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Accepts RFC 3339, the common naive layouts, or a bare date. Offsets are
/// normalised to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
