//! Document store interface for the dashboard's tweet queries.

use crate::error::DataError;
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredTweet {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub display_text: String,
    #[serde(default)]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub retweet_count: u64,
    /// County assigned upstream
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub retweet: bool,
}

/// Maps a dashboard account-type name to its label code.
pub fn account_type_code(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "government" => Some("gov"),
        "academic" => Some("acad"),
        "media" => Some("media"),
        "tourism" => Some("tourbiz"),
        "other" => Some("other"),
        _ => None,
    }
}

/// Filter over stored tweets. Every `None` means "no restriction".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweetQuery {
    /// `[start, end)` at day granularity
    pub time_range: Option<(NaiveDate, NaiveDate)>,
    pub labels: Option<Vec<String>>,
    pub counties: Option<Vec<String>>,
    pub exclude_retweets: bool,
}

impl TweetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes `["YYYY-MM-DD", "YYYY-MM-DD"]`. Anything else drops the date filter.
    pub fn time_frame<S: AsRef<str>>(mut self, bounds: &[S]) -> Self {
        self.time_range = None;
        if bounds.len() != 2 {
            if !bounds.is_empty() {
                warn!("Ignoring time frame with {} parts", bounds.len());
            }
            return self;
        }
        let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d");
        match (parse(bounds[0].as_ref()), parse(bounds[1].as_ref())) {
            (Ok(start), Ok(end)) => self.time_range = Some((start, end)),
            _ => warn!(
                "Ignoring unparseable time frame {:?} .. {:?}",
                bounds[0].as_ref(),
                bounds[1].as_ref()
            ),
        }
        self
    }

    /// Unknown account types are logged and skipped; if none are left the
    /// label filter is dropped.
    pub fn account_types<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        let codes: Vec<String> = names
            .iter()
            .filter_map(|name| {
                let code = account_type_code(name.as_ref());
                if code.is_none() {
                    warn!("Ignoring unknown account type '{}'", name.as_ref());
                }
                code.map(str::to_string)
            })
            .collect();
        self.labels = if codes.is_empty() { None } else { Some(codes) };
        self
    }

    pub fn counties<S: AsRef<str>>(mut self, counties: &[S]) -> Self {
        self.counties = if counties.is_empty() {
            None
        } else {
            Some(counties.iter().map(|c| c.as_ref().to_string()).collect())
        };
        self
    }

    pub fn include_retweets(mut self, include: bool) -> Self {
        self.exclude_retweets = !include;
        self
    }

    pub fn matches(&self, tweet: &StoredTweet) -> bool {
        if let Some((start, end)) = self.time_range {
            let in_range = tweet.time.is_some_and(|t| {
                let day_start = start.and_hms_opt(0, 0, 0).unwrap_or_default();
                let day_end = end.and_hms_opt(0, 0, 0).unwrap_or_default();
                t >= day_start && t < day_end
            });
            if !in_range {
                return false;
            }
        }

        if let Some(labels) = &self.labels {
            match &tweet.label {
                Some(label) if labels.contains(label) => {}
                _ => return false,
            }
        }

        if let Some(counties) = &self.counties {
            match &tweet.location {
                Some(location) if counties.contains(location) => {}
                _ => return false,
            }
        }

        !(self.exclude_retweets && tweet.retweet)
    }
}

pub trait TweetStore: Send + Sync {
    fn find(&self, query: &TweetQuery) -> Vec<StoredTweet>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tweets: Vec<StoredTweet>,
}

impl InMemoryStore {
    pub fn new(tweets: Vec<StoredTweet>) -> Self {
        Self { tweets }
    }

    /// Accepts a JSON array or one JSON document per line.
    pub fn from_json(content: &str) -> Result<Self, DataError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('[') {
            return Ok(Self::new(serde_json::from_str(trimmed)?));
        }
        let mut tweets = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            tweets.push(serde_json::from_str(line)?);
        }
        Ok(Self::new(tweets))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&content)?;
        info!("Loaded {} tweets from {:?}", store.tweets.len(), path);
        Ok(store)
    }
}

impl TweetStore for InMemoryStore {
    fn find(&self, query: &TweetQuery) -> Vec<StoredTweet> {
        self.tweets
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.tweets.len()
    }
}

/// Tweets per assigned county; tweets without a location are not counted.
pub fn count_by_county(tweets: &[StoredTweet]) -> IndexMap<String, u64> {
    let mut counts = IndexMap::new();
    for tweet in tweets {
        if let Some(county) = tweet.location.as_deref().filter(|c| !c.is_empty()) {
            *counts.entry(county.to_string()).or_insert(0) += 1;
        }
    }
    counts
}
