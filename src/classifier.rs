//! Geo-tag classification of hashtags.
//!
//! A [`HashtagClassifier`] owns its two frequency maps. Build one per
//! classification session, or call [`HashtagClassifier::reset`] between
//! sessions. [`SharedClassifier`] wraps one behind a mutex for request
//! handlers and pairs the read with the reset.

use crate::matcher::PlaceMatcher;
use crate::normalization::filter_hashtags;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::debug;

pub type FrequencyMap = IndexMap<String, u64>;

static LINK_TAIL_REGEX: OnceLock<Regex> = OnceLock::new();

// Punctuation removed before hashtag extraction; `#` survives
const HASHTAG_NOISE: [char; 35] = [
    '!', '"', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '.', '/', ':', ';', '<', '=', '>',
    '?', '@', '[', '\\', ']', '^', '_', '-', '`', '{', '|', '}', '~', '»', '«', '“', '”',
];

fn get_link_tail_regex() -> &'static Regex {
    LINK_TAIL_REGEX.get_or_init(|| Regex::new(r"\bhttp\w*\b.*").unwrap())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrequencyCounts {
    pub geo: FrequencyMap,
    pub non_geo: FrequencyMap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    Geo,
    NonGeo,
}

pub struct HashtagClassifier {
    matcher: Arc<dyn PlaceMatcher>,
    geo: FrequencyMap,
    non_geo: FrequencyMap,
}

impl HashtagClassifier {
    pub fn new(matcher: Arc<dyn PlaceMatcher>) -> Self {
        Self {
            matcher,
            geo: IndexMap::new(),
            non_geo: IndexMap::new(),
        }
    }

    /// Counts each hashtag as geo-tagged or not. Never fails; anything the
    /// matcher does not recognise lands in the non-geo map.
    pub fn classify<S: AsRef<str>>(&mut self, hashtags: &[S]) {
        for hashtag in hashtags {
            let hashtag = hashtag.as_ref();
            let target = match self.matcher.find(hashtag) {
                Some(place) => {
                    debug!("Geo-tagged '{}' via {:?}", hashtag, place);
                    &mut self.geo
                }
                None => &mut self.non_geo,
            };
            *target.entry(hashtag.to_string()).or_insert(0) += 1;
        }
    }

    pub fn geo_counts(&self) -> &FrequencyMap {
        &self.geo
    }

    pub fn non_geo_counts(&self) -> &FrequencyMap {
        &self.non_geo
    }

    pub fn counts(&self) -> FrequencyCounts {
        FrequencyCounts {
            geo: self.geo.clone(),
            non_geo: self.non_geo.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.geo.clear();
        self.non_geo.clear();
    }

    /// Returns both maps and leaves the classifier empty.
    pub fn take_counts(&mut self) -> FrequencyCounts {
        FrequencyCounts {
            geo: std::mem::take(&mut self.geo),
            non_geo: std::mem::take(&mut self.non_geo),
        }
    }

    /// Returns one map and clears it; the other is untouched.
    pub fn take(&mut self, kind: TagKind) -> FrequencyMap {
        match kind {
            TagKind::Geo => std::mem::take(&mut self.geo),
            TagKind::NonGeo => std::mem::take(&mut self.non_geo),
        }
    }
}

/// Classifier shared between request handlers.
pub struct SharedClassifier {
    inner: Mutex<HashtagClassifier>,
}

impl SharedClassifier {
    pub fn new(classifier: HashtagClassifier) -> Self {
        Self {
            inner: Mutex::new(classifier),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashtagClassifier> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn classify<S: AsRef<str>>(&self, hashtags: &[S]) {
        self.lock().classify(hashtags);
    }

    pub fn harvest<S: AsRef<str>>(&self, texts: &[S], stop_words: &IndexSet<String>) -> usize {
        harvest_hashtags(&mut self.lock(), texts, stop_words)
    }

    pub fn snapshot(&self) -> FrequencyCounts {
        self.lock().counts()
    }

    /// Reads one map and clears it under a single lock.
    pub fn read_and_reset(&self, kind: TagKind) -> FrequencyMap {
        self.lock().take(kind)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }
}

/// Words starting with `#`, first occurrence order, no repeats.
pub fn extract_hashtags<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for word in words {
        let word = word.as_ref();
        if word.starts_with('#') && !result.iter().any(|w| w == word) {
            result.push(word.to_string());
        }
    }
    result
}

/// Cuts everything from the first link onward, strips punctuation other than
/// `#` and splits on whitespace.
pub fn tokenize_for_hashtags(line: &str) -> Vec<String> {
    let without_links = get_link_tail_regex().replace(line, "");
    without_links
        .chars()
        .filter(|c| !HASHTAG_NOISE.contains(c))
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Feeds the hashtags of each distinct text through the filter and the
/// classifier. Returns how many distinct texts were processed.
pub fn harvest_hashtags<S: AsRef<str>>(
    classifier: &mut HashtagClassifier,
    texts: &[S],
    stop_words: &IndexSet<String>,
) -> usize {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    for text in texts {
        let tokens = tokenize_for_hashtags(text.as_ref());
        if !seen.insert(tokens.clone()) {
            continue;
        }
        let hashtags = extract_hashtags(&tokens);
        let filtered = filter_hashtags(&hashtags, stop_words);
        classifier.classify(&filtered);
    }
    seen.len()
}
