//! Noun lemmatizer in the style of WordNet's morphy, without the dictionary.
//!
//! Only all-lowercase alphabetic words are reduced. Anything with capitals,
//! digits or punctuation is left alone, which is what a dictionary lookup
//! would do for words it does not know.

use crate::normalization::TextStage;
use std::collections::{HashMap, HashSet};

// (suffix, replacement), tried in order
const DETACHMENTS: [(&str, &str); 6] = [
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("ies", "y"),
];

const KEEP_ENDINGS: [&str; 3] = ["ss", "us", "is"];

const MIN_LEN: usize = 4;

#[derive(Clone, Debug, Default)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
    protected: HashSet<String>,
}

impl Lemmatizer {
    pub fn new(exceptions: HashMap<String, String>) -> Self {
        Self {
            exceptions,
            protected: HashSet::new(),
        }
    }

    /// Words returned unchanged, ahead of the exception table. Stop words go
    /// here so the later stop-word filter still recognises them.
    pub fn with_protected<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn lemmatize_word(&self, word: &str) -> String {
        if self.protected.contains(word) {
            return word.to_string();
        }
        if let Some(base) = self.exceptions.get(word) {
            return base.clone();
        }
        if word.len() < MIN_LEN || !word.chars().all(|c| c.is_ascii_lowercase()) {
            return word.to_string();
        }
        for (suffix, replacement) in DETACHMENTS {
            if let Some(stem) = word.strip_suffix(suffix) {
                return format!("{}{}", stem, replacement);
            }
        }
        if KEEP_ENDINGS.iter().any(|e| word.ends_with(e)) {
            return word.to_string();
        }
        match word.strip_suffix('s') {
            Some(stem) => stem.to_string(),
            None => word.to_string(),
        }
    }

    /// Lemmatizes each whitespace-delimited word and rejoins with single spaces.
    pub fn lemmatize_text(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|w| self.lemmatize_word(w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TextStage for Lemmatizer {
    fn name(&self) -> &str {
        "lemmatize"
    }

    fn apply(&self, input: &str) -> String {
        self.lemmatize_text(input)
    }
}
