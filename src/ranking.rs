//! Term-frequency ranking for the single-term word cloud.
//!
//! `rank_terms` runs the corpus through these steps, in order:
//!
//! 1. corpus assembly (label, date window, retweets)
//! 2. display-text cleaning
//! 3. lemmatization
//! 4. the distinct-text guard
//! 5. entity masking, then lemmatization again
//! 6. whitespace tokenization and stop-word removal
//! 7. counting, with geo names and hazard tokens excluded

use crate::config::{PipelineConfig, MASK_TOKEN, PLACEHOLDER_TEXT, PLACEHOLDER_VALUE};
use crate::corpus::{assemble_corpus, TweetRecord};
use crate::error::DataError;
use crate::gazetteer::Gazetteer;
use crate::lemmatizer::Lemmatizer;
use crate::lexicon::Lexicon;
use crate::masking::TermMasker;
use crate::normalization::CleaningPipeline;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub text: String,
    pub value: u64,
}

impl TermCount {
    pub fn placeholder() -> Self {
        Self {
            text: PLACEHOLDER_TEXT.to_string(),
            value: PLACEHOLDER_VALUE,
        }
    }
}

pub struct TermAnalyzer {
    config: PipelineConfig,
    cleaning: CleaningPipeline,
    lemmatizer: Lemmatizer,
    masker: TermMasker,
    stop_words: IndexSet<String>,
    excluded_terms: HashSet<String>,
}

impl TermAnalyzer {
    pub fn new(
        gazetteer: &Gazetteer,
        lexicon: &Lexicon,
        config: PipelineConfig,
    ) -> Result<Self, DataError> {
        let geo_terms: Vec<String> = gazetteer.place_names().map(str::to_string).collect();

        let masker = TermMasker::new(&[
            geo_terms.clone(),
            lexicon.political_terms.clone(),
            lexicon.hazard_phrases.clone(),
        ])?;

        let excluded_terms = geo_terms
            .into_iter()
            .chain(lexicon.hazard_tokens.iter().cloned())
            .collect();

        Ok(Self {
            config,
            cleaning: CleaningPipeline::tweet_text(lexicon.contractions.iter().cloned())?,
            lemmatizer: Lemmatizer::new(lexicon.lemma_exceptions.clone())
                .with_protected(lexicon.english_stop_words.iter().map(|w| w.to_lowercase())),
            masker,
            stop_words: lexicon.english_stop_set(),
            excluded_terms,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Cleans one display text, lemmatizing when enabled.
    pub fn clean_text(&self, raw: &str) -> String {
        let cleaned = self.cleaning.run(raw);
        if self.config.lemmatize {
            self.lemmatizer.lemmatize_text(&cleaned)
        } else {
            cleaned
        }
    }

    /// Masks entity phrases and splits into the tokens that get counted.
    pub fn tokenize(&self, cleaned: &str) -> Vec<String> {
        let mut masked = self.masker.mask(cleaned);
        if self.config.lemmatize {
            masked = self.lemmatizer.lemmatize_text(&masked);
        }
        masked
            .split_whitespace()
            .filter(|word| !self.stop_words.contains(&word.to_lowercase()))
            .filter(|word| *word != "#na" && *word != MASK_TOKEN)
            .map(str::to_string)
            .collect()
    }

    /// Ranks terms by descending count; ties keep first-occurrence order.
    /// Undersized corpora yield the single placeholder entry.
    pub fn rank_terms(&self, corpus: &[TweetRecord]) -> Vec<TermCount> {
        let assembled = assemble_corpus(corpus, &self.config);

        let distinct_raw: HashSet<&str> = assembled.iter().map(|r| r.text.as_str()).collect();
        info!("Distinct tweets in ranking window: {}", distinct_raw.len());

        let cleaned: Vec<String> = assembled
            .iter()
            .map(|r| self.clean_text(r.display_text()))
            .collect();

        self.rank_cleaned(&cleaned)
    }

    /// Steps 4 onward, for texts that are already cleaned.
    pub fn rank_cleaned(&self, cleaned: &[String]) -> Vec<TermCount> {
        let distinct: HashSet<&String> = cleaned.iter().collect();
        if cleaned.is_empty() || distinct.len() < self.config.min_distinct_texts {
            info!(
                "Only {} distinct cleaned texts (minimum {}), returning placeholder",
                distinct.len(),
                self.config.min_distinct_texts
            );
            return vec![TermCount::placeholder()];
        }

        let mut counts: IndexMap<String, u64> = IndexMap::new();
        for text in cleaned {
            for token in self.tokenize(text) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<TermCount> = counts
            .into_iter()
            .filter(|(term, _)| !self.excluded_terms.contains(term))
            .map(|(text, value)| TermCount { text, value })
            .collect();
        // Stable sort keeps first occurrence order among equal counts.
        ranked.sort_by(|a, b| b.value.cmp(&a.value));

        debug!("Top terms: {:?}", ranked.iter().take(10).collect::<Vec<_>>());
        ranked
    }
}
