//! Curated word lists: stop words, entity terms to mask, lemma exceptions.

use crate::error::DataError;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

const BUNDLED_LEXICON: &str = include_str!("../data/lexicon.yaml");

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Lexicon {
    /// Project boilerplate: link fragments, outlets, recurring names.
    #[serde(default)]
    pub boilerplate: Vec<String>,
    /// Hazard vocabulary already covered by the collection queries.
    #[serde(default)]
    pub domain_noise: Vec<String>,
    /// Free-text location references, grouped by query area.
    #[serde(default)]
    pub geo_markers: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub political_terms: Vec<String>,
    #[serde(default)]
    pub hazard_phrases: Vec<String>,
    #[serde(default)]
    pub hazard_tokens: Vec<String>,
    #[serde(default)]
    pub contractions: Vec<String>,
    #[serde(default)]
    pub english_stop_words: Vec<String>,
    #[serde(default)]
    pub lemma_exceptions: HashMap<String, String>,
}

impl Lexicon {
    pub fn bundled() -> Result<Self, DataError> {
        Self::from_yaml(BUNDLED_LEXICON)
    }

    pub fn from_yaml(content: &str) -> Result<Self, DataError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_yaml(&content)?;
        info!("Loaded lexicon from {:?}", path);
        Ok(lexicon)
    }

    /// Geo-marker phrases across all areas, lower-cased.
    pub fn geo_marker_phrases(&self) -> Vec<String> {
        self.geo_markers
            .values()
            .flatten()
            .map(|w| w.to_lowercase())
            .collect()
    }

    /// `primary_only` selects the boilerplate set alone; otherwise the union
    /// of boilerplate, domain noise and geo markers. All entries lower-cased.
    pub fn stop_words(&self, primary_only: bool) -> IndexSet<String> {
        let boilerplate = self.boilerplate.iter().map(|w| w.to_lowercase());
        if primary_only {
            return boilerplate.collect();
        }
        boilerplate
            .chain(self.domain_noise.iter().map(|w| w.to_lowercase()))
            .chain(self.geo_marker_phrases())
            .collect()
    }

    pub fn english_stop_set(&self) -> IndexSet<String> {
        self.english_stop_words.iter().map(|w| w.to_lowercase()).collect()
    }
}
