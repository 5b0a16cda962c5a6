use crate::classifier::{FrequencyCounts, HashtagClassifier};
use crate::config::PipelineConfig;
use crate::corpus::TweetRecord;
use crate::error::DataError;
use crate::gazetteer::Gazetteer;
use crate::lexicon::Lexicon;
use crate::matcher::{PlaceMatcher, SubstringMatcher};
use crate::normalization::filter_hashtags;
use crate::ranking::{TermAnalyzer, TermCount};
use indexmap::IndexSet;
use std::sync::Arc;
use tracing::info;

/// Reference data plus everything derived from it once at startup.
pub struct GeoCloudEngine {
    gazetteer: Gazetteer,
    lexicon: Lexicon,
    matcher: Arc<dyn PlaceMatcher>,
    hashtag_stop_words: IndexSet<String>,
    analyzer: TermAnalyzer,
}

impl GeoCloudEngine {
    pub fn new(
        gazetteer: Gazetteer,
        lexicon: Lexicon,
        config: PipelineConfig,
    ) -> Result<Self, DataError> {
        let matcher = SubstringMatcher::from_gazetteer(&gazetteer);
        info!(
            "Matcher ready: {} pure keys, {} categorized keys",
            matcher.pure_len(),
            matcher.categorized_len()
        );
        Self::with_matcher(gazetteer, lexicon, config, Arc::new(matcher))
    }

    pub fn with_matcher(
        gazetteer: Gazetteer,
        lexicon: Lexicon,
        config: PipelineConfig,
        matcher: Arc<dyn PlaceMatcher>,
    ) -> Result<Self, DataError> {
        let analyzer = TermAnalyzer::new(&gazetteer, &lexicon, config)?;
        let hashtag_stop_words = lexicon.stop_words(true);
        Ok(Self {
            gazetteer,
            lexicon,
            matcher,
            hashtag_stop_words,
            analyzer,
        })
    }

    pub fn bundled(config: PipelineConfig) -> Result<Self, DataError> {
        Self::new(Gazetteer::bundled()?, Lexicon::bundled()?, config)
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn analyzer(&self) -> &TermAnalyzer {
        &self.analyzer
    }

    pub fn hashtag_stop_words(&self) -> &IndexSet<String> {
        &self.hashtag_stop_words
    }

    /// Fresh classifier sharing this engine's matcher.
    pub fn new_classifier(&self) -> HashtagClassifier {
        HashtagClassifier::new(self.matcher.clone())
    }

    pub fn filter_hashtags<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        filter_hashtags(tokens, &self.hashtag_stop_words)
    }

    /// Classifies in a one-off session and returns both maps.
    pub fn classify<S: AsRef<str>>(&self, hashtags: &[S]) -> FrequencyCounts {
        let mut classifier = self.new_classifier();
        classifier.classify(hashtags);
        classifier.take_counts()
    }

    pub fn rank_terms(&self, corpus: &[TweetRecord]) -> Vec<TermCount> {
        self.analyzer.rank_terms(corpus)
    }
}
