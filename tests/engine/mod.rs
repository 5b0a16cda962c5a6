use geocloud_rust::config::PipelineConfig;
use geocloud_rust::engine::GeoCloudEngine;
use geocloud_rust::gazetteer::Gazetteer;
use geocloud_rust::lexicon::Lexicon;
use geocloud_rust::matcher::{PlaceMatch, PlaceMatcher};
use std::sync::Arc;

struct ExactMatcher(Vec<String>);

impl PlaceMatcher for ExactMatcher {
    fn find(&self, token: &str) -> Option<PlaceMatch> {
        self.0
            .iter()
            .find(|entry| entry.as_str() == token)
            .map(|entry| PlaceMatch::Pure(entry.clone()))
    }
}

#[test]
fn test_bundled_engine_classifies() {
    let engine = GeoCloudEngine::bundled(PipelineConfig::default()).unwrap();
    let counts = engine.classify(&["tampa", "fishkill", "tampa"]);

    assert_eq!(counts.geo.get("tampa"), Some(&2));
    assert_eq!(counts.non_geo.get("fishkill"), Some(&1));
    assert_eq!(counts.geo.len(), 1);
}

#[test]
fn test_filter_uses_primary_stop_words() {
    let engine = GeoCloudEngine::bundled(PipelineConfig::default()).unwrap();
    assert!(engine.hashtag_stop_words().contains("redtide"));
    // Domain noise only applies to the term ranking.
    assert!(!engine.hashtag_stop_words().contains("sewage"));
    assert_eq!(
        engine.filter_hashtags(&["#Sewage", "#RedTide", "#Tampa"]),
        vec!["sewage", "tampa"]
    );
}

#[test]
fn test_custom_matcher() {
    let matcher = Arc::new(ExactMatcher(vec!["tampa".to_string()]));
    let engine = GeoCloudEngine::with_matcher(
        Gazetteer::bundled().unwrap(),
        Lexicon::bundled().unwrap(),
        PipelineConfig::default(),
        matcher,
    )
    .unwrap();

    let counts = engine.classify(&["tampa", "tampabay"]);
    assert_eq!(counts.geo.get("tampa"), Some(&1));
    assert_eq!(counts.non_geo.get("tampabay"), Some(&1));
}

#[test]
fn test_classifier_sessions_share_matcher() {
    let engine = GeoCloudEngine::bundled(PipelineConfig::default()).unwrap();
    let mut first = engine.new_classifier();
    let mut second = engine.new_classifier();

    first.classify(&["sarasota"]);
    second.classify(&["dolphins"]);

    assert_eq!(first.geo_counts().get("sarasota"), Some(&1));
    assert!(first.non_geo_counts().is_empty());
    assert!(second.geo_counts().is_empty());
    assert_eq!(engine.gazetteer().names(geocloud_rust::gazetteer::Category::County).len(), 67);
    assert!(!engine.lexicon().hazard_tokens.is_empty());
    assert!(engine.analyzer().config().lemmatize);
}
