use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use geocloud_rust::api::{self, parse_tweets_request, AppState};
use geocloud_rust::config::PipelineConfig;
use geocloud_rust::corpus::TweetRecord;
use geocloud_rust::engine::GeoCloudEngine;
use geocloud_rust::store::{InMemoryStore, TweetStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const TWEETS: &str = r##"[
  {"id": "1", "username": "fwc", "text": "#RedTide update #Sarasota https://t.co/abc #ignored", "time": "2019-08-01T12:00:00", "location": "Sarasota", "label": "gov"},
  {"id": "2", "username": "wusf", "text": "RT @fwc: #RedTide update #Sarasota", "time": "2019-08-02T09:30:00", "location": "Sarasota", "label": "media", "retweet": true},
  {"id": "3", "username": "visitpinellas", "text": "Beaches are open! #StPete", "time": "2019-09-15T18:00:00", "location": "Pinellas", "label": "tourbiz"},
  {"id": "4", "username": "usf", "text": "New study on #kbrevis", "time": "2020-01-10T08:00:00", "location": "Hillsborough", "label": "acad"}
]"##;

fn app(corpus: Vec<TweetRecord>) -> Router {
    let engine = Arc::new(GeoCloudEngine::bundled(PipelineConfig::default()).unwrap());
    let store: Arc<dyn TweetStore> = Arc::new(InMemoryStore::from_json(TWEETS).unwrap());
    api::routes(AppState::new(engine, store, corpus))
}

async fn post(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn cloud_request(kind: &str) -> String {
    json!({
        "type_of_cloud": kind,
        "timeFrame": "2019-01-01 2021-01-01",
        "county": [],
        "accountType": [],
        "retweets": false
    })
    .to_string()
}

#[tokio::test]
async fn test_root_describes_service() {
    let app = app(Vec::new());
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["name"], "GeoCloud Rust Engine");
}

#[tokio::test]
async fn test_geo_cloud_counts() {
    let app = app(Vec::new());

    let (status, body) = post(&app, "/word_cloud", &cloud_request("Geo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "value1": [
            { "text": "sarasota", "value": 1 },
            { "text": "stpete", "value": 1 }
        ]})
    );

    // A repeat request does not double the counts.
    let (_, again) = post(&app, "/word_cloud", &cloud_request("Geo")).await;
    assert_eq!(again, body);
}

#[tokio::test]
async fn test_clouds_do_not_leak_between_requests() {
    let app = app(Vec::new());
    let for_county = |kind: &str, county: &str| {
        json!({ "type_of_cloud": kind, "county": [county], "retweets": false }).to_string()
    };

    let (_, body) = post(&app, "/word_cloud", &for_county("Geo", "Hillsborough")).await;
    assert_eq!(body, json!({ "value1": [] }));

    let (_, body) = post(&app, "/word_cloud", &for_county("Non-Geo", "Sarasota")).await;
    assert_eq!(body, json!({ "value1": [] }));

    let (_, body) = post(&app, "/word_cloud", &for_county("Non-Geo", "Hillsborough")).await;
    assert_eq!(body, json!({ "value1": [{ "text": "kbrevis", "value": 1 }] }));

    let (_, body) = post(&app, "/word_cloud", &for_county("Non-Geo", "Hillsborough")).await;
    assert_eq!(body, json!({ "value1": [{ "text": "kbrevis", "value": 1 }] }));
}

#[tokio::test]
async fn test_cloud_filters_by_county() {
    let app = app(Vec::new());
    let request = json!({
        "type_of_cloud": "Geo",
        "county": ["Pinellas"],
        "accountType": ["Tourism"],
        "retweets": true
    })
    .to_string();
    let (_, body) = post(&app, "/word_cloud", &request).await;
    assert_eq!(body, json!({ "value1": [{ "text": "stpete", "value": 1 }] }));
}

#[tokio::test]
async fn test_single_cloud_placeholder_and_unknown_type() {
    let corpus = vec![TweetRecord::new("1", "fwc", "Fish kill", "2019-08-01").with_label("gov")];
    let app = app(corpus);

    let (_, body) = post(&app, "/word_cloud", &cloud_request("Single")).await;
    assert_eq!(body, json!({ "value1": [{ "text": "Empty", "value": 10 }] }));

    let (status, body) = post(&app, "/word_cloud", &cloud_request("Bubble")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "value1": [] }));
}

#[tokio::test]
async fn test_get_tweets_filters() {
    let app = app(Vec::new());
    let request = json!([
        { "timeFrame": "2019-08-01 2019-09-01", "county": ["Sarasota"], "accountType": [] },
        { "retweets": true }
    ])
    .to_string();
    let (status, body) = post(&app, "/get_tweets", &request).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_malformed_get_tweets_returns_unfiltered() {
    let app = app(Vec::new());
    let (status, body) = post(&app, "/get_tweets", "{{{").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[test]
fn test_parse_tweets_request_defaults() {
    let query = parse_tweets_request(&json!([{ "timeFrame": "2019-08-01" }]));
    assert_eq!(query.time_range, None);
    assert!(query.exclude_retweets);
    assert_eq!(query.labels, None);
    assert_eq!(query.counties, None);

    let query = parse_tweets_request(&json!([
        { "accountType": ["Academic"], "county": ["Lee"] },
        { "retweets": true }
    ]));
    assert_eq!(query.labels, Some(vec!["acad".to_string()]));
    assert_eq!(query.counties, Some(vec!["Lee".to_string()]));
    assert!(!query.exclude_retweets);
}

#[tokio::test]
async fn test_get_counts() {
    let app = app(Vec::new());
    let request = json!({ "date": "2019-01-01 2021-01-01", "account_types": [], "retweets": true });
    let (_, body) = post(&app, "/get_counts", &request.to_string()).await;
    assert_eq!(
        body,
        json!({ "counts": { "Sarasota": 2, "Pinellas": 1, "Hillsborough": 1 } })
    );

    let request = json!({ "date": "", "account_types": ["Government"], "retweets": false });
    let (_, body) = post(&app, "/get_counts", &request.to_string()).await;
    assert_eq!(body, json!({ "counts": { "Sarasota": 1 } }));
}

#[tokio::test]
async fn test_hashtag_endpoints() {
    let app = app(Vec::new());

    let tokens = json!({ "tokens": ["#RedTide", "#Sarasota", "#WUSFnews", "#Dolphins"] });
    let (_, body) = post(&app, "/hashtags/filter", &tokens.to_string()).await;
    assert_eq!(body, json!({ "tokens": ["sarasota", "dolphins"] }));

    let tokens = json!({ "tokens": ["sarasota", "dolphins", "sarasota"] });
    let (_, body) = post(&app, "/hashtags/classify", &tokens.to_string()).await;
    assert_eq!(
        body,
        json!({ "geo": { "sarasota": 2 }, "non_geo": { "dolphins": 1 } })
    );

    // Each classify call is its own session.
    let (_, body) = post(&app, "/hashtags/classify", &tokens.to_string()).await;
    assert_eq!(body["geo"]["sarasota"], 2);
}

#[tokio::test]
async fn test_malformed_hashtag_requests_degrade_to_empty() {
    let app = app(Vec::new());

    let (status, body) = post(&app, "/hashtags/filter", "{not json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "tokens": [] }));

    let request = Request::builder()
        .method("POST")
        .uri("/hashtags/classify")
        .body(Body::from(r#"{"tokens": ["tampa"]}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["geo"]["tampa"], 1);

    let (status, body) = post(&app, "/hashtags/classify", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "geo": {}, "non_geo": {} }));
}
