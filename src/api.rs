use crate::classifier::{harvest_hashtags, FrequencyMap, TagKind};
use crate::corpus::TweetRecord;
use crate::engine::GeoCloudEngine;
use crate::ranking::TermCount;
use crate::store::{count_by_county, StoredTweet, TweetQuery, TweetStore};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GeoCloudEngine>,
    pub store: Arc<dyn TweetStore>,
    pub corpus: Arc<Vec<TweetRecord>>,
}

impl AppState {
    pub fn new(
        engine: Arc<GeoCloudEngine>,
        store: Arc<dyn TweetStore>,
        corpus: Vec<TweetRecord>,
    ) -> Self {
        Self {
            engine,
            store,
            corpus: Arc::new(corpus),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CountsRequest {
    #[serde(default)]
    date: String,
    #[serde(default)]
    account_types: Vec<String>,
    #[serde(default)]
    retweets: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct WordCloudRequest {
    #[serde(default)]
    type_of_cloud: String,
    #[serde(default, rename = "timeFrame")]
    time_frame: Option<String>,
    #[serde(default)]
    county: Vec<String>,
    #[serde(default, rename = "accountType")]
    account_type: Vec<String>,
    #[serde(default)]
    retweets: bool,
}

#[derive(Debug, Serialize)]
pub struct WordCloudResponse {
    value1: Vec<TermCount>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokensRequest {
    #[serde(default)]
    tokens: Vec<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/get_tweets", post(get_tweets))
        .route("/get_counts", post(get_counts))
        .route("/word_cloud", post(word_cloud))
        .route("/hashtags/filter", post(filter_hashtags))
        .route("/hashtags/classify", post(classify_hashtags))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "GeoCloud Rust Engine",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Geo-tag classification and term frequencies for Florida hazard discourse"
    }))
}

/// Builds a query from the dashboard's `[ {timeFrame, county, accountType},
/// {retweets} ]` body. Missing or malformed parts are logged and left
/// unfiltered.
pub fn parse_tweets_request(body: &Value) -> TweetQuery {
    let filters = body.get(0).cloned().unwrap_or(Value::Null);
    let retweets = body
        .get(1)
        .and_then(|v| v.get("retweets"))
        .and_then(Value::as_bool);
    if retweets.is_none() || filters.is_null() {
        warn!("Tweet request is missing filters or the retweets flag");
    }

    let strings = |key: &str| -> Vec<String> {
        filters
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    let time_frame: Vec<String> = filters
        .get("timeFrame")
        .and_then(Value::as_str)
        .map(|s| s.split(' ').map(str::to_string).collect())
        .unwrap_or_default();

    TweetQuery::new()
        .time_frame(&time_frame)
        .counties(&strings("county"))
        .account_types(&strings("accountType"))
        .include_retweets(retweets.unwrap_or(false))
}

fn split_date(date: &str) -> Vec<String> {
    if date.trim().is_empty() {
        return Vec::new();
    }
    date.split(' ').map(str::to_string).collect()
}

async fn get_tweets(State(state): State<AppState>, body: Bytes) -> Json<Vec<StoredTweet>> {
    let query = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => parse_tweets_request(&value),
        Err(e) => {
            warn!("Malformed tweet request, returning unfiltered results: {}", e);
            TweetQuery::new()
        }
    };
    let tweets = state.store.find(&query);
    info!("get_tweets returned {} tweets", tweets.len());
    Json(tweets)
}

async fn get_counts(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let req: CountsRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        warn!("Malformed counts request: {}", e);
        CountsRequest::default()
    });

    let query = TweetQuery::new()
        .time_frame(&split_date(&req.date))
        .account_types(&req.account_types)
        .include_retweets(req.retweets);

    let counts = count_by_county(&state.store.find(&query));
    Json(serde_json::json!({ "counts": counts }))
}

fn to_term_counts(map: FrequencyMap) -> Vec<TermCount> {
    map.into_iter()
        .map(|(text, value)| TermCount { text, value })
        .collect()
}

async fn word_cloud(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<WordCloudResponse>) {
    let req: WordCloudRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        warn!("Malformed word cloud request: {}", e);
        WordCloudRequest::default()
    });

    let kind = if req.type_of_cloud.contains("Non-Geo") {
        Some(TagKind::NonGeo)
    } else if req.type_of_cloud.contains("Geo") {
        Some(TagKind::Geo)
    } else {
        None
    };

    let value1 = match kind {
        Some(kind) => {
            let time_frame = req.time_frame.as_deref().map(split_date).unwrap_or_default();
            let query = TweetQuery::new()
                .time_frame(&time_frame)
                .counties(&req.county)
                .account_types(&req.account_type)
                .include_retweets(req.retweets);
            let texts: Vec<String> = state
                .store
                .find(&query)
                .into_iter()
                .map(|t| t.text)
                .collect();
            // One classifier session per request.
            let mut classifier = state.engine.new_classifier();
            let processed =
                harvest_hashtags(&mut classifier, &texts, state.engine.hashtag_stop_words());
            info!("Harvested hashtags from {} distinct tweets", processed);
            to_term_counts(classifier.take(kind))
        }
        None if req.type_of_cloud.contains("Single") => {
            let corpus = state.corpus.clone();
            let engine = state.engine.clone();
            tokio::task::spawn_blocking(move || engine.rank_terms(&corpus))
                .await
                .unwrap_or_else(|e| {
                    warn!("Term ranking task failed: {}", e);
                    vec![TermCount::placeholder()]
                })
        }
        None => {
            warn!("Unknown word cloud type '{}'", req.type_of_cloud);
            Vec::new()
        }
    };

    (StatusCode::OK, Json(WordCloudResponse { value1 }))
}

fn parse_tokens(body: &[u8]) -> TokensRequest {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!("Malformed hashtag request, treating as empty: {}", e);
        TokensRequest::default()
    })
}

async fn filter_hashtags(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let req = parse_tokens(&body);
    let tokens = state.engine.filter_hashtags(&req.tokens);
    Json(serde_json::json!({ "tokens": tokens }))
}

async fn classify_hashtags(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let req = parse_tokens(&body);
    let counts = state.engine.classify(&req.tokens);
    Json(serde_json::json!({
        "geo": counts.geo,
        "non_geo": counts.non_geo,
    }))
}
