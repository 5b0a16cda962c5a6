use chrono::NaiveDate;
use geocloud_rust::store::{account_type_code, count_by_county, InMemoryStore, TweetQuery, TweetStore};

const TWEETS: &str = r##"
{"id": "1", "username": "fwc", "text": "#RedTide update #Sarasota", "time": "2019-08-01T12:00:00", "location": "Sarasota", "label": "gov", "retweet": false}
{"id": "2", "username": "wusf", "text": "RT @fwc: #RedTide update", "time": "2019-08-02T09:30:00", "location": "Sarasota", "label": "media", "retweet": true}
{"id": "3", "username": "visitpinellas", "text": "Beaches are open #StPete", "time": "2019-09-15T18:00:00", "location": "Pinellas", "label": "tourbiz", "retweet": false}
{"id": "4", "username": "usf", "text": "New study on #kbrevis", "time": "2020-01-10T08:00:00", "location": "Hillsborough", "label": "acad", "retweet": false}
{"id": "5", "username": "anon", "text": "no place here", "time": "2019-08-05T00:00:00"}
"##;

fn store() -> InMemoryStore {
    InMemoryStore::from_json(TWEETS).unwrap()
}

fn ids(store: &InMemoryStore, query: &TweetQuery) -> Vec<String> {
    store.find(query).into_iter().map(|t| t.id).collect()
}

#[test]
fn test_json_lines_and_array() {
    assert_eq!(store().len(), 5);

    let array = r#"[{"id": "a", "text": "x"}, {"id": "b"}]"#;
    let store = InMemoryStore::from_json(array).unwrap();
    assert_eq!(store.len(), 2);
    assert!(!store.is_empty());

    assert!(InMemoryStore::from_json("{not json").is_err());
    assert!(InMemoryStore::from_json("").unwrap().is_empty());
}

#[test]
fn test_empty_query_returns_everything() {
    let store = store();
    assert_eq!(ids(&store, &TweetQuery::new()), vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn test_time_frame_is_half_open() {
    let store = store();
    let query = TweetQuery::new().time_frame(&["2019-08-01", "2019-08-02"]);
    assert_eq!(
        query.time_range,
        Some((
            NaiveDate::from_ymd_opt(2019, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2019, 8, 2).unwrap()
        ))
    );
    assert_eq!(ids(&store, &query), vec!["1"]);

    let wider = TweetQuery::new().time_frame(&["2019-08-01", "2019-10-01"]);
    assert_eq!(ids(&store, &wider), vec!["1", "2", "3", "5"]);
}

#[test]
fn test_malformed_time_frame_drops_filter() {
    assert_eq!(TweetQuery::new().time_frame(&["2019-08-01"]).time_range, None);
    assert_eq!(
        TweetQuery::new().time_frame(&["2019-08-01", "soon"]).time_range,
        None
    );
    let empty: [&str; 0] = [];
    assert_eq!(TweetQuery::new().time_frame(&empty).time_range, None);
}

#[test]
fn test_account_types_map_to_codes() {
    assert_eq!(account_type_code("Government"), Some("gov"));
    assert_eq!(account_type_code("academic"), Some("acad"));
    assert_eq!(account_type_code("Media"), Some("media"));
    assert_eq!(account_type_code("tourism"), Some("tourbiz"));
    assert_eq!(account_type_code("other"), Some("other"));
    assert_eq!(account_type_code("bots"), None);

    let store = store();
    let query = TweetQuery::new().account_types(&["Government", "Tourism", "bots"]);
    assert_eq!(
        query.labels,
        Some(vec!["gov".to_string(), "tourbiz".to_string()])
    );
    assert_eq!(ids(&store, &query), vec!["1", "3"]);

    let unknown_only = TweetQuery::new().account_types(&["bots"]);
    assert_eq!(unknown_only.labels, None);
}

#[test]
fn test_county_and_retweet_filters() {
    let store = store();
    let sarasota = TweetQuery::new().counties(&["Sarasota"]);
    assert_eq!(ids(&store, &sarasota), vec!["1", "2"]);

    let no_retweets = sarasota.clone().include_retweets(false);
    assert_eq!(ids(&store, &no_retweets), vec!["1"]);

    let with_retweets = sarasota.include_retweets(true);
    assert!(!with_retweets.exclude_retweets);
    assert_eq!(ids(&store, &with_retweets), vec!["1", "2"]);
}

#[test]
fn test_count_by_county() {
    let store = store();
    let counts = count_by_county(&store.find(&TweetQuery::new()));
    assert_eq!(counts.get("Sarasota"), Some(&2));
    assert_eq!(counts.get("Pinellas"), Some(&1));
    assert_eq!(counts.get("Hillsborough"), Some(&1));
    assert_eq!(counts.len(), 3);

    let originals = TweetQuery::new().include_retweets(false);
    let counts = count_by_county(&store.find(&originals));
    assert_eq!(counts.get("Sarasota"), Some(&1));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.jsonl");
    std::fs::write(&path, TWEETS).unwrap();
    assert_eq!(InMemoryStore::load(&path).unwrap().len(), 5);
    assert!(InMemoryStore::load(dir.path().join("missing.jsonl")).is_err());
}
