use super::*;
use chrono::FixedOffset;

const FEB_24_2020_1507_UTC_MS: i64 = 1_582_556_820_000;

fn feature_json(place: &str, mag: f64, time: i64, url: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": {
            "mag": mag,
            "place": place,
            "time": time,
            "updated": time,
            "url": url,
            "felt": null,
            "tsunami": 0
        },
        "geometry": { "type": "Point", "coordinates": [-118.1, 34.2, 7.5] },
        "id": "us1000abcd"
    })
}

fn collection_json(features: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "type": "FeatureCollection",
        "metadata": { "status": 200, "count": features.len() },
        "features": features
    })
    .to_string()
}

#[test]
fn parses_every_feature_in_feed_order() {
    let body = collection_json(vec![
        feature_json("5km NW of Alpha", 6.1, FEB_24_2020_1507_UTC_MS, "https://a"),
        feature_json("10km S of Beta", 7.4, FEB_24_2020_1507_UTC_MS, "https://b"),
        feature_json("Gamma Ridge", 6.6, FEB_24_2020_1507_UTC_MS, "https://c"),
    ]);

    let ParsedFeed::Events(events) = parse_feed(&body) else {
        panic!("expected events");
    };

    let locations: Vec<&str> = events.iter().map(|e| e.location.as_str()).collect();
    assert_eq!(locations, vec!["Alpha", "Beta", "Gamma Ridge"]);
    let urls: Vec<&str> = events.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a", "https://b", "https://c"]);
}

#[test]
fn extracts_all_fields_of_a_single_feature() {
    let body = collection_json(vec![feature_json(
        "5km NW of Example City",
        4.3,
        FEB_24_2020_1507_UTC_MS,
        "https://x",
    )]);

    let events = parse_feed_in(&body, &Utc).into_events().expect("events");
    assert_eq!(
        events,
        vec![EventRecord {
            location: "Example City".to_string(),
            offset: "5km NW of".to_string(),
            magnitude: 4.3,
            date: "Feb 24, 2020".to_string(),
            time: "03:07 PM".to_string(),
            url: "https://x".to_string(),
        }]
    );
}

#[test]
fn empty_feature_list_is_an_empty_event_list() {
    let parsed = parse_feed(&collection_json(Vec::new()));
    assert_eq!(parsed, ParsedFeed::Events(Vec::new()));
    assert_eq!(parsed.into_events(), Some(Vec::new()));
}

#[test]
fn empty_input_is_no_input() {
    assert_eq!(parse_feed(""), ParsedFeed::NoInput);
    assert_eq!(parse_feed("  \n"), ParsedFeed::NoInput);
    assert_eq!(parse_feed("").into_events(), None);
}

#[test]
fn non_json_input_is_malformed_and_collapses_to_empty_list() {
    let parsed = parse_feed("<html>503 Service Unavailable</html>");
    assert!(matches!(parsed, ParsedFeed::Malformed(_)));
    assert_eq!(parsed.into_events(), Some(Vec::new()));
}

#[test]
fn one_bad_feature_aborts_the_whole_batch() {
    let mut broken = feature_json("3km E of Delta", 5.0, FEB_24_2020_1507_UTC_MS, "https://d");
    broken["properties"]["mag"] = serde_json::Value::Null;
    let body = collection_json(vec![
        feature_json("5km NW of Alpha", 6.1, FEB_24_2020_1507_UTC_MS, "https://a"),
        broken,
    ]);

    assert!(matches!(parse_feed(&body), ParsedFeed::Malformed(_)));
}

#[test]
fn missing_features_array_is_malformed() {
    let parsed = parse_feed(r#"{"type":"FeatureCollection","metadata":{}}"#);
    let ParsedFeed::Malformed(reason) = parsed else {
        panic!("expected malformed");
    };
    assert!(reason.contains("features"), "reason was: {reason}");
}

#[test]
fn out_of_range_timestamp_is_malformed() {
    let body = collection_json(vec![feature_json("Far away", 6.0, i64::MAX, "https://z")]);
    assert!(matches!(
        extract_events(&body),
        Err(FeedError::Timestamp { index: 0, .. })
    ));
}

#[test]
fn place_with_single_of_splits_into_offset_and_location() {
    assert_eq!(
        split_place("5km NW of Example City"),
        ("5km NW of".to_string(), "Example City".to_string())
    );
    assert_eq!(
        split_place("of Nowhere"),
        ("of".to_string(), "Nowhere".to_string())
    );
}

#[test]
fn place_without_of_uses_default_offset() {
    assert_eq!(
        split_place("Southern Mid-Atlantic Ridge"),
        ("Near the".to_string(), "Southern Mid-Atlantic Ridge".to_string())
    );
    assert_eq!(split_place(""), ("Near the".to_string(), String::new()));
}

#[test]
fn place_with_several_of_uses_default_offset_and_last_segment() {
    assert_eq!(
        split_place("12km S of Bay of Islands"),
        ("Near the".to_string(), "Islands".to_string())
    );
}

#[test]
fn trailing_of_is_dropped_before_counting_segments() {
    assert_eq!(
        split_place("Gulf of"),
        ("Near the".to_string(), "Gulf".to_string())
    );
}

#[test]
fn dates_and_times_use_fixed_display_patterns() {
    let body = collection_json(vec![feature_json(
        "Somewhere",
        6.0,
        1_000_000_000_000,
        "https://s",
    )]);
    let events = extract_events_in(&body, &Utc).expect("events");
    assert_eq!(events[0].date, "Sep 09, 2001");
    assert_eq!(events[0].time, "01:46 AM");
}

#[test]
fn dates_and_times_follow_the_wall_clock_of_the_zone() {
    let pacific = FixedOffset::west_opt(8 * 3600).expect("offset");
    assert_eq!(
        format_event_time(FEB_24_2020_1507_UTC_MS, &pacific),
        Some(("Feb 24, 2020".to_string(), "07:07 AM".to_string()))
    );

    let tokyo = FixedOffset::east_opt(9 * 3600).expect("offset");
    let body = collection_json(vec![feature_json(
        "5km NW of Example City",
        4.3,
        FEB_24_2020_1507_UTC_MS,
        "https://x",
    )]);
    let events = extract_events_in(&body, &tokyo).expect("events");
    assert_eq!(events[0].date, "Feb 25, 2020");
    assert_eq!(events[0].time, "12:07 AM");
}

#[test]
fn default_parse_uses_the_host_local_clock() {
    let body = collection_json(vec![feature_json(
        "Somewhere",
        6.0,
        FEB_24_2020_1507_UTC_MS,
        "https://s",
    )]);
    let events = parse_feed(&body).into_events().expect("events");
    let (date, time) = format_event_time(FEB_24_2020_1507_UTC_MS, &Local).expect("in range");
    assert_eq!(events[0].date, date);
    assert_eq!(events[0].time, time);
}
