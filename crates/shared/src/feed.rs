//! GeoJSON feed document and its extraction into [`EventRecord`]s.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;
use tracing::error;

use crate::{domain::EventRecord, error::FeedError};

pub const PLACE_SPLITTER: &str = "of";
pub const DEFAULT_OFFSET: &str = "Near the";
pub const DATE_FORMAT: &str = "%b %d, %Y";
pub const TIME_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureProperties {
    pub place: String,
    pub mag: f64,
    /// Epoch milliseconds.
    pub time: i64,
    pub url: String,
}

/// Outcome of reading one response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFeed {
    /// Nothing came back (empty body, or the request never happened).
    NoInput,
    /// The body was not a feed document; no partial list is kept.
    Malformed(String),
    Events(Vec<EventRecord>),
}

impl ParsedFeed {
    /// Collapses to what the list screen consumes: no input is "no data",
    /// a malformed document is an empty list.
    pub fn into_events(self) -> Option<Vec<EventRecord>> {
        match self {
            ParsedFeed::NoInput => None,
            ParsedFeed::Malformed(_) => Some(Vec::new()),
            ParsedFeed::Events(events) => Some(events),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ParsedFeed::Events(events) => events.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dates and times come out on the host's local clock.
pub fn parse_feed(text: &str) -> ParsedFeed {
    parse_feed_in(text, &Local)
}

pub fn parse_feed_in<Tz>(text: &str, tz: &Tz) -> ParsedFeed
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if text.trim().is_empty() {
        return ParsedFeed::NoInput;
    }

    match extract_events_in(text, tz) {
        Ok(events) => ParsedFeed::Events(events),
        Err(err) => {
            error!(error = %err, "problem parsing the earthquake feed");
            ParsedFeed::Malformed(err.to_string())
        }
    }
}

pub fn extract_events(text: &str) -> Result<Vec<EventRecord>, FeedError> {
    extract_events_in(text, &Local)
}

pub fn extract_events_in<Tz>(text: &str, tz: &Tz) -> Result<Vec<EventRecord>, FeedError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let collection: FeatureCollection = serde_json::from_str(text)?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| event_from_properties(index, feature.properties, tz))
        .collect()
}

fn event_from_properties<Tz>(
    index: usize,
    properties: FeatureProperties,
    tz: &Tz,
) -> Result<EventRecord, FeedError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (offset, location) = split_place(&properties.place);
    let (date, time) =
        format_event_time(properties.time, tz).ok_or(FeedError::Timestamp {
            index,
            time_ms: properties.time,
        })?;

    Ok(EventRecord {
        location,
        offset,
        magnitude: properties.mag,
        date,
        time,
        url: properties.url,
    })
}

/// Date and time display strings for epoch milliseconds on the wall clock
/// of `tz`. `None` when the instant is out of range.
pub fn format_event_time<Tz>(time_ms: i64, tz: &Tz) -> Option<(String, String)>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let at = DateTime::<Utc>::from_timestamp_millis(time_ms)?.with_timezone(tz);
    Some((
        at.format(DATE_FORMAT).to_string(),
        at.format(TIME_FORMAT).to_string(),
    ))
}

/// Splits `"5km NW of Example City"` into `("5km NW of", "Example City")`.
///
/// Only a place with exactly one `of` yields a real offset; anything else
/// gets [`DEFAULT_OFFSET`] with the last segment as the location.
pub fn split_place(place: &str) -> (String, String) {
    let mut segments: Vec<&str> = place.split(PLACE_SPLITTER).collect();
    while segments.last().is_some_and(|segment| segment.is_empty()) {
        segments.pop();
    }

    let location = segments.last().copied().unwrap_or_default().trim().to_string();
    let offset = match segments.as_slice() {
        [head, _] => format!("{}{PLACE_SPLITTER}", head.trim_start()),
        _ => DEFAULT_OFFSET.to_string(),
    };

    (offset, location)
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
