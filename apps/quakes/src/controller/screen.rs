//! State container backing the earthquake list.

use serde::Serialize;
use shared::domain::{EventRecord, MagnitudeBucket};
use thiserror::Error;

use crate::{
    browser::{OpenError, UrlOpener},
    controller::events::UiEvent,
};

pub const NO_EARTHQUAKES_MESSAGE: &str = "No earthquakes found.";
pub const NO_CONNECTION_MESSAGE: &str = "No internet connection.";

/// One row as displayed: the record plus its derived badge text and color bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub location: String,
    pub offset: String,
    pub magnitude: f64,
    pub magnitude_text: String,
    pub bucket: MagnitudeBucket,
    pub date: String,
    pub time: String,
    pub url: String,
}

impl From<EventRecord> for ListItem {
    fn from(record: EventRecord) -> Self {
        Self {
            magnitude_text: record.magnitude_text(),
            bucket: record.bucket(),
            location: record.location,
            offset: record.offset,
            magnitude: record.magnitude,
            date: record.date,
            time: record.time,
            url: record.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Empty,
    NoConnection,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ActivateError {
    #[error("no item {index} in a list of {len}")]
    NoSuchItem { index: usize, len: usize },
    #[error(transparent)]
    Open(#[from] OpenError),
}

#[derive(Debug, Default)]
pub struct FeedScreen {
    state: LoadState,
    items: Vec<ListItem>,
}

impl FeedScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Text shown in place of the list when it has nothing to show.
    pub fn empty_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Empty => Some(NO_EARTHQUAKES_MESSAGE),
            LoadState::NoConnection => Some(NO_CONNECTION_MESSAGE),
            LoadState::Failed(message) => Some(message),
            LoadState::Idle | LoadState::Loading | LoadState::Loaded => None,
        }
    }

    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::NoConnection => self.show_no_connection(),
            UiEvent::LoadFinished(records) => self.finish_load(records),
            UiEvent::BackendFailed(message) => self.fail(message),
        }
    }

    /// Replaces the whole list with the outcome of one load.
    pub fn finish_load(&mut self, records: Option<Vec<EventRecord>>) {
        self.items.clear();
        if let Some(records) = records {
            self.items.extend(records.into_iter().map(ListItem::from));
        }
        self.state = if self.items.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Loaded
        };
    }

    pub fn show_no_connection(&mut self) {
        self.items.clear();
        self.state = LoadState::NoConnection;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.items.clear();
        self.state = LoadState::Failed(message.into());
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.state = LoadState::Idle;
    }

    /// Opens the detail page of the item at `index` (zero-based).
    pub fn activate(
        &self,
        index: usize,
        opener: &dyn UrlOpener,
    ) -> Result<&ListItem, ActivateError> {
        let item = self.items.get(index).ok_or(ActivateError::NoSuchItem {
            index,
            len: self.items.len(),
        })?;
        opener.open(&item.url)?;
        Ok(item)
    }
}

#[cfg(test)]
#[path = "../tests/screen_tests.rs"]
mod tests;
