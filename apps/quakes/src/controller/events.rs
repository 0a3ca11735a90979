//! Events delivered from the backend worker to the interactive thread.

use shared::domain::EventRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The probe found no network; the fetch was skipped.
    NoConnection,
    /// `None` means the load produced no data at all.
    LoadFinished(Option<Vec<EventRecord>>),
    BackendFailed(String),
}
