//! Controller layer: backend events, the list screen state container, and command dispatch.

pub mod events;
pub mod orchestration;
pub mod screen;
