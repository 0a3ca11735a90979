//! Bridge between the interactive thread and the background load worker.

pub mod commands;
pub mod runtime;
