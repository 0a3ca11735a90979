//! Command orchestration from screen actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use feed_client::FeedQuery;

use crate::{backend_bridge::commands::BackendCommand, controller::screen::FeedScreen};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = match &cmd {
        BackendCommand::Load { .. } => "load",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "Load queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Load worker disconnected (possible startup failure); restart the app"
                .to_string();
            false
        }
    }
}

/// Puts the screen into its loading state and queues exactly one load.
pub fn request_load(cmd_tx: &Sender<BackendCommand>, screen: &mut FeedScreen, query: FeedQuery) {
    let mut status = String::new();
    screen.begin_load();
    if !dispatch_backend_command(cmd_tx, BackendCommand::Load { query }, &mut status) {
        tracing::error!(%status, "failed to queue load");
        screen.fail(status);
    }
}
