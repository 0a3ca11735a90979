use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("'{url}' is not a valid URL: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to launch the URL viewer: {0}")]
    Launch(#[from] std::io::Error),
}

/// Hands a detail page URL to something that can show it.
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// The host's default URI viewer, usually a web browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        let parsed = Url::parse(url).map_err(|source| OpenError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        launch(viewer_command(parsed.as_str()))?;
        info!(%url, "opened detail page");
        Ok(())
    }
}

/// Starts the viewer without waiting on it; only a failed launch is an error.
fn launch(mut command: Command) -> Result<(), OpenError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

// Not `cmd /C start`: cmd would treat `&` in the query as a command separator.
#[cfg(target_os = "windows")]
fn viewer_command(url: &str) -> Command {
    let mut command = Command::new("rundll32");
    command.args(["url.dll,FileProtocolHandler", url]);
    command
}

#[cfg(target_os = "macos")]
fn viewer_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn viewer_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
