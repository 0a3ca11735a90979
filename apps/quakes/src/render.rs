use std::io::{self, Write};

use shared::domain::Rgb;

use crate::controller::screen::{FeedScreen, ListItem, LoadState};

pub const LOADING_MESSAGE: &str = "Loading earthquakes...";

pub fn render_screen(out: &mut impl Write, screen: &FeedScreen, color: bool) -> io::Result<()> {
    match screen.state() {
        LoadState::Idle => Ok(()),
        LoadState::Loading => writeln!(out, "{LOADING_MESSAGE}"),
        LoadState::Loaded => {
            for (index, item) in screen.items().iter().enumerate() {
                render_item(out, index + 1, item, color)?;
            }
            Ok(())
        }
        LoadState::Empty | LoadState::NoConnection | LoadState::Failed(_) => {
            writeln!(out, "{}", screen.empty_message().unwrap_or_default())
        }
    }
}

fn render_item(out: &mut impl Write, number: usize, item: &ListItem, color: bool) -> io::Result<()> {
    writeln!(
        out,
        "{number:>3}. {badge} {offset}  {location}",
        badge = badge(&item.magnitude_text, item.bucket.color(), color),
        offset = item.offset,
        location = item.location,
    )?;
    writeln!(out, "       {}  {}", item.date, item.time)
}

fn badge(text: &str, rgb: Rgb, color: bool) -> String {
    if color {
        let Rgb(r, g, b) = rgb;
        format!("\x1b[1;97;48;2;{r};{g};{b}m {text} \x1b[0m")
    } else {
        format!("[{text}]")
    }
}
