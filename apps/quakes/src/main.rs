use std::{
    io::{self, BufRead, Write},
    sync::Arc,
    thread::JoinHandle,
};

mod backend_bridge;
mod browser;
mod config;
mod controller;
mod render;

use anyhow::{bail, Context, Result};
use backend_bridge::{
    commands::BackendCommand,
    runtime::{self, BackendServices},
};
use browser::SystemBrowser;
use clap::{Parser, Subcommand};
use config::{apply_file, load_settings, save_settings, settings_path, Settings};
use controller::{events::UiEvent, orchestration::request_load, screen::FeedScreen};
use crossbeam_channel::{bounded, Receiver, Sender};
use feed_client::{AlwaysOnline, ConnectivityProbe, FeedQuery, Fetcher, TcpProbe};
use render::render_screen;
use tracing_subscriber::EnvFilter;

/// Recent earthquakes from the USGS event feed.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Only list events at or above this magnitude
    #[arg(long, global = true)]
    min_magnitude: Option<String>,
    /// Sort order: time, time-asc, magnitude, magnitude-asc
    #[arg(long, global = true)]
    order_by: Option<String>,
    /// Feed endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Load without checking connectivity first
    #[arg(long, global = true)]
    skip_probe: bool,
    /// Plain magnitude badges without ANSI colors
    #[arg(long, global = true)]
    no_color: bool,
    /// Log filter, e.g. "info" or "feed_client=debug" (defaults to RUST_LOG, then "warn")
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Show the list, then open items by number (default)
    Browse,
    /// Load once, print the list and exit
    List {
        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or persist the minimum magnitude and sort order
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum SettingsAction {
    /// Print the effective settings
    Show,
    /// Persist --min-magnitude / --order-by / --endpoint to the settings file
    Set,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command.clone().unwrap_or(Command::Browse) {
        Command::Browse => browse(&cli),
        Command::List { json } => list(&cli, json),
        Command::Settings { action } => match action {
            SettingsAction::Show => show_settings(&cli),
            SettingsAction::Set => set_settings(&cli),
        },
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) -> Result<()> {
    if let Some(v) = &cli.min_magnitude {
        settings.set_min_magnitude(v)?;
    }
    if let Some(v) = &cli.order_by {
        settings.set_order_by(v)?;
    }
    if let Some(v) = &cli.endpoint {
        settings.set_endpoint(v)?;
    }
    Ok(())
}

/// Settings as they stand right now; called at every load.
fn effective_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings();
    apply_cli_overrides(&mut settings, cli)?;
    Ok(settings)
}

fn use_color(cli: &Cli) -> bool {
    !cli.no_color && std::env::var_os("NO_COLOR").is_none()
}

fn backend_services(skip_probe: bool) -> Result<BackendServices> {
    let fetcher = Fetcher::new().context("failed to build HTTP client")?;
    let probe: Arc<dyn ConnectivityProbe> = if skip_probe {
        Arc::new(AlwaysOnline)
    } else {
        Arc::new(TcpProbe::default())
    };
    Ok(BackendServices {
        source: Arc::new(fetcher),
        probe,
    })
}

/// The list screen plus its channel pair to the load worker.
struct Session {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    worker: JoinHandle<()>,
    screen: FeedScreen,
}

impl Session {
    fn start(services: BackendServices) -> Self {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (ui_tx, ui_rx) = bounded(1);
        let worker = runtime::launch(cmd_rx, ui_tx, services);
        Self {
            cmd_tx,
            ui_rx,
            worker,
            screen: FeedScreen::new(),
        }
    }

    fn request(&mut self, query: FeedQuery) {
        request_load(&self.cmd_tx, &mut self.screen, query);
    }

    /// Blocks until the in-flight load reports back.
    fn wait(&mut self) {
        if !self.screen.is_loading() {
            return;
        }
        match self.ui_rx.recv() {
            Ok(event) => self.screen.apply(event),
            Err(_) => self.screen.fail("Load worker stopped unexpectedly"),
        }
    }

    fn shutdown(self) {
        let Session {
            cmd_tx,
            worker,
            mut screen,
            ..
        } = self;
        screen.reset();
        drop(cmd_tx);
        if worker.join().is_err() {
            tracing::error!("load worker panicked");
        }
    }
}

fn browse(cli: &Cli) -> Result<()> {
    let color = use_color(cli);
    let mut session = Session::start(backend_services(cli.skip_probe)?);
    reload(&mut session, cli, color)?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("\nItem number to open, r to reload, q to quit: ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "" => continue,
            "q" | "quit" => break,
            "r" | "reload" => reload(&mut session, cli, color)?,
            input => match input.parse::<usize>() {
                Ok(number) if number >= 1 => {
                    match session.screen.activate(number - 1, &SystemBrowser) {
                        Ok(item) => println!("Opened {}", item.url),
                        Err(err) => println!("{err}"),
                    }
                }
                _ => println!("Unknown command '{input}'"),
            },
        }
    }

    session.shutdown();
    Ok(())
}

fn reload(session: &mut Session, cli: &Cli, color: bool) -> Result<()> {
    let settings = effective_settings(cli)?;
    session.request(settings.feed_query());

    let mut out = io::stdout().lock();
    render_screen(&mut out, &session.screen, color)?;
    out.flush()?;
    session.wait();
    writeln!(out)?;
    render_screen(&mut out, &session.screen, color)?;
    out.flush()?;
    Ok(())
}

fn list(cli: &Cli, json: bool) -> Result<()> {
    let settings = effective_settings(cli)?;
    let mut session = Session::start(backend_services(cli.skip_probe)?);
    session.request(settings.feed_query());
    session.wait();

    let mut out = io::stdout().lock();
    if json {
        if let Some(message) = session.screen.empty_message() {
            tracing::warn!(%message, "no rows to print");
        }
        serde_json::to_writer_pretty(&mut out, session.screen.items())?;
        writeln!(out)?;
    } else {
        render_screen(&mut out, &session.screen, use_color(cli))?;
    }
    out.flush()?;
    drop(out);

    session.shutdown();
    Ok(())
}

fn show_settings(cli: &Cli) -> Result<()> {
    let settings = effective_settings(cli)?;
    match settings_path() {
        Some(path) => println!("settings file: {}", path.display()),
        None => println!("settings file: (no config directory)"),
    }
    println!("min_magnitude = {}", settings.min_magnitude);
    println!("order_by = {}", settings.order_by);
    println!("endpoint = {}", settings.endpoint);
    Ok(())
}

fn set_settings(cli: &Cli) -> Result<()> {
    if cli.min_magnitude.is_none() && cli.order_by.is_none() && cli.endpoint.is_none() {
        bail!("nothing to set; pass --min-magnitude, --order-by or --endpoint");
    }
    let Some(path) = settings_path() else {
        bail!("unable to resolve a config directory; set QUAKES_SETTINGS_FILE");
    };

    let mut settings = Settings::default();
    apply_file(&mut settings, &path);
    apply_cli_overrides(&mut settings, cli)?;
    save_settings(&path, &settings)?;

    println!("saved settings to {}", path.display());
    Ok(())
}
