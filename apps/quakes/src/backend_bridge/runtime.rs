//! Worker thread that runs loads off the interactive thread.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};
use feed_client::{ConnectivityProbe, FeedLoader, FeedSource};
use tracing::{debug, error, info};

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent};

pub struct BackendServices {
    pub source: Arc<dyn FeedSource>,
    pub probe: Arc<dyn ConnectivityProbe>,
}

/// Runs until every command sender is dropped or the UI side goes away.
/// Commands are handled one at a time, so at most one load is in flight.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    services: BackendServices,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to build load worker runtime: {err}");
                let _ = ui_tx.send(UiEvent::BackendFailed(format!(
                    "load worker startup failure: {err}"
                )));
                return;
            }
        };

        let loader = FeedLoader::new(services.source);
        for cmd in cmd_rx.iter() {
            let event = runtime.block_on(handle_command(&loader, services.probe.as_ref(), cmd));
            if ui_tx.send(event).is_err() {
                debug!("ui receiver dropped; stopping load worker");
                break;
            }
        }
    })
}

async fn handle_command(
    loader: &FeedLoader<Arc<dyn FeedSource>>,
    probe: &dyn ConnectivityProbe,
    cmd: BackendCommand,
) -> UiEvent {
    match cmd {
        BackendCommand::Load { query } => {
            if !probe.is_connected(&query.endpoint).await {
                info!(endpoint = %query.endpoint, "no network connection; skipping load");
                return UiEvent::NoConnection;
            }
            UiEvent::LoadFinished(loader.load(&query).await.into_events())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use crossbeam_channel::bounded;
    use feed_client::FeedQuery;

    use super::*;

    struct CannedSource {
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeedSource for CannedSource {
        async fn fetch_text(&self, _query: &FeedQuery) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body.to_string()
        }
    }

    struct FixedProbe(bool);

    #[async_trait]
    impl ConnectivityProbe for FixedProbe {
        async fn is_connected(&self, _endpoint: &str) -> bool {
            self.0
        }
    }

    const ONE_EVENT: &str = r#"{"features":[{"properties":{"place":"5km NW of Example City","mag":4.3,"time":1582556820000,"url":"https://x"}}]}"#;

    fn start(
        body: &'static str,
        connected: bool,
    ) -> (
        Sender<BackendCommand>,
        Receiver<UiEvent>,
        Arc<CannedSource>,
        JoinHandle<()>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(4);
        let source = Arc::new(CannedSource {
            body,
            calls: AtomicUsize::new(0),
        });
        let handle = launch(
            cmd_rx,
            ui_tx,
            BackendServices {
                source: source.clone(),
                probe: Arc::new(FixedProbe(connected)),
            },
        );
        (cmd_tx, ui_rx, source, handle)
    }

    #[test]
    fn load_delivers_parsed_events() {
        let (cmd_tx, ui_rx, source, handle) = start(ONE_EVENT, true);

        cmd_tx
            .send(BackendCommand::Load {
                query: FeedQuery::default(),
            })
            .expect("send");
        let event = ui_rx.recv_timeout(Duration::from_secs(5)).expect("event");

        let records = match event {
            UiEvent::LoadFinished(Some(records)) => records,
            other => panic!("expected records, got {other:?}"),
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "Example City");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        drop(cmd_tx);
        handle.join().expect("worker exits");
    }

    #[test]
    fn offline_probe_skips_the_fetch() {
        let (cmd_tx, ui_rx, source, handle) = start(ONE_EVENT, false);

        cmd_tx
            .send(BackendCommand::Load {
                query: FeedQuery::default(),
            })
            .expect("send");

        assert_eq!(
            ui_rx.recv_timeout(Duration::from_secs(5)).expect("event"),
            UiEvent::NoConnection
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        drop(cmd_tx);
        handle.join().expect("worker exits");
    }

    #[test]
    fn empty_body_is_delivered_as_no_data() {
        let (cmd_tx, ui_rx, _source, handle) = start("", true);

        cmd_tx
            .send(BackendCommand::Load {
                query: FeedQuery::default(),
            })
            .expect("send");

        assert_eq!(
            ui_rx.recv_timeout(Duration::from_secs(5)).expect("event"),
            UiEvent::LoadFinished(None)
        );

        drop(cmd_tx);
        handle.join().expect("worker exits");
    }
}
