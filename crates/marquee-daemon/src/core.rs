/// DaemonCore: single-owner event loop for the slideshow.
///
/// The core owns the `Deck` exclusively. Tickers, fetch tasks, the HTTP API
/// and the signal handler only ever send `DaemonEvent`s here. Fetches run as
/// spawned tasks and report back tagged with the poll sequence number they
/// were issued under, so the deck can drop responses that arrive out of
/// order.
///
/// After every change the core publishes a fresh `DeckView` to the
/// `StateManager` and, when the visible slide changed, broadcasts a
/// `BroadcastMessage` to the renderer.
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use marquee_proto::card::Card;
use marquee_proto::config::Config;
use marquee_proto::deck::Deck;
use marquee_proto::fetch::{probe_identity, HttpFetcher, ServerIdentity, Target};
use marquee_proto::pipeline::{
    fetch_now_streaming, fetch_recently_added, NowStreaming, RecentlyAdded, RecentlyAddedRequest,
};
use marquee_proto::protocol::Command;
use marquee_proto::scheduler::Advance;
use marquee_proto::state::StateManager;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::BroadcastMessage;

// ── DaemonEvent ───────────────────────────────────────────────────────────────

/// All inputs into the DaemonCore loop.
#[derive(Debug)]
pub enum DaemonEvent {
    /// A command from the HTTP API.
    ClientCommand(Command),
    /// Time to advance the slideshow.
    SlideTick,
    /// Time to re-poll recently added items.
    LibraryTick,
    /// Time to re-poll active sessions.
    SessionsTick,
    LibraryFetched { seq: u64, result: RecentlyAdded },
    SessionsFetched { seq: u64, result: NowStreaming },
    IdentityProbed(Result<ServerIdentity, String>),
    /// Shutdown requested (Ctrl-C).
    Shutdown,
}

// ── DaemonCore ────────────────────────────────────────────────────────────────

pub struct DaemonCore {
    config: Config,
    deck: Deck,
    fetcher: HttpFetcher,
    state_manager: Arc<StateManager>,
    event_tx: mpsc::Sender<DaemonEvent>,
    broadcast_tx: broadcast::Sender<BroadcastMessage>,
}

impl DaemonCore {
    pub fn new(
        config: Config,
        broadcast_tx: broadcast::Sender<BroadcastMessage>,
        event_tx: mpsc::Sender<DaemonEvent>,
    ) -> Self {
        let fetcher = HttpFetcher::new(Target::from(&config.server));
        Self {
            deck: Deck::from_config(&config),
            config,
            fetcher,
            state_manager: Arc::new(StateManager::new()),
            event_tx,
            broadcast_tx,
        }
    }

    /// Borrow the state manager (for use by the HTTP server).
    pub fn state_manager(&self) -> Arc<StateManager> {
        Arc::clone(&self.state_manager)
    }

    /// Run the core event loop. Returns when a `Shutdown` event is received
    /// or every sender is gone.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<DaemonEvent>) -> anyhow::Result<()> {
        info!(
            "DaemonCore: starting event loop against {}",
            self.fetcher.target().base_url()
        );

        self.spawn_ticker(self.config.slides.interval(), || DaemonEvent::SlideTick);
        self.spawn_ticker(self.config.polling.recently_added_interval(), || {
            DaemonEvent::LibraryTick
        });
        if self.config.slides.show_sessions {
            self.spawn_ticker(self.config.polling.now_streaming_interval(), || {
                DaemonEvent::SessionsTick
            });
        }

        self.probe_identity();
        self.poll_library();
        self.poll_sessions();
        self.publish().await;

        while let Some(evt) = event_rx.recv().await {
            match evt {
                DaemonEvent::Shutdown => {
                    info!("DaemonCore: shutdown requested");
                    break;
                }

                DaemonEvent::ClientCommand(cmd) => {
                    info!("DaemonCore: command {:?}", cmd);
                    self.handle_command(cmd).await;
                }

                DaemonEvent::SlideTick => self.advance().await,
                DaemonEvent::LibraryTick => self.poll_library(),
                DaemonEvent::SessionsTick => self.poll_sessions(),

                DaemonEvent::LibraryFetched { seq, result } => {
                    let was_empty = self.deck.total() == 0;
                    if self.deck.apply_library(seq, result) {
                        self.after_snapshot(was_empty).await;
                    }
                }

                DaemonEvent::SessionsFetched { seq, result } => {
                    let was_empty = self.deck.total() == 0;
                    if self.deck.apply_sessions(seq, result) {
                        self.after_snapshot(was_empty).await;
                    }
                }

                DaemonEvent::IdentityProbed(Ok(identity)) => {
                    info!(
                        "connected to server {} (version {})",
                        identity.machine_identifier.as_deref().unwrap_or("?"),
                        identity.version.as_deref().unwrap_or("?")
                    );
                }
                DaemonEvent::IdentityProbed(Err(e)) => {
                    error!("server identity probe failed: {}", e);
                }
            }
        }

        info!("DaemonCore: event loop finished");
        Ok(())
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Next => self.advance().await,
            Command::Refresh => {
                self.poll_library();
                self.poll_sessions();
            }
        }
    }

    // ── slideshow ─────────────────────────────────────────────────────────────

    async fn advance(&mut self) {
        match self.deck.tick() {
            Advance::Show(index) => debug!("slide {}/{}", index + 1, self.deck.total()),
            Advance::Empty => debug!("slide tick with empty pool"),
        }
        self.redraw();
        self.publish().await;
    }

    /// A snapshot was swapped in. Redraw right away when the pool goes from
    /// empty to non-empty or back, otherwise wait for the next slide tick.
    async fn after_snapshot(&mut self, was_empty: bool) {
        let is_empty = self.deck.total() == 0;
        if was_empty != is_empty {
            self.redraw();
        }
        self.publish().await;
    }

    fn redraw(&self) {
        let msg = match self.deck.current() {
            Some(resolved) => BroadcastMessage::Redraw {
                index: self.deck.current_index(),
                total: self.deck.total(),
                card: Box::new(Card::build(
                    resolved.slide,
                    &self.config.display,
                    &self.config.server,
                )),
            },
            None => BroadcastMessage::NoSlides,
        };
        let _ = self.broadcast_tx.send(msg);
    }

    async fn publish(&self) {
        let rev = self
            .state_manager
            .publish(self.deck.view(&self.config))
            .await;
        debug!("published deck view rev {}", rev);
    }

    // ── polling ───────────────────────────────────────────────────────────────

    fn poll_library(&mut self) {
        let seq = self.deck.begin_library_poll();
        let fetcher = self.fetcher.clone();
        let request = RecentlyAddedRequest::from(&self.config);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = fetch_recently_added(&fetcher, request, Utc::now().timestamp()).await;
            let _ = tx.send(DaemonEvent::LibraryFetched { seq, result }).await;
        });
    }

    fn poll_sessions(&mut self) {
        if !self.config.slides.show_sessions {
            return;
        }
        let seq = self.deck.begin_sessions_poll();
        let fetcher = self.fetcher.clone();
        let limit = self.config.limits.sessions();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = fetch_now_streaming(&fetcher, limit).await;
            let _ = tx.send(DaemonEvent::SessionsFetched { seq, result }).await;
        });
    }

    fn probe_identity(&self) {
        let fetcher = self.fetcher.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = probe_identity(&fetcher).await.map_err(|e| {
                if e.is_transport() {
                    warn!("server unreachable: {}", e);
                }
                e.to_string()
            });
            let _ = tx.send(DaemonEvent::IdentityProbed(result)).await;
        });
    }

    fn spawn_ticker(&self, period: Duration, event: fn() -> DaemonEvent) {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if tx.send(event()).await.is_err() {
                    break;
                }
            }
        });
    }
}
