mod core;
mod http;
mod render;

use std::path::PathBuf;

use marquee_proto::card::Card;
use marquee_proto::config::Config;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Messages from the core to display surfaces.
#[derive(Debug, Clone)]
pub enum BroadcastMessage {
    /// Show the slide at `index` of `total`.
    Redraw {
        index: usize,
        total: usize,
        card: Box<Card>,
    },
    /// The pool is empty; show the placeholder.
    NoSlides,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (broadcast_tx, broadcast_rx) = broadcast::channel::<BroadcastMessage>(32);

    let data_dir = marquee_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = marquee_proto::platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,marquee_daemon=debug,marquee_proto=debug")
            }),
        )
        .init();

    info!("Log file: {:?}", log_path);

    // Optional config path as the first argument, otherwise the platform default.
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = Config::load_from(&path)?;
            info!("Config loaded from: {:?}", path);
            config
        }
        None => {
            let config = Config::load()?;
            info!("Config loaded from: {:?}", Config::config_path());
            config
        }
    };

    if config.server.token.is_empty() {
        tracing::warn!("server.token is empty; the server will likely reject requests");
    }

    let (event_tx, event_rx) = tokio::sync::mpsc::channel::<core::DaemonEvent>(64);

    let daemon_core = core::DaemonCore::new(config.clone(), broadcast_tx.clone(), event_tx.clone());
    let state_manager = daemon_core.state_manager();

    if config.http.enabled {
        let _http_handle = http::start_server(
            config.http.bind_address.clone(),
            config.http.port,
            state_manager.clone(),
            event_tx.clone(),
        );
    }

    let _render_handle = render::start_renderer(broadcast_rx);

    let shutdown_tx = event_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(core::DaemonEvent::Shutdown).await;
        }
    });

    info!("Daemon initialised, running event loop");
    daemon_core.run(event_rx).await?;

    Ok(())
}
