//! Stand-in display surface: writes every redraw to the log.

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::BroadcastMessage;

pub fn start_renderer(
    mut rx: broadcast::Receiver<BroadcastMessage>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(BroadcastMessage::Redraw { index, total, card }) => {
                    info!("[{}/{}] {}", index + 1, total, card.one_line());
                    if let Some(extra) = &card.extra {
                        info!("    {}", extra);
                    }
                }
                Ok(BroadcastMessage::NoSlides) => {
                    info!("Nothing to show yet: no recent items or active streams");
                }
                Err(RecvError::Lagged(n)) => warn!("renderer skipped {} redraws", n),
                Err(RecvError::Closed) => break,
            }
        }
    })
}
