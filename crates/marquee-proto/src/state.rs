use crate::protocol::DeckView;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the last published `DeckView` for readers outside the core loop
/// (the HTTP API). Only the core writes; every write bumps `rev`.
pub struct StateManager {
    state: Arc<RwLock<DeckView>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(DeckView::default())),
        }
    }

    pub fn arc(&self) -> Arc<RwLock<DeckView>> {
        Arc::clone(&self.state)
    }

    pub async fn get_state(&self) -> DeckView {
        self.state.read().await.clone()
    }

    /// Replace the published view, returning the new revision.
    pub async fn publish(&self, mut view: DeckView) -> u64 {
        let mut state = self.state.write().await;
        view.rev = state.rev + 1;
        *state = view;
        state.rev
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}
