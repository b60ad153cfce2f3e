use crate::core::DaemonEvent;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use marquee_proto::card::Card;
use marquee_proto::protocol::{Command, DeckView, Slide};
use marquee_proto::state::StateManager;
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
struct HttpState {
    state_manager: Arc<StateManager>,
    event_tx: mpsc::Sender<DaemonEvent>,
}

#[derive(Serialize)]
struct CurrentSlide {
    index: usize,
    total: usize,
    slide: Slide,
    card: Option<Card>,
}

pub fn start_server(
    bind_address: String,
    port: u16,
    state_manager: Arc<StateManager>,
    event_tx: mpsc::Sender<DaemonEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app = router(HttpState {
            state_manager,
            event_tx,
        });

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/slide", get(get_slide))
        .route("/api/next", get(next_slide).post(next_slide))
        .route("/api/refresh", get(refresh).post(refresh))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_state(State(state): State<HttpState>) -> Json<DeckView> {
    Json(state.state_manager.get_state().await)
}

/// The slide on screen, or 204 when there is nothing to show.
async fn get_slide(State(state): State<HttpState>) -> Result<Json<CurrentSlide>, StatusCode> {
    let view = state.state_manager.get_state().await;
    let slide = view.current.ok_or(StatusCode::NO_CONTENT)?;
    Ok(Json(CurrentSlide {
        index: view.current_index,
        total: view.total,
        slide,
        card: view.card,
    }))
}

async fn next_slide(State(state): State<HttpState>) -> StatusCode {
    info!("HTTP API: Next slide");
    send(&state, Command::Next).await
}

async fn refresh(State(state): State<HttpState>) -> StatusCode {
    info!("HTTP API: Refresh");
    send(&state, Command::Refresh).await
}

async fn send(state: &HttpState, cmd: Command) -> StatusCode {
    if state
        .event_tx
        .send(DaemonEvent::ClientCommand(cmd))
        .await
        .is_err()
    {
        error!("Failed to forward command to core");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::ACCEPTED
}
