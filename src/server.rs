//! Local HTTP and WebSocket front end for the explorer page.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::chat::{ChatMessage, ChatPanel};
use crate::context::AppContext;
use crate::profile::{ProfileView, RenderedProfile, has_dossier};
use crate::render::page::render_page;
use crate::render::style::LayoutConfig;
use crate::render::{GraphRenderer, SceneEvent};

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<AppContext>,
    pub renderer: GraphRenderer,
    pub chat: Arc<ChatPanel>,
    pub profiles: Arc<ProfileView>,
    page: Arc<String>,
}

impl AppState {
    /// Wire the renderer, chat panel and profile view around a loaded context
    pub fn new(ctx: Arc<AppContext>) -> Result<Self> {
        let state = ctx
            .current()
            .context("Graph must be loaded before starting the server")?;
        let renderer = GraphRenderer::new(&state.snapshot, ctx.config().server.highlight_reset());
        let chat = Arc::new(ChatPanel::new(Arc::clone(&ctx), Arc::new(renderer.clone())));
        let page = render_page(&LayoutConfig::new())?;
        let profiles = Arc::new(ProfileView::with_assets(&ctx.config().data.assets));

        Ok(Self {
            ctx,
            renderer,
            chat,
            profiles,
            page: Arc::new(page),
        })
    }

    /// Handle a click on a graph node: people with a dossier open it,
    /// anything else is described in the chat.
    pub fn select_node(&self, id: &str) -> Option<Selection> {
        if has_dossier(id)
            && let Some(profile) = self.profiles.show(id)
        {
            return Some(Selection::Profile { profile });
        }

        let state = self.ctx.current()?;
        let node = state.snapshot.node(id)?;
        let message = self
            .chat
            .announce(format!("{}: {}", node.name, node.description));
        Some(Selection::Message { message })
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    Profile { profile: RenderedProfile },
    Message { message: ChatMessage },
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Debug, Deserialize)]
struct EntityLinkRequest {
    label: String,
}

pub fn router(state: AppState) -> Router {
    let images = ServeDir::new(state.ctx.config().data.assets.join("images"));
    Router::new()
        .route("/", get(index))
        .route("/api/graph", get(graph))
        .route("/api/layout", get(layout))
        .route("/api/chat", post(chat))
        .route("/api/entity-link", post(entity_link))
        .route("/api/nodes/:id/select", post(select_node))
        .route("/api/profiles/hide", post(hide_profile))
        .route("/api/profiles/:id", get(profile))
        .route("/ws", get(websocket_handler))
        .nest_service("/images", images)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to localhost and serve until the process is interrupted
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let refresh = state.renderer.spawn_auto_refresh(
        Arc::clone(&state.ctx),
        state.ctx.config().server.refresh_interval(),
    );

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server error");

    if let Some(refresh) = refresh {
        refresh.abort();
    }
    result
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.page.as_ref().clone())
}

async fn graph(State(state): State<AppState>) -> Response {
    match state.ctx.current() {
        Some(current) => (
            [(header::CACHE_CONTROL, "no-store")],
            Json(current.snapshot.as_ref().clone()),
        )
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn layout() -> Json<LayoutConfig> {
    Json(LayoutConfig::new())
}

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    match state.chat.send(&request.message).await {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn entity_link(
    State(state): State<AppState>,
    Json(request): Json<EntityLinkRequest>,
) -> Response {
    match state.chat.click_entity_link(&request.label) {
        Some(message) => Json(message).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn select_node(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.select_node(&id) {
        Some(selection) => Json(selection).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn profile(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.profiles.show(&id) {
        Some(profile) => Json(profile).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn hide_profile(State(state): State<AppState>) -> StatusCode {
    if let Some(id) = state.profiles.current() {
        debug!("Closing profile {}", id);
    }
    state.profiles.hide();
    StatusCode::NO_CONTENT
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forward scene events to one page until either side hangs up
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut events = state.renderer.subscribe();
    let client_id = Uuid::new_v4().to_string();
    info!("Client {} connected", client_id);

    // Bring a late joiner up to date with any active highlight
    let initial = SceneEvent::Highlight {
        frame: state.renderer.frame(),
    };
    if let Err(e) = send_event(&mut socket, &initial).await {
        error!("Failed to send initial frame: {}", e);
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Client {} closed the connection", client_id);
                    break;
                }
                Some(Err(e)) => {
                    error!("WebSocket error for client {}: {}", client_id, e);
                    break;
                }
                Some(Ok(_)) => {}
            },
            event = events.recv() => match event {
                Ok(event) => {
                    if let Err(e) = send_event(&mut socket, &event).await {
                        error!("Failed to send scene event: {}", e);
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Client {} skipped {} scene events", client_id, skipped);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    info!("WebSocket connection closed for client {}", client_id);
}

async fn send_event(socket: &mut WebSocket, event: &SceneEvent) -> Result<()> {
    let text = serde_json::to_string(event)?;
    socket.send(Message::Text(text)).await?;
    Ok(())
}
