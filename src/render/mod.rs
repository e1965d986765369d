//! Graph rendering state.
//!
//! Layout physics, drag and zoom run in the browser; this module owns the
//! lookup tables that parameterise them, the per-element visual state, and
//! the timers that drive highlight resets and data refreshes.

pub mod page;
pub mod scene;
pub mod style;

use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::context::AppContext;
use crate::graph::{Snapshot, SnapshotMetadata};
use scene::{Scene, SceneFrame};

/// Receives requests to emphasise a set of nodes
pub trait HighlightSink: Send + Sync {
    fn highlight(&self, ids: &[String], focus: bool);
}

/// Messages pushed to connected pages
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneEvent {
    Highlight { frame: SceneFrame },
    Reset { frame: SceneFrame },
    Refresh { metadata: SnapshotMetadata },
}

struct RendererInner {
    scene: Mutex<Scene>,
    events: broadcast::Sender<SceneEvent>,
    pending_reset: Mutex<Option<JoinHandle<()>>>,
    reset_after: Duration,
}

/// Shared handle to the scene and its event stream
#[derive(Clone)]
pub struct GraphRenderer {
    inner: Arc<RendererInner>,
}

impl GraphRenderer {
    pub fn new(snapshot: &Snapshot, reset_after: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(RendererInner {
                scene: Mutex::new(Scene::new(snapshot)),
                events,
                pending_reset: Mutex::new(None),
                reset_after,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SceneEvent> {
        self.inner.events.subscribe()
    }

    pub fn frame(&self) -> SceneFrame {
        lock(&self.inner.scene).frame().clone()
    }

    fn broadcast(&self, event: SceneEvent) {
        // No receivers just means no page is open
        let _ = self.inner.events.send(event);
    }

    fn cancel_pending_reset(&self) {
        if let Some(handle) = lock(&self.inner.pending_reset).take() {
            handle.abort();
        }
    }

    /// Highlight `ids` and schedule an automatic reset, replacing any reset
    /// still pending from an earlier highlight.
    pub fn highlight_nodes(&self, ids: &[String], focus: bool) -> SceneFrame {
        tracing::debug!("Highlighting nodes: {:?}", ids);
        let frame = lock(&self.inner.scene).highlight(ids, focus);
        self.broadcast(SceneEvent::Highlight {
            frame: frame.clone(),
        });

        let renderer = self.clone();
        let delay = self.inner.reset_after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            renderer.reset_highlight();
        });
        if let Some(previous) = lock(&self.inner.pending_reset).replace(handle) {
            previous.abort();
        }

        frame
    }

    pub fn reset_highlight(&self) -> SceneFrame {
        let frame = lock(&self.inner.scene).reset();
        self.broadcast(SceneEvent::Reset {
            frame: frame.clone(),
        });
        frame
    }

    /// Swap in a freshly loaded snapshot and tell pages to re-render
    pub fn replace(&self, snapshot: &Snapshot) {
        self.cancel_pending_reset();
        *lock(&self.inner.scene) = Scene::new(snapshot);
        self.broadcast(SceneEvent::Refresh {
            metadata: snapshot.metadata.clone(),
        });
    }

    /// Reload the snapshot into the context and the scene.
    ///
    /// On failure the previous state stays in place.
    pub fn refresh(&self, ctx: &AppContext) -> bool {
        match ctx.reload() {
            Ok(state) => {
                tracing::info!(
                    "Graph refreshed with {} nodes and {} links",
                    state.snapshot.nodes.len(),
                    state.snapshot.links.len()
                );
                self.replace(&state.snapshot);
                true
            }
            Err(e) => {
                tracing::error!("Failed to refresh graph data: {:#}", e);
                false
            }
        }
    }

    /// Reload the snapshot every `period`, starting one period from now.
    ///
    /// A zero period disables auto-refresh and spawns nothing.
    pub fn spawn_auto_refresh(
        &self,
        ctx: Arc<AppContext>,
        period: Duration,
    ) -> Option<JoinHandle<()>> {
        if period.is_zero() {
            tracing::info!("Auto-refresh disabled");
            return None;
        }

        let renderer = self.clone();
        tracing::info!("Auto-refresh enabled every {:?}", period);
        Some(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                tracing::info!("Auto-refreshing graph data...");
                renderer.refresh(&ctx);
            }
        }))
    }
}

impl HighlightSink for GraphRenderer {
    fn highlight(&self, ids: &[String], focus: bool) {
        self.highlight_nodes(ids, focus);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
