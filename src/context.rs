//! Explicit application context shared by the server, the chat panel and the
//! refresh task.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::config::Config;
use crate::graph::{Snapshot, read_snapshot};
use crate::query::{QueryHandler, QueryService};

/// A loaded snapshot and the query service built over it
pub struct GraphState {
    pub snapshot: Arc<Snapshot>,
    pub queries: Arc<dyn QueryService>,
}

impl GraphState {
    pub fn new(snapshot: Snapshot) -> Result<Self> {
        let snapshot = Arc::new(snapshot);
        let handler = QueryHandler::new(Arc::clone(&snapshot))
            .context("Failed to compile query rules")?;
        Ok(Self {
            snapshot,
            queries: Arc::new(handler),
        })
    }

    /// Pair a snapshot with a caller-provided query service
    #[cfg(test)]
    pub fn with_service(snapshot: Snapshot, queries: Arc<dyn QueryService>) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            queries,
        }
    }
}

pub struct AppContext {
    config: Config,
    state: RwLock<Option<Arc<GraphState>>>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.config.data.snapshot
    }

    /// The state in effect right now. Holders keep a consistent view even if
    /// a refresh swaps in a new one.
    pub fn current(&self) -> Option<Arc<GraphState>> {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn install(&self, state: GraphState) -> Arc<GraphState> {
        let state = Arc::new(state);
        let mut guard = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(Arc::clone(&state));
        state
    }

    /// Read the snapshot file and replace the current state.
    ///
    /// The previous state is left untouched when reading or parsing fails.
    pub fn reload(&self) -> Result<Arc<GraphState>> {
        let path = self.snapshot_path();
        let snapshot = read_snapshot(path)
            .with_context(|| format!("Failed to load graph from {}", path.display()))?;
        tracing::debug!(
            "Loaded {} nodes and {} links from {}",
            snapshot.nodes.len(),
            snapshot.links.len(),
            path.display()
        );
        let state = GraphState::new(snapshot)?;
        Ok(self.install(state))
    }
}
