//! Chat panel controller: transcript, canned answers and entity-link focus.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::context::AppContext;
use crate::query::RelatedLink;
use crate::render::HighlightSink;

pub const ERROR_MESSAGE: &str = "I encountered an error processing your question. Please try again.";
pub const LOADING_MESSAGE: &str =
    "I'm still loading the knowledge graph. Please wait a moment and try again.";

/// Messages kept in the transcript; older ones are dropped first
pub const TRANSCRIPT_LIMIT: usize = 200;

/// Example questions offered before the first message
pub const SUGGESTIONS: [&str; 4] = [
    "What has Vince Gilligan made?",
    "What are the connections between Pluribus and Better Call Saul?",
    "Who is the cinematographer?",
    "What is the hive mind?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub related_links: Vec<RelatedLink>,
}

impl ChatMessage {
    fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            text: text.to_string(),
            related_links: Vec::new(),
        }
    }

    fn assistant(text: impl Into<String>, related_links: Vec<RelatedLink>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            related_links,
        }
    }
}

pub struct ChatPanel {
    ctx: Arc<AppContext>,
    sink: Arc<dyn HighlightSink>,
    thinking_delay: Duration,
    transcript: Mutex<Vec<ChatMessage>>,
}

impl ChatPanel {
    pub fn new(ctx: Arc<AppContext>, sink: Arc<dyn HighlightSink>) -> Self {
        let thinking_delay = ctx.config().server.thinking_delay();
        Self {
            ctx,
            sink,
            thinking_delay,
            transcript: Mutex::new(Vec::new()),
        }
    }

    pub fn with_thinking_delay(mut self, delay: Duration) -> Self {
        self.thinking_delay = delay;
        self
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ChatMessage>> {
        self.transcript
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, message: ChatMessage) -> ChatMessage {
        let mut transcript = self.lock();
        transcript.push(message.clone());
        if transcript.len() > TRANSCRIPT_LIMIT {
            let excess = transcript.len() - TRANSCRIPT_LIMIT;
            transcript.drain(..excess);
        }
        message
    }

    /// Echo the user's text into the transcript. Blank input is ignored.
    pub fn submit(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        tracing::debug!("Sending message: {}", text);
        self.push(ChatMessage::user(text));
        Some(text.to_string())
    }

    /// Answer a submitted question after the thinking delay
    pub async fn respond(&self, text: &str) -> ChatMessage {
        tokio::time::sleep(self.thinking_delay).await;

        let Some(state) = self.ctx.current() else {
            tracing::warn!("Query handler not loaded yet");
            return self.push(ChatMessage::assistant(LOADING_MESSAGE, Vec::new()));
        };

        match state.queries.process_query(text) {
            Ok(result) => {
                let message = self.push(ChatMessage::assistant(result.response, result.related_links));
                if !result.highlight_nodes.is_empty() {
                    self.sink.highlight(&result.highlight_nodes, true);
                }
                message
            }
            Err(e) => {
                tracing::error!("Error processing query: {:#}", e);
                self.push(ChatMessage::assistant(ERROR_MESSAGE, Vec::new()))
            }
        }
    }

    /// Post an assistant message that did not come from a question
    pub fn announce(&self, text: impl Into<String>) -> ChatMessage {
        self.push(ChatMessage::assistant(text, Vec::new()))
    }

    /// Submit and answer in one go; `None` for blank input
    pub async fn send(&self, text: &str) -> Option<ChatMessage> {
        let text = self.submit(text)?;
        Some(self.respond(&text).await)
    }

    /// Focus the graph on the entity behind a related-link chip.
    ///
    /// Unresolvable labels are logged and otherwise ignored.
    pub fn click_entity_link(&self, label: &str) -> Option<ChatMessage> {
        let Some(state) = self.ctx.current() else {
            tracing::error!("Graph not available");
            return None;
        };

        let Some(entity) = state.snapshot.find_by_label(label) else {
            tracing::warn!("Entity not found in graph: {}", label);
            return None;
        };

        let connected = state.snapshot.connected_ids(&entity.id);
        let mut ids = Vec::with_capacity(connected.len() + 1);
        ids.push(entity.id.clone());
        ids.extend(connected.iter().cloned());
        self.sink.highlight(&ids, true);

        Some(self.push(ChatMessage::assistant(
            format!(
                "Focusing on {} and its {} connections.",
                entity.name,
                connected.len()
            ),
            Vec::new(),
        )))
    }
}
