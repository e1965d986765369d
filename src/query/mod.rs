//! Canned question answering over the graph snapshot.
//!
//! Questions are matched against an ordered rule table; the first rule with
//! a matching pattern answers. There is no scoring and no merging.

mod handlers;

use anyhow::Result;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::GraphResult;
use crate::graph::Snapshot;

/// A clickable entity chip shown beneath an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    #[serde(rename = "type")]
    pub link_type: String,
    pub label: String,
}

impl RelatedLink {
    pub fn new(link_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            link_type: link_type.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub response: String,
    pub related_links: Vec<RelatedLink>,
    pub highlight_nodes: Vec<String>,
}

/// Anything that can answer a free-text question about the graph
pub trait QueryService: Send + Sync {
    fn process_query(&self, text: &str) -> Result<QueryResponse>;
}

type Handler = fn(&QueryHandler, &str) -> QueryResponse;

/// One row of the dispatch table
struct Rule {
    name: &'static str,
    patterns: Vec<Regex>,
    handler: Handler,
}

impl Rule {
    fn new(name: &'static str, patterns: &[&str], handler: Handler) -> GraphResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name,
            patterns,
            handler,
        })
    }

    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

pub struct QueryHandler {
    snapshot: Arc<Snapshot>,
    rules: Vec<Rule>,
}

impl QueryHandler {
    pub fn new(snapshot: Arc<Snapshot>) -> GraphResult<Self> {
        let rules = vec![
            Rule::new(
                "creator-works",
                &[
                    r"what.*has.*vince gilligan.*made",
                    r"what.*vince gilligan.*created",
                    r"show.*vince gilligan",
                    r"vince gilligan.*shows",
                ],
                |h, _| h.handle_creator_works("vince-gilligan"),
            )?,
            Rule::new(
                "cinematographer",
                &[r"who.*cinematographer", r"who.*shot", r"who.*filmed"],
                |h, _| h.handle_cinematographer(),
            )?,
            Rule::new(
                "actor-characters",
                &[
                    r"who.*rhea seehorn",
                    r"rhea seehorn.*character",
                    r"rhea seehorn.*play",
                ],
                |h, _| h.handle_actor_characters("rhea-seehorn"),
            )?,
            Rule::new(
                "show-connections",
                &[
                    r"connection.*pluribus.*better call saul",
                    r"pluribus.*better call saul",
                    r"better call saul.*pluribus",
                ],
                |h, _| h.handle_show_connections("pluribus", "better-call-saul"),
            )?,
            Rule::new(
                "hive-mind",
                &[r"what.*hive", r"explain.*hive", r"hive mind"],
                |h, _| h.handle_hive_mind(),
            )?,
            Rule::new("themes", &[r"theme", r"about"], |h, _| h.handle_themes())?,
        ];

        Ok(Self { snapshot, rules })
    }

    /// Name of the rule that would answer `text`, if any
    #[cfg(test)]
    pub fn matching_rule(&self, text: &str) -> Option<&'static str> {
        self.rules.iter().find(|r| r.matches(text)).map(|r| r.name)
    }

    pub fn answer(&self, text: &str) -> QueryResponse {
        match self.rules.iter().find(|r| r.matches(text)) {
            Some(rule) => {
                tracing::debug!("Query routed to {}", rule.name);
                (rule.handler)(self, text)
            }
            None => self.handle_generic(),
        }
    }
}

impl QueryService for QueryHandler {
    fn process_query(&self, text: &str) -> Result<QueryResponse> {
        Ok(self.answer(text))
    }
}
