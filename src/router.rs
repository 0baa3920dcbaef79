//! LLM-assisted agent routing.
//!
//! The routing model sees the agent catalogue, the user's query and how many files
//! were uploaded (never their contents), and answers with two labeled fields:
//!
//! ```text
//! agent: <identifier>
//! files: [<index>, <index>, ...]
//! ```
//!
//! Labels are matched case-insensitively anywhere in the reply and may be wrapped in
//! markdown emphasis. A value runs to the next label or the end of its line, so both
//! fields may share one line. The first occurrence of each label whose value is well
//! formed wins; a stray `files:` in prose does not shadow the real field. Whether the
//! identifier names a registered agent is the dispatcher's call.

use crate::llm::LlmClient;
use crate::registry::AgentRegistry;
use crate::schema::UploadedFile;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub agent: String,
    pub file_indices: Vec<usize>,
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing model call failed: {0:#}")]
    Llm(anyhow::Error),
    #[error("could not parse routing reply: {0}")]
    Parse(String),
    #[error("invalid routing decision: {0}")]
    Validation(String),
}

pub struct AgentRouter {
    llm: Arc<dyn LlmClient>,
    registry: Arc<AgentRegistry>,
}

impl AgentRouter {
    pub fn new(llm: Arc<dyn LlmClient>, registry: Arc<AgentRegistry>) -> Self {
        Self { llm, registry }
    }

    /// Pick an agent and the files it should receive. One model call, no retry.
    pub async fn route(
        &self,
        query: &str,
        files: &[UploadedFile],
    ) -> Result<RoutingDecision, RoutingError> {
        let prompt = build_prompt(&self.registry, query, files.len());
        let reply = self
            .llm
            .generate(&prompt)
            .await
            .map_err(RoutingError::Llm)?;
        debug!("Routing reply: {:?}", reply);

        let decision = parse_reply(&reply)?;
        validate(&decision, files.len())?;

        info!(
            "Routed to agent {} with files {:?}",
            decision.agent, decision.file_indices
        );
        Ok(decision)
    }
}

/// Build the classification prompt.
pub fn build_prompt(registry: &AgentRegistry, query: &str, file_count: usize) -> String {
    let catalogue = registry
        .iter()
        .enumerate()
        .map(|(i, agent)| {
            format!(
                "{}. **{}** - {} (requires {} PDF{})",
                i + 1,
                agent.id,
                agent.description,
                agent.required_files,
                if agent.required_files == 1 { "" } else { "s" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a routing assistant for a document compliance analysis platform.

Decide which specialized agent should handle the user's request. Available agents:

{catalogue}

Instructions:
- Choose the single most relevant agent for the query and the number of uploaded files.
- File indices are zero-based positions of the uploaded PDFs.
- Select exactly as many files as the chosen agent requires, in the order the agent expects them.
- Reply with exactly these two lines and nothing else:
agent: <agent_name>
files: [<file_indices>]

Example:
agent: asuretify
files: [0, 1]

Query:
"""{query}"""
There are {file_count} PDF file(s) uploaded."#
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Agent,
    Files,
}

impl Label {
    fn name(self) -> &'static str {
        match self {
            Label::Agent => "agent",
            Label::Files => "files",
        }
    }
}

fn label_pattern() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| {
        Regex::new(r"(?i)\b(agent|files)\b[ \t*_`]*:[ \t*_`]*").expect("label pattern is valid")
    })
}

/// Every labeled value in the reply, in order of appearance.
fn tokenize(reply: &str) -> Vec<(Label, &str)> {
    let labels: Vec<(Label, usize, usize)> = label_pattern()
        .captures_iter(reply)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = if caps.get(1)?.as_str().eq_ignore_ascii_case("agent") {
                Label::Agent
            } else {
                Label::Files
            };
            Some((label, whole.start(), whole.end()))
        })
        .collect();

    labels
        .iter()
        .enumerate()
        .map(|(i, &(label, _, value_start))| {
            let line_end = reply[value_start..]
                .find('\n')
                .map_or(reply.len(), |offset| value_start + offset);
            let next_label = labels.get(i + 1).map_or(reply.len(), |&(_, start, _)| start);
            (label, &reply[value_start..line_end.min(next_label)])
        })
        .collect()
}

/// Parse the first well-formed value for `label`. When none parses, the first
/// occurrence's error is reported.
fn first_well_formed<T>(
    fields: &[(Label, &str)],
    label: Label,
    parse: fn(&str) -> Result<T, RoutingError>,
) -> Result<T, RoutingError> {
    let mut first_error = None;
    for &(_, value) in fields.iter().filter(|(l, _)| *l == label) {
        match parse(value) {
            Ok(parsed) => return Ok(parsed),
            Err(e) if first_error.is_none() => first_error = Some(e),
            Err(_) => {}
        }
    }
    Err(first_error
        .unwrap_or_else(|| RoutingError::Parse(format!("missing `{}` field", label.name()))))
}

/// Parse a routing reply into a decision. Index bounds are checked by [`validate`].
pub fn parse_reply(reply: &str) -> Result<RoutingDecision, RoutingError> {
    let fields = tokenize(reply);

    Ok(RoutingDecision {
        agent: first_well_formed(&fields, Label::Agent, parse_agent)?,
        file_indices: first_well_formed(&fields, Label::Files, parse_indices)?,
    })
}

fn parse_agent(value: &str) -> Result<String, RoutingError> {
    let ident: String = value
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '`' | '"' | '\''))
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase();

    if ident.is_empty() {
        return Err(RoutingError::Parse(format!(
            "`agent` field has no identifier: {:?}",
            value.trim()
        )));
    }
    Ok(ident)
}

fn parse_indices(value: &str) -> Result<Vec<usize>, RoutingError> {
    let value = value.trim();
    let inner = value
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .map(|(inner, _)| inner)
        .ok_or_else(|| {
            RoutingError::Parse(format!("`files` field is not a bracketed list: {:?}", value))
        })?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse::<usize>().map_err(|_| {
                RoutingError::Parse(format!("`{}` is not a file index", entry))
            })
        })
        .collect()
}

/// Check the decision against the number of uploaded files.
pub fn validate(decision: &RoutingDecision, file_count: usize) -> Result<(), RoutingError> {
    if decision.file_indices.is_empty() {
        return Err(RoutingError::Validation("no file indices returned".to_string()));
    }
    if let Some(&index) = decision.file_indices.iter().find(|&&i| i >= file_count) {
        return Err(RoutingError::Validation(format!(
            "file index {} out of range for {} uploaded file(s)",
            index, file_count
        )));
    }
    Ok(())
}
