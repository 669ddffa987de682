use std::time::Duration;

use indoc::indoc;
use serde_json::json;

use crate::errors::{OrchestrationError, OrchestrationResult};
use crate::models::assistant::AssistantSpec;
use crate::models::role::Role;
use crate::models::run::{RunStatus, ToolCallRequest, ToolInvocation, ToolOutput, GET_NEWS};
use crate::models::summary::SummaryOutcome;
use crate::models::tool::Tool;
use crate::news::NewsSource;
use crate::platform::base::AssistantBackend;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_POLLS: u32 = 100;

const ASSISTANT_NAME: &str = "News Assistant";

const ASSISTANT_INSTRUCTIONS: &str = "Summarize multiple news articles into a single, \
    well-structured paragraph. Do NOT use bullet points, numbered lists, or separate \
    sections. Ensure all key points are smoothly integrated into a single paragraph. \
    Use in-text citations in parentheses at the end of relevant sentences \
    (e.g. '[BBC - Article Title]'). At the end of the summary, provide a 'Sources:' \
    section listing each article with its URL.";

/// Seeded into every new thread so the final reply is machine-readable.
const FORMAT_INSTRUCTIONS: &str = indoc! {r#"
    INSTRUCTIONS: You MUST return the response strictly as a JSON object. DO NOT include bullet points, markdown formatting, or extra text. Return the data ONLY in this JSON format:

    {
      "summary": "Brief news summary",
      "citations": [
        {
          "intextCitation": "BBC",
          "articleName": "Title of article",
          "link": "https://example.com/article"
        }
      ]
    }

    IMPORTANT: If the articles do not contain sufficient information, return:
    { "summary": "No relevant news found.", "citations": [] }
    FAILURE TO RETURN VALID JSON WILL RESULT IN ERRORS.
"#};

fn get_news_tool() -> Tool {
    Tool::new(
        GET_NEWS,
        "Fetches the latest news on a given topic",
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The news topic to summarize"
                }
            },
            "required": ["topic"]
        }),
    )
}

/// The remote resources one caller is working with. Owned by the boundary
/// and passed into every orchestration; never process-global.
#[derive(Debug, Clone, Default)]
pub struct Session {
    assistant_id: Option<String>,
    thread_id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reattach to remote resources created in an earlier process.
    pub fn with_ids(assistant_id: Option<String>, thread_id: Option<String>) -> Self {
        Self {
            assistant_id,
            thread_id,
        }
    }

    pub fn assistant_id(&self) -> Option<&str> {
        self.assistant_id.as_deref()
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// Forget the thread so the next orchestration starts a fresh
    /// conversation. The assistant id is kept; assistants are configuration,
    /// not conversation state.
    pub fn clear_thread(&mut self) {
        self.thread_id = None;
    }
}

/// Drives one topic through the assistant platform: ensure the assistant and
/// thread exist, start a run, poll it, answer its tool calls with news text,
/// and decode the final reply.
pub struct Orchestrator {
    backend: Box<dyn AssistantBackend>,
    news: Box<dyn NewsSource>,
    model: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl Orchestrator {
    pub fn new<M: Into<String>>(
        backend: Box<dyn AssistantBackend>,
        news: Box<dyn NewsSource>,
        model: M,
    ) -> Self {
        Self {
            backend,
            news,
            model: model.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Validate externally configured ids at startup. Ids the platform no
    /// longer recognizes are dropped so they get recreated on first use
    /// instead of failing every request.
    pub async fn attach(&self, session: &mut Session) {
        if let Some(id) = session.assistant_id.clone() {
            if let Err(err) = self.backend.retrieve_assistant(&id).await {
                tracing::warn!(assistant_id = %id, "dropping configured assistant id: {}", err);
                session.assistant_id = None;
            }
        }
        if let Some(id) = session.thread_id.clone() {
            if let Err(err) = self.backend.retrieve_thread(&id).await {
                tracing::warn!(thread_id = %id, "dropping configured thread id: {}", err);
                session.thread_id = None;
            }
        }
    }

    /// Produce a structured summary of recent news on `topic`.
    pub async fn summarize_topic(
        &self,
        session: &mut Session,
        topic: &str,
    ) -> OrchestrationResult<SummaryOutcome> {
        let assistant_id = self.ensure_assistant(session).await?;
        let thread_id = self.ensure_thread(session).await?;

        let request = format!(
            "Summarize the latest news about {} in accordance with your instructions. \
             Remember to provide the output in JSON format",
            topic
        );
        self.backend
            .add_message(&thread_id, Role::User, &request)
            .await?;

        let run = self.backend.create_run(&thread_id, &assistant_id).await?;
        tracing::info!(run_id = %run.id, topic, "started run");

        let mut attempts = 0u32;
        while attempts < self.max_polls {
            tokio::time::sleep(self.poll_interval).await;
            attempts += 1;

            let current = self.backend.retrieve_run(&thread_id, &run.id).await?;
            tracing::debug!(status = %current.status, attempts, "run status");

            match current.status {
                RunStatus::Completed => {
                    let reply = self
                        .backend
                        .latest_message(&thread_id)
                        .await?
                        .ok_or(OrchestrationError::MissingReply)?;
                    return Ok(SummaryOutcome::from_reply(&reply));
                }
                RunStatus::RequiresAction => {
                    let outputs = self.execute_tool_calls(current.tool_calls()).await;
                    if !outputs.is_empty() {
                        self.backend
                            .submit_tool_outputs(&thread_id, &run.id, &outputs)
                            .await?;
                    }
                }
                status if status.is_failure() => {
                    return Err(OrchestrationError::RunFailed(status));
                }
                _ => {}
            }
        }

        Err(OrchestrationError::PollTimeout { attempts })
    }

    async fn ensure_assistant(&self, session: &mut Session) -> OrchestrationResult<String> {
        if let Some(id) = session.assistant_id() {
            return Ok(id.to_string());
        }

        let spec = AssistantSpec {
            name: ASSISTANT_NAME.to_string(),
            instructions: ASSISTANT_INSTRUCTIONS.to_string(),
            model: self.model.clone(),
            tools: vec![get_news_tool()],
        };
        let assistant = self.backend.create_assistant(&spec).await?;
        tracing::info!(assistant_id = %assistant.id, "created assistant");
        session.assistant_id = Some(assistant.id.clone());
        Ok(assistant.id)
    }

    async fn ensure_thread(&self, session: &mut Session) -> OrchestrationResult<String> {
        if let Some(id) = session.thread_id() {
            return Ok(id.to_string());
        }

        let thread = self.backend.create_thread().await?;
        self.backend
            .add_message(&thread.id, Role::User, FORMAT_INSTRUCTIONS)
            .await?;
        tracing::info!(thread_id = %thread.id, "created thread with format instructions");
        session.thread_id = Some(thread.id.clone());
        Ok(thread.id)
    }

    /// Answer every call in the batch. Calls we cannot interpret get their
    /// error as output; leaving any call unanswered stalls the run.
    async fn execute_tool_calls(&self, calls: &[ToolCallRequest]) -> Vec<ToolOutput> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            let output = match call.invocation() {
                Ok(ToolInvocation::GetNews { topic }) => {
                    tracing::info!(topic = %topic, "assistant requested news");
                    self.news.fetch_news(&topic).await
                }
                Err(err) => {
                    tracing::warn!("refusing tool call {}: {}", call.id, err);
                    format!("Error: {}", err)
                }
            };
            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output,
            });
        }
        outputs
    }
}
