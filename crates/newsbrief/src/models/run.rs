use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ToolCallError;

/// Function name the assistant is told it may call.
pub const GET_NEWS: &str = "get_news";

/// Lifecycle of one assistant execution against a thread.
///
/// The platform owns this enumeration and may grow it; anything we do not
/// recognize lands in `Unknown` and is treated as non-terminal by the
/// orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Terminal statuses that can never yield a summary.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// One run of an assistant over a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_action: Option<RequiredAction>,
}

impl Run {
    /// The tool-call batch the platform is waiting on, empty unless the run
    /// is paused in `requires_action`.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        self.required_action
            .as_ref()
            .map(|action| action.submit_tool_outputs.tool_calls.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredAction {
    pub submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<ToolCallRequest>,
}

/// A single function call the assistant asked us to execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object, exactly as the platform sends it.
    pub arguments: String,
}

/// The known function calls, parsed out of a remote-defined batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    GetNews { topic: String },
}

#[derive(Debug, Deserialize)]
struct GetNewsArgs {
    topic: String,
}

impl ToolCallRequest {
    /// Interpret the request as one of the functions we declared. Unknown
    /// names and malformed argument payloads are rejected rather than
    /// guessed at.
    pub fn invocation(&self) -> Result<ToolInvocation, ToolCallError> {
        match self.function.name.as_str() {
            GET_NEWS => {
                let args: GetNewsArgs = serde_json::from_str(&self.function.arguments)
                    .map_err(|source| ToolCallError::InvalidArguments {
                        name: self.function.name.clone(),
                        source,
                    })?;
                Ok(ToolInvocation::GetNews { topic: args.topic })
            }
            other => Err(ToolCallError::UnsupportedFunction(other.to_string())),
        }
    }
}

/// Answer to one [`ToolCallRequest`], keyed by the id the platform issued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}
