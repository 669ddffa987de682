use thiserror::Error;

use crate::models::run::RunStatus;

/// Why one summarization cycle could not produce a result. Malformed
/// assistant output is not an error at this level; it is recovered into the
/// error-marker outcome instead.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("run ended in terminal status `{0}` before completing")]
    RunFailed(RunStatus),

    #[error("run did not complete after {attempts} status checks")]
    PollTimeout { attempts: u32 },

    #[error("thread has no assistant reply to read")]
    MissingReply,

    #[error(transparent)]
    Platform(#[from] anyhow::Error),
}

pub type OrchestrationResult<T> = Result<T, OrchestrationError>;

/// Failure to interpret a single tool call out of a required-action batch.
#[derive(Error, Debug)]
pub enum ToolCallError {
    #[error("unsupported function: {0}")]
    UnsupportedFunction(String),

    #[error("invalid arguments for {name}: {source}")]
    InvalidArguments {
        name: String,
        source: serde_json::Error,
    },
}
