use anyhow::Result;
use async_trait::async_trait;

use crate::models::assistant::{Assistant, AssistantSpec, Thread};
use crate::models::role::Role;
use crate::models::run::{Run, ToolOutput};

/// The operations the orchestrator needs from a hosted assistant platform.
///
/// Implementations own the wire protocol; callers only see the typed models.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant>;

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant>;

    async fn create_thread(&self) -> Result<Thread>;

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread>;

    async fn add_message(&self, thread_id: &str, role: Role, content: &str) -> Result<()>;

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run>;

    /// Text of the most recent message on the thread, if there is one.
    async fn latest_message(&self, thread_id: &str) -> Result<Option<String>>;
}
