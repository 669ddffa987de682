use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::base::AssistantBackend;
use crate::models::assistant::{Assistant, AssistantSpec, Thread};
use crate::models::role::Role;
use crate::models::run::{
    RequiredAction, Run, RunStatus, SubmitToolOutputs, ToolCallRequest, ToolOutput,
};

/// A scripted backend for exercising the orchestrator without a network.
///
/// `retrieve_run` walks the configured status sequence, holding on the last
/// entry once the script is exhausted; everything the orchestrator sends is
/// recorded for assertions. Clones share state.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    run_states: Mutex<VecDeque<Run>>,
    reply: Mutex<Option<String>>,
    reject_retrievals: bool,
    created_assistants: Mutex<Vec<AssistantSpec>>,
    created_threads: AtomicUsize,
    messages: Mutex<Vec<(String, Role, String)>>,
    submitted: Mutex<Vec<ToolOutput>>,
    retrievals: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the sequence of runs returned by successive `retrieve_run`s.
    pub fn with_run_states(self, states: Vec<Run>) -> Self {
        *self.inner.run_states.lock().unwrap() = states.into();
        self
    }

    /// The final message text the thread will report once polled to completion.
    pub fn with_reply<S: Into<String>>(self, text: S) -> Self {
        *self.inner.reply.lock().unwrap() = Some(text.into());
        self
    }

    /// Make `retrieve_assistant`/`retrieve_thread` fail, as the platform does
    /// for ids that no longer exist.
    pub fn rejecting_retrievals(mut self) -> Self {
        Arc::get_mut(&mut self.inner)
            .expect("configure the mock before cloning it")
            .reject_retrievals = true;
        self
    }

    pub fn run_with_status(status: RunStatus) -> Run {
        Run {
            id: "run_mock".to_string(),
            thread_id: "thread_mock".to_string(),
            assistant_id: "asst_mock".to_string(),
            status,
            required_action: None,
        }
    }

    pub fn run_requiring(tool_calls: Vec<ToolCallRequest>) -> Run {
        Run {
            required_action: Some(RequiredAction {
                submit_tool_outputs: SubmitToolOutputs { tool_calls },
            }),
            ..Self::run_with_status(RunStatus::RequiresAction)
        }
    }

    pub fn created_assistants(&self) -> usize {
        self.inner.created_assistants.lock().unwrap().len()
    }

    pub fn created_threads(&self) -> usize {
        self.inner.created_threads.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<(String, Role, String)> {
        self.inner.messages.lock().unwrap().clone()
    }

    pub fn submitted_outputs(&self) -> Vec<ToolOutput> {
        self.inner.submitted.lock().unwrap().clone()
    }

    pub fn retrievals(&self) -> Vec<String> {
        self.inner.retrievals.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantBackend for MockBackend {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        self.inner
            .created_assistants
            .lock()
            .unwrap()
            .push(spec.clone());
        Ok(Assistant {
            id: "asst_mock".to_string(),
            name: Some(spec.name.clone()),
            model: Some(spec.model.clone()),
            instructions: Some(spec.instructions.clone()),
        })
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        self.inner
            .retrievals
            .lock()
            .unwrap()
            .push(assistant_id.to_string());
        if self.inner.reject_retrievals {
            return Err(anyhow!("Request failed: 404 Not Found"));
        }
        Ok(Assistant {
            id: assistant_id.to_string(),
            name: None,
            model: None,
            instructions: None,
        })
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.inner.created_threads.fetch_add(1, Ordering::SeqCst);
        Ok(Thread {
            id: "thread_mock".to_string(),
        })
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        self.inner
            .retrievals
            .lock()
            .unwrap()
            .push(thread_id.to_string());
        if self.inner.reject_retrievals {
            return Err(anyhow!("Request failed: 404 Not Found"));
        }
        Ok(Thread {
            id: thread_id.to_string(),
        })
    }

    async fn add_message(&self, thread_id: &str, role: Role, content: &str) -> Result<()> {
        self.inner
            .messages
            .lock()
            .unwrap()
            .push((thread_id.to_string(), role, content.to_string()));
        Ok(())
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run> {
        Ok(Self::run_with_status(RunStatus::Queued))
    }

    async fn retrieve_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
        let mut states = self.inner.run_states.lock().unwrap();
        match states.len() {
            0 => Ok(Self::run_with_status(RunStatus::Completed)),
            1 => Ok(states.front().cloned().unwrap()),
            _ => Ok(states.pop_front().unwrap()),
        }
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        self.inner
            .submitted
            .lock()
            .unwrap()
            .extend(outputs.iter().cloned());
        Ok(Self::run_with_status(RunStatus::InProgress))
    }

    async fn latest_message(&self, _thread_id: &str) -> Result<Option<String>> {
        Ok(self.inner.reply.lock().unwrap().clone())
    }
}
