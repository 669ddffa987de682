use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::AssistantBackend;
use super::configs::PlatformConfig;
use crate::models::assistant::{Assistant, AssistantSpec, MessageList, Thread};
use crate::models::role::Role;
use crate::models::run::{Run, ToolOutput};
use crate::models::tool::Tool;

/// Client for the Assistants v2 REST protocol.
pub struct OpenAiAssistantClient {
    client: Client,
    config: PlatformConfig,
}

impl OpenAiAssistantClient {
    pub fn new(config: PlatformConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.host.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => Err(anyhow!(
                "Request failed: {}\n{}",
                status,
                response.text().await.unwrap_or_default()
            )),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, payload: &Value) -> Result<T> {
        self.send(self.client.post(self.url(path)).json(payload))
            .await
    }
}

/// Convert declared tools to the platform's function-tool specification
fn tools_to_platform_spec(tools: &[Tool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

#[async_trait]
impl AssistantBackend for OpenAiAssistantClient {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        let payload = json!({
            "name": spec.name,
            "instructions": spec.instructions,
            "model": spec.model,
            "tools": tools_to_platform_spec(&spec.tools),
        });
        self.post_json("assistants", &payload).await
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        self.get_json(&format!("assistants/{}", assistant_id)).await
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.post_json("threads", &json!({})).await
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        self.get_json(&format!("threads/{}", thread_id)).await
    }

    async fn add_message(&self, thread_id: &str, role: Role, content: &str) -> Result<()> {
        let payload = json!({
            "role": role,
            "content": content,
        });
        // The platform echoes the stored message back; nothing downstream
        // needs it.
        let _: Value = self
            .post_json(&format!("threads/{}/messages", thread_id), &payload)
            .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let payload = json!({ "assistant_id": assistant_id });
        self.post_json(&format!("threads/{}/runs", thread_id), &payload)
            .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get_json(&format!("threads/{}/runs/{}", thread_id, run_id))
            .await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        let payload = json!({ "tool_outputs": outputs });
        self.post_json(
            &format!("threads/{}/runs/{}/submit_tool_outputs", thread_id, run_id),
            &payload,
        )
        .await
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<String>> {
        let list: MessageList = self
            .send(
                self.client
                    .get(self.url(&format!("threads/{}/messages", thread_id)))
                    .query(&[("limit", "1")]),
            )
            .await?;

        Ok(list
            .data
            .first()
            .and_then(|message| message.text())
            .map(String::from))
    }
}
