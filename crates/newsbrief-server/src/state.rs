use std::sync::Arc;

use newsbrief::news::NewsApiClient;
use newsbrief::orchestrator::{Orchestrator, Session};
use newsbrief::platform::openai::OpenAiAssistantClient;
use tokio::sync::Mutex;

use crate::configuration::Settings;

/// Shared application state: one orchestrator and one session. The session
/// mutex is held for a whole orchestration, so concurrent requests take
/// turns instead of racing runs on a shared thread.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub session: Arc<Mutex<Session>>,
    pub reuse_thread: bool,
    pub default_topic: String,
}

impl AppState {
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let backend = OpenAiAssistantClient::new(settings.platform.client_config())?;
        let news = NewsApiClient::new(settings.news.client_config())?;

        let orchestrator = Orchestrator::new(
            Box::new(backend),
            Box::new(news),
            settings.platform.model.clone(),
        )
        .with_poll_interval(std::time::Duration::from_secs(
            settings.platform.poll_interval_secs,
        ))
        .with_max_polls(settings.platform.max_polls);

        let mut session = Session::with_ids(
            settings.platform.assistant_id.clone(),
            settings.platform.thread_id.clone(),
        );
        // Configured ids may be stale; check them now rather than on the
        // first request.
        orchestrator.attach(&mut session).await;

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            session: Arc::new(Mutex::new(session)),
            reuse_thread: settings.platform.reuse_thread
                || settings.platform.thread_id.is_some(),
            default_topic: "technology".to_string(),
        })
    }
}
