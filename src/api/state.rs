use std::sync::Arc;

use crate::domain::ports::RemoteChatClient;
use crate::infrastructure::{AppConfig, GradioSpaceClient, RetrievalAssistant};

#[derive(Clone)]
pub struct AppState {
    pub remote_chat: Arc<dyn RemoteChatClient>,
    pub assistant: Arc<RetrievalAssistant>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        remote_chat: Arc<dyn RemoteChatClient>,
        assistant: Arc<RetrievalAssistant>,
        config: AppConfig,
    ) -> Self {
        Self {
            remote_chat,
            assistant,
            config: Arc::new(config),
        }
    }

    /// Wires the hosted-service adapters named in `config`.
    pub fn from_config(config: AppConfig) -> Self {
        let remote_chat = Arc::new(GradioSpaceClient::from_config(&config.config.space));
        let assistant = Arc::new(RetrievalAssistant::from_config(&config));
        Self::new(remote_chat, assistant, config)
    }
}
