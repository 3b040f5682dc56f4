//! Client for the queued `/call` API that Gradio apps hosted on Hugging Face
//! Spaces expose.
//!
//! A prediction is two requests: a POST that enqueues the inputs and returns
//! an `event_id`, then a GET on that event that streams server-sent events
//! until a `complete` or `error` event arrives.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::domain::{ports::RemoteChatClient, DomainError};
use crate::infrastructure::config::SpaceConfig;
use crate::infrastructure::http;

#[derive(Serialize)]
struct CallRequest<'a> {
    data: [&'a str; 1],
}

#[derive(Deserialize)]
struct CallAccepted {
    event_id: String,
}

pub struct GradioSpaceClient {
    client: Client,
    base_url: String,
    api_prefix: String,
    api_name: String,
}

impl GradioSpaceClient {
    pub fn new(base_url: impl Into<String>, api_name: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_prefix: String::new(),
            api_name: api_name.trim_start_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &SpaceConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| space_host(&config.space_id));
        Self::new(base_url, &config.api_name).with_api_prefix(&config.api_prefix)
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        self.api_prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("/{prefix}")
        };
        self
    }

    fn call_url(&self) -> String {
        format!("{}{}/call/{}", self.base_url, self.api_prefix, self.api_name)
    }
}

/// `owner/My.Space` is served from `https://owner-my-space.hf.space`.
pub fn space_host(space_id: &str) -> String {
    let subdomain: String = space_id
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '.' | '_' => '-',
            other => other,
        })
        .collect();
    format!("https://{subdomain}.hf.space")
}

/// Extracts the outputs of the first terminal event in an SSE body.
pub fn parse_event_stream(body: &str) -> Result<Value, DomainError> {
    let mut event = "";

    for line in body.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
        } else if let Some(data) = line.strip_prefix("data:") {
            let data = data.trim();
            match event {
                "complete" => {
                    return serde_json::from_str(data).map_err(|e| {
                        DomainError::external(format!("malformed prediction output: {e}"))
                    });
                }
                "error" => {
                    let detail = match data {
                        "" | "null" => "the Space reported an error".to_string(),
                        other => other.to_string(),
                    };
                    return Err(DomainError::external(detail));
                }
                _ => {}
            }
        }
    }

    Err(DomainError::external("event stream ended without a result"))
}

/// A single output is returned bare, matching how Gradio clients unwrap
/// one-output endpoints.
fn unwrap_outputs(outputs: Value) -> Value {
    match outputs {
        Value::Array(mut values) if values.len() == 1 => values.remove(0),
        other => other,
    }
}

#[async_trait]
impl RemoteChatClient for GradioSpaceClient {
    #[instrument(skip(self, message), fields(api = %self.api_name))]
    async fn predict(&self, message: &str) -> Result<Value, DomainError> {
        let url = self.call_url();

        let accepted: CallAccepted = http::send(
            self.client
                .post(&url)
                .json(&CallRequest { data: [message] }),
        )
        .await?
        .json()
        .await
        .map_err(http::map_transport_error)?;

        tracing::debug!(event_id = %accepted.event_id, "prediction queued");

        let body = http::send(self.client.get(format!("{url}/{}", accepted.event_id)))
            .await?
            .text()
            .await
            .map_err(http::map_transport_error)?;

        parse_event_stream(&body).map(unwrap_outputs)
    }
}
