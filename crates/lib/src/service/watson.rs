//! Watson Conversation v1 client (`POST /v1/workspaces/{id}/message`).
//! Keeps the dialog context returned by each reply and sends it with the next
//! message for the same session token.

use super::{ConversationService, ServiceError, SessionToken};
use crate::config::{self, Config};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// Client for the conversation message API.
pub struct WatsonClient {
    base_url: String,
    version: String,
    username: Option<String>,
    password: Option<String>,
    workspace_id: Option<String>,
    client: reqwest::Client,
    /// Dialog context per session token, replaced after every reply.
    contexts: RwLock<HashMap<SessionToken, serde_json::Value>>,
}

impl WatsonClient {
    /// Build from config; credentials and workspace come from env when set.
    /// Missing credentials are reported on the first call, not here.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.service.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config::resolve_service_url(config)
                .trim_end_matches('/')
                .to_string(),
            version: config.service.version.clone(),
            username: config::resolve_username(config),
            password: config::resolve_password(config),
            workspace_id: config::resolve_workspace_id(config),
            client,
            contexts: RwLock::new(HashMap::new()),
        })
    }

    fn message_url(&self) -> Result<String, ServiceError> {
        let workspace = self
            .workspace_id
            .as_deref()
            .ok_or(ServiceError::NotConfigured("workspaceId"))?;
        Ok(format!(
            "{}/v1/workspaces/{}/message?version={}",
            self.base_url, workspace, self.version
        ))
    }

    /// POST one message (or none, to start a dialog) and return the parsed reply.
    async fn post_message(
        &self,
        text: Option<&str>,
        context: Option<serde_json::Value>,
    ) -> Result<MessageResponse, ServiceError> {
        let url = self.message_url()?;
        let username = self
            .username
            .as_deref()
            .ok_or(ServiceError::NotConfigured("username"))?;
        let body = MessageRequest {
            input: text.map(|text| MessageInput { text }),
            context,
        };
        let res = self
            .client
            .post(&url)
            .basic_auth(username, self.password.as_deref())
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ServiceError::Api(format!("{} {}", status, body)));
        }
        Ok(res.json().await?)
    }

    async fn store_context(&self, token: &SessionToken, context: Option<serde_json::Value>) {
        if let Some(ctx) = context {
            self.contexts.write().await.insert(token.clone(), ctx);
        }
    }
}

#[async_trait]
impl ConversationService for WatsonClient {
    async fn start_session(&self, token: &SessionToken) -> Result<String, ServiceError> {
        log::debug!("watson: starting dialog for {}", token);
        let res = self.post_message(None, None).await?;
        let text = res.text();
        self.store_context(token, res.context).await;
        Ok(text)
    }

    async fn send_message(&self, token: &SessionToken, text: &str) -> Result<String, ServiceError> {
        let context = self.contexts.read().await.get(token).cloned();
        if context.is_none() {
            log::debug!("watson: no stored context for {}, sending without one", token);
        }
        let res = self.post_message(Some(text), context).await?;
        let reply = res.text();
        self.store_context(token, res.context).await;
        Ok(reply)
    }

    async fn clear_session(&self, token: &SessionToken) -> Result<(), ServiceError> {
        self.contexts.write().await.remove(token);
        log::debug!("watson: cleared context for {}", token);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<MessageInput<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct MessageInput<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    output: MessageOutput,
    #[serde(default)]
    context: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageOutput {
    #[serde(default)]
    text: Vec<String>,
}

impl MessageResponse {
    /// All output lines joined with no separator.
    fn text(&self) -> String {
        self.output.text.concat()
    }
}
