use crate::api::{AgentRequest, AgentResult};
use crate::config::AgentClientConfig;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Lazy, non-restartable sequence of results produced by one agent call
pub type AgentResultStream = BoxStream<'static, Result<AgentResult, AgentError>>;

/// Failure of a remote agent invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("Agent call failed: {0}")]
    Call(String),
    #[error("Agent '{0}' is not available")]
    AgentUnavailable(String),
    #[error("Unexpected agent response: {0}")]
    InvalidResponse(String),
}

/// Optional routing for a single call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    /// Server default agent when `None`
    pub agent_name: Option<String>,
    /// Client default URL when `None`
    pub url: Option<String>,
    pub request_headers: BTreeMap<String, Value>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, name: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request_headers.insert(key.into(), value.into());
        self
    }

    /// Options carrying only the configured defaults
    pub fn from_config(config: &AgentClientConfig) -> Self {
        Self::default().with_defaults(config)
    }

    /// Fill unset fields from `config`; values already set are kept.
    pub fn with_defaults(mut self, config: &AgentClientConfig) -> Self {
        if self.agent_name.is_none() {
            self.agent_name = config.default_agent.clone();
        }
        if self.url.is_none() {
            self.url = config.default_url.clone();
        }
        for (key, value) in &config.headers {
            self.request_headers
                .entry(key.clone())
                .or_insert_with(|| Value::String(value.clone()));
        }
        self
    }
}

/// Client for communicating with agents.
///
/// Implementations are registered as beans under `Arc<dyn AgentClient>` and
/// resolved through a `BeanProvider`.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Calls the agent with the given request.
    async fn call_agent(
        &self,
        request: AgentRequest,
        options: CallOptions,
    ) -> Result<AgentResultStream, AgentError>;
}
