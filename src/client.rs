use std::future::Future;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/chat";

/// Which response field carries the bot's reply.
///
/// The service has shipped two shapes. `V1` is the canonical one; the legacy
/// shape is only read when it is selected explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ContractVersion {
    #[default]
    #[value(name = "v1")]
    V1,
    #[value(name = "legacy")]
    LegacyAiResponse,
}

impl ContractVersion {
    pub fn response_field(&self) -> &'static str {
        match self {
            ContractVersion::V1 => "response",
            ContractVersion::LegacyAiResponse => "ai_response",
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct SearchResults {
    #[serde(default)]
    search_results: Vec<String>,
}

/// Anything that can answer a chat query.
pub trait ChatBackend {
    fn send(&self, query: &str) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    contract: ContractVersion,
}

impl ChatClient {
    pub fn new(endpoint: &str, contract: ContractVersion) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            contract,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn query(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { query })
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.endpoint))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "chat request failed with status: {}",
                response.status()
            ));
        }

        let body: Value = response
            .json()
            .await
            .context("chat response was not valid JSON")?;

        extract_reply(&body, self.contract)
    }
}

impl ChatBackend for ChatClient {
    async fn send(&self, query: &str) -> Result<String> {
        self.query(query).await
    }
}

/// Pull the reply out of a response body, refusing bodies that don't carry
/// the field the contract names.
fn extract_reply(body: &Value, contract: ContractVersion) -> Result<String> {
    let field = contract.response_field();

    if let Ok(extra) = SearchResults::deserialize(body) {
        if !extra.search_results.is_empty() {
            tracing::debug!(count = extra.search_results.len(), "response carried search results");
        }
    }

    match body.get(field) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(anyhow!(
            "response field `{}` is not a string: {}",
            field,
            other
        )),
        None => Err(anyhow!("response is missing field `{}`", field)),
    }
}
