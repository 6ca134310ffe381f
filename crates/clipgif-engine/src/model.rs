//! Language model invocation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Opaque language-model endpoint.
///
/// The pipeline only needs `instruction text -> raw reply text`; tests
/// substitute fixed fake replies for the remote call.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send an instruction and return the raw reply text.
    ///
    /// Transport-level failures (network, auth, non-2xx) surface as
    /// [`EngineError::ModelTransport`]; they are fatal for the invocation
    /// and not retried here.
    async fn invoke(&self, prompt: &str) -> EngineResult<String>;
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for std::sync::Arc<T> {
    async fn invoke(&self, prompt: &str) -> EngineResult<String> {
        (**self).invoke(prompt).await
    }
}

/// Ollama chat-endpoint client.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    /// Ask the endpoint for JSON output; adherence is not assumed
    format: &'a str,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    /// Create a client from engine configuration.
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.model_timeout)
            .build()
            .map_err(|e| EngineError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
            client,
        })
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn invoke(&self, prompt: &str) -> EngineResult<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            format: "json",
            stream: false,
        };

        debug!(model = %self.model, "Invoking model endpoint");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::model_transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::model_transport(format!(
                "Model endpoint returned {}: {}",
                status,
                body.trim()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| EngineError::model_transport(format!("Invalid endpoint response: {}", e)))?;

        Ok(chat.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> EngineConfig {
        EngineConfig {
            ollama_url: base_url.to_string(),
            ollama_model: "phi3".to_string(),
            ..EngineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_invoke_returns_message_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "phi3",
                "format": "json",
                "stream": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": { "role": "assistant", "content": "[{\"start\":1,\"end\":4,\"text\":\"x\"}]" }
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&test_config(&server.uri())).unwrap();
        let reply = client.invoke("prompt").await.unwrap();
        assert_eq!(reply, "[{\"start\":1,\"end\":4,\"text\":\"x\"}]");
    }

    #[tokio::test]
    async fn test_non_2xx_is_transport_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model exploded"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&test_config(&server.uri())).unwrap();
        let err = client.invoke("prompt").await.unwrap_err();
        assert!(matches!(err, EngineError::ModelTransport(_)));
        assert!(err.to_string().contains("model exploded"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_failure() {
        // Port 9 (discard) is not listening
        let client = OllamaClient::new(&test_config("http://127.0.0.1:9")).unwrap();
        let err = client.invoke("prompt").await.unwrap_err();
        assert!(matches!(err, EngineError::ModelTransport(_)));
    }
}
