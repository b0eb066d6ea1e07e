//! Bedrock `InvokeModel` text-completion client

use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::client::{ModelClient, ModelError};
use super::config::ModelConfig;

/// Request body understood by Titan text models
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextRequest<'a> {
    input_text: &'a str,
    text_generation_config: TextGenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextGenerationConfig {
    max_token_count: u32,
    stop_sequences: Vec<String>,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct TextResponse {
    #[serde(default)]
    results: Vec<TextResult>,
}

#[derive(Debug, Deserialize)]
struct TextResult {
    #[serde(rename = "outputText", default)]
    output_text: String,
}

/// Direct text completion with fixed decoding parameters
pub struct TextCompletionClient {
    client: Client,
    model_id: String,
    generation: TextGenerationConfig,
}

impl TextCompletionClient {
    pub async fn new(config: &ModelConfig) -> Self {
        let aws_config = aws_config::from_env()
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;
        Self::from_client(Client::new(&aws_config), config)
    }

    pub fn from_client(client: Client, config: &ModelConfig) -> Self {
        Self {
            client,
            model_id: config.model_id.clone(),
            generation: TextGenerationConfig {
                max_token_count: config.max_tokens,
                stop_sequences: Vec::new(),
                temperature: config.temperature,
                top_p: config.top_p,
            },
        }
    }

    fn request_body(&self, prompt: &str) -> Result<Vec<u8>, ModelError> {
        serde_json::to_vec(&TextRequest {
            input_text: prompt,
            text_generation_config: self.generation.clone(),
        })
        .map_err(|e| ModelError::InvalidRequest(e.to_string()))
    }
}

/// First result's output text; missing results read as an empty answer
fn parse_response(body: &[u8]) -> Result<String, ModelError> {
    let response: TextResponse =
        serde_json::from_slice(body).map_err(|e| ModelError::Malformed(e.to_string()))?;
    Ok(response
        .results
        .into_iter()
        .next()
        .map(|result| result.output_text)
        .unwrap_or_default())
}

/// Classify an SDK failure by transport kind first, then by service error code
pub(crate) fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> ModelError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) => ModelError::Timeout(message),
        SdkError::DispatchFailure(_) => ModelError::Unavailable(message),
        SdkError::ConstructionFailure(_) => ModelError::InvalidRequest(message),
        _ => ModelError::from_service_code(err.code(), message),
    }
}

#[async_trait]
impl ModelClient for TextCompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        debug!("Invoking model '{}' ({} prompt bytes)", self.model_id, prompt.len());

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(self.request_body(prompt)?))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let text = parse_response(output.body().as_ref())?;
        trace!("Model response: {}", text);
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let generation = TextGenerationConfig {
            max_token_count: 3072,
            stop_sequences: Vec::new(),
            temperature: 0.3,
            top_p: 0.7,
        };
        let body = serde_json::to_value(TextRequest {
            input_text: "translate",
            text_generation_config: generation,
        })
        .unwrap();

        assert_eq!(body["inputText"], "translate");
        assert_eq!(body["textGenerationConfig"]["maxTokenCount"], 3072);
        assert_eq!(
            body["textGenerationConfig"]["stopSequences"],
            serde_json::json!([])
        );
        assert!((body["textGenerationConfig"]["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert!((body["textGenerationConfig"]["topP"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_parse_response_reads_first_output_text() {
        let body = br#"{"inputTextTokenCount":10,"results":[{"tokenCount":4,"outputText":"```hcl\nx\n```","completionReason":"FINISH"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "```hcl\nx\n```");
    }

    #[test]
    fn test_parse_response_without_results_is_empty() {
        assert_eq!(parse_response(br#"{}"#).unwrap(), "");
    }

    #[test]
    fn test_parse_response_rejects_non_json() {
        assert!(matches!(
            parse_response(b"<html>"),
            Err(ModelError::Malformed(_))
        ));
    }
}
