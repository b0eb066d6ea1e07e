//! Bedrock Agent `RetrieveAndGenerate` client bound to a knowledge base

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::types::{
    KnowledgeBaseRetrieveAndGenerateConfiguration, RetrieveAndGenerateConfiguration,
    RetrieveAndGenerateInput, RetrieveAndGenerateType,
};
use aws_sdk_bedrockagentruntime::Client;
use tracing::{debug, trace};

use super::bedrock::classify_sdk_error;
use super::client::{ModelClient, ModelError};
use super::config::ModelConfig;

/// Retrieval-augmented generation; the knowledge base supplies the context
pub struct KnowledgeBaseClient {
    client: Client,
    knowledge_base_id: String,
    model_arn: String,
}

impl KnowledgeBaseClient {
    pub async fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let aws_config = aws_config::from_env()
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;
        Self::from_client(Client::new(&aws_config), config)
    }

    pub fn from_client(client: Client, config: &ModelConfig) -> Result<Self, ModelError> {
        let knowledge_base_id = config.knowledge_base_id.clone().ok_or_else(|| {
            ModelError::Config("model.knowledge_base_id is required".to_string())
        })?;
        let model_arn = config
            .model_arn
            .clone()
            .ok_or_else(|| ModelError::Config("model.model_arn is required".to_string()))?;

        Ok(Self {
            client,
            knowledge_base_id,
            model_arn,
        })
    }

    fn configuration(&self) -> Result<RetrieveAndGenerateConfiguration, ModelError> {
        let knowledge_base = KnowledgeBaseRetrieveAndGenerateConfiguration::builder()
            .knowledge_base_id(&self.knowledge_base_id)
            .model_arn(&self.model_arn)
            .build()
            .map_err(|e| ModelError::InvalidRequest(e.to_string()))?;

        RetrieveAndGenerateConfiguration::builder()
            .r#type(RetrieveAndGenerateType::KnowledgeBase)
            .knowledge_base_configuration(knowledge_base)
            .build()
            .map_err(|e| ModelError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl ModelClient for KnowledgeBaseClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        debug!(
            "Retrieve-and-generate against knowledge base '{}' ({} prompt bytes)",
            self.knowledge_base_id,
            prompt.len()
        );

        let input = RetrieveAndGenerateInput::builder()
            .text(prompt)
            .build()
            .map_err(|e| ModelError::InvalidRequest(e.to_string()))?;

        let response = self
            .client
            .retrieve_and_generate()
            .input(input)
            .retrieve_and_generate_configuration(self.configuration()?)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let text = response
            .output()
            .map(|output| output.text().to_string())
            .unwrap_or_default();
        trace!("Model response: {}", text);
        Ok(text)
    }

    fn uses_reference_documents(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        &self.model_arn
    }
}
