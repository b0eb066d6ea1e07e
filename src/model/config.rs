//! Model configuration

use serde::{Deserialize, Serialize};

use super::retry::RetryConfig;

/// Which Bedrock API answers translation prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelBackend {
    /// `InvokeModel` text completion, grounded with reference document text
    #[default]
    Text,
    /// `RetrieveAndGenerate` against a knowledge base
    KnowledgeBase,
}

impl std::str::FromStr for ModelBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "text" => Ok(Self::Text),
            "knowledge_base" => Ok(Self::KnowledgeBase),
            other => Err(format!("unknown model backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub backend: ModelBackend,

    /// AWS region of the Bedrock endpoint
    #[serde(default = "default_region")]
    pub region: String,

    /// Model identifier for the text backend
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Maximum tokens in the model's answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Knowledge base id, required for the knowledge_base backend
    #[serde(default)]
    pub knowledge_base_id: Option<String>,

    /// Model or inference profile ARN, required for the knowledge_base backend
    #[serde(default)]
    pub model_arn: Option<String>,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            region: default_region(),
            model_id: default_model_id(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            knowledge_base_id: None,
            model_arn: None,
            retry: RetryConfig::default(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_model_id() -> String {
    "amazon.titan-text-premier-v1:0".to_string()
}

fn default_max_tokens() -> u32 {
    3072
}

fn default_temperature() -> f32 {
    0.3
}

fn default_top_p() -> f32 {
    0.7
}
