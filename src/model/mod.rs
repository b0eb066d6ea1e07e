//! Translation invoker: prompt, model call, code extraction
//!
//! Two hosted model flavours sit behind [`ModelClient`]: a direct text
//! completion grounded with reference text, and a knowledge-base backed
//! retrieve-and-generate call that brings its own context.

pub mod bedrock;
pub mod client;
pub mod config;
pub mod invoker;
pub mod knowledge_base;
pub mod mock;
pub mod prompt;
pub mod response;
pub mod retry;

pub use bedrock::TextCompletionClient;
pub use client::{ModelClient, ModelError};
pub use config::{ModelBackend, ModelConfig};
pub use invoker::TranslationInvoker;
pub use knowledge_base::KnowledgeBaseClient;
pub use mock::ScriptedModelClient;
pub use prompt::build_prompt;
pub use response::extract_code_block;
pub use retry::{BackoffStrategy, RetryConfig, RetryExecutor};

use std::sync::Arc;

/// Build the configured model client
pub async fn build_client(config: &ModelConfig) -> Result<Arc<dyn ModelClient>, ModelError> {
    match config.backend {
        ModelBackend::Text => Ok(Arc::new(TextCompletionClient::new(config).await)),
        ModelBackend::KnowledgeBase => Ok(Arc::new(KnowledgeBaseClient::new(config).await?)),
    }
}
