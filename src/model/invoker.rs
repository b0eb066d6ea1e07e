//! Translation of a single source file through the model

use std::sync::Arc;

use tracing::{info, warn};

use super::client::{ModelClient, ModelError};
use super::prompt::build_prompt;
use super::response::extract_code_block;
use super::retry::RetryExecutor;

/// Builds the prompt, calls the model with retries, and pulls out the code block
#[derive(Clone)]
pub struct TranslationInvoker {
    client: Arc<dyn ModelClient>,
    retry: RetryExecutor,
}

impl TranslationInvoker {
    pub fn new(client: Arc<dyn ModelClient>, retry: RetryExecutor) -> Self {
        Self { client, retry }
    }

    pub fn uses_reference_documents(&self) -> bool {
        self.client.uses_reference_documents()
    }

    /// Translated code for `file_key`; empty when the answer has no `hcl` block
    pub async fn translate(
        &self,
        file_key: &str,
        source: &str,
        reference: Option<&str>,
    ) -> Result<String, ModelError> {
        if source.is_empty() {
            return Err(ModelError::InvalidRequest(format!(
                "source for '{file_key}' is empty"
            )));
        }

        let reference = reference.filter(|text| !text.is_empty());
        let prompt = build_prompt(file_key, source, reference);

        info!("Invoking model '{}' for file '{}'", self.client.name(), file_key);
        let response = self
            .retry
            .execute_with_retry(|| self.client.generate(&prompt), file_key)
            .await?;

        let code = extract_code_block(&response);
        if code.is_empty() {
            warn!("Extracted response text is empty for '{}'", file_key);
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock::ScriptedModelClient;

    #[tokio::test]
    async fn test_translate_extracts_code_from_answer() {
        let client = ScriptedModelClient::new();
        client.respond_with_hcl("resource \"google_compute_network\" \"main\" {}");
        let invoker = TranslationInvoker::new(Arc::new(client.clone()), RetryExecutor::disabled());

        let code = invoker
            .translate("users/u1/aws/vpc.tf", "resource \"aws_vpc\" \"main\" {}", Some("guide"))
            .await
            .unwrap();

        assert_eq!(code, "resource \"google_compute_network\" \"main\" {}");
        assert_eq!(client.call_count(), 1);
        assert!(client.prompts()[0].contains("guide"));
    }

    #[tokio::test]
    async fn test_answer_without_block_is_empty_not_error() {
        let client = ScriptedModelClient::new();
        client.respond_with("Sorry, no code today.");
        let invoker = TranslationInvoker::new(Arc::new(client), RetryExecutor::disabled());

        let code = invoker.translate("a.tf", "x", None).await.unwrap();
        assert_eq!(code, "");
    }

    #[tokio::test]
    async fn test_empty_source_is_rejected_without_calling_model() {
        let client = ScriptedModelClient::new();
        let invoker = TranslationInvoker::new(Arc::new(client.clone()), RetryExecutor::disabled());

        let err = invoker.translate("a.tf", "", None).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidRequest(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_reference_is_treated_as_absent() {
        let client = ScriptedModelClient::new();
        client.respond_with_hcl("x");
        let invoker = TranslationInvoker::new(Arc::new(client.clone()), RetryExecutor::disabled());

        invoker.translate("a.tf", "src", Some("")).await.unwrap();
        assert!(!client.prompts()[0].contains("PDF document"));
    }
}
