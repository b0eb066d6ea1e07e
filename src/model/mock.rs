use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::client::{ModelClient, ModelError};

/// Model client that replays queued answers and records every prompt
#[derive(Clone)]
pub struct ScriptedModelClient {
    responses: Arc<Mutex<VecDeque<Result<String, ModelError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    uses_reference: bool,
}

impl ScriptedModelClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            uses_reference: true,
        }
    }

    /// Behave like a knowledge-base model that needs no reference text
    pub fn without_reference_documents(mut self) -> Self {
        self.uses_reference = false;
        self
    }

    /// Queue a raw answer
    pub fn respond_with(&self, text: &str) -> &Self {
        self.push(Ok(text.to_string()))
    }

    /// Queue an answer wrapping `code` in an `hcl` fence
    pub fn respond_with_hcl(&self, code: &str) -> &Self {
        self.push(Ok(format!("Here is the GCP code:\n```hcl\n{code}\n```\n")))
    }

    /// Queue a failure
    pub fn fail_with(&self, error: ModelError) -> &Self {
        self.push(Err(error))
    }

    fn push(&self, response: Result<String, ModelError>) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
        self
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

impl Default for ScriptedModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(ModelError::InvalidRequest(
                    "no scripted response left".to_string(),
                ))
            })
    }

    fn uses_reference_documents(&self) -> bool {
        self.uses_reference
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
