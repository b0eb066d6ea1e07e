//! Common test utilities and helpers

#![allow(dead_code)]

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use cloudport::app::AppContext;
use cloudport::config::AppConfig;
use cloudport::model::ScriptedModelClient;
use cloudport::reference::PagedTextParser;
use cloudport::storage::MemoryBackend;
use cloudport::subprocess::MockProcessRunner;

/// Test context builder wiring the application against in-memory doubles
pub struct TestContextBuilder {
    objects: Vec<(String, String)>,
    answers: Vec<String>,
    uses_reference: bool,
    config: AppConfig,
}

impl TestContextBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.storage.backend = cloudport::storage::BackendType::Memory;
        config.model.retry.attempts = 1;
        Self {
            objects: Vec::new(),
            answers: Vec::new(),
            uses_reference: true,
            config,
        }
    }

    /// Seed an object in the store
    pub fn with_object(mut self, key: &str, content: &str) -> Self {
        self.objects.push((key.to_string(), content.to_string()));
        self
    }

    /// Queue a model answer containing `code` in an hcl block
    pub fn with_model_answer(mut self, code: &str) -> Self {
        self.answers.push(code.to_string());
        self
    }

    /// Model that answers without reference documents
    pub fn without_reference_documents(mut self) -> Self {
        self.uses_reference = false;
        self
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.config.translation.min_interval = interval;
        self
    }

    pub fn with_config(mut self, configure: impl FnOnce(&mut AppConfig)) -> Self {
        configure(&mut self.config);
        self
    }

    pub async fn build(self) -> Result<TestContext> {
        let workspace_root = TempDir::new()?;
        let mut config = self.config;
        config.apply.workspace_root = workspace_root.path().to_path_buf();

        let backend = MemoryBackend::new();
        for (key, content) in &self.objects {
            backend.insert(key, content.as_str()).await;
        }

        let model = if self.uses_reference {
            ScriptedModelClient::new()
        } else {
            ScriptedModelClient::new().without_reference_documents()
        };
        for code in &self.answers {
            model.respond_with_hcl(code);
        }

        let runner = MockProcessRunner::new();
        let context = AppContext::from_parts(
            &config,
            Arc::new(backend.clone()),
            Arc::new(model.clone()),
            Arc::new(PagedTextParser),
            Arc::new(runner.clone()),
        );

        Ok(TestContext {
            backend,
            model,
            runner,
            context,
            config,
            _workspace_root: workspace_root,
        })
    }
}

impl Default for TestContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wired application plus handles on its doubles
pub struct TestContext {
    pub backend: MemoryBackend,
    pub model: ScriptedModelClient,
    pub runner: MockProcessRunner,
    pub context: AppContext,
    pub config: AppConfig,
    _workspace_root: TempDir,
}

impl TestContext {
    /// Answer `terraform <args>` with `exit_code`
    pub fn expect_terraform(&self, args: &'static [&'static str], exit_code: i32) {
        let mut runner = self.runner.clone();
        runner
            .expect_command("terraform")
            .with_args(move |actual| actual == args)
            .returns_exit_code(exit_code)
            .returns_stderr(if exit_code == 0 { "" } else { "Error: Invalid provider configuration" })
            .finish();
    }
}
