//! Wiring of gateway, model client and orchestrators

use std::sync::Arc;
use tracing::info;

use crate::apply::ApplyOrchestrator;
use crate::config::AppConfig;
use crate::error::Result;
use crate::model::{build_client, ModelClient, RetryExecutor, TranslationInvoker};
use crate::reference::{DocumentParser, PdfParser, ReferenceExtractor};
use crate::storage::{ObjectGateway, ObjectStore, StorageFactory};
use crate::subprocess::{ProcessRunner, TerraformRunner, TokioProcessRunner};
use crate::translate::TranslationOrchestrator;

/// Everything a request handler or CLI command needs
#[derive(Clone)]
pub struct AppContext {
    pub gateway: ObjectGateway,
    pub translation: Arc<TranslationOrchestrator>,
    pub apply: Arc<ApplyOrchestrator>,
}

impl AppContext {
    /// Connect to the configured store and model service
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store = StorageFactory::from_config(&config.storage).await?;
        let model = build_client(&config.model).await?;
        info!(
            storage = store.name(),
            model = model.name(),
            "Initialized backends"
        );

        Ok(Self::from_parts(
            config,
            store,
            model,
            Arc::new(PdfParser),
            Arc::new(TokioProcessRunner),
        ))
    }

    /// Assemble from already constructed backends
    pub fn from_parts(
        config: &AppConfig,
        store: Arc<dyn ObjectStore>,
        model: Arc<dyn ModelClient>,
        parser: Arc<dyn DocumentParser>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let gateway = ObjectGateway::new(store);

        let invoker = TranslationInvoker::new(model, RetryExecutor::new(config.model.retry.clone()));
        let translation = TranslationOrchestrator::new(
            gateway.clone(),
            ReferenceExtractor::new(gateway.clone(), parser),
            invoker,
            &config.storage,
            config.translation.clone(),
        );

        let terraform = TerraformRunner::new(runner, &config.apply.terraform_bin, config.apply.timeout)
            .with_passthrough_env(config.apply.passthrough_env.clone());
        let apply = ApplyOrchestrator::new(
            gateway.clone(),
            terraform,
            &config.storage,
            config.apply.clone(),
        );

        Self {
            gateway,
            translation: Arc::new(translation),
            apply: Arc::new(apply),
        }
    }
}
