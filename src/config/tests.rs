use super::*;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_defaults_match_legacy_service() {
    let config = AppConfig::default();

    assert_eq!(config.log_level, "info");
    assert_eq!(config.server.bind.port(), 5000);
    assert_eq!(config.server.translate_path, "/api/bedrock/username");
    assert_eq!(config.server.apply_path, "/api/terraform/confirm");
    assert_eq!(config.storage.bucket, "aiwa-terraform");
    assert_eq!(config.storage.users_prefix, "users");
    assert_eq!(config.storage.reference_prefix, "rag");
    assert_eq!(config.model.model_id, "amazon.titan-text-premier-v1:0");
    assert_eq!(config.model.max_tokens, 3072);
    assert_eq!(config.translation.min_interval, Duration::from_secs(5));
    assert!(!config.translation.persist_empty);
    assert_eq!(config.apply.credential_env, "GOOGLE_APPLICATION_CREDENTIALS");
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let config = AppConfig::from_toml(
        r#"
log_level = "debug"

[server]
translate_path = "/bedrock/api/username"
apply_path = "/bedrock/api/confirm"

[model]
backend = "knowledge_base"
knowledge_base_id = "KB123"
model_arn = "arn:aws:bedrock:us-east-1::foundation-model/amazon.titan-text-premier-v1:0"

[model.retry]
attempts = 2
initial_delay = "500ms"

[translation]
min_interval = "1s"
persist_empty = true

[apply]
timeout = "5m"
passthrough_env = ["HTTPS_PROXY"]
"#,
    )
    .unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.server.translate_path, "/bedrock/api/username");
    assert_eq!(config.server.bind.port(), 5000);
    assert_eq!(config.model.backend, ModelBackend::KnowledgeBase);
    assert_eq!(config.model.retry.attempts, 2);
    assert_eq!(config.model.retry.initial_delay, Duration::from_millis(500));
    assert_eq!(config.model.retry.max_delay, Duration::from_secs(30));
    assert_eq!(config.translation.min_interval, Duration::from_secs(1));
    assert!(config.translation.persist_empty);
    assert_eq!(config.apply.timeout, Duration::from_secs(300));
    assert_eq!(config.apply.passthrough_env, vec!["HTTPS_PROXY".to_string()]);
    assert_eq!(config.storage.bucket, "aiwa-terraform");
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_overrides_file_values() {
    let mut config = AppConfig::default();
    config
        .merge_env_with(env_of(&[
            ("CLOUDPORT_BUCKET", "other-bucket"),
            ("CLOUDPORT_BIND", "127.0.0.1:8080"),
            ("CLOUDPORT_STORAGE_BACKEND", "file"),
            ("CLOUDPORT_STORAGE_ROOT", "/srv/objects"),
            ("CLOUDPORT_MIN_INTERVAL", "250ms"),
            ("CLOUDPORT_MODEL_BACKEND", "knowledge-base"),
            ("CLOUDPORT_KNOWLEDGE_BASE_ID", "KB1"),
            ("CLOUDPORT_MODEL_ARN", "arn:model"),
            ("CLOUDPORT_TERRAFORM_BIN", "/usr/local/bin/terraform"),
        ]))
        .unwrap();

    assert_eq!(config.storage.bucket, "other-bucket");
    assert_eq!(config.server.bind.to_string(), "127.0.0.1:8080");
    assert_eq!(config.storage.backend, BackendType::File);
    assert_eq!(config.storage.root, Some(PathBuf::from("/srv/objects")));
    assert_eq!(config.translation.min_interval, Duration::from_millis(250));
    assert_eq!(config.model.backend, ModelBackend::KnowledgeBase);
    assert_eq!(config.apply.terraform_bin, "/usr/local/bin/terraform");
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_env_value_is_an_error() {
    let mut config = AppConfig::default();
    let err = config
        .merge_env_with(env_of(&[("CLOUDPORT_MIN_INTERVAL", "soon")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnv { ref name, .. } if name == "CLOUDPORT_MIN_INTERVAL"));

    let err = config
        .merge_env_with(env_of(&[("CLOUDPORT_STORAGE_BACKEND", "ftp")]))
        .unwrap_err();
    assert!(err.to_string().contains("CLOUDPORT_STORAGE_BACKEND"));
}

#[test]
fn test_validate_reports_every_problem() {
    let mut config = AppConfig::default();
    config.log_level = "loud".to_string();
    config.storage.backend = BackendType::File;
    config.model.backend = ModelBackend::KnowledgeBase;
    config.model.temperature = 1.5;
    config.model.retry.attempts = 0;

    let err = config.validate().unwrap_err();
    match err {
        ConfigError::Invalid(problems) => {
            assert_eq!(problems.len(), 6, "{problems:?}");
            assert!(problems.iter().any(|p| p.contains("log_level")));
            assert!(problems.iter().any(|p| p.contains("storage.root")));
            assert!(problems.iter().any(|p| p.contains("knowledge_base_id")));
            assert!(problems.iter().any(|p| p.contains("model_arn")));
            assert!(problems.iter().any(|p| p.contains("temperature")));
            assert!(problems.iter().any(|p| p.contains("attempts")));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_validate_rejects_unusable_retry_settings() {
    let mut config = AppConfig::default();
    config.model.retry.backoff = BackoffStrategy::Exponential { base: -2.0 };
    config.model.retry.jitter_factor = 1.5;
    config.model.retry.initial_delay = Duration::from_secs(60);

    let err = config.validate().unwrap_err();
    match err {
        ConfigError::Invalid(problems) => {
            assert_eq!(problems.len(), 3, "{problems:?}");
            assert!(problems.iter().any(|p| p.contains("backoff base")));
            assert!(problems.iter().any(|p| p.contains("jitter_factor")));
            assert!(problems.iter().any(|p| p.contains("initial_delay")));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_retry_backoff_parses_from_toml() {
    let config = AppConfig::from_toml(
        r#"
[model.retry]
attempts = 80
backoff = { exponential = { base = 0.0 } }
"#,
    )
    .unwrap();
    assert!(config.validate().is_err());

    let config = AppConfig::from_toml("[model.retry]\nattempts = 80\n").unwrap();
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_loader_reads_default_file_from_dir() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(DEFAULT_CONFIG_FILE),
        "[storage]\nbucket = \"from-file\"\n",
    )
    .unwrap();

    let config = ConfigLoader::new()
        .in_dir(temp.path())
        .without_environment()
        .load()
        .await
        .unwrap();

    assert_eq!(config.storage.bucket, "from-file");
}

#[tokio::test]
async fn test_loader_without_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .in_dir(temp.path())
        .without_environment()
        .load()
        .await
        .unwrap();

    assert_eq!(config.storage.bucket, "aiwa-terraform");
}

#[tokio::test]
async fn test_loader_explicit_path_must_exist() {
    let temp = TempDir::new().unwrap();
    let err = ConfigLoader::new()
        .with_path(Some(temp.path().join("missing.toml")))
        .without_environment()
        .load()
        .await
        .unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}

#[tokio::test]
async fn test_loader_reports_parse_errors_with_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    fs::write(&path, "[server\nbind = 1").unwrap();

    let err = ConfigLoader::new()
        .with_path(Some(path.clone()))
        .without_environment()
        .load()
        .await
        .unwrap_err();

    match err {
        ConfigError::Parse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error {other}"),
    }
}
