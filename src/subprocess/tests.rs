use super::*;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_production_runner_success() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("echo")
        .arg("hello world")
        .build();

    let output = runner.run(command).await.unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout.trim(), "hello world");
    assert!(output.stderr.is_empty());
}

#[tokio::test]
async fn test_production_runner_failure() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("false").build();

    let output = runner.run(command).await.unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_production_runner_command_not_found() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("nonexistent-command-12345").build();

    let result = runner.run(command).await;
    assert!(matches!(
        result.unwrap_err(),
        ProcessError::CommandNotFound(_)
    ));
}

#[tokio::test]
async fn test_production_runner_timeout() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sleep")
        .arg("5")
        .timeout(Duration::from_millis(100))
        .build();

    let result = runner.run(command).await;
    assert!(matches!(result.unwrap_err(), ProcessError::Timeout(_)));
}

#[tokio::test]
async fn test_child_sees_only_forwarded_environment() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("env")
        .env("CLOUDPORT_CHILD_ONLY", "/tmp/key/credential.json")
        .build();

    let output = runner.run(command).await.unwrap();
    assert!(output.status.success());

    let allowed = [
        "PATH",
        "HOME",
        "USER",
        "SHELL",
        "TMPDIR",
        "TERM",
        "LANG",
        "LC_ALL",
        "LC_CTYPE",
        "CLOUDPORT_CHILD_ONLY",
    ];
    for line in output.stdout.lines().filter(|line| line.contains('=')) {
        let name = line.split('=').next().unwrap_or_default();
        assert!(allowed.contains(&name), "unexpected variable {name}");
    }
    assert!(output
        .stdout
        .contains("CLOUDPORT_CHILD_ONLY=/tmp/key/credential.json"));
    assert!(std::env::var("CLOUDPORT_CHILD_ONLY").is_err());
}

#[tokio::test]
async fn test_working_directory_is_applied() {
    let temp = tempfile::TempDir::new().unwrap();
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("pwd")
        .current_dir(temp.path())
        .build();

    let output = runner.run(command).await.unwrap();
    let reported = std::fs::canonicalize(output.stdout.trim()).unwrap();
    assert_eq!(reported, std::fs::canonicalize(temp.path()).unwrap());
}

#[tokio::test]
async fn test_mock_runner_answers_first_matching_expectation() {
    let mut mock = MockProcessRunner::new();

    mock.expect_command("terraform")
        .with_args(|args| args == ["validate"])
        .returns_exit_code(1)
        .returns_stderr("Error: missing provider\n")
        .finish();
    mock.expect_command("terraform").finish();

    let failed = mock
        .run(ProcessCommandBuilder::new("terraform").arg("validate").build())
        .await
        .unwrap();
    let other = mock
        .run(ProcessCommandBuilder::new("terraform").arg("version").build())
        .await
        .unwrap();

    assert_eq!(failed.status.code(), Some(1));
    assert_eq!(failed.stderr, "Error: missing provider\n");
    assert!(other.status.success());
    assert!(mock.verify_called("terraform", 2));
    assert!(mock.was_called_with("terraform", &["version"]));
}

#[tokio::test]
async fn test_mock_runner_rejects_unexpected_command() {
    let mut mock = MockProcessRunner::new();
    mock.expect_command("terraform")
        .with_args(|args| args == ["init"])
        .finish();

    let result = mock
        .run(ProcessCommandBuilder::new("terraform").arg("destroy").build())
        .await;

    assert!(matches!(result, Err(ProcessError::MockExpectationNotMet(ref message)) if message.contains("terraform destroy")));
    assert_eq!(mock.get_call_history().len(), 1);
}

#[tokio::test]
async fn test_terraform_runner_builds_scoped_commands() {
    let mut mock = MockProcessRunner::new();

    mock.expect_command("terraform")
        .with_args(|args| args == ["init"])
        .finish();
    mock.expect_command("terraform")
        .with_args(|args| args == ["apply", "-auto-approve"])
        .returns_exit_code(1)
        .returns_stderr("Error: invalid provider")
        .finish();

    let terraform = TerraformRunner::new(Arc::new(mock.clone()), "terraform", Duration::from_secs(60))
        .with_passthrough_env(vec!["HTTPS_PROXY".to_string()]);
    let dir = Path::new("/tmp/u1/terraform");
    let env = HashMap::from([(
        "GOOGLE_APPLICATION_CREDENTIALS".to_string(),
        "/tmp/u1/terraform/key/credential.json".to_string(),
    )]);

    let init = terraform.run(terraform.init_command(dir, &env)).await.unwrap();
    let apply = terraform.run(terraform.apply_command(dir, &env)).await.unwrap();

    assert!(init.status.success());
    assert_eq!(apply.status.code(), Some(1));
    assert_eq!(apply.stderr, "Error: invalid provider");

    let history = mock.get_call_history();
    assert_eq!(history.len(), 2);
    for call in &history {
        assert_eq!(call.working_dir.as_deref(), Some(dir));
        assert_eq!(call.timeout, Some(Duration::from_secs(60)));
        assert_eq!(call.inherit_env, vec!["HTTPS_PROXY".to_string()]);
        assert_eq!(
            call.env.get("GOOGLE_APPLICATION_CREDENTIALS").map(String::as_str),
            Some("/tmp/u1/terraform/key/credential.json")
        );
    }
    assert_eq!(history[1].display(), "terraform apply -auto-approve");
}

#[test]
fn test_process_command_builder() {
    let command = ProcessCommandBuilder::new("test")
        .arg("arg1")
        .args(["arg2", "arg3"])
        .env("KEY1", "value1")
        .envs([("KEY2", "value2"), ("KEY3", "value3")])
        .inherit_env(["HTTP_PROXY"])
        .current_dir(Path::new("/tmp"))
        .timeout(Duration::from_secs(30))
        .build();

    assert_eq!(command.program, "test");
    assert_eq!(command.args, vec!["arg1", "arg2", "arg3"]);
    assert_eq!(command.env.get("KEY1"), Some(&"value1".to_string()));
    assert_eq!(command.env.get("KEY2"), Some(&"value2".to_string()));
    assert_eq!(command.env.get("KEY3"), Some(&"value3".to_string()));
    assert_eq!(command.inherit_env, vec!["HTTP_PROXY".to_string()]);
    assert_eq!(command.working_dir, Some(std::path::PathBuf::from("/tmp")));
    assert_eq!(command.timeout, Some(Duration::from_secs(30)));
}
