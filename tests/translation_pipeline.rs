mod common;

use std::time::Duration;
use tokio::time::Instant;

use cloudport::storage::Platform;
use cloudport::translate::{FileStatus, SkipReason, TranslationOutcome};
use common::TestContextBuilder;

#[tokio::test(start_paused = true)]
async fn test_single_file_end_to_end() {
    let ctx = TestContextBuilder::new()
        .with_object("users/u1/aws/vpc.tf", "X")
        .with_object("rag/vpc.pdf", "VPC migration notes")
        .with_model_answer("Y")
        .build()
        .await
        .unwrap();

    let start = Instant::now();
    let outcome = ctx.context.translation.run("u1", Platform::Aws).await.unwrap();

    let report = match outcome {
        TranslationOutcome::Completed(report) => report,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(ctx.backend.text("users/u1/gcp/vpc.tf").await.as_deref(), Some("Y"));
    assert_eq!(ctx.model.call_count(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(report.translated(), 1);
    assert_eq!(report.user, "u1");
}

#[tokio::test]
async fn test_no_eligible_files_is_not_found() {
    let ctx = TestContextBuilder::new()
        .with_object("users/u1/aws/main.tf", "terraform {}")
        .with_object("users/u1/aws/terraform.tfvars", "region = \"x\"")
        .with_object("users/u2/aws/vpc.tf", "vpc")
        .build()
        .await
        .unwrap();

    let outcome = ctx.context.translation.run("u1", Platform::Aws).await.unwrap();

    assert!(matches!(outcome, TranslationOutcome::NotFound { .. }));
    assert_eq!(ctx.model.call_count(), 0);
    assert_eq!(ctx.backend.put_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_mixed_batch_reports_each_file() {
    let ctx = TestContextBuilder::new()
        .with_object("users/u1/aws/empty.tf", "")
        .with_object("users/u1/aws/eip.tf", "resource \"aws_eip\" \"ip\" {}")
        .with_object("users/u1/aws/subnet.tf", "resource \"aws_subnet\" \"a\" {}")
        .with_object("users/u1/aws/main.tf", "provider \"aws\" {}")
        .with_object("rag/subnet.pdf", "Subnet guide")
        .with_model_answer("resource \"google_compute_subnetwork\" \"a\" {}")
        .build()
        .await
        .unwrap();

    let outcome = ctx.context.translation.run("u1", Platform::Aws).await.unwrap();
    let report = match outcome {
        TranslationOutcome::Completed(report) => report,
        other => panic!("unexpected outcome {other:?}"),
    };

    let keys: Vec<&str> = report.files.iter().map(|f| f.source_key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["users/u1/aws/eip.tf", "users/u1/aws/empty.tf", "users/u1/aws/subnet.tf"]
    );
    assert!(matches!(
        report.files[0].status,
        FileStatus::Skipped { reason: SkipReason::ReferenceUnavailable, .. }
    ));
    assert!(matches!(
        report.files[1].status,
        FileStatus::Skipped { reason: SkipReason::EmptySource, .. }
    ));
    assert!(report.files[2].is_translated());
    assert_eq!(ctx.model.call_count(), 1);
    assert!(ctx.backend.object("users/u1/gcp/main.tf").await.is_none());
}

#[tokio::test]
async fn test_user_names_containing_platform_token_keep_their_folder() {
    let ctx = TestContextBuilder::new()
        .with_object("users/aws-team@example.com/aws/vpc.tf", "vpc")
        .with_model_answer("network")
        .without_reference_documents()
        .build()
        .await
        .unwrap();

    ctx.context
        .translation
        .run("aws-team@example.com", Platform::Aws)
        .await
        .unwrap();

    assert_eq!(
        ctx.backend
            .text("users/aws-team@example.com/gcp/vpc.tf")
            .await
            .as_deref(),
        Some("network")
    );
}
