//! Prompt construction for one source file

/// Instruction sent to the model for a single file.
///
/// The reference block is omitted when `reference` is `None`, which is the
/// case for knowledge-base backed models that retrieve their own context.
pub fn build_prompt(file_key: &str, source: &str, reference: Option<&str>) -> String {
    let mut prompt = String::new();

    if let Some(reference) = reference {
        prompt.push_str(
            "Use the following context from the PDF document to accurately convert AWS Terraform code to GCP. ",
        );
        prompt.push_str(
            "Make sure to keep all resource names, like 'name-vpc', exactly as they appear in the AWS code and RAG context:\n\n",
        );
        prompt.push_str(reference);
        prompt.push_str("\n\nNow, provide");
    } else {
        prompt.push_str(
            "Keep all resource names, like 'name-vpc', exactly as they appear in the AWS code. Provide",
        );
    }

    prompt.push_str(&format!(
        " only the minimal GCP Terraform code required to replicate the configuration in this AWS file ({file_key}). "
    ));
    prompt.push_str(
        "Return only the essential GCP code in a code block using this format:\n\n```hcl\n<code_here>\n```.\n\n",
    );
    prompt.push_str(source);
    prompt
}
