//! Extraction of the translated code from free-text model output

use once_cell::sync::Lazy;
use regex::Regex;

static HCL_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```hcl\n(.*?)\n```").expect("Valid regex pattern"));

/// Body of the first fenced `hcl` block, or an empty string if there is none
pub fn extract_code_block(response: &str) -> String {
    HCL_BLOCK
        .captures(response)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_block_between_markers() {
        assert_eq!(
            extract_code_block("intro ```hcl\nresource x {}\n``` trailing"),
            "resource x {}"
        );
    }

    #[test]
    fn test_no_block_yields_empty() {
        assert_eq!(extract_code_block("I cannot help with that."), "");
        assert_eq!(extract_code_block("```terraform\nresource x {}\n```"), "");
    }

    #[test]
    fn test_multiline_block_and_first_match_only() {
        let response = "Here:\n```hcl\nresource \"a\" {\n  name = \"n\"\n}\n```\nand\n```hcl\nsecond\n```";
        assert_eq!(
            extract_code_block(response),
            "resource \"a\" {\n  name = \"n\"\n}"
        );
    }
}
