//! Maps a source file to the reference document that grounds its translation.

/// Ordered keyword → document stem table. The first keyword found wins.
const TOPICS: [(&str, &str); 4] = [
    ("eip", "eip"),
    ("vpc", "vpc"),
    ("subnet", "subnet"),
    ("route-table", "route-table"),
];

/// Document used when no keyword matches.
const FALLBACK_TOPIC: &str = "rag_full";

/// Reference document key for `file_key`, e.g. `rag/vpc.pdf`.
///
/// Matching is case-insensitive over the whole key, so a keyword in a folder
/// name counts too.
pub fn select_context(reference_prefix: &str, file_key: &str) -> String {
    let lowered = file_key.to_lowercase();
    let topic = TOPICS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, topic)| *topic)
        .unwrap_or(FALLBACK_TOPIC);

    format!("{}/{}.pdf", reference_prefix.trim_end_matches('/'), topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_selection() {
        assert_eq!(select_context("rag", "users/a/aws/eip.tf"), "rag/eip.pdf");
        assert_eq!(select_context("rag", "users/a/aws/vpc.tf"), "rag/vpc.pdf");
        assert_eq!(
            select_context("rag", "users/a/aws/private-subnet.tf"),
            "rag/subnet.pdf"
        );
        assert_eq!(
            select_context("rag", "users/a/aws/route-table.tf"),
            "rag/route-table.pdf"
        );
        assert_eq!(
            select_context("rag", "users/a/aws/security-group.tf"),
            "rag/rag_full.pdf"
        );
    }

    #[test]
    fn test_selection_is_case_insensitive() {
        assert_eq!(
            select_context("rag", "VPC-main.tf"),
            select_context("rag", "vpc-main.tf")
        );
        assert_eq!(select_context("rag", "SUBNET.TF"), "rag/subnet.pdf");
    }

    #[test]
    fn test_first_keyword_in_table_order_wins() {
        // "eip" is checked before "vpc" regardless of position in the name
        assert_eq!(select_context("rag", "vpc-eip.tf"), "rag/eip.pdf");
        assert_eq!(select_context("rag", "vpc-subnet.tf"), "rag/vpc.pdf");
    }

    #[test]
    fn test_prefix_trailing_slash() {
        assert_eq!(select_context("docs/", "x.tf"), "docs/rag_full.pdf");
    }
}
