//! Model client abstraction and its error taxonomy

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Rate limit exceeded: {0}")]
    Throttled(String),

    #[error("Model call timed out: {0}")]
    Timeout(String),

    #[error("Model service unavailable: {0}")]
    Unavailable(String),

    #[error("Model service fault: {0}")]
    Service(String),

    #[error("Not authorized to invoke model: {0}")]
    Auth(String),

    #[error("Invalid model request: {0}")]
    InvalidRequest(String),

    #[error("Failed to parse model response: {0}")]
    Malformed(String),

    #[error("Model configuration error: {0}")]
    Config(String),
}

impl ModelError {
    /// Throttling and transient service faults are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Throttled(_) | Self::Timeout(_) | Self::Unavailable(_) | Self::Service(_)
        )
    }

    /// Map an AWS service error code onto the taxonomy
    pub fn from_service_code(code: Option<&str>, message: String) -> Self {
        match code.unwrap_or_default() {
            "ThrottlingException"
            | "TooManyRequestsException"
            | "ServiceQuotaExceededException" => Self::Throttled(message),
            "ModelTimeoutException" | "RequestTimeout" => Self::Timeout(message),
            "ServiceUnavailableException" | "ModelNotReadyException" => {
                Self::Unavailable(message)
            }
            "InternalServerException" | "DependencyFailedException" | "BadGatewayException" => {
                Self::Service(message)
            }
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "ExpiredTokenException" => Self::Auth(message),
            _ => Self::InvalidRequest(message),
        }
    }
}

/// A hosted generative model that answers a single prompt
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Raw text of the model's answer
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    /// Whether prompts should embed reference document text. Knowledge-base
    /// models retrieve their own context and return `false`.
    fn uses_reference_documents(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_codes_map_to_retryable_kinds() {
        let throttled = ModelError::from_service_code(Some("ThrottlingException"), "slow".into());
        assert_eq!(throttled, ModelError::Throttled("slow".into()));
        assert!(throttled.is_retryable());

        assert!(ModelError::from_service_code(Some("InternalServerException"), String::new())
            .is_retryable());
        assert!(ModelError::from_service_code(Some("ModelTimeoutException"), String::new())
            .is_retryable());
    }

    #[test]
    fn test_client_faults_are_not_retryable() {
        let denied = ModelError::from_service_code(Some("AccessDeniedException"), String::new());
        assert!(matches!(denied, ModelError::Auth(_)));
        assert!(!denied.is_retryable());

        let invalid = ModelError::from_service_code(Some("ValidationException"), String::new());
        assert!(matches!(invalid, ModelError::InvalidRequest(_)));
        assert!(!invalid.is_retryable());

        assert!(!ModelError::from_service_code(None, String::new()).is_retryable());
    }
}
