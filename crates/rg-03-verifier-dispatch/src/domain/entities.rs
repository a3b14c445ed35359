//! # Verification Entities

use serde::{Deserialize, Serialize};

/// Outcome of verifying one transaction against its stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the transaction may be appended.
    pub valid: bool,
    /// Reason for rejection; empty when valid.
    #[serde(default)]
    pub error_message: String,
}

impl VerificationResult {
    /// Accepting result.
    pub fn valid() -> Self {
        Self {
            valid: true,
            error_message: String::new(),
        }
    }

    /// Rejecting result carrying `message`.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error_message: message.into(),
        }
    }
}

/// Verifier family of a payload type: everything before the last `.`.
///
/// `project_origin.electricity.v1.IssuedEvent` belongs to
/// `project_origin.electricity.v1`. Returns `None` for a payload type
/// without a namespace.
pub fn payload_family(payload_type: &str) -> Option<&str> {
    match payload_type.rsplit_once('.') {
        Some((family, _)) if !family.is_empty() => Some(family),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_is_namespace_prefix() {
        assert_eq!(
            payload_family("project_origin.electricity.v1.IssuedEvent"),
            Some("project_origin.electricity.v1")
        );
        assert_eq!(payload_family("chat.Message"), Some("chat"));
    }

    #[test]
    fn test_payload_type_without_namespace_has_no_family() {
        assert_eq!(payload_family("IssuedEvent"), None);
        assert_eq!(payload_family(".IssuedEvent"), None);
        assert_eq!(payload_family(""), None);
    }

    #[test]
    fn test_result_constructors() {
        assert!(VerificationResult::valid().valid);
        let rejected = VerificationResult::invalid("bad signature");
        assert!(!rejected.valid);
        assert_eq!(rejected.error_message, "bad signature");
    }
}
