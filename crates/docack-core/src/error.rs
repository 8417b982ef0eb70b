//! # Error Hierarchy
//!
//! Structured validation errors for the domain layer, built with
//! `thiserror`.

use thiserror::Error;

/// Domain-primitive validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An email outside the organizational domain attempted sign-in.
    #[error("only {domain} emails are allowed, got: {email}", domain = crate::policy::ALLOWED_DOMAIN)]
    DisallowedEmailDomain {
        /// The rejected address.
        email: String,
    },

    /// The stored or submitted visibility value is not `all`/`targeted`.
    #[error("invalid visibility value: {0}")]
    InvalidVisibility(String),

    /// A required upload field was missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_domain_message_names_the_policy_domain() {
        let err = ValidationError::DisallowedEmailDomain {
            email: "x@example.com".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("@docack.io"), "got: {msg}");
        assert!(msg.contains("x@example.com"));
    }

    #[test]
    fn missing_field_names_the_field() {
        assert!(ValidationError::MissingField("title")
            .to_string()
            .contains("title"));
    }
}
