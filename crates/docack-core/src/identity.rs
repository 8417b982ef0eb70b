//! # Caller Identity
//!
//! The identity the identity provider resolves for a request: an email, the
//! provider's stable user id, and an optional role claim. Identities are
//! sourced per-request and never persisted by this system.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy;

/// The authenticated caller, as resolved from the session by the identity
/// provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The provider's stable user identifier.
    pub user_id: Uuid,
    /// The caller's email address.
    pub email: String,
    /// Role claim from the provider's app metadata, if any. Only the
    /// literal value `"admin"` grants admin capability.
    pub role: Option<String>,
}

impl Identity {
    /// Whether this identity's role claim grants admin capability.
    pub fn is_admin(&self) -> bool {
        policy::is_admin(self.role.as_deref())
    }

    /// Whether this identity's email belongs to the allowed organization.
    pub fn in_allowed_domain(&self) -> bool {
        policy::is_allowed_domain(&self.email)
    }
}
