//! # Domain Policy
//!
//! Two pure predicates governing who may use the system and who may
//! administer it. No external calls, no configuration lookups.
//!
//! An earlier design also consulted a hardcoded allow-listed admin email;
//! current policy trusts only the role claim set by the identity provider.

/// The organizational email domain suffix. Sign-in is restricted to
/// addresses ending in this suffix, matched case-insensitively.
pub const ALLOWED_DOMAIN: &str = "@docack.io";

/// The literal role value that grants admin capability.
pub const ADMIN_ROLE: &str = "admin";

/// Whether an email address belongs to the allowed organization.
///
/// Case-insensitive suffix match against [`ALLOWED_DOMAIN`]. Empty or
/// malformed input returns `false` — there is no error path.
pub fn is_allowed_domain(email: &str) -> bool {
    let email = email.trim();
    // The address must have a local part; the bare suffix is not a mailbox.
    email.len() > ALLOWED_DOMAIN.len() && email.to_lowercase().ends_with(ALLOWED_DOMAIN)
}

/// Whether a role claim grants admin capability.
///
/// Exact string equality against [`ADMIN_ROLE`]. `None` (absent claim)
/// and every other value are non-admin.
pub fn is_admin(role: Option<&str>) -> bool {
    role == Some(ADMIN_ROLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- is_allowed_domain --

    #[test]
    fn allowed_domain_accepts_org_addresses() {
        assert!(is_allowed_domain("hr@docack.io"));
        assert!(is_allowed_domain("first.last@docack.io"));
    }

    #[test]
    fn allowed_domain_is_case_insensitive() {
        assert!(is_allowed_domain("HR@DOCACK.IO"));
        assert!(is_allowed_domain("Someone@Docack.Io"));
    }

    #[test]
    fn allowed_domain_rejects_other_domains() {
        assert!(!is_allowed_domain("someone@example.com"));
        assert!(!is_allowed_domain("someone@docack.io.evil.com"));
    }

    #[test]
    fn allowed_domain_rejects_empty_and_malformed() {
        assert!(!is_allowed_domain(""));
        assert!(!is_allowed_domain("   "));
        assert!(!is_allowed_domain("@docack.io")); // no local part
        assert!(!is_allowed_domain("docack.io"));
    }

    #[test]
    fn allowed_domain_rejects_lookalike_suffix() {
        // "notdocack.io" ends differently than "@docack.io"
        assert!(!is_allowed_domain("user@notdocack.io"));
    }

    // -- is_admin --

    #[test]
    fn admin_role_exact_match_only() {
        assert!(is_admin(Some("admin")));
        assert!(!is_admin(Some("Admin")));
        assert!(!is_admin(Some("administrator")));
        assert!(!is_admin(Some("")));
        assert!(!is_admin(None));
    }
}
