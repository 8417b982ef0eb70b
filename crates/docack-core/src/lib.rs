#![deny(missing_docs)]

//! # docack-core — Foundational Types for Docack
//!
//! Docack distributes company documents to employees and tracks who has
//! acknowledged them. This crate defines the domain layer every other crate
//! depends on. It performs no I/O — only `serde`, `thiserror`, and `uuid`
//! from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Policy is pure.** [`policy::is_allowed_domain`] and
//!    [`policy::is_admin`] are side-effect-free predicates. The role claim
//!    from the identity provider is the single source of truth for admin
//!    capability — email is deliberately not consulted.
//!
//! 2. **Identity is per-request, never persisted.** [`Identity`] is resolved
//!    from the session by the identity provider on every request and carried
//!    through the request context, not stored by this system.
//!
//! 3. **Visibility is advisory.** A document's audience is either the whole
//!    organization or an explicit target-email set; the target set annotates
//!    display and auditing but is not an access-control filter.

pub mod document;
pub mod error;
pub mod identity;
pub mod policy;

pub use document::{normalize_target_emails, Visibility};
pub use error::ValidationError;
pub use identity::Identity;
pub use policy::{is_admin, is_allowed_domain, ADMIN_ROLE, ALLOWED_DOMAIN};
