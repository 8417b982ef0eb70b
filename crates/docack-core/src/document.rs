//! # Document Visibility & Audience
//!
//! A document is visible either to the entire organization (`all`) or to an
//! explicit list of target emails (`targeted`). Visibility is chosen at
//! upload time and immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Document audience mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to the entire allowed-domain population.
    All,
    /// Visible to exactly the emails in the document's target rows.
    Targeted,
}

impl Visibility {
    /// The string stored in the `visibility` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Targeted => "targeted",
        }
    }

    /// Parse the stored column value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidVisibility`] for anything other
    /// than `"all"` or `"targeted"`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "all" => Ok(Self::All),
            "targeted" => Ok(Self::Targeted),
            other => Err(ValidationError::InvalidVisibility(other.to_string())),
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw target-email list into the set of rows to store.
///
/// Each entry is trimmed and lower-cased; empty entries are dropped and
/// duplicates are removed, keeping first-seen order. The result for
/// `["A@x.com", " a@x.com ", "b@x.com"]` is `["a@x.com", "b@x.com"]`.
pub fn normalize_target_emails<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for entry in raw {
        let email = entry.as_ref().trim().to_lowercase();
        if email.is_empty() {
            continue;
        }
        if seen.insert(email.clone()) {
            out.push(email);
        }
    }
    out
}
