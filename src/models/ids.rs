//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. New IDs are UUID v4 strings; IDs read from
//! older exports are kept verbatim, whatever their format.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an existing identifier string
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Check whether a user-supplied reference points at this ID
            ///
            /// Accepts the full identifier, the displayed short form, or a
            /// bare prefix of at least four characters.
            pub fn matches(&self, reference: &str) -> bool {
                let reference = reference.strip_prefix($display_prefix).unwrap_or(reference);
                reference == self.0 || (reference.len() >= 4 && self.0.starts_with(reference))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let short: String = self.0.chars().take(8).collect();
                write!(f, "{}{}", $display_prefix, short)
            }
        }
    };
}

define_id!(TemplateId, "tpl-");
define_id!(FixedCostId, "fix-");
define_id!(PositionId, "pos-");
define_id!(ExpenseId, "exp-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_id_creation() {
        let id = TemplateId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_id_display() {
        let id = TemplateId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("tpl-"));
        assert_eq!(display.len(), 12); // "tpl-" + 8 chars
    }

    #[test]
    fn test_id_uniqueness() {
        let id1 = ExpenseId::new();
        let id2 = id1.clone();
        assert_eq!(id1, id2);
        assert_ne!(id1, ExpenseId::new());
    }

    #[test]
    fn test_legacy_id_kept_verbatim() {
        let id: TemplateId = serde_json::from_str("\"1712345678901-k3j2\"").unwrap();
        assert_eq!(id.as_str(), "1712345678901-k3j2");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1712345678901-k3j2\"");
    }

    #[test]
    fn test_matches_short_form() {
        let id = TemplateId::from_string("550e8400-e29b-41d4-a716-446655440000");
        assert!(id.matches("tpl-550e8400"));
        assert!(id.matches("550e"));
        assert!(id.matches("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!id.matches("55"));
        assert!(!id.matches("tpl-deadbeef"));
    }
}
