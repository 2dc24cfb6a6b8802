//! Flat diff records as reported by a resource provider.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// DiffKind classifies the change at a single property path.
///
/// The `*Replace` variants additionally mark that the change forces the
/// resource to be replaced. They shape the diff tree exactly like their
/// plain counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffKind {
    Add,
    AddReplace,
    Delete,
    DeleteReplace,
    Update,
    UpdateReplace,
}

impl DiffKind {
    /// Returns true if this change requires a replacement.
    pub fn is_replace(self) -> bool {
        matches!(
            self,
            DiffKind::AddReplace | DiffKind::DeleteReplace | DiffKind::UpdateReplace
        )
    }

    /// Returns the kind with the replacement annotation removed.
    pub fn base(self) -> DiffKind {
        match self {
            DiffKind::Add | DiffKind::AddReplace => DiffKind::Add,
            DiffKind::Delete | DiffKind::DeleteReplace => DiffKind::Delete,
            DiffKind::Update | DiffKind::UpdateReplace => DiffKind::Update,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiffKind::Add => "add",
            DiffKind::AddReplace => "add-replace",
            DiffKind::Delete => "delete",
            DiffKind::DeleteReplace => "delete-replace",
            DiffKind::Update => "update",
            DiffKind::UpdateReplace => "update-replace",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// PropertyDiff describes the change at one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDiff {
    pub kind: DiffKind,
    /// When set, the old value is read from the old inputs rather than
    /// the old outputs.
    #[serde(default)]
    pub input_diff: bool,
}

impl PropertyDiff {
    pub fn new(kind: DiffKind) -> Self {
        PropertyDiff {
            kind,
            input_diff: false,
        }
    }

    pub fn input(kind: DiffKind) -> Self {
        PropertyDiff {
            kind,
            input_diff: true,
        }
    }
}

/// DetailedDiff maps property paths to the change at each path.
pub type DetailedDiff = BTreeMap<String, PropertyDiff>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_and_replace() {
        assert_eq!(DiffKind::AddReplace.base(), DiffKind::Add);
        assert_eq!(DiffKind::DeleteReplace.base(), DiffKind::Delete);
        assert_eq!(DiffKind::UpdateReplace.base(), DiffKind::Update);
        assert_eq!(DiffKind::Update.base(), DiffKind::Update);
        assert!(DiffKind::UpdateReplace.is_replace());
        assert!(!DiffKind::Delete.is_replace());
    }

    #[test]
    fn test_kind_serde_names() {
        let kind: DiffKind = serde_json::from_str(r#""delete-replace""#).unwrap();
        assert_eq!(kind, DiffKind::DeleteReplace);
        assert_eq!(serde_json::to_string(&DiffKind::AddReplace).unwrap(), r#""add-replace""#);
        assert_eq!(DiffKind::UpdateReplace.to_string(), "update-replace");
    }

    #[test]
    fn test_property_diff_input_diff_defaults_false() {
        let pd: PropertyDiff = serde_json::from_str(r#"{"kind": "update"}"#).unwrap();
        assert_eq!(pd, PropertyDiff::new(DiffKind::Update));

        let pd: PropertyDiff = serde_json::from_str(r#"{"kind": "add", "inputDiff": true}"#).unwrap();
        assert_eq!(pd, PropertyDiff::input(DiffKind::Add));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(serde_json::from_str::<DiffKind>(r#""rename""#).is_err());
    }
}
