//! Nested diff trees over property values.

use super::property::{PropertyKey, PropertyValue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// ValueDiff holds the old and new sides of a changed value.
///
/// Container nodes additionally carry the per-child changes of either an
/// array or an object, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDiff {
    pub old: PropertyValue,
    pub new: PropertyValue,
    #[serde(flatten)]
    pub container: Option<ContainerDiff>,
}

/// The child changes of a container ValueDiff.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerDiff {
    Array(ArrayDiff),
    Object(ObjectDiff),
}

impl ContainerDiff {
    /// Returns "array" or "object".
    pub fn kind(&self) -> &'static str {
        match self {
            ContainerDiff::Array(_) => "array",
            ContainerDiff::Object(_) => "object",
        }
    }
}

impl ValueDiff {
    /// Creates a leaf diff between two values.
    pub fn new(old: PropertyValue, new: PropertyValue) -> Self {
        ValueDiff {
            old,
            new,
            container: None,
        }
    }

    /// Returns true if this node has no child changes.
    pub fn is_leaf(&self) -> bool {
        self.container.is_none()
    }

    pub fn array(&self) -> Option<&ArrayDiff> {
        match &self.container {
            Some(ContainerDiff::Array(a)) => Some(a),
            _ => None,
        }
    }

    pub fn object(&self) -> Option<&ObjectDiff> {
        match &self.container {
            Some(ContainerDiff::Object(o)) => Some(o),
            _ => None,
        }
    }

    /// Consumes the diff, returning its object changes if any.
    pub fn into_object(self) -> Option<ObjectDiff> {
        match self.container {
            Some(ContainerDiff::Object(o)) => Some(o),
            _ => None,
        }
    }
}

/// ArrayDiff records the changes to the elements of an array, by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayDiff {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub adds: BTreeMap<i64, PropertyValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub deletes: BTreeMap<i64, PropertyValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sames: BTreeMap<i64, PropertyValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub updates: BTreeMap<i64, ValueDiff>,
}

impl ArrayDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any element was added, deleted or updated.
    pub fn any_changes(&self) -> bool {
        !self.adds.is_empty() || !self.deletes.is_empty() || !self.updates.is_empty()
    }

    /// Returns every touched index in ascending order.
    pub fn keys(&self) -> Vec<i64> {
        let mut keys: BTreeSet<i64> = BTreeSet::new();
        keys.extend(self.adds.keys());
        keys.extend(self.deletes.keys());
        keys.extend(self.sames.keys());
        keys.extend(self.updates.keys());
        keys.into_iter().collect()
    }

    /// Returns one past the largest touched index.
    pub fn len(&self) -> usize {
        self.keys()
            .last()
            .map_or(0, |&i| usize::try_from(i).map_or(0, |i| i + 1))
    }

    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.deletes.is_empty() && self.sames.is_empty() && self.updates.is_empty()
    }
}

/// ObjectDiff records the changes to the properties of an object, by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDiff {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub adds: BTreeMap<PropertyKey, PropertyValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub deletes: BTreeMap<PropertyKey, PropertyValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sames: BTreeMap<PropertyKey, PropertyValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub updates: BTreeMap<PropertyKey, ValueDiff>,
}

impl ObjectDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any property was added, deleted or updated.
    pub fn any_changes(&self) -> bool {
        !self.adds.is_empty() || !self.deletes.is_empty() || !self.updates.is_empty()
    }

    /// Returns every touched key in sorted order.
    pub fn keys(&self) -> Vec<PropertyKey> {
        let mut keys: BTreeSet<&PropertyKey> = BTreeSet::new();
        keys.extend(self.adds.keys());
        keys.extend(self.deletes.keys());
        keys.extend(self.sames.keys());
        keys.extend(self.updates.keys());
        keys.into_iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.deletes.is_empty() && self.sames.is_empty() && self.updates.is_empty()
    }
}
