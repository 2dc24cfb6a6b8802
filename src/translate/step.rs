//! Step metadata carrying the states a detailed diff is read against.

use super::kind::DetailedDiff;
use crate::resource::{PropertyMap, PropertyValue};
use serde::{Deserialize, Serialize};

/// The state of a resource on one side of a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEventStateMetadata {
    #[serde(default)]
    pub inputs: PropertyMap,
    #[serde(default)]
    pub outputs: PropertyMap,
}

/// A step between two resource states, with the provider's detailed diff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEventMetadata {
    #[serde(default)]
    pub old: Option<StepEventStateMetadata>,
    #[serde(default)]
    pub new: Option<StepEventStateMetadata>,
    #[serde(default)]
    pub detailed_diff: Option<DetailedDiff>,
}

impl StepEventMetadata {
    /// Old outputs as an object value; empty if there is no old state.
    pub fn old_outputs(&self) -> PropertyValue {
        PropertyValue::object(self.old.as_ref().map(|s| s.outputs.clone()).unwrap_or_default())
    }

    /// Old inputs as an object value; empty if there is no old state.
    pub fn old_inputs(&self) -> PropertyValue {
        PropertyValue::object(self.old.as_ref().map(|s| s.inputs.clone()).unwrap_or_default())
    }

    /// New inputs as an object value; empty if there is no new state.
    pub fn new_inputs(&self) -> PropertyValue {
        PropertyValue::object(self.new.as_ref().map(|s| s.inputs.clone()).unwrap_or_default())
    }
}
