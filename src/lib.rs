//! # Detailed Diff
//!
//! Folds the flat, path-keyed diffs reported by resource providers into
//! nested diff trees suitable for display.
//!
//! A provider describes a change as a map from property paths such as
//! `spec.containers[0]["image"]` to the kind of change at each path. This
//! crate parses those paths and inserts each change into a tree of
//! [`ObjectDiff`]s and [`ArrayDiff`]s, reading the old and new values from
//! the resource's property trees.
//!
//! ## Modules
//!
//! - [`resource`] - Property values and the diff trees built over them
//! - [`diffpath`] - Property paths and their string grammar
//! - [`translate`] - Folding a detailed diff into an object diff

pub mod diffpath;
pub mod resource;
pub mod translate;

pub use diffpath::{parse_diff_path, Path, PathElement, PathError};
pub use resource::{
    ArrayDiff, ContainerDiff, ObjectDiff, PropertyKey, PropertyMap, PropertyValue, ValueDiff,
};
pub use translate::{
    add_diff, get_property, translate, translate_detailed_diff, DetailedDiff, DiffKind,
    PropertyDiff, StepEventMetadata, StepEventStateMetadata, TranslateError,
};
