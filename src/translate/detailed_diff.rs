//! Translation of a provider's detailed diff into a nested ObjectDiff.
//!
//! A detailed diff is a flat map from property path to the kind of change
//! at that path. The kind is only trusted at the leaf: every intermediate
//! position is classified by whether the value exists in the old and new
//! trees, so a record deep under a wholly new (or wholly removed) property
//! collapses into a single add (or delete) of that property.

use super::kind::{DetailedDiff, DiffKind};
use super::step::StepEventMetadata;
use crate::diffpath::{parse_diff_path, PathElement, PathError};
use crate::resource::{
    ArrayDiff, ContainerDiff, ObjectDiff, PropertyKey, PropertyValue, ValueDiff,
};
use thiserror::Error;
use tracing::{debug, trace};

static ABSENT: PropertyValue = PropertyValue::Null;

/// The path addressed a diff node with the wrong kind of element: an index
/// where an object diff was already recorded, or a key where an array
/// diff was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path element {depth} needs an {needed} diff, but an {existing} diff is already recorded there")]
pub struct ContainerMismatch {
    pub depth: usize,
    pub needed: &'static str,
    pub existing: &'static str,
}

/// TranslateError is returned when a detailed diff cannot be translated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("step has no detailed diff")]
    MissingDetailedDiff,

    #[error("invalid diff path {path:?}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: PathError,
    },

    #[error("diff path {path:?}: {source}")]
    ContainerMismatch {
        path: String,
        #[source]
        source: ContainerMismatch,
    },
}

/// Fetches the child of `value` named by `element`.
///
/// Missing children read as null. Computed, output and secret values are
/// returned as-is: their contents are unknown, so they may or may not
/// hold the requested child.
pub fn get_property<'a>(element: &PathElement, value: &'a PropertyValue) -> &'a PropertyValue {
    match (value, element) {
        (PropertyValue::Array(items), PathElement::Index(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .unwrap_or(&ABSENT),
        (PropertyValue::Object(map), PathElement::Key(k)) => map.get(k.as_str()).unwrap_or(&ABSENT),
        (v, _) if v.is_opaque() => v,
        _ => &ABSENT,
    }
}

/// The per-child maps of an array or object diff.
trait ChildDiffs {
    type Key: Ord;

    fn add(&mut self, key: Self::Key, value: PropertyValue);
    fn delete(&mut self, key: Self::Key, value: PropertyValue);
    fn update(&mut self, key: Self::Key) -> &mut ValueDiff;
}

impl ChildDiffs for ArrayDiff {
    type Key = i64;

    fn add(&mut self, key: i64, value: PropertyValue) {
        self.adds.insert(key, value);
    }

    fn delete(&mut self, key: i64, value: PropertyValue) {
        self.deletes.insert(key, value);
    }

    fn update(&mut self, key: i64) -> &mut ValueDiff {
        self.updates.entry(key).or_default()
    }
}

impl ChildDiffs for ObjectDiff {
    type Key = PropertyKey;

    fn add(&mut self, key: PropertyKey, value: PropertyValue) {
        self.adds.insert(key, value);
    }

    fn delete(&mut self, key: PropertyKey, value: PropertyValue) {
        self.deletes.insert(key, value);
    }

    fn update(&mut self, key: PropertyKey) -> &mut ValueDiff {
        self.updates.entry(key).or_default()
    }
}

/// Inserts a diff of the given kind at `path` into `parent`.
///
/// If the path has a single element, a diff of the indicated kind is
/// recorded directly. Otherwise, if the property named by the first
/// element exists in both parents, the remaining path is inserted into the
/// nested update for that property; if it exists in only one of them the
/// kind is disregarded and the whole property is recorded as an add or a
/// delete.
///
/// # Panics
///
/// Panics if `path` is empty.
pub fn add_diff(
    path: &[PathElement],
    kind: DiffKind,
    parent: &mut ValueDiff,
    old_parent: &PropertyValue,
    new_parent: &PropertyValue,
) -> Result<(), ContainerMismatch> {
    let (element, rest) = path
        .split_first()
        .unwrap_or_else(|| panic!("add_diff requires a non-empty path"));
    add_diff_at(element, rest, 0, kind, parent, old_parent, new_parent)
}

fn add_diff_at(
    element: &PathElement,
    rest: &[PathElement],
    depth: usize,
    kind: DiffKind,
    parent: &mut ValueDiff,
    old_parent: &PropertyValue,
    new_parent: &PropertyValue,
) -> Result<(), ContainerMismatch> {
    let old = get_property(element, old_parent);
    let new = get_property(element, new_parent);
    trace!(depth, element = %element, old = old.type_name(), new = new.type_name(), "descending");

    let container = parent.container.get_or_insert_with(|| match element {
        PathElement::Index(_) => ContainerDiff::Array(ArrayDiff::new()),
        PathElement::Key(_) => ContainerDiff::Object(ObjectDiff::new()),
    });

    match (element, container) {
        (PathElement::Index(i), ContainerDiff::Array(array)) => {
            record(array, *i, rest, depth, kind, old, new)
        }
        (PathElement::Key(k), ContainerDiff::Object(object)) => {
            record(object, PropertyKey::from(k.as_str()), rest, depth, kind, old, new)
        }
        (PathElement::Index(_), existing) => Err(ContainerMismatch {
            depth,
            needed: "array",
            existing: existing.kind(),
        }),
        (PathElement::Key(_), existing) => Err(ContainerMismatch {
            depth,
            needed: "object",
            existing: existing.kind(),
        }),
    }
}

fn record<C: ChildDiffs>(
    children: &mut C,
    key: C::Key,
    rest: &[PathElement],
    depth: usize,
    kind: DiffKind,
    old: &PropertyValue,
    new: &PropertyValue,
) -> Result<(), ContainerMismatch> {
    // The provider names the kind of the leaf only.
    let Some((next, rest)) = rest.split_first() else {
        match kind {
            DiffKind::Add | DiffKind::AddReplace => children.add(key, new.clone()),
            DiffKind::Delete | DiffKind::DeleteReplace => children.delete(key, old.clone()),
            DiffKind::Update | DiffKind::UpdateReplace => {
                *children.update(key) = ValueDiff::new(old.clone(), new.clone());
            }
        }
        return Ok(());
    };

    match (old.is_null(), new.is_null()) {
        (true, false) => children.add(key, new.clone()),
        (false, true) => children.delete(key, old.clone()),
        _ => add_diff_at(next, rest, depth + 1, kind, children.update(key), old, new)?,
    }
    Ok(())
}

/// Translates a detailed diff into an ObjectDiff.
///
/// Old values are taken from `old_outputs`, or from `old_inputs` for
/// records flagged as input diffs. New values are always taken from
/// `new_inputs`. The first record that fails aborts the translation.
pub fn translate(
    detailed_diff: Option<&DetailedDiff>,
    old_outputs: &PropertyValue,
    old_inputs: &PropertyValue,
    new_inputs: &PropertyValue,
) -> Result<ObjectDiff, TranslateError> {
    let detailed_diff = detailed_diff.ok_or(TranslateError::MissingDetailedDiff)?;

    // Property trees are rooted at an object, so the root diff is one too.
    let mut diff = ValueDiff {
        container: Some(ContainerDiff::Object(ObjectDiff::new())),
        ..ValueDiff::default()
    };

    for (path, pdiff) in detailed_diff {
        let elements = parse_diff_path(path).map_err(|source| TranslateError::InvalidPath {
            path: path.clone(),
            source,
        })?;

        let olds = if pdiff.input_diff { old_inputs } else { old_outputs };
        debug!(path = %path, kind = %pdiff.kind, input_diff = pdiff.input_diff, "applying detailed diff");

        add_diff(elements.as_slice(), pdiff.kind, &mut diff, olds, new_inputs).map_err(|source| {
            TranslateError::ContainerMismatch {
                path: path.clone(),
                source,
            }
        })?;
    }

    Ok(diff.into_object().unwrap_or_default())
}

/// Translates the detailed diff of a step, reading old values from the
/// old state and new values from the new state's inputs.
pub fn translate_detailed_diff(step: &StepEventMetadata) -> Result<ObjectDiff, TranslateError> {
    translate(
        step.detailed_diff.as_ref(),
        &step.old_outputs(),
        &step.old_inputs(),
        &step.new_inputs(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::PropertyMap;

    #[test]
    fn test_get_property_array() {
        let v = PropertyValue::Array(vec!["a".into(), "b".into()]);
        assert_eq!(get_property(&PathElement::index(1), &v), &PropertyValue::from("b"));
        assert!(get_property(&PathElement::index(2), &v).is_null());
        assert!(get_property(&PathElement::index(-1), &v).is_null());
        assert!(get_property(&PathElement::key("0"), &v).is_null());
    }

    #[test]
    fn test_get_property_object() {
        let mut m = PropertyMap::new();
        m.insert("name".into(), "web".into());
        let v = PropertyValue::object(m);
        assert_eq!(get_property(&PathElement::key("name"), &v), &PropertyValue::from("web"));
        assert!(get_property(&PathElement::key("missing"), &v).is_null());
        assert!(get_property(&PathElement::index(0), &v).is_null());
    }

    #[test]
    fn test_get_property_opaque_passthrough() {
        for v in [PropertyValue::Computed, PropertyValue::Output, PropertyValue::Secret] {
            assert_eq!(get_property(&PathElement::key("anything"), &v), &v);
            assert_eq!(get_property(&PathElement::index(7), &v), &v);
            assert_eq!(get_property(&PathElement::index(-3), &v), &v);
        }
    }

    #[test]
    fn test_get_property_scalars_are_absent() {
        for v in [
            PropertyValue::Null,
            PropertyValue::Bool(true),
            PropertyValue::Number(1.0),
            PropertyValue::from("s"),
        ] {
            assert!(get_property(&PathElement::key("x"), &v).is_null());
            assert!(get_property(&PathElement::index(0), &v).is_null());
        }
    }

    #[test]
    #[should_panic(expected = "non-empty path")]
    fn test_add_diff_empty_path_panics() {
        let mut diff = ValueDiff::default();
        let _ = add_diff(&[], DiffKind::Add, &mut diff, &PropertyValue::Null, &PropertyValue::Null);
    }

    #[test]
    fn test_container_mismatch_message() {
        let err = ContainerMismatch {
            depth: 1,
            needed: "array",
            existing: "object",
        };
        assert_eq!(
            err.to_string(),
            "path element 1 needs an array diff, but an object diff is already recorded there"
        );
    }
}
