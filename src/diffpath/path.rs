//! Path element and path types.

use std::fmt;

/// PathElement is one step of descent into a property tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Index into an array. Negative indices parse but never match.
    Index(i64),
    /// Key into an object.
    Key(String),
}

impl PathElement {
    /// Creates a new index path element.
    pub fn index(i: i64) -> Self {
        PathElement::Index(i)
    }

    /// Creates a new key path element.
    pub fn key(k: impl Into<String>) -> Self {
        PathElement::Key(k.into())
    }

    /// Returns the index if this is an index element.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            PathElement::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the key if this is a key element.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathElement::Key(k) => Some(k),
            _ => None,
        }
    }
}

impl From<i64> for PathElement {
    fn from(i: i64) -> Self {
        PathElement::Index(i)
    }
}

impl From<&str> for PathElement {
    fn from(k: &str) -> Self {
        PathElement::Key(k.to_string())
    }
}

/// Path locates a value within a property tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a path from a vector of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    pub fn first(&self) -> Option<&PathElement> {
        self.elements.first()
    }

    pub fn as_slice(&self) -> &[PathElement] {
        &self.elements
    }

    pub(crate) fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = PathElement;
    type IntoIter = std::vec::IntoIter<PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Index(i) => write!(f, "[{}]", i),
            PathElement::Key(k) if is_identifier(k) => write!(f, ".{}", k),
            PathElement::Key(k) => write!(f, "[\"{}\"]", k.replace('"', "\\\"")),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Key(k) if i == 0 && is_identifier(k) => write!(f, "{}", k)?,
                _ => write!(f, "{}", element)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_element_accessors() {
        assert_eq!(PathElement::index(3).as_index(), Some(3));
        assert_eq!(PathElement::index(3).as_key(), None);
        assert_eq!(PathElement::key("foo").as_key(), Some("foo"));
        assert_eq!(PathElement::key("foo").as_index(), None);
    }

    #[test]
    fn test_path_display() {
        let path: Path = vec![
            PathElement::key("foo"),
            PathElement::index(0),
            PathElement::key("bar"),
        ]
        .into_iter()
        .collect();
        assert_eq!(path.to_string(), "foo[0].bar");
    }

    #[test]
    fn test_path_display_quotes_non_identifiers() {
        let path = Path::from_elements(vec![
            PathElement::key("tags"),
            PathElement::key("kubernetes.io/name"),
            PathElement::key("say \"hi\""),
        ]);
        assert_eq!(
            path.to_string(),
            r#"tags["kubernetes.io/name"]["say \"hi\""]"#
        );
    }

    #[test]
    fn test_path_display_leading_index_and_quoted_root() {
        let path = Path::from_elements(vec![PathElement::index(2), PathElement::key("$ref")]);
        assert_eq!(path.to_string(), "[2].$ref");

        let path = Path::from_elements(vec![PathElement::key("0abc")]);
        assert_eq!(path.to_string(), r#"["0abc"]"#);

        let path = Path::from_elements(vec![PathElement::key("")]);
        assert_eq!(path.to_string(), r#"[""]"#);
    }
}
