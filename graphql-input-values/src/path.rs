use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// One step from the root of an input value to a nested position: an
/// input-object field name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    /// Field name in an input object
    Key(String),
    /// Index in a list
    Index(usize),
}

/// Path from the root of a coerced input value down to the position a
/// violation was found at, in root-to-leaf order.
///
/// Paths are only ever used for reporting: coercion decisions never consult
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path(pub Vec<PathElement>);

impl Path {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.0.iter()
    }

    /// `` ` at 'value.a[0].b'` `` suffix for error messages, empty for a
    /// root-level violation.
    pub(crate) fn in_input_value(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" at 'value{self}'")
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.0 {
            match element {
                PathElement::Key(key) => write!(f, ".{key}")?,
                PathElement::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// One frame of the path being walked, allocated on the call stack so that
/// recursion costs nothing when no error fires.
pub(crate) struct LinkedPathElement<'a> {
    pub(crate) element: PathElement,
    pub(crate) next: LinkedPath<'a>,
}

pub(crate) type LinkedPath<'a> = Option<&'a LinkedPathElement<'a>>;

/// Materialize a linked path (leaf-to-root) into a root-to-leaf [`Path`].
pub(crate) fn path_to_root(mut link: LinkedPath<'_>) -> Path {
    let mut elements = Vec::new();
    while let Some(frame) = link {
        elements.push(frame.element.clone());
        link = frame.next;
    }
    elements.reverse();
    Path(elements)
}
