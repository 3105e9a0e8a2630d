//! The ordered capability table.
//!
//! Each rule pairs a storage [`Shape`] with a predicate over [`StateValue`].
//! Encoding walks the table top-down and stops at the first match, so the
//! order below *is* the precedence contract:
//!
//! - typed-list rules come before every object fallback, and within them the
//!   int sample outranks text, text outranks shared text, shared text
//!   outranks transferable elements;
//! - the fixed-width array shapes come before the generic slice fallbacks;
//! - a transferable object outranks an archivable one when a type carries
//!   both capability tags.
//!
//! The macro crate applies the same decision order to declared types at
//! build time; keep the two lists in sync when adding a shape.

use crate::value::{StateObject as _, StateValue};

/// Names for every storage shape a record entry can take.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
pub enum Shape {
    NestedRecord,
    IntList,
    TextList,
    SharedTextList,
    TransferableList,
    I8Array,
    I16Array,
    I32Array,
    I64Array,
    F32Array,
    F64Array,
    CharArray,
    BoolArray,
    I8,
    Char,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Text,
    SharedText,
    Size,
    SizeF,
    TextSlice,
    TransferableSlice,
    TransferableObject,
    ArchivableObject,
}

/// One row of the table: a named shape plus the predicate that admits a
/// runtime value into it.
pub struct CapabilityRule {
    pub shape: Shape,
    matches: fn(&StateValue) -> bool,
}

impl CapabilityRule {
    #[must_use]
    pub fn matches(&self, value: &StateValue) -> bool {
        (self.matches)(value)
    }
}

/// Walk the table and return the first shape that admits `value`.
#[must_use]
pub fn classify(value: &StateValue) -> Option<Shape> {
    CAPABILITY_TABLE
        .iter()
        .find(|rule| rule.matches(value))
        .map(|rule| rule.shape)
}

/// Index of a shape in the table, for precedence assertions.
#[must_use]
pub fn precedence(shape: Shape) -> Option<usize> {
    CAPABILITY_TABLE.iter().position(|rule| rule.shape == shape)
}

fn list_sample(value: &StateValue) -> Option<Option<&StateValue>> {
    match value {
        StateValue::List(items) => Some(items.first()),
        _ => None,
    }
}

fn slice_sample(value: &StateValue) -> Option<Option<&StateValue>> {
    match value {
        StateValue::Slice(items) => Some(items.first()),
        _ => None,
    }
}

/// The decision table. An empty generic list lands on the first list rule,
/// which makes the empty int-list the default shape for empty containers;
/// empty generic slices land on the text slice for the same reason.
pub static CAPABILITY_TABLE: &[CapabilityRule] = &[
    CapabilityRule {
        shape: Shape::NestedRecord,
        matches: |v| matches!(v, StateValue::Nested(_)),
    },
    CapabilityRule {
        shape: Shape::IntList,
        matches: |v| {
            matches!(v, StateValue::IntList(_))
                || matches!(
                    list_sample(v),
                    Some(None) | Some(Some(StateValue::I32(_)))
                )
        },
    },
    CapabilityRule {
        shape: Shape::TextList,
        matches: |v| {
            matches!(v, StateValue::TextList(_))
                || matches!(list_sample(v), Some(Some(StateValue::Text(_))))
        },
    },
    CapabilityRule {
        shape: Shape::SharedTextList,
        matches: |v| {
            matches!(v, StateValue::SharedTextList(_))
                || matches!(list_sample(v), Some(Some(StateValue::SharedText(_))))
        },
    },
    CapabilityRule {
        shape: Shape::TransferableList,
        matches: |v| {
            matches!(v, StateValue::ObjectList(_))
                || matches!(
                    list_sample(v),
                    Some(Some(StateValue::Object(o))) if o.as_transferable().is_some()
                )
        },
    },
    CapabilityRule {
        shape: Shape::I8Array,
        matches: |v| matches!(v, StateValue::I8Array(_)),
    },
    CapabilityRule {
        shape: Shape::I16Array,
        matches: |v| matches!(v, StateValue::I16Array(_)),
    },
    CapabilityRule {
        shape: Shape::I32Array,
        matches: |v| matches!(v, StateValue::I32Array(_)),
    },
    CapabilityRule {
        shape: Shape::I64Array,
        matches: |v| matches!(v, StateValue::I64Array(_)),
    },
    CapabilityRule {
        shape: Shape::F32Array,
        matches: |v| matches!(v, StateValue::F32Array(_)),
    },
    CapabilityRule {
        shape: Shape::F64Array,
        matches: |v| matches!(v, StateValue::F64Array(_)),
    },
    CapabilityRule {
        shape: Shape::CharArray,
        matches: |v| matches!(v, StateValue::CharArray(_)),
    },
    CapabilityRule {
        shape: Shape::BoolArray,
        matches: |v| matches!(v, StateValue::BoolArray(_)),
    },
    CapabilityRule {
        shape: Shape::I8,
        matches: |v| matches!(v, StateValue::I8(_)),
    },
    CapabilityRule {
        shape: Shape::Char,
        matches: |v| matches!(v, StateValue::Char(_)),
    },
    CapabilityRule {
        shape: Shape::I16,
        matches: |v| matches!(v, StateValue::I16(_)),
    },
    CapabilityRule {
        shape: Shape::I32,
        matches: |v| matches!(v, StateValue::I32(_)),
    },
    CapabilityRule {
        shape: Shape::I64,
        matches: |v| matches!(v, StateValue::I64(_)),
    },
    CapabilityRule {
        shape: Shape::F32,
        matches: |v| matches!(v, StateValue::F32(_)),
    },
    CapabilityRule {
        shape: Shape::F64,
        matches: |v| matches!(v, StateValue::F64(_)),
    },
    CapabilityRule {
        shape: Shape::Bool,
        matches: |v| matches!(v, StateValue::Bool(_)),
    },
    CapabilityRule {
        shape: Shape::Text,
        matches: |v| matches!(v, StateValue::Text(_)),
    },
    CapabilityRule {
        shape: Shape::SharedText,
        matches: |v| matches!(v, StateValue::SharedText(_)),
    },
    CapabilityRule {
        shape: Shape::Size,
        matches: |v| matches!(v, StateValue::Size(_)),
    },
    CapabilityRule {
        shape: Shape::SizeF,
        matches: |v| matches!(v, StateValue::SizeF(_)),
    },
    CapabilityRule {
        shape: Shape::TextSlice,
        matches: |v| {
            matches!(v, StateValue::TextSlice(_))
                || matches!(
                    slice_sample(v),
                    Some(None) | Some(Some(StateValue::Text(_)))
                )
        },
    },
    CapabilityRule {
        shape: Shape::TransferableSlice,
        matches: |v| {
            matches!(v, StateValue::ObjectSlice(_))
                || matches!(
                    slice_sample(v),
                    Some(Some(StateValue::Object(o))) if o.as_transferable().is_some()
                )
        },
    },
    CapabilityRule {
        shape: Shape::TransferableObject,
        matches: |v| {
            matches!(v, StateValue::Object(o) if o.as_transferable().is_some())
        },
    },
    CapabilityRule {
        shape: Shape::ArchivableObject,
        matches: |v| {
            matches!(v, StateValue::Object(o) if o.as_archivable().is_some())
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SavedValue;

    #[test]
    fn empty_list_defaults_to_int_list() {
        let value = Vec::<i32>::new().to_state();
        assert_eq!(classify(&value), Some(Shape::IntList));
    }

    #[test]
    fn list_sample_decides_the_list_shape() {
        assert_eq!(
            classify(&vec![1i32, 2].to_state()),
            Some(Shape::IntList)
        );
        assert_eq!(
            classify(&vec!["a".to_string()].to_state()),
            Some(Shape::TextList)
        );
    }

    #[test]
    fn unsupported_list_elements_fall_through() {
        // i64 elements match no list rule; the value classifies as nothing.
        assert_eq!(classify(&vec![1i64, 2].to_state()), None);
    }

    #[test]
    fn precedence_holds_the_documented_order() {
        let before = |a: Shape, b: Shape| precedence(a).unwrap() < precedence(b).unwrap();
        assert!(before(Shape::IntList, Shape::TextList));
        assert!(before(Shape::TransferableList, Shape::I8Array));
        assert!(before(Shape::I8Array, Shape::TextSlice));
        assert!(before(Shape::TextSlice, Shape::TransferableObject));
        assert!(before(Shape::TransferableObject, Shape::ArchivableObject));
    }

    #[test]
    fn every_shape_appears_exactly_once() {
        use strum::IntoEnumIterator;
        for shape in Shape::iter() {
            assert_eq!(
                CAPABILITY_TABLE
                    .iter()
                    .filter(|rule| rule.shape == shape)
                    .count(),
                1,
                "shape {shape:?} must have exactly one rule"
            );
        }
    }
}
