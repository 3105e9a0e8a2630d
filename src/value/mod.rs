//! The closed set of value shapes a [`Record`] can hold.
//!
//! [`StateValue`] is the runtime representation every saved field passes
//! through. Most variants map one-to-one onto a storage shape; the two
//! generic container variants ([`StateValue::List`] and [`StateValue::Slice`])
//! are produced by the blanket [`SavedValue`](convert::SavedValue) container
//! impls and are normalized into a specific typed shape by the codec before
//! they reach a record.
//!
//! Dispatch over this set is deliberately a closed tagged match: the
//! capability table in [`crate::capability`] is an explicit priority list
//! over these variants, not open-ended type testing.

use std::sync::Arc;

use strum::{EnumDiscriminants, IntoDiscriminant};

use crate::record::Record;

pub mod convert;
pub mod object;

pub use convert::SavedValue;
pub use object::{Archivable, StateObject, Transferable};

/// Integer-sided 2D extent, one of the two dedicated geometry shapes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::From,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Float-sided 2D extent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    derive_more::From,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An archivable object flattened to bytes, tagged with the concrete type
/// name so decoding into the wrong type is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedValue {
    pub type_name: String,
    pub bytes: Vec<u8>,
}

/// Tagged runtime value.
///
/// The discriminant enum [`ValueKind`] gives a cheap, nameable handle on the
/// shape of a value; error messages and the capability table both use it.
#[derive(Debug, EnumDiscriminants, derive_more::From)]
#[strum_discriminants(
    name(ValueKind),
    derive(Hash, strum::AsRefStr, strum::IntoStaticStr, strum::EnumIter)
)]
pub enum StateValue {
    // Scalars.
    I8(i8),
    Char(char),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),

    // Text.
    Text(String),
    SharedText(Arc<str>),

    // Geometry.
    Size(Size),
    SizeF(SizeF),

    // Fixed-width arrays. Boxed slices: the length is fixed once stored.
    I8Array(Box<[i8]>),
    I16Array(Box<[i16]>),
    I32Array(Box<[i32]>),
    I64Array(Box<[i64]>),
    F32Array(Box<[f32]>),
    F64Array(Box<[f64]>),
    CharArray(Box<[char]>),
    BoolArray(Box<[bool]>),

    // Generic containers, pre-encoding. The codec resolves these against the
    // capability table using their first element as the type sample.
    List(Vec<StateValue>),
    Slice(Box<[StateValue]>),

    // Homogeneous typed lists, post-encoding.
    IntList(Vec<i32>),
    TextList(Vec<String>),
    SharedTextList(Vec<Arc<str>>),
    ObjectList(Vec<Box<dyn StateObject>>),

    // Homogeneous typed slices, post-encoding.
    TextSlice(Box<[String]>),
    ObjectSlice(Box<[Box<dyn StateObject>]>),

    // Polymorphic values.
    Object(Box<dyn StateObject>),
    Archived(ArchivedValue),

    // A record nested inside another record.
    Nested(Record),
}

impl StateValue {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.discriminant()
    }

    /// Static name of this value's shape, used in error messages and logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.kind().into()
    }

    /// Wrap a concrete polymorphic value.
    pub fn object(value: impl StateObject) -> Self {
        Self::Object(Box::new(value))
    }

    /// Build a generic slice of polymorphic values, classified on encode.
    #[must_use]
    pub fn object_slice(objects: Vec<Box<dyn StateObject>>) -> Self {
        Self::Slice(
            objects
                .into_iter()
                .map(StateValue::Object)
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        )
    }
}

impl Clone for StateValue {
    fn clone(&self) -> Self {
        match self {
            Self::I8(v) => Self::I8(*v),
            Self::Char(v) => Self::Char(*v),
            Self::I16(v) => Self::I16(*v),
            Self::I32(v) => Self::I32(*v),
            Self::I64(v) => Self::I64(*v),
            Self::F32(v) => Self::F32(*v),
            Self::F64(v) => Self::F64(*v),
            Self::Bool(v) => Self::Bool(*v),
            Self::Text(v) => Self::Text(v.clone()),
            Self::SharedText(v) => Self::SharedText(Arc::clone(v)),
            Self::Size(v) => Self::Size(*v),
            Self::SizeF(v) => Self::SizeF(*v),
            Self::I8Array(v) => Self::I8Array(v.clone()),
            Self::I16Array(v) => Self::I16Array(v.clone()),
            Self::I32Array(v) => Self::I32Array(v.clone()),
            Self::I64Array(v) => Self::I64Array(v.clone()),
            Self::F32Array(v) => Self::F32Array(v.clone()),
            Self::F64Array(v) => Self::F64Array(v.clone()),
            Self::CharArray(v) => Self::CharArray(v.clone()),
            Self::BoolArray(v) => Self::BoolArray(v.clone()),
            Self::List(v) => Self::List(v.clone()),
            Self::Slice(v) => Self::Slice(v.clone()),
            Self::IntList(v) => Self::IntList(v.clone()),
            Self::TextList(v) => Self::TextList(v.clone()),
            Self::SharedTextList(v) => Self::SharedTextList(v.clone()),
            Self::ObjectList(v) => {
                Self::ObjectList(v.iter().map(|o| o.clone_object()).collect())
            }
            Self::TextSlice(v) => Self::TextSlice(v.clone()),
            Self::ObjectSlice(v) => {
                Self::ObjectSlice(v.iter().map(|o| o.clone_object()).collect())
            }
            Self::Object(o) => Self::Object(o.clone_object()),
            Self::Archived(a) => Self::Archived(a.clone()),
            Self::Nested(r) => Self::Nested(r.clone()),
        }
    }
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::SharedText(a), Self::SharedText(b)) => a == b,
            (Self::Size(a), Self::Size(b)) => a == b,
            (Self::SizeF(a), Self::SizeF(b)) => a == b,
            (Self::I8Array(a), Self::I8Array(b)) => a == b,
            (Self::I16Array(a), Self::I16Array(b)) => a == b,
            (Self::I32Array(a), Self::I32Array(b)) => a == b,
            (Self::I64Array(a), Self::I64Array(b)) => a == b,
            (Self::F32Array(a), Self::F32Array(b)) => a == b,
            (Self::F64Array(a), Self::F64Array(b)) => a == b,
            (Self::CharArray(a), Self::CharArray(b)) => a == b,
            (Self::BoolArray(a), Self::BoolArray(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Slice(a), Self::Slice(b)) => a == b,
            (Self::IntList(a), Self::IntList(b)) => a == b,
            (Self::TextList(a), Self::TextList(b)) => a == b,
            (Self::SharedTextList(a), Self::SharedTextList(b)) => a == b,
            (Self::ObjectList(a), Self::ObjectList(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.object_eq(y.as_ref()))
            }
            (Self::TextSlice(a), Self::TextSlice(b)) => a == b,
            (Self::ObjectSlice(a), Self::ObjectSlice(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.object_eq(y.as_ref()))
            }
            (Self::Object(a), Self::Object(b)) => a.object_eq(b.as_ref()),
            (Self::Archived(a), Self::Archived(b)) => a == b,
            (Self::Nested(a), Self::Nested(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_follow_variants() {
        assert_eq!(StateValue::I32(5).kind_name(), "I32");
        assert_eq!(StateValue::Text("x".into()).kind_name(), "Text");
        assert_eq!(
            StateValue::Nested(Record::new()).kind_name(),
            "Nested"
        );
    }

    #[test]
    fn sizes_build_from_tuples() {
        let size: Size = (800, 600).into();
        assert_eq!(size, Size::new(800, 600));
        let sizef: SizeF = (1.5, 2.5).into();
        assert_eq!(sizef, SizeF::new(1.5, 2.5));
    }

    #[test]
    fn scalar_equality_is_shape_aware() {
        assert_ne!(StateValue::I32(1), StateValue::I64(1));
        assert_eq!(StateValue::Bool(true), StateValue::Bool(true));
    }
}
