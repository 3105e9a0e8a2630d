//! Conversions between Rust types and [`StateValue`].
//!
//! Scalars and the fixed-width array types convert to their dedicated shapes
//! directly. `Vec<T>` converts through the generic [`StateValue::List`] form
//! and `Box<[String]>` through [`StateValue::Slice`]; the codec classifies
//! those against the capability table at encode time, so an unsupported
//! element type is rejected there rather than here.
//!
//! `Option<T>` deliberately has no impl: absence is handled one layer up (a
//! `None` is never encoded, the key simply stays out of the record).

use std::sync::Arc;

use crate::errors::CodecError;
use crate::record::Record;
use crate::value::{SizeF, Size, StateValue};

/// A value that can cross a destroy/recreate cycle through a record entry.
pub trait SavedValue: Sized {
    fn to_state(&self) -> StateValue;

    fn from_state(value: StateValue) -> Result<Self, CodecError>;
}

macro_rules! scalar_saved_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl SavedValue for $ty {
            fn to_state(&self) -> StateValue {
                StateValue::$variant(*self)
            }

            fn from_state(value: StateValue) -> Result<Self, CodecError> {
                match value {
                    StateValue::$variant(v) => Ok(v),
                    other => Err(CodecError::ValueShapeMismatch {
                        expected: stringify!($variant),
                        found: other.kind_name(),
                    }),
                }
            }
        }
    )*};
}

scalar_saved_value!(
    i8 => I8,
    char => Char,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    Size => Size,
    SizeF => SizeF,
);

macro_rules! fixed_array_saved_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl SavedValue for Box<[$ty]> {
            fn to_state(&self) -> StateValue {
                StateValue::$variant(self.clone())
            }

            fn from_state(value: StateValue) -> Result<Self, CodecError> {
                match value {
                    StateValue::$variant(v) => Ok(v),
                    other => Err(CodecError::ValueShapeMismatch {
                        expected: stringify!($variant),
                        found: other.kind_name(),
                    }),
                }
            }
        }
    )*};
}

fixed_array_saved_value!(
    i8 => I8Array,
    i16 => I16Array,
    i32 => I32Array,
    i64 => I64Array,
    f32 => F32Array,
    f64 => F64Array,
    char => CharArray,
    bool => BoolArray,
);

impl SavedValue for String {
    fn to_state(&self) -> StateValue {
        StateValue::Text(self.clone())
    }

    fn from_state(value: StateValue) -> Result<Self, CodecError> {
        match value {
            StateValue::Text(v) => Ok(v),
            other => Err(CodecError::ValueShapeMismatch {
                expected: "Text",
                found: other.kind_name(),
            }),
        }
    }
}

impl SavedValue for Arc<str> {
    fn to_state(&self) -> StateValue {
        StateValue::SharedText(Arc::clone(self))
    }

    fn from_state(value: StateValue) -> Result<Self, CodecError> {
        match value {
            StateValue::SharedText(v) => Ok(v),
            other => Err(CodecError::ValueShapeMismatch {
                expected: "SharedText",
                found: other.kind_name(),
            }),
        }
    }
}

impl SavedValue for Record {
    fn to_state(&self) -> StateValue {
        StateValue::Nested(self.clone())
    }

    fn from_state(value: StateValue) -> Result<Self, CodecError> {
        match value {
            StateValue::Nested(v) => Ok(v),
            other => Err(CodecError::ValueShapeMismatch {
                expected: "Nested",
                found: other.kind_name(),
            }),
        }
    }
}

/// Growable containers travel as generic lists; the codec picks the stored
/// list shape from the element sample. Decoding accepts every typed list
/// shape by re-wrapping each element and converting it.
impl<T: SavedValue> SavedValue for Vec<T> {
    fn to_state(&self) -> StateValue {
        StateValue::List(self.iter().map(SavedValue::to_state).collect())
    }

    fn from_state(value: StateValue) -> Result<Self, CodecError> {
        match value {
            StateValue::List(items) => items.into_iter().map(T::from_state).collect(),
            StateValue::IntList(items) => items
                .into_iter()
                .map(|v| T::from_state(StateValue::I32(v)))
                .collect(),
            StateValue::TextList(items) => items
                .into_iter()
                .map(|v| T::from_state(StateValue::Text(v)))
                .collect(),
            StateValue::SharedTextList(items) => items
                .into_iter()
                .map(|v| T::from_state(StateValue::SharedText(v)))
                .collect(),
            StateValue::ObjectList(items) => items
                .into_iter()
                .map(|v| T::from_state(StateValue::Object(v)))
                .collect(),
            other => Err(CodecError::ValueShapeMismatch {
                expected: "List",
                found: other.kind_name(),
            }),
        }
    }
}

impl SavedValue for Box<[String]> {
    fn to_state(&self) -> StateValue {
        StateValue::Slice(
            self.iter()
                .map(|s| StateValue::Text(s.clone()))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        )
    }

    fn from_state(value: StateValue) -> Result<Self, CodecError> {
        match value {
            StateValue::TextSlice(v) => Ok(v),
            StateValue::Slice(items) => items
                .into_vec()
                .into_iter()
                .map(String::from_state)
                .collect::<Result<Vec<_>, _>>()
                .map(Vec::into_boxed_slice),
            other => Err(CodecError::ValueShapeMismatch {
                expected: "TextSlice",
                found: other.kind_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_round_trip() {
        assert_eq!(i32::from_state(42i32.to_state()).unwrap(), 42);
        assert_eq!(char::from_state('y'.to_state()).unwrap(), 'y');
        assert!(bool::from_state(true.to_state()).unwrap());
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let err = i32::from_state(StateValue::I64(5)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ValueShapeMismatch {
                expected: "I32",
                found: "I64"
            }
        ));
    }

    #[test]
    fn vec_decodes_typed_lists() {
        let decoded = Vec::<i32>::from_state(StateValue::IntList(vec![1, 2, 3])).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }
}
