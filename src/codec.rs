//! Type-directed encoding of values into records.
//!
//! `encode` classifies a value against the capability table, normalizes the
//! generic container forms into their stored typed shape, and inserts the
//! result. Decoding lives on [`Record`] (`decode`/`take`) since it is a plain
//! keyed lookup plus a [`SavedValue`](crate::value::SavedValue) conversion.

use crate::capability::{self, Shape};
use crate::errors::CodecError;
use crate::record::Record;
use crate::value::{ArchivedValue, StateObject, StateValue};

/// Encode `value` into `record` under `key`.
///
/// The first capability rule that admits the value picks the stored shape.
/// A value no rule admits is rejected with
/// [`CodecError::UnsupportedValueType`]; a generic container whose elements
/// do not all fit the sampled shape is rejected with
/// [`CodecError::UnsupportedElementType`].
///
/// Absent values never reach this function: the delegate and generated
/// layers skip encoding entirely, leaving the key out of the record.
pub fn encode(record: &mut Record, key: &str, value: StateValue) -> Result<(), CodecError> {
    let Some(shape) = capability::classify(&value) else {
        return Err(CodecError::UnsupportedValueType {
            key: key.to_owned(),
            kind: value.kind_name(),
        });
    };
    let stored = normalize(key, shape, value)?;
    log::trace!(
        "encoded key `{key}` as {}",
        <&'static str>::from(shape)
    );
    record.put(key, stored);
    Ok(())
}

/// Rewrite the generic container forms into the typed shape the table chose;
/// every other value is stored as-is.
fn normalize(key: &str, shape: Shape, value: StateValue) -> Result<StateValue, CodecError> {
    match (shape, value) {
        (Shape::IntList, StateValue::List(items)) => {
            collect_list(key, items, |item| match item {
                StateValue::I32(v) => Some(v),
                _ => None,
            })
            .map(StateValue::IntList)
        }
        (Shape::TextList, StateValue::List(items)) => {
            collect_list(key, items, |item| match item {
                StateValue::Text(v) => Some(v),
                _ => None,
            })
            .map(StateValue::TextList)
        }
        (Shape::SharedTextList, StateValue::List(items)) => {
            collect_list(key, items, |item| match item {
                StateValue::SharedText(v) => Some(v),
                _ => None,
            })
            .map(StateValue::SharedTextList)
        }
        (Shape::TransferableList, StateValue::List(items)) => {
            collect_list(key, items, |item| match item {
                StateValue::Object(o) if o.as_transferable().is_some() => Some(o),
                _ => None,
            })
            .map(StateValue::ObjectList)
        }
        (Shape::TextSlice, StateValue::Slice(items)) => {
            collect_list(key, items.into_vec(), |item| match item {
                StateValue::Text(v) => Some(v),
                _ => None,
            })
            .map(|texts| StateValue::TextSlice(texts.into_boxed_slice()))
        }
        (Shape::TransferableSlice, StateValue::Slice(items)) => {
            collect_list(key, items.into_vec(), |item| match item {
                StateValue::Object(o) if o.as_transferable().is_some() => Some(o),
                _ => None,
            })
            .map(|objects| StateValue::ObjectSlice(objects.into_boxed_slice()))
        }
        (Shape::ArchivableObject, StateValue::Object(object)) => match object.as_archivable() {
            Some(archivable) => Ok(StateValue::Archived(ArchivedValue {
                type_name: archivable.archived_type_name().to_owned(),
                bytes: archivable.archive()?,
            })),
            None => Err(CodecError::UnsupportedValueType {
                key: key.to_owned(),
                kind: "Object",
            }),
        },
        (_, value) => Ok(value),
    }
}

fn collect_list<T>(
    key: &str,
    items: Vec<StateValue>,
    accept: fn(StateValue) -> Option<T>,
) -> Result<Vec<T>, CodecError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let kind = item.kind_name();
        match accept(item) {
            Some(value) => out.push(value),
            None => {
                return Err(CodecError::UnsupportedElementType {
                    key: key.to_owned(),
                    kind,
                });
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SavedValue;

    #[test]
    fn generic_list_is_normalized_before_storage() {
        let mut record = Record::new();
        encode(&mut record, "ids", vec![4i32, 5].to_state()).unwrap();
        assert_eq!(record.get("ids"), Some(&StateValue::IntList(vec![4, 5])));
    }

    #[test]
    fn empty_list_stores_as_empty_int_list() {
        let mut record = Record::new();
        encode(&mut record, "ids", Vec::<String>::new().to_state()).unwrap();
        assert_eq!(record.get("ids"), Some(&StateValue::IntList(Vec::new())));
    }

    #[test]
    fn mixed_list_fails_closed() {
        let mut record = Record::new();
        let mixed = StateValue::List(vec![StateValue::I32(1), StateValue::Text("x".into())]);
        let err = encode(&mut record, "mixed", mixed).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedElementType { kind: "Text", .. }
        ));
        assert!(record.is_empty());
    }

    #[test]
    fn unsupported_value_reports_its_shape() {
        let mut record = Record::new();
        let err = encode(&mut record, "longs", vec![1i64, 2].to_state()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedValueType { kind: "List", .. }
        ));
    }

    #[test]
    fn fixed_arrays_store_unchanged() {
        let mut record = Record::new();
        let values: Box<[i64]> = (0..4).collect();
        encode(&mut record, "spans", values.to_state()).unwrap();
        assert_eq!(
            record.take::<Box<[i64]>>("spans").unwrap().as_deref(),
            Some(&[0i64, 1, 2, 3][..])
        );
    }
}
