//! Build-time classification of declared field types.
//!
//! This is the capability decision table applied early: the same precedence
//! the runtime codec walks, evaluated against a field's declared type while
//! the host compiles. Resolution is textual on the final path segment —
//! a proc macro sees syntax, not types — which is also why polymorphic
//! fields need an explicit `object` marker rather than trait detection.
//!
//! A type that matches nothing fails the expansion immediately; the build
//! stops at the first unsupported declaration.

use syn::{GenericArgument, Ident, PathArguments, Type, spanned::Spanned};

use crate::errors;

/// Storage shape a declared type was classified into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredShape {
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
    Record,
    I8Array,
    I16Array,
    I32Array,
    I64Array,
    F32Array,
    F64Array,
    CharArray,
    BoolArray,
    List(Box<DeclaredShape>),
    TextSlice,
    Object,
    Optional(Box<DeclaredShape>),
}

impl DeclaredShape {
    /// Whether this shape may appear as a typed-list element.
    fn supported_list_element(&self) -> bool {
        matches!(
            self,
            Self::I32 | Self::Text | Self::SharedText | Self::Object
        )
    }
}

/// Classify a declared type. `object` is true when the field carries the
/// `object` marker, admitting otherwise-unknown paths as polymorphic values.
pub fn classify(ty: &Type, object: bool) -> syn::Result<DeclaredShape> {
    let Type::Path(type_path) = ty else {
        return Err(errors::unsupported_declared_type(ty));
    };
    let Some(segment) = type_path.path.segments.last() else {
        return Err(errors::unsupported_declared_type(ty));
    };

    if let Some(shape) = classify_plain_ident(&segment.ident) {
        if segment.arguments.is_empty() {
            return Ok(shape);
        }
        return Err(errors::unsupported_declared_type(ty));
    }

    match segment.ident.to_string().as_str() {
        "Option" => {
            let inner = single_type_argument(ty, &segment.arguments)?;
            let shape = classify(inner, object)?;
            if matches!(shape, DeclaredShape::Optional(_)) {
                return Err(errors::unsupported_declared_type(ty));
            }
            Ok(DeclaredShape::Optional(Box::new(shape)))
        }
        "Vec" => {
            let element = single_type_argument(ty, &segment.arguments)?;
            let shape = classify(element, object)?;
            if !shape.supported_list_element() {
                return Err(errors::unsupported_list_element(element));
            }
            Ok(DeclaredShape::List(Box::new(shape)))
        }
        "Box" => classify_boxed_slice(ty, &segment.arguments),
        "Arc" => {
            let inner = single_type_argument(ty, &segment.arguments)?;
            if matches!(inner, Type::Path(p) if p.path.is_ident("str")) {
                Ok(DeclaredShape::SharedText)
            } else {
                Err(errors::unsupported_declared_type(ty))
            }
        }
        // Shapes the storage set deliberately lacks get the precise error,
        // not the "did you mean object?" hint.
        "u8" | "u16" | "u32" | "u64" | "u128" | "usize" | "isize" | "i128" | "str" => {
            Err(errors::unsupported_declared_type(ty))
        }
        _ if segment.arguments.is_empty() => {
            if object {
                Ok(DeclaredShape::Object)
            } else {
                Err(errors::unknown_field_type(ty))
            }
        }
        _ => Err(errors::unsupported_declared_type(ty)),
    }
}

fn classify_plain_ident(ident: &Ident) -> Option<DeclaredShape> {
    let shape = match ident.to_string().as_str() {
        "i8" => DeclaredShape::I8,
        "char" => DeclaredShape::Char,
        "i16" => DeclaredShape::I16,
        "i32" => DeclaredShape::I32,
        "i64" => DeclaredShape::I64,
        "f32" => DeclaredShape::F32,
        "f64" => DeclaredShape::F64,
        "bool" => DeclaredShape::Bool,
        "String" => DeclaredShape::Text,
        "Size" => DeclaredShape::Size,
        "SizeF" => DeclaredShape::SizeF,
        "Record" => DeclaredShape::Record,
        _ => return None,
    };
    Some(shape)
}

fn classify_boxed_slice(ty: &Type, arguments: &PathArguments) -> syn::Result<DeclaredShape> {
    let inner = single_type_argument(ty, arguments)?;
    let Type::Slice(slice) = inner else {
        return Err(errors::unsupported_declared_type(ty));
    };
    let Type::Path(element) = slice.elem.as_ref() else {
        return Err(errors::unsupported_declared_type(ty));
    };
    let Some(ident) = element.path.get_ident() else {
        return Err(errors::unsupported_declared_type(ty));
    };
    let shape = match ident.to_string().as_str() {
        "i8" => DeclaredShape::I8Array,
        "i16" => DeclaredShape::I16Array,
        "i32" => DeclaredShape::I32Array,
        "i64" => DeclaredShape::I64Array,
        "f32" => DeclaredShape::F32Array,
        "f64" => DeclaredShape::F64Array,
        "char" => DeclaredShape::CharArray,
        "bool" => DeclaredShape::BoolArray,
        "String" => DeclaredShape::TextSlice,
        _ => return Err(errors::unsupported_declared_type(ty)),
    };
    Ok(shape)
}

fn single_type_argument<'a>(
    ty: &Type,
    arguments: &'a PathArguments,
) -> syn::Result<&'a Type> {
    if let PathArguments::AngleBracketed(args) = arguments {
        let mut types = args.args.iter().filter_map(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        });
        if let (Some(inner), None) = (types.next(), types.next()) {
            return Ok(inner);
        }
    }
    Err(syn::Error::new(
        ty.span(),
        "expected exactly one type argument",
    ))
}
