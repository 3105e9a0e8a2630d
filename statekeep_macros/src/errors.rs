//! Error constructors shared by the parsing and classification passes.
//!
//! Every helper produces a `syn::Error` spanned at the offending syntax; the
//! derive entry points surface the first one as a compile error, so the
//! build fails at the first unsupported declaration.

use syn::{Type, spanned::Spanned};

pub fn unsupported_declared_type(ty: &Type) -> syn::Error {
    syn::Error::new(
        ty.span(),
        "unsupported declared type for a saved field; supported shapes are \
         i8/i16/i32/i64/f32/f64/char/bool, String, Arc<str>, Size, SizeF, \
         Record, Box<[numeric/char/bool]>, Box<[String]>, Vec<element>, \
         Option<shape>, and `#[saved(object)]` types",
    )
}

pub fn unsupported_list_element(element: &Type) -> syn::Error {
    syn::Error::new(
        element.span(),
        "unsupported list element; lists carry i32, String, Arc<str> or \
         `#[saved(object)]` elements — fixed-width numerics belong in a \
         Box<[..]> array instead",
    )
}

pub fn unknown_field_type(ty: &Type) -> syn::Error {
    syn::Error::new(
        ty.span(),
        "unknown type for a saved field; if this is a polymorphic value \
         deriving `SavedObject`, mark the field `#[saved(object)]`",
    )
}
