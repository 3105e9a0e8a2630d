//! Parsing of the derive inputs into the shapes the generators consume.

use syn::{Data, DeriveInput, Fields, Ident, LitStr, Meta, spanned::Spanned};

use crate::classify::{self, DeclaredShape};

/// A host struct deriving `SavedFields`.
pub struct HostInput {
    pub ident: Ident,
    pub fields: Vec<SavedField>,
}

/// One `#[saved]` field.
pub struct SavedField {
    pub ident: Ident,
    pub key: String,
    pub role: FieldRole,
}

pub enum FieldRole {
    /// A tracked value field, classified against the decision table.
    Plain { shape: DeclaredShape },
    /// An embedded ancestor host the generated procedures chain into.
    Base,
}

struct SavedAttr {
    key: Option<String>,
    object: bool,
    base: bool,
}

pub fn parse_host(input: &DeriveInput) -> syn::Result<HostInput> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "`SavedFields` does not support generic hosts",
        ));
    }
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "`SavedFields` can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new(
            input.ident.span(),
            "`SavedFields` requires named fields",
        ));
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let Some(attr) = parse_saved_attr(field)? else {
            continue;
        };
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let role = if attr.base {
            if attr.key.is_some() || attr.object {
                return Err(syn::Error::new(
                    field.span(),
                    "`base` cannot be combined with `key` or `object`",
                ));
            }
            FieldRole::Base
        } else {
            FieldRole::Plain {
                shape: classify::classify(&field.ty, attr.object)?,
            }
        };
        let key = attr.key.unwrap_or_else(|| ident.to_string());
        fields.push(SavedField { ident, key, role });
    }

    if fields.is_empty() {
        return Err(syn::Error::new(
            input.ident.span(),
            "`SavedFields` needs at least one `#[saved]` field",
        ));
    }

    Ok(HostInput {
        ident: input.ident.clone(),
        fields,
    })
}

fn parse_saved_attr(field: &syn::Field) -> syn::Result<Option<SavedAttr>> {
    let Some(attr) = field.attrs.iter().find(|attr| attr.path().is_ident("saved")) else {
        return Ok(None);
    };
    let mut parsed = SavedAttr {
        key: None,
        object: false,
        base: false,
    };
    match &attr.meta {
        Meta::Path(_) => {}
        Meta::List(_) => {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parsed.key = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("object") {
                    parsed.object = true;
                    Ok(())
                } else if meta.path.is_ident("base") {
                    parsed.base = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown `saved` option; expected `key`, `object` or `base`"))
                }
            })?;
        }
        Meta::NameValue(nv) => {
            return Err(syn::Error::new(
                nv.span(),
                "use `#[saved(key = \"..\")]` rather than `#[saved = ..]`",
            ));
        }
    }
    Ok(Some(parsed))
}

/// A type deriving `SavedObject`.
pub struct ObjectInput {
    pub ident: Ident,
    pub transferable: bool,
    pub archivable: bool,
}

pub fn parse_object(input: &DeriveInput) -> syn::Result<ObjectInput> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "`SavedObject` does not support generic types",
        ));
    }

    let mut transferable = false;
    let mut archivable = false;
    for attr in &input.attrs {
        if !attr.path().is_ident("saved_object") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("transferable") {
                transferable = true;
                Ok(())
            } else if meta.path.is_ident("archivable") {
                archivable = true;
                Ok(())
            } else {
                Err(meta.error(
                    "unknown capability; expected `transferable` and/or `archivable`",
                ))
            }
        })?;
    }

    if !transferable && !archivable {
        return Err(syn::Error::new(
            input.ident.span(),
            "`SavedObject` needs `#[saved_object(..)]` naming at least one of \
             `transferable`, `archivable`",
        ));
    }

    Ok(ObjectInput {
        ident: input.ident.clone(),
        transferable,
        archivable,
    })
}
