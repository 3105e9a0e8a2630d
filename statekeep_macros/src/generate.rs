//! Code generation for the two derives.

use proc_macro2::TokenStream;
use quote::quote;

use crate::parse::{FieldRole, HostInput, ObjectInput, SavedField};

/// Emit the `FieldPersister` impl for a host.
///
/// Own fields are processed in declaration order, then every `base` field
/// chains into its ancestor's impl — the same sequence for save and restore.
pub fn field_persister_impl(host: &HostInput) -> TokenStream {
    let ident = &host.ident;
    let (own, bases): (Vec<&SavedField>, Vec<&SavedField>) = host
        .fields
        .iter()
        .partition(|field| matches!(field.role, FieldRole::Plain { .. }));

    let save_stmts = own.iter().map(|field| save_stmt(field));
    let restore_stmts = own.iter().map(|field| restore_stmt(field));
    let base_saves = bases.iter().map(|field| {
        let field_ident = &field.ident;
        quote! {
            ::statekeep::auto::FieldPersister::save_fields(&self.#field_ident, record)?;
        }
    });
    let base_restores = bases.iter().map(|field| {
        let field_ident = &field.ident;
        quote! {
            ::statekeep::auto::FieldPersister::restore_fields(&mut self.#field_ident, record)?;
        }
    });

    quote! {
        #[automatically_derived]
        impl ::statekeep::auto::FieldPersister for #ident {
            fn save_fields(
                &self,
                record: &mut ::statekeep::record::Record,
            ) -> ::statekeep::errors::StatekeepResult<()> {
                #(#save_stmts)*
                #(#base_saves)*
                ::core::result::Result::Ok(())
            }

            fn restore_fields(
                &mut self,
                record: &mut ::statekeep::record::Record,
            ) -> ::statekeep::errors::StatekeepResult<()> {
                #(#restore_stmts)*
                #(#base_restores)*
                ::core::result::Result::Ok(())
            }
        }
    }
}

fn is_optional(field: &SavedField) -> bool {
    matches!(
        &field.role,
        FieldRole::Plain {
            shape: crate::classify::DeclaredShape::Optional(_)
        }
    )
}

fn save_stmt(field: &SavedField) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    if is_optional(field) {
        // An absent optional writes nothing: the key stays out of the record.
        quote! {
            if let ::core::option::Option::Some(value) = &self.#ident {
                ::statekeep::codec::encode(
                    record,
                    #key,
                    ::statekeep::value::SavedValue::to_state(value),
                )?;
            }
        }
    } else {
        quote! {
            ::statekeep::codec::encode(
                record,
                #key,
                ::statekeep::value::SavedValue::to_state(&self.#ident),
            )?;
        }
    }
}

fn restore_stmt(field: &SavedField) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    if is_optional(field) {
        quote! {
            if let ::core::option::Option::Some(value) = record.remove(#key) {
                self.#ident = ::core::option::Option::Some(
                    ::statekeep::value::SavedValue::from_state(value)?,
                );
            }
        }
    } else {
        // An absent key is "no update", never "reset to default".
        quote! {
            if let ::core::option::Option::Some(value) = record.remove(#key) {
                self.#ident = ::statekeep::value::SavedValue::from_state(value)?;
            }
        }
    }
}

/// Emit the capability impls and the `SavedValue` conversion for a
/// `SavedObject` type.
pub fn saved_object_impl(object: &ObjectInput) -> TokenStream {
    let ident = &object.ident;
    let name_str = ident.to_string();

    let as_transferable = object.transferable.then(|| {
        quote! {
            fn as_transferable(
                &self,
            ) -> ::core::option::Option<&dyn ::statekeep::value::Transferable> {
                ::core::option::Option::Some(self)
            }
        }
    });
    let transferable_impl = object.transferable.then(|| {
        quote! {
            #[automatically_derived]
            impl ::statekeep::value::Transferable for #ident {}
        }
    });

    let as_archivable = object.archivable.then(|| {
        quote! {
            fn as_archivable(
                &self,
            ) -> ::core::option::Option<&dyn ::statekeep::value::Archivable> {
                ::core::option::Option::Some(self)
            }
        }
    });
    let archivable_impl = object.archivable.then(|| {
        quote! {
            #[automatically_derived]
            impl ::statekeep::value::Archivable for #ident {
                fn archived_type_name(&self) -> &'static str {
                    #name_str
                }

                fn archive(
                    &self,
                ) -> ::core::result::Result<::std::vec::Vec<u8>, ::statekeep::errors::CodecError> {
                    ::statekeep::__private::bincode::encode_to_vec(
                        self,
                        ::statekeep::__private::bincode::config::standard(),
                    )
                    .map_err(::statekeep::errors::CodecError::from)
                }
            }
        }
    });
    let archived_arm = object.archivable.then(|| {
        quote! {
            ::statekeep::value::StateValue::Archived(archived) => {
                if archived.type_name != #name_str {
                    return ::core::result::Result::Err(
                        ::statekeep::errors::CodecError::WrongArchivedType {
                            found: archived.type_name,
                            expected: #name_str,
                        },
                    );
                }
                let (value, _) = ::statekeep::__private::bincode::decode_from_slice(
                    &archived.bytes,
                    ::statekeep::__private::bincode::config::standard(),
                )?;
                ::core::result::Result::Ok(value)
            }
        }
    });

    quote! {
        #[automatically_derived]
        impl ::statekeep::value::StateObject for #ident {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }

            fn clone_object(&self) -> ::std::boxed::Box<dyn ::statekeep::value::StateObject> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn object_eq(&self, other: &dyn ::statekeep::value::StateObject) -> bool {
                match other.as_any().downcast_ref::<Self>() {
                    ::core::option::Option::Some(other) => self == other,
                    ::core::option::Option::None => false,
                }
            }

            #as_transferable
            #as_archivable
        }

        #transferable_impl
        #archivable_impl

        #[automatically_derived]
        impl ::statekeep::value::SavedValue for #ident {
            fn to_state(&self) -> ::statekeep::value::StateValue {
                ::statekeep::value::StateValue::Object(
                    ::std::boxed::Box::new(::core::clone::Clone::clone(self)),
                )
            }

            fn from_state(
                value: ::statekeep::value::StateValue,
            ) -> ::core::result::Result<Self, ::statekeep::errors::CodecError> {
                match value {
                    ::statekeep::value::StateValue::Object(object) => {
                        match object.into_any().downcast::<Self>() {
                            ::core::result::Result::Ok(object) => {
                                ::core::result::Result::Ok(*object)
                            }
                            ::core::result::Result::Err(_) => ::core::result::Result::Err(
                                ::statekeep::errors::CodecError::ValueShapeMismatch {
                                    expected: #name_str,
                                    found: "Object",
                                },
                            ),
                        }
                    }
                    #archived_arm
                    other => ::core::result::Result::Err(
                        ::statekeep::errors::CodecError::ValueShapeMismatch {
                            expected: #name_str,
                            found: other.kind_name(),
                        },
                    ),
                }
            }
        }
    }
}
