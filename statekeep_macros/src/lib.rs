use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod classify;
mod errors;
mod generate;
mod parse;

/// Derives saved-field persistence for a host struct.
///
/// Every `#[saved]` field is validated against the storage decision table at
/// build time and woven into a generated
/// [`FieldPersister`](../statekeep/auto/trait.FieldPersister.html) impl:
/// `save_fields` encodes each tracked field into the host's record,
/// `restore_fields` applies a restore payload with absent keys leaving the
/// field untouched. A field whose declared type matches no storage shape
/// fails the build at the first violation.
///
/// # Attributes
///
/// - `#[saved]` — track this field under its own name
/// - `#[saved(key = "..")]` — track it under an explicit record key
/// - `#[saved(object)]` — the type is a polymorphic value deriving
///   [`SavedObject`]
/// - `#[saved(base)]` — the field embeds an ancestor host; the generated
///   procedures chain into its impl after this host's own fields, the same
///   order for save and restore
///
/// # Examples
///
/// ```ignore
/// use statekeep::{Record, SavedFields};
/// use statekeep::auto::FieldPersister;
///
/// #[derive(SavedFields, Default)]
/// struct Pane {
///     #[saved]
///     visits: i32,
///     #[saved(key = "sel")]
///     selection: Option<String>,
///     scratch: Vec<u8>, // untracked
/// }
///
/// let pane = Pane { visits: 3, selection: None, scratch: Vec::new() };
/// let mut record = Record::new();
/// pane.save_fields(&mut record).unwrap();
/// assert!(record.contains("visits"));
/// assert!(!record.contains("sel")); // absent optionals write nothing
/// ```
#[proc_macro_derive(SavedFields, attributes(saved))]
pub fn saved_fields_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match parse::parse_host(&input) {
        Ok(host) => generate::field_persister_impl(&host).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derives the polymorphic-value capabilities for a concrete type.
///
/// The `#[saved_object(..)]` attribute names the capabilities the type
/// carries: `transferable` (stored as a live object), `archivable`
/// (flattened to bincode bytes), or both. When both are present the
/// capability table prefers the transferable shape.
///
/// The type must also derive `Clone`, `Debug` and `PartialEq`; archivable
/// types additionally derive `bincode::Encode` and `bincode::Decode`.
///
/// # Examples
///
/// ```ignore
/// use statekeep::SavedObject;
///
/// #[derive(SavedObject, Clone, Debug, PartialEq,
///          bincode::Encode, bincode::Decode)]
/// #[saved_object(archivable)]
/// struct Draft {
///     body: String,
///     revision: u32,
/// }
/// ```
#[proc_macro_derive(SavedObject, attributes(saved_object))]
pub fn saved_object_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match parse::parse_object(&input) {
        Ok(object) => generate::saved_object_impl(&object).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
