//! Capability tags for polymorphic values.
//!
//! A value stored behind [`StateValue::Object`](super::StateValue::Object) may
//! carry either or both of two independent capabilities: it can be
//! *transferable* (handed across a destroy/recreate cycle as a live object) or
//! *archivable* (flattened to bytes and rebuilt later). The capability table
//! decides which one wins when a type carries both; see
//! [`crate::capability`].

use std::any::Any;
use std::fmt::Debug;

use crate::errors::CodecError;

/// Object-safe surface every polymorphic saved value implements.
///
/// Usually generated by `#[derive(SavedObject)]` rather than written by hand.
/// The two `as_*` probes report which capabilities the concrete type carries;
/// the defaults report none, and the derive overrides the ones requested in
/// its `#[saved_object(...)]` attribute.
pub trait StateObject: Any + Debug {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn clone_object(&self) -> Box<dyn StateObject>;

    /// Value equality across trait objects. Implementations downcast `other`
    /// and compare; a differing concrete type is never equal.
    fn object_eq(&self, other: &dyn StateObject) -> bool;

    fn as_transferable(&self) -> Option<&dyn Transferable> {
        None
    }

    fn as_archivable(&self) -> Option<&dyn Archivable> {
        None
    }
}

/// Capability tag: the value survives a recreate cycle as a live object and
/// is stored in the record without being flattened.
pub trait Transferable: StateObject {}

/// Capability tag: the value can be flattened to bytes and rebuilt.
///
/// Archiving goes through bincode; the type name travels with the bytes so a
/// decode into the wrong type is rejected instead of producing garbage.
pub trait Archivable: StateObject {
    fn archived_type_name(&self) -> &'static str;

    fn archive(&self) -> Result<Vec<u8>, CodecError>;
}
