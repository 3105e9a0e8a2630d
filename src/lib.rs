//! # Statekeep
//!
//! Field-level saved state for host objects that get destroyed and recreated
//! by their environment. A host declares which fields matter; statekeep
//! lazily initializes them, writes them into a typed [`Record`] when the
//! environment asks for a snapshot, and hands the values back — once — after
//! the host is rebuilt.
//!
//! ## Features
//!
//! - **Typed records**: every stored value carries its shape; decoding into
//!   the wrong type is an error, not a reinterpretation
//! - **Property cells**: nullable, defaulted and late-init field wrappers
//!   with lazy initialization and single-consumption restore
//! - **One coordinator per host**: many fields, one persisted record, one
//!   destructive restore read
//! - **Ordered capability table**: values satisfying several shapes resolve
//!   by a fixed priority list, identically at runtime and in the derive
//! - **Derive path**: `#[derive(SavedFields)]` generates save/restore
//!   procedures, validated at build time, with ancestor chaining
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use statekeep::prelude::*;
//!
//! struct Screen {
//!     id: HostId,
//!     registry: Rc<SavedStateRegistry>,
//!     lifecycle: Rc<LifecycleSource>,
//!     visits: ValueCell<i32>,
//! }
//!
//! impl StateHost for Screen {
//!     fn host_id(&self) -> HostId { self.id }
//!     fn saved_state_registry(&self) -> Option<Rc<SavedStateRegistry>> {
//!         Some(Rc::clone(&self.registry))
//!     }
//!     fn lifecycle(&self) -> Option<Rc<LifecycleSource>> {
//!         Some(Rc::clone(&self.lifecycle))
//!     }
//! }
//!
//! let screen = Screen { /* ... */ };
//! let visits = screen.visits.get(&screen, "visits")?; // initializer on first read
//! screen.visits.set(&screen, "visits", visits + 1)?;
//!
//! // The environment captures a snapshot, tears the host down, rebuilds it,
//! // injects the snapshot — and the first read after that sees the old value.
//! let snapshot = screen.registry.capture()?;
//! ```

pub mod auto;
pub mod capability;
pub mod cells;
pub mod codec;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod host;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod value;

pub use record::Record;
pub use statekeep_macros::{SavedFields, SavedObject};

#[doc(hidden)]
pub mod __private {
    //! Re-exports for macro hygiene: generated code reaches its external
    //! dependencies through here, so downstream crates never have to import
    //! them directly.

    pub use bincode;
}
