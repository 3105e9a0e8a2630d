//! Prelude re-exporting the types most integrations need.
//!
//! ```rust,ignore
//! use statekeep::prelude::*;
//! ```

pub use crate::auto::{FieldPersister, register_host};
pub use crate::cells::{self, LateCell, NullableCell, ValueCell};
pub use crate::config::RegistryConfig;
pub use crate::errors::{CodecError, StatekeepError, StatekeepResult};
pub use crate::host::{HostId, LifecycleSource, StateHost};
pub use crate::record::Record;
pub use crate::registry::{SaveProvider, SavedStateRegistry};
pub use crate::value::{Archivable, SavedValue, Size, SizeF, StateObject, StateValue, Transferable};
pub use crate::{SavedFields, SavedObject};
