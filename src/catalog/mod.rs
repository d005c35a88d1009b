//! Bunker resource catalog: typed entity kinds, persistence seam,
//! reference-integrity guard, and the generic resource operations.

pub mod error;
pub mod guard;
pub mod kinds;
pub mod models;
pub mod ops;
pub mod store;

pub use error::CatalogError;
pub use guard::{can_delete, BlockingReference, DeleteCheck};
pub use kinds::{Dependent, ResourceKind};
pub use ops::CatalogService;
pub use store::{CatalogStore, MemoryStore, RecordId, StoreError};
