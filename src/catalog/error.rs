//! Error taxonomy for catalog operations.

use thiserror::Error;

use super::guard::BlockingSet;
use super::kinds::ResourceKind;
use super::store::{RecordId, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The addressed record does not exist.
    #[error("{} not found with ID: {id}", kind.label())]
    NotFound { kind: ResourceKind, id: RecordId },

    /// A foreign key on an incoming payload does not resolve.
    #[error("{} not found with ID: {id}", kind.label())]
    ReferenceNotFound { kind: ResourceKind, id: RecordId },

    /// Delete vetoed: dependents still cite the record. Carries every
    /// blocking kind with its count.
    #[error("Cannot delete {} with ID: {id}. It is referenced by {blocking}.", kind.label())]
    ReferentialConflict {
        kind: ResourceKind,
        id: RecordId,
        blocking: BlockingSet,
    },

    /// The delete guard was invoked on a kind that is not referenced by
    /// anything. Wiring bug, not a user error.
    #[error("delete guard invoked on non-referenced kind {0}")]
    UnsupportedKind(ResourceKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn codec(err: serde_json::Error) -> Self {
        Self::Store(StoreError::Codec(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::guard::BlockingReference;

    #[test]
    fn test_not_found_message() {
        let err = CatalogError::NotFound {
            kind: ResourceKind::StorageLocation,
            id: 7,
        };
        assert_eq!(err.to_string(), "Storage location not found with ID: 7");
    }

    #[test]
    fn test_conflict_message_lists_all_blocking_kinds() {
        let err = CatalogError::ReferentialConflict {
            kind: ResourceKind::StorageLocation,
            id: 1,
            blocking: BlockingSet(vec![
                BlockingReference {
                    kind: ResourceKind::Weapon,
                    count: 2,
                },
                BlockingReference {
                    kind: ResourceKind::Battery,
                    count: 1,
                },
            ]),
        };
        let msg = err.to_string();
        assert!(msg.contains("Cannot delete Storage location with ID: 1"));
        assert!(msg.contains("2 Weapon record(s)"));
        assert!(msg.contains("1 Battery record(s)"));
    }
}
