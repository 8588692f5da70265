use crate::acl::AclRecord;
use crate::error::StoreError;
use async_trait::async_trait;

/// Persistence interface for registry snapshots.
///
/// Implementations store the export record verbatim; the registry itself never
/// performs I/O.
#[async_trait]
pub trait AclStore: Send + Sync {
    /// Returns the last saved snapshot, if any.
    async fn load_acl(&self) -> std::result::Result<Option<AclRecord>, StoreError>;

    /// Replaces the stored snapshot.
    async fn save_acl(&self, record: AclRecord) -> std::result::Result<(), StoreError>;
}
