use crate::acl::AclRecord;
use crate::error::StoreError;
use crate::store::AclStore;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory snapshot store for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Option<AclRecord>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding a snapshot.
    pub fn with_record(record: AclRecord) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(record))),
        }
    }
}

#[async_trait]
impl AclStore for MemoryStore {
    async fn load_acl(&self) -> std::result::Result<Option<AclRecord>, StoreError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::from("poisoned lock"))?;
        Ok(guard.clone())
    }

    async fn save_acl(&self, record: AclRecord) -> std::result::Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::from("poisoned lock"))?;
        *guard = Some(record);
        Ok(())
    }
}
