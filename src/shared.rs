use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::acl::{Acl, AclRecord, PermissionNames};
use crate::error::{Error, Result};
use crate::store::AclStore;

/// Thread-safe handle to an [`Acl`].
///
/// Every call takes the lock for its own duration; use [`SharedAcl::write`]
/// to run several mutations under one lock. Clones share the same registry.
#[derive(Debug, Default, Clone)]
pub struct SharedAcl {
    inner: Arc<RwLock<Acl>>,
}

impl SharedAcl {
    /// Wraps a registry.
    pub fn new(acl: Acl) -> Self {
        Self {
            inner: Arc::new(RwLock::new(acl)),
        }
    }

    /// Loads a registry from a store.
    pub async fn load<S>(store: &S) -> Result<Self>
    where
        S: AclStore + ?Sized,
    {
        Acl::load(store).await.map(Self::new)
    }

    /// Saves a snapshot to a store. The lock is released before the store is called.
    pub async fn save<S>(&self, store: &S) -> Result<()>
    where
        S: AclStore + ?Sized,
    {
        let record = self.to_exportable();
        store.save_acl(record).await.map_err(Error::from)
    }

    /// Runs `f` with shared access to the registry.
    pub fn read<T>(&self, f: impl FnOnce(&Acl) -> T) -> T {
        f(&self.read_guard())
    }

    /// Runs `f` with exclusive access to the registry.
    pub fn write<T>(&self, f: impl FnOnce(&mut Acl) -> T) -> T {
        f(&mut self.write_guard())
    }

    /// See [`Acl::ensure_permission_list`].
    pub fn ensure_permission_list(&self, name: impl AsRef<str>) -> Result<()> {
        self.write_guard().ensure_permission_list(name).map(|_| ())
    }

    /// See [`Acl::authorize`].
    pub fn authorize(
        &self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<()> {
        self.write_guard().authorize(subject, names)
    }

    /// See [`Acl::unauthorize`].
    pub fn unauthorize(
        &self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<()> {
        self.write_guard().unauthorize(subject, names)
    }

    /// See [`Acl::block`].
    pub fn block(&self, subject: impl AsRef<str>, names: impl Into<PermissionNames>) -> Result<()> {
        self.write_guard().block(subject, names)
    }

    /// See [`Acl::unblock`].
    pub fn unblock(
        &self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<()> {
        self.write_guard().unblock(subject, names)
    }

    /// See [`Acl::make_public`].
    pub fn make_public(&self, names: impl Into<PermissionNames>) -> Result<()> {
        self.write_guard().make_public(names)
    }

    /// See [`Acl::make_private`].
    pub fn make_private(&self, names: impl Into<PermissionNames>) -> Result<()> {
        self.write_guard().make_private(names)
    }

    /// See [`Acl::is_allowed`].
    pub fn is_allowed(
        &self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<bool> {
        self.read_guard().is_allowed(subject, names)
    }

    /// Returns the export record of the current state.
    pub fn to_exportable(&self) -> AclRecord {
        self.read_guard().to_exportable()
    }

    // Operations validate before touching a list, so a poisoned lock still
    // guards a consistent registry.
    fn read_guard(&self) -> RwLockReadGuard<'_, Acl> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Acl> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Acl> for SharedAcl {
    fn from(acl: Acl) -> Self {
        Self::new(acl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn shared(names: &[&str]) -> SharedAcl {
        let mut acl = Acl::new();
        for name in names {
            acl.ensure_permission_list(name).unwrap();
        }
        SharedAcl::new(acl)
    }

    #[test]
    fn clones_should_share_state() {
        let acl = shared(&["read"]);
        let other = acl.clone();

        other.authorize("subject-1", "read").unwrap();
        assert!(acl.is_allowed("subject-1", "read").unwrap());
    }

    #[test]
    fn concurrent_writers_should_all_apply() {
        let acl = shared(&["read"]);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let acl = acl.clone();
                thread::spawn(move || acl.authorize(format!("subject-{i}"), "read"))
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked").unwrap();
        }

        let exported = acl.to_exportable();
        assert_eq!(exported["read"].authorized.len(), 8);
    }

    #[test]
    fn write_should_run_compound_updates() {
        let acl = shared(&[]);

        acl.write(|acl| -> Result<()> {
            acl.ensure_permission_list("delete")?;
            acl.make_public("delete")?;
            acl.block("subject-2", "delete")
        })
        .unwrap();

        assert!(acl.is_allowed("subject-1", "delete").unwrap());
        assert!(!acl.is_allowed("subject-2", "delete").unwrap());
        assert_eq!(acl.read(Acl::len), 1);
    }
}
