use crate::error::{Error, Result};
use crate::permission_list::{PermissionList, PermissionListRecord};
use crate::store::AclStore;
use crate::types::{PermissionName, Subject};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Export record of a whole [`Acl`], keyed by permission name.
pub type AclRecord = BTreeMap<String, PermissionListRecord>;

/// One permission name or a sequence of them.
///
/// Bulk registry operations accept either shape; a single name is treated as
/// a one-element sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionNames {
    /// A single permission name.
    One(String),
    /// Several permission names, processed in order.
    Many(Vec<String>),
}

impl PermissionNames {
    /// Normalizes to a sequence of names.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

impl From<&str> for PermissionNames {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for PermissionNames {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<&String> for PermissionNames {
    fn from(value: &String) -> Self {
        Self::One(value.clone())
    }
}

impl From<PermissionName> for PermissionNames {
    fn from(value: PermissionName) -> Self {
        Self::One(value.as_str().to_string())
    }
}

impl From<&PermissionName> for PermissionNames {
    fn from(value: &PermissionName) -> Self {
        Self::One(value.as_str().to_string())
    }
}

impl<T: AsRef<str>> From<Vec<T>> for PermissionNames {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values.iter().map(|v| v.as_ref().to_string()).collect())
    }
}

impl<T: AsRef<str>> From<&[T]> for PermissionNames {
    fn from(values: &[T]) -> Self {
        Self::Many(values.iter().map(|v| v.as_ref().to_string()).collect())
    }
}

impl<T: AsRef<str>, const N: usize> From<[T; N]> for PermissionNames {
    fn from(values: [T; N]) -> Self {
        Self::Many(values.iter().map(|v| v.as_ref().to_string()).collect())
    }
}

impl<T: AsRef<str>, const N: usize> From<&[T; N]> for PermissionNames {
    fn from(values: &[T; N]) -> Self {
        Self::Many(values.iter().map(|v| v.as_ref().to_string()).collect())
    }
}

/// Initial state of one registry entry: a live list or a raw export record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionListInput {
    /// An already built list, moved into the registry.
    List(PermissionList),
    /// A raw record, validated and copied into a new list.
    Record(PermissionListRecord),
}

impl PermissionListInput {
    /// Normalizes the entry into an owned list.
    pub fn into_list(self) -> Result<PermissionList> {
        match self {
            Self::List(list) => Ok(list),
            Self::Record(record) => PermissionList::from_record(&record),
        }
    }
}

impl From<PermissionList> for PermissionListInput {
    fn from(list: PermissionList) -> Self {
        Self::List(list)
    }
}

impl From<PermissionListRecord> for PermissionListInput {
    fn from(record: PermissionListRecord) -> Self {
        Self::Record(record)
    }
}

impl From<&PermissionListRecord> for PermissionListInput {
    fn from(record: &PermissionListRecord) -> Self {
        Self::Record(record.clone())
    }
}

/// Registry of named permission lists.
///
/// Mutations require the named permissions to exist (see
/// [`Acl::ensure_permission_list`]); queries treat unknown permissions as
/// denied. Multi-name mutations are applied name by name and are not rolled
/// back when a later name fails.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Acl {
    lists: HashMap<PermissionName, PermissionList>,
}

impl Acl {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from lists, raw records, or a mix of both.
    ///
    /// Records are validated and copied. A later entry replaces an earlier one
    /// with the same name.
    pub fn from_lists<I, K, V>(lists: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<PermissionListInput>,
    {
        let mut map = HashMap::new();
        for (name, input) in lists {
            let input: PermissionListInput = input.into();
            map.insert(PermissionName::new(name)?, input.into_list()?);
        }
        Ok(Self { lists: map })
    }

    /// Rebuilds a registry from an export record.
    pub fn from_exportable(record: &AclRecord) -> Result<Self> {
        let mut lists = HashMap::with_capacity(record.len());
        for (name, list) in record {
            lists.insert(PermissionName::new(name)?, PermissionList::from_record(list)?);
        }
        Ok(Self { lists })
    }

    /// Loads a registry from a store, or an empty one when nothing is stored.
    pub async fn load<S>(store: &S) -> Result<Self>
    where
        S: AclStore + ?Sized,
    {
        match store.load_acl().await.map_err(Error::from)? {
            Some(record) => Self::from_exportable(&record),
            None => Ok(Self::new()),
        }
    }

    /// Saves the export record of this registry to a store.
    pub async fn save<S>(&self, store: &S) -> Result<()>
    where
        S: AclStore + ?Sized,
    {
        store.save_acl(self.to_exportable()).await.map_err(Error::from)
    }

    /// Returns the list registered under `name`.
    pub fn get_permission_list(&self, name: impl AsRef<str>) -> Result<&PermissionList> {
        let name = PermissionName::new(name)?;
        match self.lists.get(name.as_str()) {
            Some(list) => Ok(list),
            None => Err(Error::PermissionNotFound(name)),
        }
    }

    /// Returns the list registered under `name` for in-place mutation.
    pub fn get_permission_list_mut(
        &mut self,
        name: impl AsRef<str>,
    ) -> Result<&mut PermissionList> {
        let name = PermissionName::new(name)?;
        match self.lists.get_mut(name.as_str()) {
            Some(list) => Ok(list),
            None => Err(Error::PermissionNotFound(name)),
        }
    }

    /// Returns the list registered under `name`, creating an empty private
    /// list when absent. Existing lists are left untouched.
    pub fn ensure_permission_list(
        &mut self,
        name: impl AsRef<str>,
    ) -> Result<&mut PermissionList> {
        let name = PermissionName::new(name)?;
        match self.lists.entry(name) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                tracing::debug!(permission = %entry.key(), "created permission list");
                Ok(entry.insert(PermissionList::new()))
            }
        }
    }

    /// Removes and returns the list registered under `name`.
    pub fn remove_permission_list(
        &mut self,
        name: impl AsRef<str>,
    ) -> Result<Option<PermissionList>> {
        let name = PermissionName::new(name)?;
        let removed = self.lists.remove(name.as_str());
        if removed.is_some() {
            tracing::debug!(permission = %name, "removed permission list");
        }
        Ok(removed)
    }

    /// Returns whether a list is registered under `name`.
    pub fn contains_permission(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    /// Registered permission names in sorted order.
    pub fn permission_names(&self) -> Vec<&PermissionName> {
        let mut names: Vec<_> = self.lists.keys().collect();
        names.sort();
        names
    }

    /// Number of registered permissions.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns whether no permission is registered.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Authorizes the subject on every named permission.
    pub fn authorize(
        &mut self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<()> {
        let subject = Subject::new(subject)?;
        self.apply(names.into(), "authorize", Some(&subject), |list| {
            list.authorize(&subject)
        })
    }

    /// Removes the subject's authorization on every named permission.
    pub fn unauthorize(
        &mut self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<()> {
        let subject = Subject::new(subject)?;
        self.apply(names.into(), "unauthorize", Some(&subject), |list| {
            list.unauthorize(&subject)
        })
    }

    /// Blocks the subject on every named permission.
    pub fn block(
        &mut self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<()> {
        let subject = Subject::new(subject)?;
        self.apply(names.into(), "block", Some(&subject), |list| {
            list.block(&subject)
        })
    }

    /// Unblocks the subject on every named permission.
    pub fn unblock(
        &mut self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<()> {
        let subject = Subject::new(subject)?;
        self.apply(names.into(), "unblock", Some(&subject), |list| {
            list.unblock(&subject)
        })
    }

    /// Makes every named permission public.
    pub fn make_public(&mut self, names: impl Into<PermissionNames>) -> Result<()> {
        self.apply(names.into(), "make_public", None, |list| {
            list.make_public();
            Ok(())
        })
    }

    /// Makes every named permission private.
    pub fn make_private(&mut self, names: impl Into<PermissionNames>) -> Result<()> {
        self.apply(names.into(), "make_private", None, |list| {
            list.make_private();
            Ok(())
        })
    }

    /// Returns whether the subject is allowed all of the named permissions.
    ///
    /// An unknown permission makes the answer `false` rather than an error.
    pub fn is_allowed(
        &self,
        subject: impl AsRef<str>,
        names: impl Into<PermissionNames>,
    ) -> Result<bool> {
        let subject = Subject::new(subject)?;
        let names = validate_names(names.into())?;

        for name in &names {
            let Some(list) = self.lists.get(name.as_str()) else {
                tracing::trace!(permission = %name, "unknown permission denies access");
                return Ok(false);
            };
            if !list.is_allowed(&subject)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns whether any of the subjects is allowed the named permission.
    pub fn is_any_allowed<I>(&self, subjects: I, name: impl AsRef<str>) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let name = PermissionName::new(name)?;
        match self.lists.get(name.as_str()) {
            Some(list) => list.is_any_allowed(subjects),
            None => {
                tracing::trace!(permission = %name, "unknown permission denies access");
                Ok(false)
            }
        }
    }

    /// Iterates over registered permissions in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&PermissionName, &PermissionList)> {
        self.lists.iter()
    }

    /// Returns the export record for persistence.
    pub fn to_exportable(&self) -> AclRecord {
        self.lists
            .iter()
            .map(|(name, list)| (name.as_str().to_string(), list.to_exportable()))
            .collect()
    }

    fn apply<F>(
        &mut self,
        names: PermissionNames,
        action: &'static str,
        subject: Option<&Subject>,
        mut op: F,
    ) -> Result<()>
    where
        F: FnMut(&mut PermissionList) -> Result<()>,
    {
        let names = names.into_vec();
        if names.is_empty() {
            return Err(Error::EmptyPermissionNames);
        }

        for name in names {
            let list = self.get_permission_list_mut(&name)?;
            op(list)?;
            tracing::debug!(
                permission = %name,
                subject = ?subject,
                action,
                "applied permission change"
            );
        }
        Ok(())
    }
}

impl TryFrom<&AclRecord> for Acl {
    type Error = Error;

    fn try_from(record: &AclRecord) -> Result<Self> {
        Self::from_exportable(record)
    }
}

impl TryFrom<AclRecord> for Acl {
    type Error = Error;

    fn try_from(record: AclRecord) -> Result<Self> {
        Self::from_exportable(&record)
    }
}

fn validate_names(names: PermissionNames) -> Result<Vec<PermissionName>> {
    let names = names.into_vec();
    if names.is_empty() {
        return Err(Error::EmptyPermissionNames);
    }
    names.into_iter().map(PermissionName::new).collect()
}
