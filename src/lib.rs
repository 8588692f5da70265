//! In-memory access control lists.
//!
//! A [`PermissionList`] tracks which subjects are authorized or blocked for one
//! permission and whether the permission is public. Blocking always wins, then
//! public status, then explicit authorization. An [`Acl`] maps permission names
//! to lists and answers "is this subject allowed all of these permissions?".
//! Unknown permissions are denied on queries and rejected on mutations.
//!
//! # Examples
//!
//! ```
//! use rs_acl::Acl;
//!
//! let mut acl = Acl::new();
//! acl.ensure_permission_list("read").unwrap();
//! acl.ensure_permission_list("write").unwrap();
//! acl.authorize("user_1", ["read", "write"]).unwrap();
//! acl.make_public("read").unwrap();
//! acl.block("user_2", "read").unwrap();
//!
//! assert!(acl.is_allowed("user_1", ["read", "write"]).unwrap());
//! assert!(acl.is_allowed("user_3", "read").unwrap());
//! assert!(!acl.is_allowed("user_2", "read").unwrap());
//!
//! // Snapshots rebuild an equivalent registry.
//! let restored = Acl::from_exportable(&acl.to_exportable()).unwrap();
//! assert_eq!(restored, acl);
//! ```
//!
//! Persisting through the in-memory store (enable `memory-store`):
//! ```no_run
//! # #[cfg(feature = "memory-store")]
//! # {
//! use futures::executor::block_on;
//! use rs_acl::{Acl, MemoryStore};
//! let store = MemoryStore::new();
//! let acl = block_on(Acl::load(&store)).unwrap();
//! block_on(acl.save(&store)).unwrap();
//! # }
//! ```
#![forbid(unsafe_code)]

mod acl;
mod error;
mod permission_list;
mod shared;
mod store;
mod subjects;
mod types;

#[cfg(feature = "memory-store")]
mod memory_store;

pub use crate::acl::{Acl, AclRecord, PermissionListInput, PermissionNames};
pub use crate::error::{Error, Result, StoreError};
pub use crate::permission_list::{PermissionList, PermissionListRecord};
pub use crate::shared::SharedAcl;
pub use crate::store::AclStore;
pub use crate::types::{PermissionName, Subject};

#[cfg(feature = "memory-store")]
pub use crate::memory_store::MemoryStore;
