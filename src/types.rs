use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::fmt;

macro_rules! define_id_type {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $variant:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            /// Creates a validated identifier.
            ///
            /// Identifiers are opaque: the value is kept verbatim and only
            /// rejected when empty.
            pub fn new(value: impl AsRef<str>) -> Result<Self> {
                let value = value.as_ref();
                if value.is_empty() {
                    return Err(Error::$variant(format!("{} must not be empty", $kind)));
                }
                Ok(Self(value.to_string()))
            }

            /// Returns the underlying string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<&str> for $name {
            type Error = Error;

            fn try_from(value: &str) -> Result<Self> {
                Self::new(value)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                if value.is_empty() {
                    return Err(Error::$variant(format!("{} must not be empty", $kind)));
                }
                Ok(Self(value))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id_type!(
    /// Identity being authorized or blocked, such as a user or service id.
    Subject,
    "subject",
    InvalidSubject
);
define_id_type!(
    /// Name of an action or resource guarded by a permission list.
    PermissionName,
    "permission name",
    InvalidPermissionName
);
