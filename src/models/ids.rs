//! Strongly-typed identity wrappers for every entity kind
//!
//! Identities are positive integers handed out by the store. The newtypes
//! keep a `UserId` from ever being passed where a `LogEntryId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::entity::EntityId;

/// Macro to generate integer identity newtypes
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Identity carried by a record that has not been stored yet
            pub const UNASSIGNED: Self = Self(0);

            /// Wrap a raw integer identity
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw integer value
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Whether this identity could refer to a stored record
            pub const fn is_assigned(&self) -> bool {
                self.0 > 0
            }
        }

        impl EntityId for $name {
            fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            fn raw(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(UserId, "user-");
define_id!(LogEntryId, "log-");
