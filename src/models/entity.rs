//! The contract every stored record kind fulfils
//!
//! The store is generic over [`Entity`]; adding a new record kind means
//! implementing this trait and giving `Storage` one more repository.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// An integer identity for one entity kind
pub trait EntityId: Copy + Ord + Hash + Debug + Display + Send + Sync + 'static {
    /// Build the identity from its raw integer
    fn from_raw(raw: i64) -> Self;

    /// The raw integer behind the identity
    fn raw(&self) -> i64;
}

/// A record kind managed by the store
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identity type for this kind
    type Id: EntityId;

    /// Name used in errors and log events
    const KIND: &'static str;

    /// Current identity of the record
    fn id(&self) -> Self::Id;

    /// Overwrite the identity; only the store calls this
    fn set_id(&mut self, id: Self::Id);
}
