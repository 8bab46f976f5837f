//! Core data models for the user directory
//!
//! Record kinds, their identities, and the [`Entity`] contract the store is
//! generic over. The audit record kind lives in `crate::audit`.

pub mod entity;
pub mod ids;
pub mod user;

pub use entity::{Entity, EntityId};
pub use ids::{LogEntryId, UserId};
pub use user::{User, UserValidationError};
