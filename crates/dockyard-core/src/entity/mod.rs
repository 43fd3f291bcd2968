//! Entity records and their field sets.
//!
//! A [`Record`] is a server-assigned [`EntityId`] plus the field set of one
//! [`Entity`] type. The field set doubles as the form draft: blank drafts
//! are `E::default()`, edit drafts are a clone of `record.fields`.

mod fields;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

pub use fields::{
    Booking, BookingStatus, Carrier, Company, Dock, ExtraFields, User, UserRole, VehicleType,
    Warehouse,
};

/// A resource type managed through a gateway.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Path segment of the remote collection, e.g. `carriers`.
    const COLLECTION: &'static str;

    /// Human-readable singular name, e.g. `carrier`.
    const LABEL: &'static str;

    /// One-line description for lists and confirmation prompts.
    fn summary(&self) -> String;
}

/// A committed record as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<E> {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: E,
}

impl<E: Entity> Record<E> {
    pub fn new(id: EntityId, fields: E) -> Self {
        Self { id, fields }
    }

    pub fn summary(&self) -> String {
        format!("#{} {}", self.id, self.fields.summary())
    }
}
