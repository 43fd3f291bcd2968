//! Field sets of the administered resources.
//!
//! Every field has a default so a blank draft can be built and partial server
//! payloads still deserialise. A `null` reads as the field's default, enum
//! values this client does not know are kept verbatim, and fields it does not
//! name are carried in `extra` so an edit sends them back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::EntityId;

use super::Entity;

/// Fields of a record that no field set names.
pub type ExtraFields = Map<String, Value>;

/// Deserialise `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn active() -> bool {
    true
}

fn null_as_active<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// A haulage company whose vehicles book dock slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Carrier {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Standard carrier alpha code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Entity for Carrier {
    const COLLECTION: &'static str = "carriers";
    const LABEL: &'static str = "carrier";

    fn summary(&self) -> String {
        match &self.scac {
            Some(scac) => format!("{} ({})", self.name, scac),
            None => self.name.clone(),
        }
    }
}

/// A customer organisation that users belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Entity for Company {
    const COLLECTION: &'static str = "companies";
    const LABEL: &'static str = "company";

    fn summary(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Operator,
    Viewer,
    /// A role this client has no name for.
    #[serde(untagged)]
    Other(String),
}

/// An account of the administration tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<EntityId>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "user";

    fn summary(&self) -> String {
        match &self.full_name {
            Some(full) => format!("{} <{}>", self.username, full),
            None => self.username.clone(),
        }
    }
}

/// A loading dock at a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dock {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<EntityId>,
    #[serde(default = "active", deserialize_with = "null_as_active")]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for Dock {
    fn default() -> Self {
        Self {
            name: String::new(),
            warehouse_id: None,
            is_active: true,
            extra: ExtraFields::new(),
        }
    }
}

impl Entity for Dock {
    const COLLECTION: &'static str = "docks";
    const LABEL: &'static str = "dock";

    fn summary(&self) -> String {
        if self.is_active {
            self.name.clone()
        } else {
            format!("{} (inactive)", self.name)
        }
    }
}

/// A class of vehicle a booking can be made for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleType {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length_m: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub requires_ramp: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Entity for VehicleType {
    const COLLECTION: &'static str = "vehicle-types";
    const LABEL: &'static str = "vehicle type";

    fn summary(&self) -> String {
        match self.max_length_m {
            Some(len) => format!("{} (≤ {len} m)", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Warehouse {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// IANA zone name, e.g. `Europe/Berlin`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Entity for Warehouse {
    const COLLECTION: &'static str = "warehouses";
    const LABEL: &'static str = "warehouse";

    fn summary(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Scheduled,
    Arrived,
    Completed,
    Cancelled,
    #[serde(untagged)]
    Other(String),
}

/// A reserved dock slot. The server owns all scheduling rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Booking {
    #[serde(deserialize_with = "null_as_default")]
    pub reference_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dock_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Entity for Booking {
    const COLLECTION: &'static str = "bookings";
    const LABEL: &'static str = "booking";

    fn summary(&self) -> String {
        match self.starts_at {
            Some(at) => format!(
                "{} at {} [{:?}]",
                self.reference_number,
                at.format("%Y-%m-%d %H:%M"),
                self.status
            ),
            None => format!("{} [{:?}]", self.reference_number, self.status),
        }
    }
}
