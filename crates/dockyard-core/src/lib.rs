//! dockyard-core - Core types, traits and credential storage for the dockyard
//! administration client.
//!
//! Every authenticated call made by the higher layers reads its bearer token
//! from a [`CredentialStore`], and every remote resource is reached through a
//! [`Gateway`] for one [`Entity`] type.

pub mod auth;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod traits;
pub mod types;

pub use auth::{AccessToken, CredentialStore, Credentials, Persistence, UserInfo};
pub use entity::{
    Booking, BookingStatus, Carrier, Company, Dock, Entity, ExtraFields, Record, User, UserRole,
    VehicleType, Warehouse,
};
pub use error::Error;
pub use gateway::MemoryGateway;
pub use traits::{Alerter, Confirmer, Gateway, Navigator};
pub use types::{ApiUrl, EntityId, Route};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
