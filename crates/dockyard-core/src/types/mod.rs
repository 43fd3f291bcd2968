//! Core value types.
//!
//! These types enforce their invariants at construction time, so an
//! [`ApiUrl`] or [`EntityId`] that exists is always usable.

mod api_url;
mod entity_id;
mod route;

pub use api_url::ApiUrl;
pub use entity_id::EntityId;
pub use route::Route;
