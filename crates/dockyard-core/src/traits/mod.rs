//! Seams between the client layers.

mod gateway;
mod navigator;
mod prompt;

pub use gateway::Gateway;
pub use navigator::Navigator;
pub use prompt::{Alerter, Confirmer};
