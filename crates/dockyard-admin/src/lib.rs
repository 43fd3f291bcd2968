//! dockyard-admin - the screens of the administration client, without
//! the pixels.
//!
//! A [`ListEditor`] drives one entity collection through a gateway, the
//! [`Router`] decides which screen is current, and [`KioskConfirmation`] is
//! what a driver sees after checking in.

mod editor;
mod kiosk;
mod router;

pub use editor::{EditorState, ListEditor, Modal, mount_both};
pub use kiosk::{KioskConfirmation, NextDriver};
pub use router::Router;
