//! Driver kiosk confirmation.

use tokio::sync::mpsc;
use tracing::debug;

use dockyard_core::{Booking, Dock, Record};

/// Event emitted when the driver at the kiosk is done. Carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextDriver;

/// What a driver sees after checking in: which dock to go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskConfirmation {
    pub dock_name: String,
    pub reference_number: String,
}

impl KioskConfirmation {
    pub fn new(dock_name: impl Into<String>, reference_number: impl Into<String>) -> Self {
        Self {
            dock_name: dock_name.into(),
            reference_number: reference_number.into(),
        }
    }

    /// Build the confirmation for the booking with `reference`, looking the
    /// dock up by id. Reference matching ignores case and surrounding blanks.
    pub fn for_reference(
        reference: &str,
        bookings: &[Record<Booking>],
        docks: &[Record<Dock>],
    ) -> Option<Self> {
        let reference = reference.trim();
        let booking = bookings
            .iter()
            .find(|b| b.fields.reference_number.eq_ignore_ascii_case(reference))?;

        let dock_name = match &booking.fields.dock_id {
            Some(id) => docks
                .iter()
                .find(|d| &d.id == id)
                .map(|d| d.fields.name.clone())
                .unwrap_or_else(|| format!("Dock {}", id)),
            None => "Unassigned".to_string(),
        };

        Some(Self::new(dock_name, &booking.fields.reference_number))
    }

    /// Text shown on the kiosk screen.
    pub fn render(&self) -> String {
        format!(
            "Booking {} confirmed.\nPlease proceed to {}.",
            self.reference_number, self.dock_name
        )
    }

    /// Dismiss the confirmation. Consumes it, so the event fires once.
    pub fn next_driver(self, events: &mpsc::UnboundedSender<NextDriver>) {
        debug!(reference = %self.reference_number, "Next driver");
        let _ = events.send(NextDriver);
    }
}
