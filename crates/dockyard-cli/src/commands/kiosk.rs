//! Driver kiosk command implementation.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use tokio::sync::mpsc;
use tracing::info;

use dockyard_admin::{KioskConfirmation, ListEditor, NextDriver, mount_both};
use dockyard_core::{Booking, Dock};

use crate::output;
use crate::session::{Context, LogAlerter, TerminalConfirmer};

#[derive(Args, Debug)]
pub struct KioskArgs {
    /// Confirm this booking reference once and exit
    #[arg(long)]
    pub reference: Option<String>,
}

/// Look a reference up against fresh booking and dock lists.
async fn confirmation(ctx: &Context, reference: &str) -> Result<Option<KioskConfirmation>> {
    let alerter = Arc::new(LogAlerter);
    let confirmer = Arc::new(TerminalConfirmer::new(false));
    let mut bookings = ListEditor::new(
        ctx.client.gateway::<Booking>(),
        alerter.clone(),
        confirmer.clone(),
    );
    let mut docks = ListEditor::new(ctx.client.gateway::<Dock>(), alerter, confirmer);

    let (loaded_bookings, loaded_docks) = mount_both(&mut bookings, &mut docks).await;
    loaded_bookings.context("Failed to load bookings")?;
    loaded_docks.context("Failed to load docks")?;

    Ok(KioskConfirmation::for_reference(
        reference,
        bookings.records(),
        docks.records(),
    ))
}

fn show(confirmation: &KioskConfirmation) {
    println!();
    for line in confirmation.render().lines() {
        println!("  {}", line.bold());
    }
    println!();
}

fn prompt(text: &str) -> Result<Option<String>> {
    eprint!("{}", text);
    io::stderr().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

pub async fn run(ctx: &Context, args: KioskArgs) -> Result<()> {
    ctx.require_session()?;

    if let Some(reference) = args.reference {
        return match confirmation(ctx, &reference).await? {
            Some(found) => {
                show(&found);
                Ok(())
            }
            None => anyhow::bail!("No booking with reference {}", reference),
        };
    }

    let (events, mut next) = mpsc::unbounded_channel::<NextDriver>();
    output::note("Driver kiosk. Enter a booking reference, or end input to quit.");

    while let Some(reference) = prompt("Reference number: ")? {
        if reference.is_empty() {
            continue;
        }

        let Some(found) = confirmation(ctx, &reference).await? else {
            output::error(&format!("No booking with reference {}", reference));
            continue;
        };

        show(&found);
        if prompt("Press Enter for the next driver")?.is_none() {
            break;
        }
        found.next_driver(&events);

        if next.recv().await.is_some() {
            info!("Kiosk reset for next driver");
            print!("{}", "\n".repeat(3));
        }
    }

    Ok(())
}
