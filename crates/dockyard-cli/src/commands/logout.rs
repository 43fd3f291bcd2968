//! Logout command implementation.

use anyhow::{Context as _, Result};

use crate::output;
use crate::session::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let was_logged_in = ctx.store.is_authenticated();

    ctx.store.clear().context("Failed to clear stored credentials")?;

    if was_logged_in {
        output::success("Logged out");
    } else {
        output::note("No active session.");
    }
    Ok(())
}
