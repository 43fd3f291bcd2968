//! Whoami command implementation.

use anyhow::Result;

use crate::output;
use crate::session::Context;

pub fn run(ctx: &Context) -> Result<()> {
    ctx.require_session()?;

    match ctx.store.user_info() {
        Some(info) => {
            output::field("User", info.display_name().unwrap_or("(unknown)"));
            if let Some(role) = info.role() {
                output::field("Role", role);
            }
        }
        None => output::field("User", "(no profile cached)"),
    }
    output::field("API", ctx.client.api().as_str());

    Ok(())
}
