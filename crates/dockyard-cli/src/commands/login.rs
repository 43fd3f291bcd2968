//! Login command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use dockyard_core::{Credentials, Persistence};

use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "DOCKYARD_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(ctx: &Context, args: LoginArgs) -> Result<()> {
    let credentials = Credentials::new(&args.username, &args.password)?;

    eprintln!("{}", "Logging in...".dimmed());

    let info = ctx
        .client
        .login(&credentials, Persistence::Durable)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", info.display_name().unwrap_or(credentials.username()));
    if let Some(role) = info.role() {
        output::field("Role", role);
    }
    output::field("API", ctx.client.api().as_str());

    Ok(())
}
