//! Routes command implementation.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use dockyard_admin::Router;
use dockyard_core::Route;

use crate::output;
use crate::session::Context;

#[derive(Args, Debug)]
pub struct RoutesArgs {
    /// Resolve this path as the router would for the current session
    pub path: Option<String>,
}

pub fn run(ctx: &Context, args: RoutesArgs) -> Result<()> {
    let router = Router::new(Arc::clone(&ctx.store));

    if let Some(path) = args.path {
        let route = router.navigate_to(&path);
        output::field("Requested", &path);
        output::field("Resolved", route.path());
        return Ok(());
    }

    for route in Route::ALL {
        let access = if route.requires_auth() {
            "auth".normal()
        } else {
            "public".green()
        };
        let collection = Router::collection(route).unwrap_or("-");
        println!("{:<16} {:<7} {}", route.path(), access, collection.dimmed());
    }
    output::note(&format!("Unknown paths resolve to {}", Route::DEFAULT));

    Ok(())
}
