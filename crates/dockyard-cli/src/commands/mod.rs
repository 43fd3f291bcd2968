//! Subcommand implementations.

pub mod entity;
pub mod kiosk;
pub mod login;
mod logout;
pub mod routes;
mod whoami;

use anyhow::Result;

use dockyard_core::{Booking, Carrier, Company, Dock, User, VehicleType, Warehouse};

use crate::cli::Commands;
use crate::session::Context;

pub async fn handle(command: Commands, api: &str) -> Result<()> {
    let ctx = Context::open(api)?;

    match command {
        Commands::Login(args) => login::run(&ctx, args).await,
        Commands::Logout => logout::run(&ctx),
        Commands::Whoami => whoami::run(&ctx),
        Commands::Routes(args) => routes::run(&ctx, args),
        Commands::Kiosk(args) => kiosk::run(&ctx, args).await,
        Commands::Bookings(cmd) => entity::run::<Booking>(&ctx, cmd).await,
        Commands::Carriers(cmd) => entity::run::<Carrier>(&ctx, cmd).await,
        Commands::Companies(cmd) => entity::run::<Company>(&ctx, cmd).await,
        Commands::Docks(cmd) => entity::run::<Dock>(&ctx, cmd).await,
        Commands::Users(cmd) => entity::run::<User>(&ctx, cmd).await,
        Commands::VehicleTypes(cmd) => entity::run::<VehicleType>(&ctx, cmd).await,
        Commands::Warehouses(cmd) => entity::run::<Warehouse>(&ctx, cmd).await,
    }
}
