//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::entity::EntityCommand;
use crate::commands::{kiosk, login, routes};

/// Administer docks, carriers, companies, users and bookings.
#[derive(Parser, Debug)]
#[command(name = "dockyard")]
#[command(author, version = env!("DOCKYARD_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Base URL of the scheduling service API
    #[arg(
        long,
        global = true,
        env = "DOCKYARD_API_URL",
        default_value = "http://localhost:8080/api"
    )]
    pub api: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new session
    Login(login::LoginArgs),

    /// End the stored session
    Logout,

    /// Display the logged-in user
    Whoami,

    /// List application routes, or resolve one path
    Routes(routes::RoutesArgs),

    /// Run the driver check-in kiosk
    Kiosk(kiosk::KioskArgs),

    /// Manage bookings
    #[command(subcommand)]
    Bookings(EntityCommand),

    /// Manage carriers
    #[command(subcommand)]
    Carriers(EntityCommand),

    /// Manage companies
    #[command(subcommand)]
    Companies(EntityCommand),

    /// Manage docks
    #[command(subcommand)]
    Docks(EntityCommand),

    /// Manage users
    #[command(subcommand)]
    Users(EntityCommand),

    /// Manage vehicle types
    #[command(subcommand)]
    VehicleTypes(EntityCommand),

    /// Manage warehouses
    #[command(subcommand)]
    Warehouses(EntityCommand),
}
