//! Wiring of the client stack for one CLI invocation.

mod terminal;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use directories::ProjectDirs;

use dockyard_core::{ApiUrl, CredentialStore};
use dockyard_http::ApiClient;

pub use terminal::{LogAlerter, TerminalConfirmer, TerminalNavigator};

/// Path of the durable credential scope.
fn credentials_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "dockyard").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("credentials.json"))
}

/// Everything a command needs to talk to the service.
pub struct Context {
    pub client: ApiClient,
    pub store: Arc<CredentialStore>,
}

impl Context {
    /// Build the stack: a process-lifetime session scope over the durable
    /// credential file, injected into an API client.
    pub fn open(api: &str) -> Result<Self> {
        let api = ApiUrl::new(api).context("Invalid API URL")?;
        let store = Arc::new(CredentialStore::with_durable_file(credentials_path()?));
        let client = ApiClient::new(api, store.clone(), Arc::new(TerminalNavigator))
            .context("Failed to build HTTP client")?;
        Ok(Self { client, store })
    }

    /// Fail early with a hint when no session is stored.
    pub fn require_session(&self) -> Result<()> {
        self.store
            .require_token()
            .context("No active session. Run 'dockyard login' first.")?;
        Ok(())
    }
}
