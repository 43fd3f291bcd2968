//! Terminal implementations of the UI seams.

use std::io::{self, BufRead, Write};

use tracing::debug;

use dockyard_core::{Alerter, Confirmer, Navigator, Route};

use crate::output;

/// A terminal has no screens; a forced move to login becomes a hint.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "navigation requested");
        if route == Route::Login {
            output::error("Session expired or rejected. Run 'dockyard login' to sign in again.");
        }
    }
}

/// Every editor alert comes with an error result, and a command prints its
/// error chain on exit. The alert itself only goes to the log.
pub struct LogAlerter;

impl Alerter for LogAlerter {
    fn alert(&self, message: &str) {
        debug!(message, "editor alert");
    }
}

/// Asks on stderr, reads the answer from stdin. Anything but `y` is a no,
/// including end of input.
pub struct TerminalConfirmer {
    assume_yes: bool,
}

impl TerminalConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", question);
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) | Err(_) => false,
            Ok(_) => input.trim().eq_ignore_ascii_case("y"),
        }
    }
}
