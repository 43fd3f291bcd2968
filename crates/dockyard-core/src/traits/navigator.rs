//! Navigation seam used by the auth interceptor.

use crate::types::Route;

/// Something that can move the user to another screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigation that goes nowhere. For headless tools with no screens.
impl Navigator for () {
    fn navigate(&self, _route: Route) {}
}
