//! Route table with an authentication guard.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use dockyard_core::{
    Booking, Carrier, Company, CredentialStore, Dock, Entity, Navigator, Route, User, VehicleType,
    Warehouse,
};

/// Most recent routes kept in the history.
const HISTORY_LIMIT: usize = 32;

#[derive(Debug)]
struct RouterState {
    current: Route,
    history: VecDeque<Route>,
}

/// Tracks the current screen.
///
/// User navigation goes through [`Router::navigate_to`], which resolves the
/// path and sends unauthenticated users to [`Route::Login`]. Forced
/// navigation (the interceptor's redirect on 401) comes in through the
/// [`Navigator`] impl and is not guarded.
pub struct Router {
    store: Arc<CredentialStore>,
    state: Mutex<RouterState>,
}

impl Router {
    /// Start on the default screen, or on login when no session is stored.
    pub fn new(store: Arc<CredentialStore>) -> Self {
        let current = if store.is_authenticated() {
            Route::DEFAULT
        } else {
            Route::Login
        };
        Self {
            store,
            state: Mutex::new(RouterState {
                current,
                history: VecDeque::with_capacity(HISTORY_LIMIT),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Route {
        self.lock().current
    }

    /// The most recent routes entered, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.lock().history.iter().copied().collect()
    }

    /// The route a user asking for `route` actually gets.
    pub fn guard(&self, route: Route) -> Route {
        if route.requires_auth() && !self.store.is_authenticated() {
            Route::Login
        } else {
            route
        }
    }

    /// Resolve `path`, apply the guard, and enter the resulting route.
    pub fn navigate_to(&self, path: &str) -> Route {
        let requested = Route::resolve(path);
        let route = self.guard(requested);
        if route != requested {
            info!(%requested, "Not authenticated, redirecting to login");
        }
        self.enter(route);
        route
    }

    fn enter(&self, route: Route) {
        let mut state = self.lock();
        debug!(from = %state.current, to = %route, "Navigating");
        state.current = route;
        if state.history.len() == HISTORY_LIMIT {
            state.history.pop_front();
        }
        state.history.push_back(route);
    }

    /// The remote collection edited on `route`, for list-editor screens.
    pub fn collection(route: Route) -> Option<&'static str> {
        match route {
            Route::Booking => Some(Booking::COLLECTION),
            Route::Docks => Some(Dock::COLLECTION),
            Route::Companies => Some(Company::COLLECTION),
            Route::Users => Some(User::COLLECTION),
            Route::VehicleTypes => Some(VehicleType::COLLECTION),
            Route::Carriers => Some(Carrier::COLLECTION),
            Route::Warehouses => Some(Warehouse::COLLECTION),
            Route::Login
            | Route::Schedule
            | Route::Arrival
            | Route::Api
            | Route::DriverKiosk
            | Route::UserGuide => None,
        }
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        self.enter(route);
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_core::{AccessToken, UserInfo};

    fn logged_in() -> Arc<CredentialStore> {
        let store = Arc::new(CredentialStore::in_memory());
        store
            .set_session(&AccessToken::new("tok"), &UserInfo::default())
            .unwrap();
        store
    }

    #[test]
    fn starts_on_login_without_session() {
        let router = Router::new(Arc::new(CredentialStore::in_memory()));
        assert_eq!(router.current(), Route::Login);

        let router = Router::new(logged_in());
        assert_eq!(router.current(), Route::Booking);
    }

    #[test]
    fn guard_redirects_unauthenticated_users() {
        let router = Router::new(Arc::new(CredentialStore::in_memory()));
        assert_eq!(router.navigate_to("/docks"), Route::Login);
        assert_eq!(router.navigate_to("/login"), Route::Login);
    }

    #[test]
    fn authenticated_navigation_and_fallback() {
        let router = Router::new(logged_in());
        assert_eq!(router.navigate_to("/carriers"), Route::Carriers);
        assert_eq!(router.navigate_to("/no-such-page"), Route::Booking);
        assert_eq!(router.history(), vec![Route::Carriers, Route::Booking]);
    }

    #[test]
    fn forced_navigation_bypasses_guard() {
        let store = logged_in();
        let router = Router::new(store.clone());
        router.navigate_to("/warehouses");

        store.clear().unwrap();
        router.navigate(Route::Login);
        assert_eq!(router.current(), Route::Login);
    }

    #[test]
    fn history_keeps_only_recent_routes() {
        let router = Router::new(logged_in());
        for _ in 0..HISTORY_LIMIT {
            router.navigate_to("/docks");
        }
        router.navigate_to("/users");

        let history = router.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.last(), Some(&Route::Users));
        assert_eq!(history.iter().filter(|r| **r == Route::Docks).count(), HISTORY_LIMIT - 1);
    }

    #[test]
    fn editor_screens_map_to_collections() {
        assert_eq!(Router::collection(Route::VehicleTypes), Some("vehicle-types"));
        assert_eq!(Router::collection(Route::Booking), Some("bookings"));
        assert_eq!(Router::collection(Route::DriverKiosk), None);
    }
}
