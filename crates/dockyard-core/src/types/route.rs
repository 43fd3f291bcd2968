//! Application routes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A screen reachable by path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Login,
    Booking,
    Schedule,
    Arrival,
    Docks,
    Companies,
    Users,
    VehicleTypes,
    Api,
    Carriers,
    DriverKiosk,
    UserGuide,
    Warehouses,
}

impl Route {
    /// Every route, in menu order.
    pub const ALL: [Route; 13] = [
        Route::Login,
        Route::Booking,
        Route::Schedule,
        Route::Arrival,
        Route::Docks,
        Route::Companies,
        Route::Users,
        Route::VehicleTypes,
        Route::Api,
        Route::Carriers,
        Route::DriverKiosk,
        Route::UserGuide,
        Route::Warehouses,
    ];

    /// Where empty and unknown paths land.
    pub const DEFAULT: Route = Route::Booking;

    /// The URL path for this route.
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Booking => "/booking",
            Route::Schedule => "/schedule",
            Route::Arrival => "/arrival",
            Route::Docks => "/docks",
            Route::Companies => "/companies",
            Route::Users => "/users",
            Route::VehicleTypes => "/vehicle-types",
            Route::Api => "/api",
            Route::Carriers => "/carriers",
            Route::DriverKiosk => "/driver-kiosk",
            Route::UserGuide => "/user-guide",
            Route::Warehouses => "/warehouses",
        }
    }

    /// Exact match on a known path. Leading and trailing slashes, a query
    /// string and a fragment are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_matches('/');
        Route::ALL
            .into_iter()
            .find(|route| route.path().trim_start_matches('/') == path)
    }

    /// Like [`Route::from_path`], but unknown paths fall back to
    /// [`Route::DEFAULT`].
    pub fn resolve(path: &str) -> Route {
        Route::from_path(path).unwrap_or(Route::DEFAULT)
    }

    /// Whether an authenticated session is needed to enter this route.
    pub fn requires_auth(self) -> bool {
        self != Route::Login
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
