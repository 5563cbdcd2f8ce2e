//! Named routes
//!
//! Every page of the application has a stable name (`"driver-detail"`,
//! `"car-list"`, ...) and a path pattern. Handlers, templates and tests build
//! links through [`reverse`] instead of hard-coding paths.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Placeholder used in path patterns for an entity id
const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Index,
    Login,
    Logout,
    ManufacturerList,
    ManufacturerCreate,
    ManufacturerUpdate,
    ManufacturerDelete,
    CarList,
    CarDetail,
    CarCreate,
    CarUpdate,
    CarDelete,
    ToggleCarAssign,
    DriverList,
    DriverDetail,
    DriverCreate,
    DriverUpdate,
    DriverDelete,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReverseError {
    #[error("Unknown route: {0}")]
    UnknownRoute(String),
    #[error("Route {0} requires an id")]
    MissingId(RouteName),
    #[error("Route {0} does not take an id")]
    UnexpectedId(RouteName),
}

impl RouteName {
    pub const ALL: [RouteName; 18] = [
        RouteName::Index,
        RouteName::Login,
        RouteName::Logout,
        RouteName::ManufacturerList,
        RouteName::ManufacturerCreate,
        RouteName::ManufacturerUpdate,
        RouteName::ManufacturerDelete,
        RouteName::CarList,
        RouteName::CarDetail,
        RouteName::CarCreate,
        RouteName::CarUpdate,
        RouteName::CarDelete,
        RouteName::ToggleCarAssign,
        RouteName::DriverList,
        RouteName::DriverDetail,
        RouteName::DriverCreate,
        RouteName::DriverUpdate,
        RouteName::DriverDelete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteName::Index => "index",
            RouteName::Login => "login",
            RouteName::Logout => "logout",
            RouteName::ManufacturerList => "manufacturer-list",
            RouteName::ManufacturerCreate => "manufacturer-create",
            RouteName::ManufacturerUpdate => "manufacturer-update",
            RouteName::ManufacturerDelete => "manufacturer-delete",
            RouteName::CarList => "car-list",
            RouteName::CarDetail => "car-detail",
            RouteName::CarCreate => "car-create",
            RouteName::CarUpdate => "car-update",
            RouteName::CarDelete => "car-delete",
            RouteName::ToggleCarAssign => "toggle-car-assign",
            RouteName::DriverList => "driver-list",
            RouteName::DriverDetail => "driver-detail",
            RouteName::DriverCreate => "driver-create",
            RouteName::DriverUpdate => "driver-update",
            RouteName::DriverDelete => "driver-delete",
        }
    }

    /// The axum path pattern of this route
    pub fn pattern(self) -> &'static str {
        match self {
            RouteName::Index => "/",
            RouteName::Login => "/accounts/login/",
            RouteName::Logout => "/accounts/logout/",
            RouteName::ManufacturerList => "/manufacturers/",
            RouteName::ManufacturerCreate => "/manufacturers/create/",
            RouteName::ManufacturerUpdate => "/manufacturers/{id}/update/",
            RouteName::ManufacturerDelete => "/manufacturers/{id}/delete/",
            RouteName::CarList => "/cars/",
            RouteName::CarDetail => "/cars/{id}/",
            RouteName::CarCreate => "/cars/create/",
            RouteName::CarUpdate => "/cars/{id}/update/",
            RouteName::CarDelete => "/cars/{id}/delete/",
            RouteName::ToggleCarAssign => "/cars/{id}/toggle-assign/",
            RouteName::DriverList => "/drivers/",
            RouteName::DriverDetail => "/drivers/{id}/",
            RouteName::DriverCreate => "/drivers/create/",
            RouteName::DriverUpdate => "/drivers/{id}/update/",
            RouteName::DriverDelete => "/drivers/{id}/delete/",
        }
    }

    pub fn takes_id(self) -> bool {
        self.pattern().contains(ID_PLACEHOLDER)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = ReverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteName::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| ReverseError::UnknownRoute(s.to_string()))
    }
}

/// Builds the path of a named route.
///
/// ### Errors
///
/// Fails when an id is given to a route without one, or omitted for a route
/// that needs one.
pub fn reverse(name: RouteName, id: Option<i32>) -> Result<String, ReverseError> {
    match (name.takes_id(), id) {
        (true, Some(id)) => Ok(path_for(name, id)),
        (true, None) => Err(ReverseError::MissingId(name)),
        (false, None) => Ok(name.pattern().to_string()),
        (false, Some(_)) => Err(ReverseError::UnexpectedId(name)),
    }
}

/// Builds the path of an id-taking route
pub fn path_for(name: RouteName, id: i32) -> String {
    name.pattern().replace(ID_PLACEHOLDER, &id.to_string())
}
