//! Data models module
//!
//! This module defines the fleet's core data structures. Each model maps to a
//! database table; the `New*` and `*Changes` structs are the insert and update
//! forms of those rows.

mod manufacturer;
pub use manufacturer::{Manufacturer, NewManufacturer};

mod car;
pub use car::{Car, CarChanges, NewCar};

mod car_driver;
pub use car_driver::CarDriver;

mod driver;
pub use driver::{Driver, DriverChanges, DriverRegistration, NewDriver};

mod session;
pub use session::Session;
