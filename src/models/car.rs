use diesel::prelude::*;
use serde::Serialize;
use std::fmt;

use super::Manufacturer;
use crate::urls::{path_for, RouteName};

/// A car in the fleet
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Eq, Serialize)]
#[diesel(belongs_to(Manufacturer))]
#[diesel(table_name = crate::schema::cars)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Car {
    /// Database-assigned identifier
    id: i32,

    /// Model name, e.g. "Corolla"
    model: String,

    /// The manufacturer this car belongs to
    manufacturer_id: i32,
}

#[derive(Insertable, Debug, Clone, Copy)]
#[diesel(table_name = crate::schema::cars)]
pub struct NewCar<'a> {
    pub model: &'a str,
    pub manufacturer_id: i32,
}

#[derive(AsChangeset, Debug, Clone, Copy)]
#[diesel(table_name = crate::schema::cars)]
pub struct CarChanges<'a> {
    pub model: &'a str,
    pub manufacturer_id: i32,
}

impl Car {
    /// Creates a car with all fields specified
    pub fn new_with_fields(id: i32, model: String, manufacturer_id: i32) -> Self {
        Self { id, model, manufacturer_id }
    }

    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_model(&self) -> String {
        self.model.clone()
    }

    pub fn get_manufacturer_id(&self) -> i32 {
        self.manufacturer_id
    }

    /// Path of this car's detail page
    pub fn get_absolute_url(&self) -> String {
        path_for(RouteName::CarDetail, self.id)
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_to_string_is_model() {
        let car = Car::new_with_fields(1, "test".to_string(), 1);

        assert_eq!(car.to_string(), car.get_model());
    }

    #[test]
    fn test_car_absolute_url() {
        let car = Car::new_with_fields(12, "Corolla".to_string(), 3);

        assert_eq!(car.get_absolute_url(), "/cars/12/");
    }
}
