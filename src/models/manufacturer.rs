use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A car manufacturer, e.g. "Toyota" from "Japan"
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::manufacturers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Manufacturer {
    /// Database-assigned identifier
    id: i32,

    /// Brand name, unique across manufacturers
    name: String,

    /// Country of origin
    country: String,
}

/// Insert and update form of a manufacturer row
#[derive(Insertable, AsChangeset, Debug, Clone, Copy)]
#[diesel(table_name = crate::schema::manufacturers)]
pub struct NewManufacturer<'a> {
    pub name: &'a str,
    pub country: &'a str,
}

impl Manufacturer {
    /// Creates a manufacturer with all fields specified
    pub fn new_with_fields(id: i32, name: String, country: String) -> Self {
        Self { id, name, country }
    }

    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_country(&self) -> String {
        self.country.clone()
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.country)
    }
}

#[cfg(test)]
mod prop_tests;
