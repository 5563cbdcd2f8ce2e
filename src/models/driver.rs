use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::auth::password::{self, PasswordError};
use crate::urls::{path_for, RouteName};

/// A driver: a user account of the application plus a driving license.
///
/// The password is only ever held as an argon2 PHC hash and is never
/// serialized.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize)]
#[diesel(table_name = crate::schema::drivers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Driver {
    id: i32,
    username: String,
    #[serde(skip_serializing)]
    password: String,
    first_name: String,
    last_name: String,
    email: String,
    is_staff: bool,
    is_superuser: bool,
    is_active: bool,
    date_joined: NaiveDateTime,
    last_login: Option<NaiveDateTime>,
    license_number: String,
}

/// Everything needed to register a new driver. The password is plaintext
/// here and gets hashed by the repository before the row is written.
#[derive(Debug, Clone, Default)]
pub struct DriverRegistration {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub license_number: String,
}

impl DriverRegistration {
    pub fn new(username: impl Into<String>, password: impl Into<String>, license_number: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            license_number: license_number.into(),
            ..Self::default()
        }
    }

    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }
}

/// Insert form of a driver row
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::drivers)]
pub struct NewDriver<'a> {
    pub username: &'a str,
    /// Already hashed
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
    pub license_number: &'a str,
}

/// Fields editable from the driver update page
#[derive(AsChangeset, Debug, Clone, Copy)]
#[diesel(table_name = crate::schema::drivers)]
pub struct DriverChanges<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub license_number: &'a str,
}

impl Driver {
    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    pub fn get_first_name(&self) -> String {
        self.first_name.clone()
    }

    pub fn get_last_name(&self) -> String {
        self.last_name.clone()
    }

    pub fn get_license_number(&self) -> String {
        self.license_number.clone()
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// The stored password hash
    pub fn get_password_hash(&self) -> &str {
        &self.password
    }

    pub fn get_last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login.map(|ts| DateTime::from_naive_utc_and_offset(ts, Utc))
    }

    /// Replaces the password hash with a fresh hash of `raw`.
    ///
    /// This only changes the in-memory value; persist it with
    /// `repo::set_driver_password`.
    pub fn set_password(&mut self, raw: &str) -> Result<(), PasswordError> {
        self.password = password::hash_password(raw)?;
        Ok(())
    }

    /// Returns true when `raw` is the password this driver's hash was made from
    pub fn check_password(&self, raw: &str) -> bool {
        password::verify_password(raw, &self.password)
    }

    /// Path of this driver's detail page, e.g. `/drivers/1/`
    pub fn get_absolute_url(&self) -> String {
        path_for(RouteName::DriverDetail, self.id)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.username, self.first_name, self.last_name)
    }
}

#[cfg(test)]
impl Driver {
    /// Builds a driver without touching the database
    pub(crate) fn for_tests(id: i32, username: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            password: String::new(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: String::new(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            date_joined: Utc::now().naive_utc(),
            last_login: None,
            license_number: String::new(),
        }
    }
}
