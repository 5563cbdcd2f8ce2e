//! HTML form payloads and their validation
//!
//! Each form deserializes straight from an `application/x-www-form-urlencoded`
//! body. Text fields default to empty so a missing field is reported as
//! "This field is required." rather than rejected by the extractor.
//! `clean` trims the text fields, validates them and returns the values
//! ready for the repository, or the errors to show next to each field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::DriverRegistration;

pub const REQUIRED: &str = "This field is required.";
pub const LICENSE_LENGTH: &str = "License number should consist of 8 characters";
pub const LICENSE_LETTERS: &str = "First 3 characters should be uppercase letters";
pub const LICENSE_DIGITS: &str = "Last 5 characters should be digits";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const PASSWORD_TOO_SHORT: &str = "This password is too short. It must contain at least 8 characters.";
pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Key under which errors not tied to a single field are stored
pub const NON_FIELD: &str = "non_field";

pub const MAX_CHARS: usize = 255;
pub const MAX_USERNAME_CHARS: usize = 150;
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// The error reported when the database refuses a duplicate value
    pub fn unique(entity: &str, field: &str) -> Self {
        let mut errors = Self::new();
        let message = match field {
            "username" => "A user with that username already exists.".to_string(),
            _ => format!("{} with this {} already exists.", entity, field_label(field)),
        };
        errors.add(field, message);
        errors
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// "license_number" -> "License number"
fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

/// Trims `value` and checks it is present and not too long
fn clean_text(errors: &mut FormErrors, field: &str, value: &str, max_chars: usize) -> String {
    let value = value.trim();
    let length = value.chars().count();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if length > max_chars {
        errors.add(
            field,
            format!("Ensure this value has at most {max_chars} characters (it has {length})."),
        );
    }
    value.to_string()
}

/// Like `clean_text` for fields that may be left blank
fn clean_optional_text(errors: &mut FormErrors, field: &str, value: &str) -> String {
    let value = value.trim();
    if !value.is_empty() {
        return clean_text(errors, field, value, MAX_CHARS);
    }
    String::new()
}

/// Checks a license number has the form `AAA99999`.
///
/// Returns the first rule the value breaks.
pub fn validate_license_number(license_number: &str) -> Result<(), &'static str> {
    if license_number.chars().count() != 8 {
        return Err(LICENSE_LENGTH);
    }
    if !license_number.chars().take(3).all(|c| c.is_ascii_uppercase()) {
        return Err(LICENSE_LETTERS);
    }
    if !license_number.chars().skip(3).all(|c| c.is_ascii_digit()) {
        return Err(LICENSE_DIGITS);
    }
    Ok(())
}

fn clean_license_number(errors: &mut FormErrors, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add("license_number", REQUIRED);
    } else if let Err(message) = validate_license_number(value) {
        errors.add("license_number", message);
    }
    value.to_string()
}

/// Returns `next` if it is a path on this site, so a login can't redirect
/// off-site.
///
/// Browsers drop tabs and newlines from URLs, turning `/\t/host` into
/// `//host`, so any control or whitespace character rejects the value.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
            && !n.chars().any(|c| c.is_control() || c.is_whitespace())
    })
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ManufacturerForm {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerInput {
    pub name: String,
    pub country: String,
}

impl ManufacturerForm {
    pub fn clean(&self) -> Result<ManufacturerInput, FormErrors> {
        let mut errors = FormErrors::new();
        let name = clean_text(&mut errors, "name", &self.name, MAX_CHARS);
        let country = clean_text(&mut errors, "country", &self.country, MAX_CHARS);
        errors.into_result(ManufacturerInput { name, country })
    }
}

/// Car form. `drivers` repeats once per selected driver.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CarForm {
    pub model: String,
    pub manufacturer_id: String,
    pub drivers: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarInput {
    pub model: String,
    pub manufacturer_id: i32,
    pub drivers: Vec<i32>,
}

impl CarForm {
    /// Validates the fields. Whether the manufacturer and drivers exist is
    /// left to the database.
    pub fn clean(&self) -> Result<CarInput, FormErrors> {
        let mut errors = FormErrors::new();
        let model = clean_text(&mut errors, "model", &self.model, MAX_CHARS);

        let raw_id = self.manufacturer_id.trim();
        let manufacturer_id = if raw_id.is_empty() {
            errors.add("manufacturer_id", REQUIRED);
            0
        } else {
            raw_id.parse::<i32>().unwrap_or_else(|_| {
                errors.add("manufacturer_id", "Select a valid choice.");
                0
            })
        };

        let mut drivers = self.drivers.clone();
        drivers.sort_unstable();
        drivers.dedup();

        errors.into_result(CarInput { model, manufacturer_id, drivers })
    }

    pub fn from_car(model: String, manufacturer_id: i32, drivers: Vec<i32>) -> Self {
        Self {
            model,
            manufacturer_id: manufacturer_id.to_string(),
            drivers,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverCreateForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub license_number: String,
}

impl DriverCreateForm {
    pub fn clean(&self) -> Result<DriverRegistration, FormErrors> {
        let mut errors = FormErrors::new();

        let username = clean_text(&mut errors, "username", &self.username, MAX_USERNAME_CHARS);
        if !username.is_empty()
            && !username.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            errors.add("username", INVALID_USERNAME);
        }

        // Passwords are taken as typed, whitespace included
        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", PASSWORD_MISMATCH);
        } else if self.password2.chars().count() < MIN_PASSWORD_CHARS {
            errors.add("password2", PASSWORD_TOO_SHORT);
        }

        let first_name = clean_optional_text(&mut errors, "first_name", &self.first_name);
        let last_name = clean_optional_text(&mut errors, "last_name", &self.last_name);
        let email = clean_optional_text(&mut errors, "email", &self.email);
        if !email.is_empty() && !looks_like_email(&email) {
            errors.add("email", "Enter a valid email address.");
        }
        let license_number = clean_license_number(&mut errors, &self.license_number);

        errors.into_result(DriverRegistration {
            username,
            password: self.password1.clone(),
            first_name,
            last_name,
            email,
            license_number,
        })
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverUpdateForm {
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverUpdateInput {
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
}

impl DriverUpdateForm {
    pub fn clean(&self) -> Result<DriverUpdateInput, FormErrors> {
        let mut errors = FormErrors::new();
        let first_name = clean_optional_text(&mut errors, "first_name", &self.first_name);
        let last_name = clean_optional_text(&mut errors, "last_name", &self.last_name);
        let license_number = clean_license_number(&mut errors, &self.license_number);
        errors.into_result(DriverUpdateInput { first_name, last_name, license_number })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub next: Option<String>,
    #[serde(rename = "csrfmiddlewaretoken", skip_serializing)]
    pub csrf_token: String,
}

impl LoginForm {
    /// Checks both fields were filled in
    pub fn clean(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result(())
    }
}

/// `?next=` on the login page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Query string of the manufacturer list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManufacturerSearch {
    pub name: Option<String>,
    pub page: Option<String>,
}

/// Query string of the car list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarSearch {
    pub model: Option<String>,
    pub page: Option<String>,
}

/// Query string of the driver list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverSearch {
    pub username: Option<String>,
    pub page: Option<String>,
}

/// Turns a raw search value into a filter; blank means no filter
pub fn search_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|term| !term.is_empty())
}
