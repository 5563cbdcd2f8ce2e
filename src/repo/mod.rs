//! Repository module
//!
//! This module provides the data access layer for the application.
//! It contains functions for creating, retrieving, searching, updating and
//! deleting manufacturers, cars and drivers, plus the session store.
//!
//! The repository pattern abstracts away the details of database access
//! and provides a clean API for the rest of the application to use.

mod pagination;
mod manufacturer_repo;
mod car_repo;
mod driver_repo;
mod session_repo;

// Re-export all repository functions
pub use pagination::{Page, PageRequest};
pub use manufacturer_repo::*;
pub use car_repo::*;
pub use driver_repo::*;
pub use session_repo::*;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Escape character used in every `LIKE` pattern built by [`contains_pattern`]
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Builds a `LIKE` pattern matching any value that contains `needle`.
///
/// `%`, `_` and the escape character itself are escaped, so they match
/// literally. An empty needle matches every value.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Returns the column named by a unique-constraint violation, if `err` is one.
///
/// SQLite reports these as `UNIQUE constraint failed: drivers.username`.
pub fn unique_violation_field(err: &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<DieselError>() {
        Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => info
            .message()
            .rsplit(['.', ' '])
            .next()
            .map(|column| column.trim().to_string()),
        _ => None,
    }
}

/// Returns true if `err` is a foreign key violation, e.g. a car pointing at a
/// manufacturer that does not exist
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DieselError>(),
        Some(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _))
    )
}
