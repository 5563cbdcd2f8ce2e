use crate::db::DbPool;
use crate::models::{Manufacturer, NewManufacturer};
use crate::schema::manufacturers;
use super::{contains_pattern, Page, PageRequest, LIKE_ESCAPE};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new manufacturer in the database
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - A manufacturer with the same name already exists
/// - The database insert operation fails
#[instrument(skip(pool), fields(name = %name))]
pub fn create_manufacturer(pool: &DbPool, name: &str, country: &str) -> Result<Manufacturer> {
    debug!("Creating new manufacturer");

    let conn = &mut pool.get()?;

    let manufacturer = diesel::insert_into(manufacturers::table)
        .values(NewManufacturer { name, country })
        .returning(Manufacturer::as_returning())
        .get_result(conn)?;

    info!("Successfully created manufacturer with id: {}", manufacturer.get_id());

    Ok(manufacturer)
}

/// Retrieves a manufacturer by its ID, or None if it does not exist
#[instrument(skip(pool))]
pub fn get_manufacturer(pool: &DbPool, id: i32) -> Result<Option<Manufacturer>> {
    let conn = &mut pool.get()?;

    let result = manufacturers::table
        .find(id)
        .select(Manufacturer::as_select())
        .first(conn)
        .optional()?;

    if result.is_none() {
        debug!("Manufacturer not found");
    }

    Ok(result)
}

/// Retrieves all manufacturers ordered by name
#[instrument(skip(pool))]
pub fn list_manufacturers(pool: &DbPool) -> Result<Vec<Manufacturer>> {
    let conn = &mut pool.get()?;

    let result = manufacturers::table
        .order((manufacturers::name.asc(), manufacturers::id.asc()))
        .select(Manufacturer::as_select())
        .load(conn)?;

    debug!("Retrieved {} manufacturers", result.len());

    Ok(result)
}

/// Retrieves one page of manufacturers whose name contains `name` (ignoring
/// ASCII case). `None` or an empty string matches every manufacturer.
#[instrument(skip(pool))]
pub fn search_manufacturers(pool: &DbPool, name: Option<&str>, page: PageRequest) -> Result<Page<Manufacturer>> {
    let conn = &mut pool.get()?;
    let pattern = contains_pattern(name.unwrap_or_default());

    let total: i64 = manufacturers::table
        .filter(manufacturers::name.like(pattern.as_str()).escape(LIKE_ESCAPE))
        .count()
        .get_result(conn)?;
    let window = page.window(total);

    let items = manufacturers::table
        .filter(manufacturers::name.like(pattern.as_str()).escape(LIKE_ESCAPE))
        .order((manufacturers::name.asc(), manufacturers::id.asc()))
        .limit(window.limit)
        .offset(window.offset)
        .select(Manufacturer::as_select())
        .load(conn)?;

    debug!("Search matched {} manufacturers", total);

    Ok(Page::new(items, window, total))
}

/// Updates a manufacturer, returning the new row or None if it does not exist
#[instrument(skip(pool))]
pub fn update_manufacturer(pool: &DbPool, id: i32, name: &str, country: &str) -> Result<Option<Manufacturer>> {
    let conn = &mut pool.get()?;

    let result = diesel::update(manufacturers::table.find(id))
        .set(NewManufacturer { name, country })
        .returning(Manufacturer::as_returning())
        .get_result(conn)
        .optional()?;

    if result.is_some() {
        info!("Updated manufacturer");
    }

    Ok(result)
}

/// Deletes a manufacturer and, through the foreign key cascade, its cars.
///
/// Returns false if there was no such manufacturer.
#[instrument(skip(pool))]
pub fn delete_manufacturer(pool: &DbPool, id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(manufacturers::table.find(id)).execute(conn)?;

    info!("Deleted {} manufacturers", deleted);

    Ok(deleted > 0)
}

#[instrument(skip(pool))]
pub fn count_manufacturers(pool: &DbPool) -> Result<i64> {
    let conn = &mut pool.get()?;
    Ok(manufacturers::table.count().get_result(conn)?)
}

#[cfg(test)]
mod tests;
