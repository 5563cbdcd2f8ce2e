use crate::auth::password;
use crate::db::DbPool;
use crate::models::{Car, Driver, DriverChanges, DriverRegistration, Manufacturer, NewDriver};
use crate::schema::{cars, cars_drivers, drivers, manufacturers};
use super::{contains_pattern, CarWithManufacturer, Page, PageRequest, LIKE_ESCAPE};
use chrono::Utc;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

fn insert_driver(pool: &DbPool, registration: &DriverRegistration, superuser: bool) -> Result<Driver> {
    let hash = password::hash_password(&registration.password)?;

    let conn = &mut pool.get()?;

    let driver = diesel::insert_into(drivers::table)
        .values(NewDriver {
            username: &registration.username,
            password: &hash,
            first_name: &registration.first_name,
            last_name: &registration.last_name,
            email: &registration.email,
            is_staff: superuser,
            is_superuser: superuser,
            is_active: true,
            date_joined: Utc::now().naive_utc(),
            license_number: &registration.license_number,
        })
        .returning(Driver::as_returning())
        .get_result(conn)?;

    info!("Successfully created driver with id: {}", driver.get_id());

    Ok(driver)
}

/// Registers a new driver. The plaintext password is hashed before it is stored.
///
/// ### Errors
///
/// Returns an error if:
/// - Password hashing fails
/// - The username or license number is already taken
/// - The database insert operation fails
#[instrument(skip(pool, registration), fields(username = %registration.username))]
pub fn create_driver(pool: &DbPool, registration: &DriverRegistration) -> Result<Driver> {
    debug!("Creating new driver");
    insert_driver(pool, registration, false)
}

/// Registers a new driver with the staff and superuser flags set
#[instrument(skip(pool, registration), fields(username = %registration.username))]
pub fn create_superuser(pool: &DbPool, registration: &DriverRegistration) -> Result<Driver> {
    debug!("Creating new superuser");
    insert_driver(pool, registration, true)
}

/// Retrieves a driver by its ID, or None if it does not exist
#[instrument(skip(pool))]
pub fn get_driver(pool: &DbPool, id: i32) -> Result<Option<Driver>> {
    let conn = &mut pool.get()?;

    let result = drivers::table
        .find(id)
        .select(Driver::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

#[instrument(skip(pool))]
pub fn get_driver_by_username(pool: &DbPool, username: &str) -> Result<Option<Driver>> {
    let conn = &mut pool.get()?;

    let result = drivers::table
        .filter(drivers::username.eq(username))
        .select(Driver::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves all drivers ordered by username
#[instrument(skip(pool))]
pub fn list_drivers(pool: &DbPool) -> Result<Vec<Driver>> {
    let conn = &mut pool.get()?;

    let result = drivers::table
        .order((drivers::username.asc(), drivers::id.asc()))
        .select(Driver::as_select())
        .load(conn)?;

    debug!("Retrieved {} drivers", result.len());

    Ok(result)
}

/// Retrieves one page of drivers whose username contains `username` (ignoring
/// ASCII case). `None` or an empty string matches every driver.
#[instrument(skip(pool))]
pub fn search_drivers(pool: &DbPool, username: Option<&str>, page: PageRequest) -> Result<Page<Driver>> {
    let conn = &mut pool.get()?;
    let pattern = contains_pattern(username.unwrap_or_default());

    let total: i64 = drivers::table
        .filter(drivers::username.like(pattern.as_str()).escape(LIKE_ESCAPE))
        .count()
        .get_result(conn)?;
    let window = page.window(total);

    let items = drivers::table
        .filter(drivers::username.like(pattern.as_str()).escape(LIKE_ESCAPE))
        .order((drivers::username.asc(), drivers::id.asc()))
        .limit(window.limit)
        .offset(window.offset)
        .select(Driver::as_select())
        .load(conn)?;

    debug!("Search matched {} drivers", total);

    Ok(Page::new(items, window, total))
}

/// Updates a driver's names and license number.
///
/// Returns the updated driver, or None if it does not exist.
#[instrument(skip(pool, changes))]
pub fn update_driver(pool: &DbPool, id: i32, changes: DriverChanges<'_>) -> Result<Option<Driver>> {
    let conn = &mut pool.get()?;

    let result = diesel::update(drivers::table.find(id))
        .set(changes)
        .returning(Driver::as_returning())
        .get_result(conn)
        .optional()?;

    if result.is_some() {
        info!("Updated driver");
    }

    Ok(result)
}

/// Hashes and stores a new password. Returns false if there is no such driver.
#[instrument(skip(pool, raw_password))]
pub fn set_driver_password(pool: &DbPool, id: i32, raw_password: &str) -> Result<bool> {
    let hash = password::hash_password(raw_password)?;

    let conn = &mut pool.get()?;

    let updated = diesel::update(drivers::table.find(id))
        .set(drivers::password.eq(hash))
        .execute(conn)?;

    Ok(updated > 0)
}

/// Deletes a driver together with their sessions and car assignments.
///
/// Returns false if there was no such driver.
#[instrument(skip(pool))]
pub fn delete_driver(pool: &DbPool, id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(drivers::table.find(id)).execute(conn)?;

    info!("Deleted {} drivers", deleted);

    Ok(deleted > 0)
}

/// Checks a username and password.
///
/// Returns the driver, with `last_login` bumped, when the credentials are
/// right and the account is active. Returns None otherwise.
#[instrument(skip(pool, raw_password))]
pub fn authenticate(pool: &DbPool, username: &str, raw_password: &str) -> Result<Option<Driver>> {
    let Some(driver) = get_driver_by_username(pool, username)? else {
        debug!("Unknown username");
        password::verify_unusable(raw_password);
        return Ok(None);
    };

    let password_ok = driver.check_password(raw_password);
    if !password_ok || !driver.is_active() {
        debug!("Rejected credentials");
        return Ok(None);
    }

    let conn = &mut pool.get()?;

    let driver = diesel::update(drivers::table.find(driver.get_id()))
        .set(drivers::last_login.eq(Some(Utc::now().naive_utc())))
        .returning(Driver::as_returning())
        .get_result(conn)?;

    info!("Driver {} authenticated", driver.get_id());

    Ok(Some(driver))
}

/// Cars the driver is assigned to, each with its manufacturer
#[instrument(skip(pool))]
pub fn list_driver_cars(pool: &DbPool, driver_id: i32) -> Result<Vec<CarWithManufacturer>> {
    let conn = &mut pool.get()?;

    let rows = cars_drivers::table
        .inner_join(cars::table.inner_join(manufacturers::table))
        .filter(cars_drivers::driver_id.eq(driver_id))
        .order((cars::model.asc(), cars::id.asc()))
        .select((Car::as_select(), Manufacturer::as_select()))
        .load::<(Car, Manufacturer)>(conn)?;

    Ok(rows.into_iter().map(CarWithManufacturer::from).collect())
}

#[instrument(skip(pool))]
pub fn count_drivers(pool: &DbPool) -> Result<i64> {
    let conn = &mut pool.get()?;
    Ok(drivers::table.count().get_result(conn)?)
}
