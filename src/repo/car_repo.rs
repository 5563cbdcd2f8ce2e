use crate::db::DbPool;
use crate::models::{Car, CarChanges, CarDriver, Driver, Manufacturer, NewCar};
use crate::schema::{cars, cars_drivers, drivers, manufacturers};
use super::{contains_pattern, Page, PageRequest, LIKE_ESCAPE};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{instrument, debug, info};

/// A car row together with its manufacturer, as shown on list pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarWithManufacturer {
    pub car: Car,
    pub manufacturer: Manufacturer,
}

/// Everything the car detail page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarDetails {
    pub car: Car,
    pub manufacturer: Manufacturer,
    pub drivers: Vec<Driver>,
}

impl From<(Car, Manufacturer)> for CarWithManufacturer {
    fn from((car, manufacturer): (Car, Manufacturer)) -> Self {
        Self { car, manufacturer }
    }
}

/// Replaces the set of drivers assigned to a car
fn replace_car_drivers(conn: &mut SqliteConnection, car_id: i32, driver_ids: &[i32]) -> QueryResult<()> {
    diesel::delete(cars_drivers::table.filter(cars_drivers::car_id.eq(car_id))).execute(conn)?;

    let rows: Vec<CarDriver> = driver_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|driver_id| CarDriver { car_id, driver_id })
        .collect();

    if !rows.is_empty() {
        diesel::insert_into(cars_drivers::table).values(&rows).execute(conn)?;
    }

    Ok(())
}

/// Creates a new car and assigns the given drivers to it
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The manufacturer or one of the drivers does not exist (foreign key violation)
/// - The database insert operation fails
#[instrument(skip(pool), fields(model = %model))]
pub fn create_car(pool: &DbPool, model: &str, manufacturer_id: i32, driver_ids: &[i32]) -> Result<Car> {
    debug!("Creating new car");

    let conn = &mut pool.get()?;

    let car = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let car = diesel::insert_into(cars::table)
            .values(NewCar { model, manufacturer_id })
            .returning(Car::as_returning())
            .get_result(conn)?;
        replace_car_drivers(conn, car.get_id(), driver_ids)?;
        Ok(car)
    })?;

    info!("Successfully created car with id: {}", car.get_id());

    Ok(car)
}

/// Retrieves a car by its ID, or None if it does not exist
#[instrument(skip(pool))]
pub fn get_car(pool: &DbPool, id: i32) -> Result<Option<Car>> {
    let conn = &mut pool.get()?;

    let result = cars::table
        .find(id)
        .select(Car::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a car with its manufacturer and assigned drivers
#[instrument(skip(pool))]
pub fn get_car_details(pool: &DbPool, id: i32) -> Result<Option<CarDetails>> {
    let conn = &mut pool.get()?;

    let row = cars::table
        .inner_join(manufacturers::table)
        .filter(cars::id.eq(id))
        .select((Car::as_select(), Manufacturer::as_select()))
        .first::<(Car, Manufacturer)>(conn)
        .optional()?;

    let Some((car, manufacturer)) = row else {
        debug!("Car not found");
        return Ok(None);
    };

    let drivers = cars_drivers::table
        .inner_join(drivers::table)
        .filter(cars_drivers::car_id.eq(id))
        .order(drivers::username.asc())
        .select(Driver::as_select())
        .load(conn)?;

    Ok(Some(CarDetails { car, manufacturer, drivers }))
}

/// Retrieves all cars ordered by model
#[instrument(skip(pool))]
pub fn list_cars(pool: &DbPool) -> Result<Vec<Car>> {
    let conn = &mut pool.get()?;

    let result = cars::table
        .order((cars::model.asc(), cars::id.asc()))
        .select(Car::as_select())
        .load(conn)?;

    debug!("Retrieved {} cars", result.len());

    Ok(result)
}

/// Retrieves one page of cars whose model contains `model` (ignoring ASCII
/// case), each with its manufacturer. `None` or an empty string matches every car.
#[instrument(skip(pool))]
pub fn search_cars(pool: &DbPool, model: Option<&str>, page: PageRequest) -> Result<Page<CarWithManufacturer>> {
    let conn = &mut pool.get()?;
    let pattern = contains_pattern(model.unwrap_or_default());

    let total: i64 = cars::table
        .filter(cars::model.like(pattern.as_str()).escape(LIKE_ESCAPE))
        .count()
        .get_result(conn)?;
    let window = page.window(total);

    let rows = cars::table
        .inner_join(manufacturers::table)
        .filter(cars::model.like(pattern.as_str()).escape(LIKE_ESCAPE))
        .order((cars::model.asc(), cars::id.asc()))
        .limit(window.limit)
        .offset(window.offset)
        .select((Car::as_select(), Manufacturer::as_select()))
        .load::<(Car, Manufacturer)>(conn)?;

    debug!("Search matched {} cars", total);

    Ok(Page::new(rows, window, total).map(CarWithManufacturer::from))
}

/// Updates a car and replaces its assigned drivers.
///
/// Returns the updated car, or None if it does not exist.
#[instrument(skip(pool))]
pub fn update_car(
    pool: &DbPool,
    id: i32,
    model: &str,
    manufacturer_id: i32,
    driver_ids: &[i32],
) -> Result<Option<Car>> {
    let conn = &mut pool.get()?;

    let result = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let car = diesel::update(cars::table.find(id))
            .set(CarChanges { model, manufacturer_id })
            .returning(Car::as_returning())
            .get_result(conn)
            .optional()?;
        if car.is_some() {
            replace_car_drivers(conn, id, driver_ids)?;
        }
        Ok(car)
    })?;

    if result.is_some() {
        info!("Updated car");
    }

    Ok(result)
}

/// Deletes a car together with its driver assignments.
///
/// Returns false if there was no such car.
#[instrument(skip(pool))]
pub fn delete_car(pool: &DbPool, id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(cars::table.find(id)).execute(conn)?;

    info!("Deleted {} cars", deleted);

    Ok(deleted > 0)
}

/// IDs of the drivers assigned to a car
#[instrument(skip(pool))]
pub fn list_car_driver_ids(pool: &DbPool, car_id: i32) -> Result<Vec<i32>> {
    let conn = &mut pool.get()?;

    let result = cars_drivers::table
        .filter(cars_drivers::car_id.eq(car_id))
        .select(cars_drivers::driver_id)
        .order(cars_drivers::driver_id.asc())
        .load(conn)?;

    Ok(result)
}

/// Assigns the driver to the car if they are not assigned yet, and removes
/// the assignment otherwise.
///
/// Returns true if the driver is assigned after the call.
#[instrument(skip(pool))]
pub fn toggle_car_assignment(pool: &DbPool, car_id: i32, driver_id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;

    let assigned = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let removed = diesel::delete(cars_drivers::table.find((car_id, driver_id))).execute(conn)?;
        if removed > 0 {
            return Ok(false);
        }
        diesel::insert_into(cars_drivers::table)
            .values(CarDriver { car_id, driver_id })
            .execute(conn)?;
        Ok(true)
    })?;

    info!(assigned, "Toggled car assignment");

    Ok(assigned)
}

#[instrument(skip(pool))]
pub fn count_cars(pool: &DbPool) -> Result<i64> {
    let conn = &mut pool.get()?;
    Ok(cars::table.count().get_result(conn)?)
}
