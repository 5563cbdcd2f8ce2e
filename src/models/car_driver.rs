use diesel::prelude::*;

use super::{Car, Driver};

/// Assignment of a driver to a car
#[derive(Queryable, Selectable, Insertable, Associations, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(belongs_to(Car))]
#[diesel(belongs_to(Driver))]
#[diesel(table_name = crate::schema::cars_drivers)]
#[diesel(primary_key(car_id, driver_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CarDriver {
    pub car_id: i32,
    pub driver_id: i32,
}
