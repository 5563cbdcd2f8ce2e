//! Integration tests for the string forms and URLs of the models, using
//! rows that went through the database

mod common;

use common::create_test_app;
use taxi_service::models::DriverRegistration;
use taxi_service::repo;

#[test]
fn test_driver_str() {
    let app = create_test_app();
    let driver = repo::create_driver(
        &app.state.pool,
        &DriverRegistration::new("test", "test123", "test license number")
            .with_names("Test first", "Test last"),
    )
    .unwrap();

    assert_eq!(driver.to_string(), "test (Test first Test last)");
}

#[test]
fn test_driver_get_absolute_url() {
    let app = create_test_app();
    let driver =
        repo::create_driver(&app.state.pool, &DriverRegistration::new("test", "test123", "test1")).unwrap();

    assert_eq!(driver.get_id(), 1);
    assert_eq!(driver.get_absolute_url(), "/drivers/1/");
}

#[test]
fn test_create_driver_with_license_number() {
    let app = create_test_app();
    repo::create_driver(
        &app.state.pool,
        &DriverRegistration::new("test", "test123", "test license number"),
    )
    .unwrap();

    let driver = repo::get_driver(&app.state.pool, 1).unwrap().unwrap();

    assert_eq!(driver.get_username(), "test");
    assert!(driver.check_password("test123"));
    assert!(!driver.check_password("test1234"));
    assert_ne!(driver.get_password_hash(), "test123");
    assert_eq!(driver.get_license_number(), "test license number");
}

#[test]
fn test_car_str() {
    let app = create_test_app();
    let manufacturer = repo::create_manufacturer(&app.state.pool, "test", "test country").unwrap();
    let car = repo::create_car(&app.state.pool, "test", manufacturer.get_id(), &[]).unwrap();

    assert_eq!(car.to_string(), "test");
}

#[test]
fn test_manufacturer_str() {
    let app = create_test_app();
    let manufacturer = repo::create_manufacturer(&app.state.pool, "test", "test country").unwrap();

    assert_eq!(manufacturer.to_string(), "test test country");
}
