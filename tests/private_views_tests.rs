//! Integration tests for the list pages as a logged-in driver

mod common;

use axum::http::HeaderValue;
use common::{create_test_app, get_page, login_superuser, TestApp};
use taxi_service::models::DriverRegistration;
use taxi_service::repo::{self, PageRequest};

fn setup() -> (TestApp, HeaderValue) {
    let app = create_test_app();
    repo::create_driver(&app.state.pool, &DriverRegistration::new("test1", "test12345", "test1")).unwrap();
    let manufacturer = repo::create_manufacturer(&app.state.pool, "test1", "test country1").unwrap();
    repo::create_manufacturer(&app.state.pool, "test2", "test country2").unwrap();
    repo::create_car(&app.state.pool, "test", manufacturer.get_id(), &[]).unwrap();

    let (_, cookie) = login_superuser(&app, "test2", "test2");
    (app, cookie)
}

#[tokio::test]
async fn test_retrieve_manufacturers() {
    let (app, cookie) = setup();

    let body = get_page(&app, "/manufacturers/", &cookie).await;

    assert!(body.contains("Manufacturer list"));
    for manufacturer in repo::list_manufacturers(&app.state.pool).unwrap() {
        assert!(body.contains(&manufacturer.get_name()));
        assert!(body.contains(&manufacturer.get_country()));
    }
}

#[tokio::test]
async fn test_retrieve_cars() {
    let (app, cookie) = setup();

    let body = get_page(&app, "/cars/", &cookie).await;

    assert!(body.contains("Car list"));
    let cars = repo::list_cars(&app.state.pool).unwrap();
    assert_eq!(cars.len(), 1);
    for car in cars {
        assert!(body.contains(&format!("{}: {}", car.get_id(), car.get_model())));
    }
}

#[tokio::test]
async fn test_retrieve_drivers() {
    let (app, cookie) = setup();

    let body = get_page(&app, "/drivers/", &cookie).await;

    assert!(body.contains("Driver list"));
    let drivers = repo::list_drivers(&app.state.pool).unwrap();
    assert_eq!(drivers.len(), 2);
    for driver in drivers {
        assert!(body.contains(&driver.get_license_number()));
    }
}

/// The page queries return exactly what the list functions return
#[tokio::test]
async fn test_list_pages_hold_full_sets() {
    let (app, _) = setup();
    let pool = &app.state.pool;

    let page = repo::search_manufacturers(pool, None, PageRequest::all()).unwrap();
    assert_eq!(page.items, repo::list_manufacturers(pool).unwrap());

    let page = repo::search_drivers(pool, None, PageRequest::all()).unwrap();
    assert_eq!(page.items, repo::list_drivers(pool).unwrap());

    let page = repo::search_cars(pool, None, PageRequest::all()).unwrap();
    let cars: Vec<_> = page.items.into_iter().map(|row| row.car).collect();
    assert_eq!(cars, repo::list_cars(pool).unwrap());
}

#[tokio::test]
async fn test_manufacturer_list_paginates() {
    let (app, cookie) = setup();
    for i in 3..=7 {
        repo::create_manufacturer(&app.state.pool, &format!("maker{i}"), "somewhere").unwrap();
    }

    let first = get_page(&app, "/manufacturers/", &cookie).await;
    assert!(first.contains("Page 1 of 2"));
    assert!(first.contains("maker3"));
    assert!(!first.contains("<td>test2</td>"));

    let second = get_page(&app, "/manufacturers/?page=2", &cookie).await;
    assert!(second.contains("Page 2 of 2"));
    assert!(second.contains("<td>test2</td>"));

    let past_end = get_page(&app, "/manufacturers/?page=99", &cookie).await;
    assert!(past_end.contains("Page 2 of 2"));

    let garbage = get_page(&app, "/manufacturers/?page=abc", &cookie).await;
    assert!(garbage.contains("Page 1 of 2"));
}
