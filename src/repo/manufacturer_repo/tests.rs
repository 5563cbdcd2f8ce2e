use super::*;
use crate::test_utils::setup_test_db;

#[test]
fn test_create_manufacturer() {
    let pool = setup_test_db();

    let manufacturer = create_manufacturer(&pool, "test", "test country").unwrap();

    assert_eq!(manufacturer.get_name(), "test");
    assert_eq!(manufacturer.get_country(), "test country");
    assert_eq!(manufacturer.to_string(), "test test country");
    assert!(manufacturer.get_id() > 0);
}

#[test]
fn test_create_duplicate_manufacturer_name_fails() {
    let pool = setup_test_db();
    create_manufacturer(&pool, "Toyota", "Japan").unwrap();

    let err = create_manufacturer(&pool, "Toyota", "USA").unwrap_err();

    assert_eq!(crate::repo::unique_violation_field(&err).as_deref(), Some("name"));
}

#[test]
fn test_get_manufacturer() {
    let pool = setup_test_db();
    let created = create_manufacturer(&pool, "Ford", "USA").unwrap();

    let retrieved = get_manufacturer(&pool, created.get_id()).unwrap().unwrap();

    assert_eq!(retrieved, created);
    assert!(get_manufacturer(&pool, created.get_id() + 100).unwrap().is_none());
}

#[test]
fn test_list_manufacturers_ordered_by_name() {
    let pool = setup_test_db();
    create_manufacturer(&pool, "Toyota", "Japan").unwrap();
    create_manufacturer(&pool, "Ford", "USA").unwrap();
    create_manufacturer(&pool, "BMW", "Germany").unwrap();

    let names: Vec<String> = list_manufacturers(&pool).unwrap().iter().map(|m| m.get_name()).collect();

    assert_eq!(names, vec!["BMW", "Ford", "Toyota"]);
}

#[test]
fn test_search_manufacturers_by_name() {
    let pool = setup_test_db();
    create_manufacturer(&pool, "Toyota", "Japan").unwrap();
    create_manufacturer(&pool, "Ford", "USA").unwrap();

    let page = search_manufacturers(&pool, Some("Toyota"), PageRequest::all()).unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].get_name(), "Toyota");
}

#[test]
fn test_search_manufacturers_ignores_case() {
    let pool = setup_test_db();
    create_manufacturer(&pool, "Toyota", "Japan").unwrap();
    create_manufacturer(&pool, "Ford", "USA").unwrap();

    let page = search_manufacturers(&pool, Some("yot"), PageRequest::all()).unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].get_name(), "Toyota");
}

#[test]
fn test_search_manufacturers_without_filter_returns_all() {
    let pool = setup_test_db();
    create_manufacturer(&pool, "test1", "test country1").unwrap();
    create_manufacturer(&pool, "test2", "test country2").unwrap();

    let unfiltered = search_manufacturers(&pool, None, PageRequest::all()).unwrap();
    let empty = search_manufacturers(&pool, Some(""), PageRequest::all()).unwrap();

    assert_eq!(unfiltered.items, list_manufacturers(&pool).unwrap());
    assert_eq!(empty.items, unfiltered.items);
}

#[test]
fn test_search_manufacturers_wildcards_are_literal() {
    let pool = setup_test_db();
    create_manufacturer(&pool, "Rolls_Royce", "UK").unwrap();
    create_manufacturer(&pool, "RollsXRoyce", "UK").unwrap();
    create_manufacturer(&pool, "100% Electric", "USA").unwrap();

    let underscore = search_manufacturers(&pool, Some("s_R"), PageRequest::all()).unwrap();
    let percent = search_manufacturers(&pool, Some("%"), PageRequest::all()).unwrap();

    assert_eq!(underscore.items.len(), 1);
    assert_eq!(underscore.items[0].get_name(), "Rolls_Royce");
    assert_eq!(percent.items.len(), 1);
    assert_eq!(percent.items[0].get_name(), "100% Electric");
}

#[test]
fn test_search_manufacturers_paginates() {
    let pool = setup_test_db();
    for i in 0..7 {
        create_manufacturer(&pool, &format!("Maker {i}"), "Nowhere").unwrap();
    }

    let first = search_manufacturers(&pool, None, PageRequest::new(1, 5)).unwrap();
    let second = search_manufacturers(&pool, None, PageRequest::new(2, 5)).unwrap();

    assert_eq!(first.items.len(), 5);
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.num_pages, 2);
    assert!(first.has_next);
    assert!(!second.has_next);
    assert_eq!(second.items[1].get_name(), "Maker 6");
}

#[test]
fn test_update_manufacturer() {
    let pool = setup_test_db();
    let created = create_manufacturer(&pool, "Ford", "USA").unwrap();

    let updated = update_manufacturer(&pool, created.get_id(), "Ford Motor", "United States").unwrap().unwrap();

    assert_eq!(updated.get_id(), created.get_id());
    assert_eq!(updated.get_name(), "Ford Motor");
    assert_eq!(updated.get_country(), "United States");
    assert!(update_manufacturer(&pool, 999, "x", "y").unwrap().is_none());
}

#[test]
fn test_delete_manufacturer_cascades_to_cars() {
    let pool = setup_test_db();
    let manufacturer = create_manufacturer(&pool, "Ford", "USA").unwrap();
    let car = crate::repo::create_car(&pool, "Mustang", manufacturer.get_id(), &[]).unwrap();

    assert!(delete_manufacturer(&pool, manufacturer.get_id()).unwrap());

    assert!(get_manufacturer(&pool, manufacturer.get_id()).unwrap().is_none());
    assert!(crate::repo::get_car(&pool, car.get_id()).unwrap().is_none());
    assert!(!delete_manufacturer(&pool, manufacturer.get_id()).unwrap());
}

#[test]
fn test_count_manufacturers() {
    let pool = setup_test_db();
    assert_eq!(count_manufacturers(&pool).unwrap(), 0);

    create_manufacturer(&pool, "Ford", "USA").unwrap();
    create_manufacturer(&pool, "Toyota", "Japan").unwrap();

    assert_eq!(count_manufacturers(&pool).unwrap(), 2);
}
