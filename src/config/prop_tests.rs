use super::*;
use crate::test_utils::arb_messy_string;
use proptest::prelude::*;

/// Generates an arbitrary Config
fn arb_config() -> impl Strategy<Value = Config> {
    (arb_messy_string(), arb_messy_string(), 1..1000i64, any::<i32>(), arb_messy_string()).prop_map(
        |(database_url, listen_addr, paginate_by, session_ttl_hours, cookie_name)| Config {
            database_url,
            listen_addr,
            paginate_by,
            session_ttl_hours: session_ttl_hours as i64,
            cookie_name,
        },
    )
}

/// Generates an arbitrary ConfigUpdate
fn arb_config_update() -> impl Strategy<Value = ConfigUpdate> {
    (
        prop::option::of(arb_messy_string()),
        prop::option::of(arb_messy_string()),
        prop::option::of(any::<i64>()),
        prop::option::of(any::<i32>()),
        prop::option::of(arb_messy_string()),
    )
        .prop_map(
            |(database_url, listen_addr, paginate_by, session_ttl_hours, cookie_name)| ConfigUpdate {
                database_url,
                listen_addr,
                paginate_by,
                session_ttl_hours: session_ttl_hours.map(i64::from),
                cookie_name,
            },
        )
}

proptest! {
    #[test]
    fn prop_empty_update_is_identity(config in arb_config()) {
        prop_assert_eq!(config.clone().apply_update(ConfigUpdate::default()), config);
    }

    #[test]
    fn prop_update_fields_take_precedence(config in arb_config(), update in arb_config_update()) {
        let updated = config.clone().apply_update(update.clone());

        prop_assert_eq!(updated.database_url, update.database_url.unwrap_or(config.database_url));
        prop_assert_eq!(updated.listen_addr, update.listen_addr.unwrap_or(config.listen_addr));
        prop_assert_eq!(updated.cookie_name, update.cookie_name.unwrap_or(config.cookie_name));
        prop_assert!(updated.paginate_by >= 1);
    }

    #[test]
    fn prop_update_is_idempotent(config in arb_config(), update in arb_config_update()) {
        let once = config.apply_update(update.clone());
        let twice = once.clone().apply_update(update);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_session_ttl_never_negative(hours in any::<i64>()) {
        let config = Config { session_ttl_hours: hours, ..base_config(None) };
        prop_assert!(config.session_ttl() >= chrono::Duration::zero());
    }

    /// Whatever the file contains as a ConfigUpdate can be written and read back
    #[test]
    fn prop_update_survives_toml(
        update in (
            prop::option::of("[a-z./:0-9]{1,20}"),
            prop::option::of(1..100i64),
            prop::option::of("[a-z_]{1,12}"),
        ).prop_map(|(database_url, paginate_by, cookie_name)| ConfigUpdate {
            database_url,
            paginate_by,
            cookie_name,
            ..Default::default()
        })
    ) {
        let text = toml::to_string(&update).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, text).unwrap();

        prop_assert_eq!(config_from_file(Some(path)).unwrap(), update);
    }
}
