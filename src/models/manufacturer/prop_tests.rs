use super::*;
use crate::test_utils::arb_messy_string;
use proptest::prelude::*;

proptest! {
    /// Display is always "{name} {country}"
    #[test]
    fn prop_display_joins_name_and_country(
        id in any::<i32>(),
        name in arb_messy_string(),
        country in arb_messy_string(),
    ) {
        let manufacturer = Manufacturer::new_with_fields(id, name.clone(), country.clone());
        prop_assert_eq!(manufacturer.to_string(), format!("{} {}", name, country));
    }

    /// Getters return what the constructor was given
    #[test]
    fn prop_new_with_fields_roundtrip(
        id in any::<i32>(),
        name in "\\PC+",
        country in "\\PC+",
    ) {
        let manufacturer = Manufacturer::new_with_fields(id, name.clone(), country.clone());
        prop_assert_eq!(manufacturer.get_id(), id);
        prop_assert_eq!(manufacturer.get_name(), name);
        prop_assert_eq!(manufacturer.get_country(), country);
    }
}
