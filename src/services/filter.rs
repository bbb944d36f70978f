use crate::domain::models::{Cafe, FilterCriteria};

pub fn matches(cafe: &Cafe, criteria: &FilterCriteria) -> bool {
    if let Some(loc) = criteria.location() {
        if !cafe
            .location
            .to_lowercase()
            .contains(&loc.to_lowercase())
        {
            return false;
        }
    }
    criteria.required.iter().all(|a| cafe.has(*a))
}

/// Stable client-side filter; always returns a new collection.
pub fn filter_cafes(cafes: &[Cafe], criteria: &FilterCriteria) -> Vec<Cafe> {
    cafes
        .iter()
        .filter(|c| matches(c, criteria))
        .cloned()
        .collect()
}



#[cfg(test)]
mod property {
    use super::*;
    use crate::domain::models::Amenity;
    use proptest::prelude::*;

    fn arb_location() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Shoreditch".to_string()),
            Just("shoreditch high st".to_string()),
            Just("PECKHAM".to_string()),
            Just(String::new()),
            "[a-zA-Z ]{0,12}",
        ]
    }

    fn arb_cafe() -> impl Strategy<Value = Cafe> {
        (0i64..50, arb_location(), any::<[bool; 4]>()).prop_map(
            |(id, location, [wifi, sockets, toilet, calls])| Cafe {
                id,
                name: format!("Cafe {}", id),
                map_url: String::new(),
                img_url: String::new(),
                location,
                has_sockets: sockets,
                has_toilet: toilet,
                has_wifi: wifi,
                can_take_calls: calls,
                seats: String::new(),
                coffee_price: String::new(),
            },
        )
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        (
            prop::option::of(prop_oneof![
                Just("shore".to_string()),
                Just("ECK".to_string()),
                "[a-zA-Z ]{0,4}",
            ]),
            prop::collection::btree_set(prop::sample::select(Amenity::ALL.to_vec()), 0..=4),
        )
            .prop_map(|(location, required)| FilterCriteria { location, required })
    }

    fn is_subsequence(out: &[Cafe], input: &[Cafe]) -> bool {
        let mut rest = input.iter();
        out.iter().all(|c| rest.any(|i| i == c))
    }

    proptest! {
        #[test]
        fn empty_criteria_keeps_input(cafes in prop::collection::vec(arb_cafe(), 0..12)) {
            prop_assert_eq!(filter_cafes(&cafes, &FilterCriteria::default()), cafes);
        }

        #[test]
        fn output_is_sound_complete_and_ordered(
            cafes in prop::collection::vec(arb_cafe(), 0..12),
            criteria in arb_criteria(),
        ) {
            let out = filter_cafes(&cafes, &criteria);
            for c in &out {
                if let Some(loc) = criteria.location() {
                    prop_assert!(c.location.to_lowercase().contains(&loc.to_lowercase()));
                }
                for a in &criteria.required {
                    prop_assert!(c.has(*a));
                }
            }
            let kept = cafes.iter().filter(|c| matches(c, &criteria)).count();
            prop_assert_eq!(out.len(), kept);
            prop_assert!(is_subsequence(&out, &cafes));
        }

        #[test]
        fn filtering_twice_changes_nothing(
            cafes in prop::collection::vec(arb_cafe(), 0..12),
            criteria in arb_criteria(),
        ) {
            let once = filter_cafes(&cafes, &criteria);
            prop_assert_eq!(filter_cafes(&once, &criteria), once.clone());
        }
    }
}
