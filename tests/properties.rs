//! Property tests for merge and display ordering.

use std::cmp::Ordering;

use car_registry::{compare_ids, display_order, rank_for_display, Car, CarPatch, Record, Registry};
use proptest::prelude::*;

/// Timestamp-style numeric ids mixed with catalog-style string ids.
const ID_POOL: &[&str] = &[
    "1", "2", "7", "07", "10", "1700000000000", "1x", "10x", "car-1", "car-2", "car-10", "zzz",
];

fn arb_id() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(ID_POOL)
}

fn arb_patch() -> impl Strategy<Value = CarPatch> {
    (
        proptest::option::of(any::<u64>()),
        proptest::option::of("[a-z]{0,8}"),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(price, city, featured)| CarPatch {
            price,
            city,
            featured,
            ..CarPatch::default()
        })
}

proptest! {
    #[test]
    fn update_is_shallow_merge(base_price in any::<u64>(), patch in arb_patch()) {
        let registry = Registry::<Car>::new();
        let base = Car { price: base_price, city: "Lahore".into(), ..Car::new("car-1", "t") };
        registry.register(base.clone());

        let mut expected = base.clone();
        if let Some(price) = patch.price { expected.price = price; }
        if let Some(city) = patch.city.clone() { expected.city = city; }
        if let Some(featured) = patch.featured { expected.featured = featured; }

        let merged = registry.update("car-1", patch).unwrap();
        prop_assert_eq!(&merged, &expected);
        prop_assert_eq!(registry.get("car-1"), Some(expected));
    }

    #[test]
    fn ranking_is_sorted_and_stable(entries in proptest::collection::vec((arb_id(), any::<bool>()), 0..40)) {
        let mut cars: Vec<Car> = entries
            .iter()
            .enumerate()
            .map(|(position, (id, featured))| Car {
                featured: *featured,
                mileage: position as u32,
                ..Car::new(id.to_string(), "")
            })
            .collect();

        rank_for_display(&mut cars);

        for pair in cars.windows(2) {
            let order = display_order(&pair[0], &pair[1]);
            prop_assert!(order != std::cmp::Ordering::Greater);
            if order == std::cmp::Ordering::Equal {
                // Equal-ranked records keep input order.
                prop_assert!(pair[0].mileage < pair[1].mileage);
            }
        }
        prop_assert!(cars.iter().skip_while(|c| c.is_featured()).all(|c| !c.is_featured()));
    }

    #[test]
    fn id_order_is_transitive(a in arb_id(), b in arb_id(), c in arb_id()) {
        if compare_ids(a, b) != Ordering::Greater && compare_ids(b, c) != Ordering::Greater {
            prop_assert_ne!(compare_ids(a, c), Ordering::Greater);
        }
        prop_assert_eq!(compare_ids(a, b), compare_ids(b, a).reverse());
    }

    #[test]
    fn ranking_ignores_input_order(
        (ids, shuffled) in proptest::sample::subsequence(ID_POOL.to_vec(), 0..=ID_POOL.len())
            .prop_flat_map(|ids| (Just(ids.clone()), Just(ids).prop_shuffle()))
    ) {
        let rank = |ids: &[&str]| {
            let mut cars: Vec<Car> = ids
                .iter()
                .map(|id| Car { featured: id.len() % 3 == 0, ..Car::new(*id, "") })
                .collect();
            rank_for_display(&mut cars);
            cars.into_iter().map(|c| c.id).collect::<Vec<_>>()
        };

        prop_assert_eq!(rank(&ids), rank(&shuffled));
    }
}
