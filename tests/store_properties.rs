use proptest::prelude::*;

use location_tracker::models::location_record::{LocationRecord, NewLocation};
use location_tracker::store::location_store::{LocationStore, LOG_CAPACITY};

fn fix_strategy() -> impl Strategy<Value = NewLocation> {
    (-90.0f64..=90.0, -180.0f64..=180.0, proptest::option::of(0.0f64..500.0)).prop_map(
        |(latitude, longitude, accuracy)| NewLocation {
            accuracy,
            ..NewLocation::new(latitude, longitude)
        },
    )
}

fn ids(records: &[LocationRecord]) -> Vec<u64> {
    records.iter().map(|r| r.id).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn ids_strictly_increase(fixes in prop::collection::vec(fix_strategy(), 1..40)) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocationStore::open(dir.path().join("locations.json"));

        let mut last = 0;
        for fix in fixes {
            let record = store.append(fix);
            prop_assert!(record.id > last);
            last = record.id;
        }
    }

    #[test]
    fn retains_the_last_hundred_in_order(fixes in prop::collection::vec(fix_strategy(), 1..160)) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocationStore::open(dir.path().join("locations.json"));

        let appended: Vec<LocationRecord> = fixes.into_iter().map(|f| store.append(f)).collect();
        let kept = appended.len().min(LOG_CAPACITY);
        let expected = &appended[appended.len() - kept..];

        prop_assert_eq!(store.len(), kept);
        prop_assert_eq!(store.recent(Some(kept)), expected.to_vec());
        prop_assert_eq!(store.recent(Some(LOG_CAPACITY + 50)), expected.to_vec());
        prop_assert_eq!(store.latest(), appended.last().cloned());
    }

    #[test]
    fn recent_window_is_a_suffix(
        fixes in prop::collection::vec(fix_strategy(), 0..30),
        limit in 1usize..40,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocationStore::open(dir.path().join("locations.json"));
        let appended: Vec<LocationRecord> = fixes.into_iter().map(|f| store.append(f)).collect();

        let window = store.recent(Some(limit));
        let start = appended.len().saturating_sub(limit);
        prop_assert_eq!(ids(&window), ids(&appended[start..]));
    }

    #[test]
    fn reads_are_idempotent(fixes in prop::collection::vec(fix_strategy(), 0..20)) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocationStore::open(dir.path().join("locations.json"));
        for fix in fixes {
            store.append(fix);
        }

        prop_assert_eq!(store.recent(None), store.recent(None));
        prop_assert_eq!(store.latest(), store.latest());
    }

    #[test]
    fn persist_then_load_round_trips(fixes in prop::collection::vec(fix_strategy(), 0..120)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let mut store = LocationStore::open(&path);
        for fix in fixes {
            store.append(fix);
        }
        store.persist().unwrap();

        let before = store.recent(Some(LOG_CAPACITY));
        store.load();
        prop_assert_eq!(store.recent(Some(LOG_CAPACITY)), before.clone());

        let reopened = LocationStore::open(&path);
        prop_assert_eq!(reopened.recent(Some(LOG_CAPACITY)), before);
    }
}
