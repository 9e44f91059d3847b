use crate::domain::pharmacy::{Candidate, GeoPoint, PharmacyRecord};
use crate::geo;
use chrono::NaiveDateTime;

/// Closed-interval shift-window check: `from <= now <= to`.
/// A record with `from > to` can never satisfy this and is effectively
/// always closed.
pub fn is_open_at(record: &PharmacyRecord, now: NaiveDateTime) -> bool {
    record.from <= now && now <= record.to
}

/// Pick the single nearest pharmacy whose shift window covers `now`.
///
/// Without a user location there is nothing to rank by, so the first open
/// record in feed order is returned with no distance attached. Distances are
/// only computed for records that passed the window filter. Ties keep feed
/// order (stable sort, no secondary key).
pub fn select_nearest(
    records: &[PharmacyRecord],
    now: NaiveDateTime,
    user: Option<GeoPoint>,
) -> Option<Candidate> {
    let open: Vec<&PharmacyRecord> = records.iter().filter(|r| is_open_at(r, now)).collect();

    let Some(user) = user else {
        return open.first().map(|r| Candidate {
            record: (*r).clone(),
            distance_km: None,
        });
    };

    let mut ranked: Vec<(f64, &PharmacyRecord)> = open
        .into_iter()
        .map(|r| (geo::haversine_km(user, r.position), r))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    ranked.first().map(|(distance_km, r)| Candidate {
        record: (*r).clone(),
        distance_km: Some(*distance_km),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record(id: &str, from: NaiveDateTime, to: NaiveDateTime, lat: f64, lon: f64) -> PharmacyRecord {
        PharmacyRecord {
            id: id.to_string(),
            from,
            to,
            name: format!("Apotheke {id}"),
            street: "Hauptstr. 1".to_string(),
            zip_code: "10115".to_string(),
            location: "Berlin".to_string(),
            phone: "030 1234567".to_string(),
            position: GeoPoint { lat, lon },
        }
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let r = record("a", at(8, 0, 0), at(20, 0, 0), 52.0, 13.0);

        assert!(is_open_at(&r, at(8, 0, 0)));
        assert!(is_open_at(&r, at(20, 0, 0)));
        assert!(is_open_at(&r, at(12, 0, 0)));

        // One second outside either end is closed.
        assert!(!is_open_at(&r, at(7, 59, 59)));
        assert!(!is_open_at(&r, at(20, 0, 1)));
    }

    #[test]
    fn inverted_window_is_never_open() {
        let r = record("a", at(20, 0, 0), at(8, 0, 0), 52.0, 13.0);
        assert!(!is_open_at(&r, at(12, 0, 0)));
        assert!(!is_open_at(&r, at(20, 0, 0)));
    }

    #[test]
    fn empty_record_set_yields_none() {
        let user = GeoPoint { lat: 52.0, lon: 13.0 };
        assert!(select_nearest(&[], at(12, 0, 0), Some(user)).is_none());
    }

    #[test]
    fn all_closed_yields_none() {
        let records = vec![
            record("a", at(0, 0, 0), at(8, 0, 0), 52.0, 13.0),
            record("b", at(20, 0, 0), at(23, 59, 59), 52.1, 13.1),
        ];
        let user = GeoPoint { lat: 52.0, lon: 13.0 };
        assert!(select_nearest(&records, at(12, 0, 0), Some(user)).is_none());
    }

    #[test]
    fn picks_minimum_distance_among_open() {
        let user = GeoPoint { lat: 52.0, lon: 13.0 };
        // Offsets in latitude only: ~5.0 km, ~1.2 km, ~3.7 km north of the user.
        let records = vec![
            record("far", at(8, 0, 0), at(20, 0, 0), 52.0 + 5.0 / 111.19, 13.0),
            record("near", at(8, 0, 0), at(20, 0, 0), 52.0 + 1.2 / 111.19, 13.0),
            record("mid", at(8, 0, 0), at(20, 0, 0), 52.0 + 3.7 / 111.19, 13.0),
        ];

        let picked = select_nearest(&records, at(12, 0, 0), Some(user)).unwrap();
        assert_eq!(picked.record.id, "near");
        let d = picked.distance_km.unwrap();
        assert!((d - 1.2).abs() < 0.01, "expected ~1.2 km, got {d}");
    }

    #[test]
    fn closed_record_is_never_picked_even_if_nearest() {
        let user = GeoPoint { lat: 52.0, lon: 13.0 };
        let records = vec![
            record("closed_near", at(0, 0, 0), at(1, 0, 0), 52.0, 13.0),
            record("open_far", at(8, 0, 0), at(20, 0, 0), 52.5, 13.5),
        ];

        let picked = select_nearest(&records, at(12, 0, 0), Some(user)).unwrap();
        assert_eq!(picked.record.id, "open_far");
    }

    #[test]
    fn without_location_returns_first_open_in_feed_order() {
        let records = vec![
            record("closed", at(0, 0, 0), at(1, 0, 0), 52.0, 13.0),
            record("first_open", at(8, 0, 0), at(20, 0, 0), 52.5, 13.5),
            record("second_open", at(8, 0, 0), at(20, 0, 0), 52.0, 13.0),
        ];

        let picked = select_nearest(&records, at(12, 0, 0), None).unwrap();
        assert_eq!(picked.record.id, "first_open");
        assert!(picked.distance_km.is_none());
    }

    #[test]
    fn equal_distances_keep_feed_order() {
        let user = GeoPoint { lat: 52.0, lon: 13.0 };
        // Two pharmacies at the same address: identical distance, feed
        // order decides.
        let records = vec![
            record("first", at(8, 0, 0), at(20, 0, 0), 52.01, 13.01),
            record("second", at(8, 0, 0), at(20, 0, 0), 52.01, 13.01),
        ];

        let picked = select_nearest(&records, at(12, 0, 0), Some(user)).unwrap();
        assert_eq!(picked.record.id, "first");
    }

    #[test]
    fn deterministic_for_frozen_inputs() {
        let user = GeoPoint { lat: 52.1, lon: 13.1 };
        let records = vec![
            record("a", at(8, 0, 0), at(20, 0, 0), 52.0, 13.0),
            record("b", at(8, 0, 0), at(20, 0, 0), 52.2, 13.2),
        ];
        let now = at(12, 0, 0);

        let first = select_nearest(&records, now, Some(user)).unwrap();
        for _ in 0..10 {
            let again = select_nearest(&records, now, Some(user)).unwrap();
            assert_eq!(again.record.id, first.record.id);
            assert_eq!(again.distance_km, first.distance_km);
        }
    }

    #[test]
    fn single_record_end_to_end() {
        // Feed entry 08:00-20:00 at (52.0, 13.0), user at (52.1, 13.1),
        // evaluated at noon: selected, ~13.05 km away by haversine.
        let records = vec![record("only", at(8, 0, 0), at(20, 0, 0), 52.0, 13.0)];
        let user = GeoPoint { lat: 52.1, lon: 13.1 };

        let picked = select_nearest(&records, at(12, 0, 0), Some(user)).unwrap();
        assert_eq!(picked.record.id, "only");
        let d = picked.distance_km.unwrap();
        assert!((d - 13.05).abs() < 0.05, "expected ~13.05 km, got {d}");
    }
}
