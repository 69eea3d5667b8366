//! End-to-end planner behavior against stubbed estimators. The live
//! routing provider is non-deterministic, so everything here runs on
//! the fallback path or on purpose-built stubs.

use std::time::Duration;

use chrono::NaiveTime;

use wayfarer_api::models::itinerary::PlannedTrip;
use wayfarer_api::models::place::{Coordinate, GeoPoint, Place, PlaceCategory};
use wayfarer_api::models::trip::{Budget, Pace, PlanningRequest, Preferences};
use wayfarer_api::services::distance_service::{
    DistanceEstimator, DistanceService, HaversineEstimator, Leg,
};
use wayfarer_api::services::planner_service::{plan, PlannerConfig};

/// Constant one-minute hop regardless of coordinates; makes travel
/// negligible so tests exercise only the window/budget logic.
struct NegligibleTravel;

impl DistanceEstimator for NegligibleTravel {
    async fn estimate(&self, _from: Coordinate, _to: Coordinate) -> Leg {
        Leg {
            distance_km: 0.5,
            travel_minutes: 1,
        }
    }
}

fn place(id: &str, lat: f64, lng: f64, category: PlaceCategory, fee: f64) -> Place {
    Place {
        id: id.to_string(),
        name: format!("Place {}", id),
        city: "Denver".to_string(),
        address: "123 Main St".to_string(),
        coordinates: Coordinate::new(lat, lng),
        category,
        entrance_fee: fee,
    }
}

fn catalog() -> Vec<Place> {
    vec![
        place("art-museum", 39.7372, -104.9894, PlaceCategory::Cultural, 18.0),
        place("botanic-gardens", 39.7320, -104.9610, PlaceCategory::Natural, 15.0),
        place("capitol", 39.7393, -104.9848, PlaceCategory::Historical, 0.0),
        place("cathedral", 39.7405, -104.9784, PlaceCategory::Religious, 0.0),
        place("food-hall", 39.7526, -104.9997, PlaceCategory::Food, 0.0),
        place("lookout", 39.7327, -105.2436, PlaceCategory::Photography, 0.0),
        place("red-rocks", 39.6654, -105.2057, PlaceCategory::Adventure, 25.0),
        place("zoo", 39.7496, -104.9490, PlaceCategory::Natural, 20.0),
    ]
}

fn request(days: i64) -> PlanningRequest {
    PlanningRequest {
        trip_name: "denver long weekend".to_string(),
        start_location: GeoPoint::from_coordinate(Coordinate::new(39.7392, -104.9903)),
        start_date: "2025-06-01".parse().unwrap(),
        end_date: format!("2025-06-{:02}", days).parse().unwrap(),
        budget: Budget {
            total: 100.0,
            currency: "USD".to_string(),
        },
        preferences: Preferences {
            pace: Pace::Standard,
            interests: vec![],
            daily_start_hour: 9,
            daily_end_hour: 18,
        },
        locked_place_ids: vec![],
    }
}

fn assert_invariants(planned: &PlannedTrip) {
    let itinerary = &planned.itinerary;
    let prefs = &itinerary.request.preferences;
    let window_start = NaiveTime::from_hms_opt(prefs.daily_start_hour, 0, 0).unwrap();
    let window_end = NaiveTime::from_hms_opt(prefs.daily_end_hour, 0, 0).unwrap();

    // Every day stays inside the requested window and totals add up.
    let mut seen_ids = std::collections::HashSet::new();
    let mut fee_sum = 0.0;
    let mut travel_sum = 0;
    for day in &itinerary.days {
        let mut day_fees = 0.0;
        let mut day_travel = 0;
        for item in &day.items {
            assert!(item.start_time >= window_start, "visit starts before window");
            assert!(item.end_time <= window_end, "visit ends after window");
            assert!(item.distance_km_from_prev >= 0.0);
            assert!(
                seen_ids.insert(item.place.id.clone()),
                "place {} visited twice",
                item.place.id
            );
            day_fees += item.place.entrance_fee;
            day_travel += item.travel_minutes_from_prev;
        }
        assert!((day.total_entrance_fees - day_fees).abs() < 1e-9);
        assert_eq!(day.total_travel_minutes, day_travel);
        fee_sum += day.total_entrance_fees;
        travel_sum += day.total_travel_minutes;
    }
    assert!((itinerary.total_fees - fee_sum).abs() < 1e-9);
    assert_eq!(itinerary.total_travel_minutes, travel_sum);
    assert_eq!(itinerary.total_places, seen_ids.len());

    // Locked ids are either placed or reported, never both.
    for locked in &itinerary.request.locked_place_ids {
        let placed = seen_ids.contains(locked);
        let reported = planned.unplaced_locked_place_ids.contains(locked);
        assert!(placed || reported, "locked {} neither placed nor reported", locked);
        assert!(!(placed && reported), "locked {} both placed and reported", locked);
    }
}

#[actix_rt::test]
async fn itinerary_has_one_day_per_date() {
    for days in [1, 2, 4] {
        let planned = plan(
            request(days),
            catalog(),
            &PlannerConfig::default(),
            &HaversineEstimator,
        )
        .await
        .unwrap();
        assert_eq!(planned.itinerary.days.len(), days as usize);
        assert_invariants(&planned);
    }
}

#[actix_rt::test]
async fn empty_catalog_is_rejected() {
    // Scenario A.
    let result = plan(
        request(2),
        vec![],
        &PlannerConfig::default(),
        &HaversineEstimator,
    )
    .await;
    assert!(result.is_err());
}

#[actix_rt::test]
async fn no_interest_match_is_rejected() {
    let mut req = request(2);
    req.preferences.interests = vec![PlaceCategory::Other];
    let result = plan(req, catalog(), &PlannerConfig::default(), &HaversineEstimator).await;
    assert!(result.is_err());
}

#[actix_rt::test]
async fn ninety_minute_visits_fit_nine_hour_window() {
    // Scenario B: three 90-minute candidates, negligible travel, 9-18
    // window. All three fit; none may cross 18:00.
    let mut req = request(1);
    req.budget.total = 1000.0;
    let catalog = vec![
        place("a", 39.74, -104.99, PlaceCategory::Cultural, 0.0),
        place("b", 39.75, -104.98, PlaceCategory::Cultural, 0.0),
        place("c", 39.76, -104.97, PlaceCategory::Cultural, 0.0),
    ];

    let planned = plan(req, catalog, &PlannerConfig::default(), &NegligibleTravel)
        .await
        .unwrap();

    let day = &planned.itinerary.days[0];
    assert_eq!(day.items.len(), 3);
    let window_end = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
    for item in &day.items {
        assert!(item.end_time <= window_end);
    }
    assert_invariants(&planned);
}

#[actix_rt::test]
async fn zero_budget_excludes_unlocked_but_keeps_locked() {
    // Scenario C.
    let mut req = request(1);
    req.budget.total = 0.0;
    let catalog = vec![
        place("unlocked-fee", 39.74, -104.99, PlaceCategory::Cultural, 12.0),
        place("locked-fee", 39.75, -104.98, PlaceCategory::Cultural, 12.0),
    ];

    let unlocked_run = plan(
        req.clone(),
        catalog.clone(),
        &PlannerConfig::default(),
        &NegligibleTravel,
    )
    .await
    .unwrap();
    assert_eq!(unlocked_run.itinerary.total_places, 0);
    assert!(!unlocked_run.itinerary.over_budget);

    req.locked_place_ids = vec!["locked-fee".to_string()];
    let locked_run = plan(req, catalog, &PlannerConfig::default(), &NegligibleTravel)
        .await
        .unwrap();
    let visited: Vec<&str> = locked_run.itinerary.days[0]
        .items
        .iter()
        .map(|i| i.place.id.as_str())
        .collect();
    assert_eq!(visited, vec!["locked-fee"]);
    assert!(locked_run.itinerary.over_budget);
    assert_invariants(&locked_run);
}

#[actix_rt::test]
async fn failing_provider_still_produces_itinerary() {
    // Scenario D: the provider always errors (nothing listens on the
    // discard port); planning must succeed on the fallback.
    let broken_provider = DistanceService::with_base_url(
        "http://127.0.0.1:9".to_string(),
        Duration::from_millis(200),
    )
    .unwrap();

    let planned = plan(
        request(2),
        catalog(),
        &PlannerConfig::default(),
        &broken_provider,
    )
    .await
    .unwrap();

    assert!(planned.itinerary.total_places > 0);
    assert_invariants(&planned);
}

#[actix_rt::test]
async fn planning_is_idempotent_with_stubbed_estimator() {
    let mut req = request(3);
    req.locked_place_ids = vec!["red-rocks".to_string()];

    let first = plan(
        req.clone(),
        catalog(),
        &PlannerConfig::default(),
        &HaversineEstimator,
    )
    .await
    .unwrap();
    let second = plan(req, catalog(), &PlannerConfig::default(), &HaversineEstimator)
        .await
        .unwrap();

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[actix_rt::test]
async fn catalog_order_does_not_change_the_plan() {
    let forward = plan(
        request(2),
        catalog(),
        &PlannerConfig::default(),
        &HaversineEstimator,
    )
    .await
    .unwrap();

    let mut reversed_catalog = catalog();
    reversed_catalog.reverse();
    let reversed = plan(
        request(2),
        reversed_catalog,
        &PlannerConfig::default(),
        &HaversineEstimator,
    )
    .await
    .unwrap();

    assert_eq!(
        serde_json::to_string(&forward).unwrap(),
        serde_json::to_string(&reversed).unwrap()
    );
}

#[actix_rt::test]
async fn oversized_locked_place_is_reported_not_dropped() {
    // A relaxed-pace stay plus hours of travel cannot fit a 2-hour
    // window; the locked place must come back in the unplaced list.
    let mut req = request(1);
    req.preferences.daily_start_hour = 9;
    req.preferences.daily_end_hour = 11;
    req.preferences.pace = Pace::Relaxed;
    // Far enough that fallback travel alone exceeds the window.
    req.locked_place_ids = vec!["distant-peak".to_string()];
    let catalog = vec![place(
        "distant-peak",
        41.5,
        -107.0,
        PlaceCategory::Natural,
        0.0,
    )];

    let planned = plan(req, catalog, &PlannerConfig::default(), &HaversineEstimator)
        .await
        .unwrap();

    assert_eq!(planned.itinerary.total_places, 0);
    assert_eq!(
        planned.unplaced_locked_place_ids,
        vec!["distant-peak".to_string()]
    );
    assert_invariants(&planned);
}

#[actix_rt::test]
async fn days_chain_from_previous_last_stop() {
    // With two far-apart clusters, day 2 should start from wherever
    // day 1 ended rather than the original start location. The lookout
    // cluster is nearer to red-rocks than to downtown.
    let mut req = request(2);
    req.preferences.pace = Pace::Relaxed;
    req.preferences.daily_start_hour = 9;
    req.preferences.daily_end_hour = 13;
    req.budget.total = 1000.0;

    let planned = plan(
        req,
        catalog(),
        &PlannerConfig::default(),
        &HaversineEstimator,
    )
    .await
    .unwrap();

    assert_eq!(planned.itinerary.days.len(), 2);
    assert_invariants(&planned);
    // First stop of day 2 reports travel from day 1's last stop, and
    // the first stop of day 1 reports travel from the start location.
    let day1 = &planned.itinerary.days[0];
    let day2 = &planned.itinerary.days[1];
    if let (Some(last), Some(first)) = (day1.items.last(), day2.items.first()) {
        let expected =
            wayfarer_api::services::distance_service::haversine_km(
                last.place.coordinates,
                first.place.coordinates,
            );
        assert!((first.distance_km_from_prev - expected).abs() < 1e-9);
    }
}

#[actix_rt::test]
async fn locked_id_missing_from_catalog_is_reported_unplaced() {
    // A locked id the catalog has never heard of cannot be scheduled;
    // it must still show up in the unplaced list rather than vanish.
    let mut req = request(2);
    req.locked_place_ids = vec!["ghost".to_string(), "red-rocks".to_string()];

    let planned = plan(req, catalog(), &PlannerConfig::default(), &NegligibleTravel)
        .await
        .unwrap();

    let placed: Vec<String> = planned
        .itinerary
        .days
        .iter()
        .flat_map(|d| d.items.iter().map(|i| i.place.id.clone()))
        .collect();
    assert!(placed.contains(&"red-rocks".to_string()));
    assert!(!placed.contains(&"ghost".to_string()));
    assert_eq!(planned.unplaced_locked_place_ids, vec!["ghost".to_string()]);
    assert_invariants(&planned);
}

#[actix_rt::test]
async fn locked_places_bypass_interest_filter() {
    let mut req = request(2);
    req.preferences.interests = vec![PlaceCategory::Cultural];
    req.locked_place_ids = vec!["zoo".to_string()];

    let planned = plan(req, catalog(), &PlannerConfig::default(), &NegligibleTravel)
        .await
        .unwrap();

    let visited: Vec<String> = planned
        .itinerary
        .days
        .iter()
        .flat_map(|d| d.items.iter().map(|i| i.place.id.clone()))
        .collect();
    assert!(visited.contains(&"zoo".to_string()));
    for id in &visited {
        assert!(
            id == "zoo" || id == "art-museum",
            "unexpected place {} for cultural-only interests",
            id
        );
    }
    assert_invariants(&planned);
}
