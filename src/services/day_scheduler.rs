//! Greedy nearest-feasible-next scheduling of one day's visits.
//!
//! Each round fans the travel estimates for all eligible candidates
//! out concurrently, then picks the winner with a deterministic sort
//! key: locked-and-unplaced candidates first, then shortest travel,
//! then lower place id. Candidates that do not fit the remaining
//! window stay in the pool for a later day.

use chrono::{NaiveDate, NaiveTime};
use futures::future::join_all;

use crate::models::itinerary::{Day, VisitItem};
use crate::models::place::{Coordinate, Place, PlaceCategory};
use crate::models::trip::Pace;
use crate::services::budget_service::BudgetTracker;
use crate::services::distance_service::{DistanceEstimator, Leg};

const MIN_STAY_MINUTES: i64 = 30;

/// A catalog place tagged with its locked status for scheduling.
/// Locked is a sort-key attribute, not a separate code path.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub place: Place,
    pub locked: bool,
}

/// Assumed stay duration per place as a function of pace and category.
/// These are tuning constants, not invariants; override per deployment
/// if the catalog calls for it.
#[derive(Debug, Clone)]
pub struct VisitDurationPolicy {
    pub food_adjustment_minutes: i64,
    pub photography_adjustment_minutes: i64,
    pub adventure_adjustment_minutes: i64,
}

impl Default for VisitDurationPolicy {
    fn default() -> Self {
        Self {
            food_adjustment_minutes: -30,
            photography_adjustment_minutes: -30,
            adventure_adjustment_minutes: 30,
        }
    }
}

impl VisitDurationPolicy {
    pub fn stay_minutes(&self, category: PlaceCategory, pace: Pace) -> i64 {
        let adjustment = match category {
            PlaceCategory::Food => self.food_adjustment_minutes,
            PlaceCategory::Photography => self.photography_adjustment_minutes,
            PlaceCategory::Adventure => self.adventure_adjustment_minutes,
            _ => 0,
        };
        (pace.base_stay_minutes() + adjustment).max(MIN_STAY_MINUTES)
    }
}

fn minutes_to_time(minutes: i64) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt((minutes * 60) as u32, 0)
        .unwrap_or(NaiveTime::MIN)
}

/// Fill one day's window greedily. Returns the scheduled day and the
/// candidates that were not placed; an empty candidate list yields an
/// empty day, not an error. Fees for committed visits are charged to
/// the tracker as part of selection.
pub async fn schedule_day<E: DistanceEstimator>(
    mut candidates: Vec<Candidate>,
    date: NaiveDate,
    start_hour: u32,
    end_hour: u32,
    start_location: Coordinate,
    pace: Pace,
    policy: &VisitDurationPolicy,
    budget: &mut BudgetTracker,
    estimator: &E,
) -> (Day, Vec<Candidate>) {
    let mut day = Day::empty(date);
    let mut current_position = start_location;
    let mut current_minute = i64::from(start_hour) * 60;
    // NaiveTime cannot represent 24:00, so a midnight window closes at
    // 23:59.
    let day_end_minute = (i64::from(end_hour) * 60).min(23 * 60 + 59);

    loop {
        let eligible: Vec<usize> = (0..candidates.len())
            .filter(|&i| {
                let c = &candidates[i];
                budget.accepts(c.place.entrance_fee, c.locked)
            })
            .collect();

        if eligible.is_empty() {
            break;
        }

        // Independent estimates, fanned out together. Selection below
        // uses a total order so completion order never matters.
        let legs: Vec<Leg> = join_all(eligible.iter().map(|&i| {
            estimator.estimate(current_position, candidates[i].place.coordinates)
        }))
        .await;

        let chosen = eligible
            .iter()
            .zip(legs.iter())
            .filter(|(&i, leg)| {
                let stay = policy.stay_minutes(candidates[i].place.category, pace);
                current_minute + leg.travel_minutes + stay <= day_end_minute
            })
            .min_by(|(&a, leg_a), (&b, leg_b)| {
                let key_a = (!candidates[a].locked, leg_a.travel_minutes, &candidates[a].place.id);
                let key_b = (!candidates[b].locked, leg_b.travel_minutes, &candidates[b].place.id);
                key_a.cmp(&key_b)
            })
            .map(|(&i, leg)| (i, *leg));

        let Some((index, leg)) = chosen else {
            // Nothing fits in the remaining window; the day is full.
            break;
        };

        let candidate = candidates.remove(index);
        let stay = policy.stay_minutes(candidate.place.category, pace);
        let visit_start = current_minute + leg.travel_minutes;
        let visit_end = visit_start + stay;

        budget.commit(candidate.place.entrance_fee);

        current_position = candidate.place.coordinates;
        current_minute = visit_end;

        day.items.push(VisitItem {
            place: candidate.place,
            start_time: minutes_to_time(visit_start),
            end_time: minutes_to_time(visit_end),
            distance_km_from_prev: leg.distance_km,
            travel_minutes_from_prev: leg.travel_minutes,
        });
    }

    (day.finalize(), candidates)
}
