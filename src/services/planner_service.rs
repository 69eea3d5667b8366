//! Itinerary planning pipeline.
//!
//! Single pass over the date range: validate, build the candidate
//! pool, fill each day greedily, aggregate. A day once scheduled is
//! never revisited; the trade for that simplicity is a feasible rather
//! than optimal plan. All state is local to one `plan` call, so
//! concurrent requests need no coordination and dropping the future
//! mid-flight leaves nothing behind.

use std::collections::HashSet;

use chrono::Duration;
use log::info;

use crate::models::error::PlanningError;
use crate::models::itinerary::{Day, Itinerary, PlannedTrip};
use crate::models::place::Place;
use crate::models::trip::PlanningRequest;
use crate::services::budget_service::BudgetTracker;
use crate::services::day_scheduler::{schedule_day, Candidate, VisitDurationPolicy};
use crate::services::distance_service::DistanceEstimator;

#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub visit_duration_policy: VisitDurationPolicy,
}

/// Candidate pool: catalog filtered by the requested interests, plus
/// locked places which bypass the filter. Sorted by id so planning is
/// reproducible regardless of catalog order.
fn build_candidate_pool(request: &PlanningRequest, catalog: Vec<Place>) -> Vec<Candidate> {
    let locked: HashSet<&String> = request.locked_place_ids.iter().collect();
    let interests: HashSet<_> = request.preferences.interests.iter().copied().collect();

    let mut pool: Vec<Candidate> = catalog
        .into_iter()
        .filter_map(|place| {
            let is_locked = locked.contains(&place.id);
            if is_locked || interests.is_empty() || interests.contains(&place.category) {
                Some(Candidate {
                    place,
                    locked: is_locked,
                })
            } else {
                None
            }
        })
        .collect();

    pool.sort_by(|a, b| a.place.id.cmp(&b.place.id));
    pool.dedup_by(|a, b| a.place.id == b.place.id);
    pool
}

/// Plan a complete multi-day itinerary. Locked places that never fit
/// the date range come back in `unplaced_locked_place_ids` — partial
/// success, not an error.
pub async fn plan<E: DistanceEstimator>(
    request: PlanningRequest,
    catalog: Vec<Place>,
    config: &PlannerConfig,
    estimator: &E,
) -> Result<PlannedTrip, PlanningError> {
    request.validate()?;

    let mut remaining = build_candidate_pool(&request, catalog);
    if remaining.is_empty() {
        return Err(PlanningError::NoFeasiblePlan);
    }

    // Locked ids the catalog does not know can never be scheduled;
    // they go straight to the unplaced list so they are reported
    // rather than silently dropped.
    let mut unknown_locked_ids: Vec<String> = {
        let pool_ids: HashSet<&String> = remaining.iter().map(|c| &c.place.id).collect();
        request
            .locked_place_ids
            .iter()
            .filter(|id| !pool_ids.contains(id))
            .cloned()
            .collect()
    };
    if !unknown_locked_ids.is_empty() {
        info!(
            "{} locked place id(s) not present in the catalog",
            unknown_locked_ids.len()
        );
    }

    let day_count = request.day_count();
    let pace = request.preferences.pace;
    let mut budget = BudgetTracker::new(request.budget.total);
    let mut days: Vec<Day> = Vec::with_capacity(day_count as usize);
    let mut day_start_location = request.start_location.to_coordinate();

    for day_index in 0..day_count {
        let date = request.start_date + Duration::days(day_index);
        let (day, unplaced) = schedule_day(
            remaining,
            date,
            request.preferences.daily_start_hour,
            request.preferences.daily_end_hour,
            day_start_location,
            pace,
            &config.visit_duration_policy,
            &mut budget,
            estimator,
        )
        .await;

        // The next day picks up where this one ended; an empty day
        // leaves the start location unchanged.
        if let Some(last) = day.last_coordinates() {
            day_start_location = last;
        }
        remaining = unplaced;
        days.push(day);
    }

    let mut unplaced_locked_place_ids: Vec<String> = remaining
        .iter()
        .filter(|c| c.locked)
        .map(|c| c.place.id.clone())
        .collect();
    let skipped = remaining.len() - unplaced_locked_place_ids.len();
    unplaced_locked_place_ids.append(&mut unknown_locked_ids);
    unplaced_locked_place_ids.sort();
    unplaced_locked_place_ids.dedup();

    if skipped > 0 {
        info!(
            "{} candidate place(s) did not fit the {}-day itinerary",
            skipped, day_count
        );
    }

    let over_budget = budget.over_budget();
    Ok(PlannedTrip {
        itinerary: Itinerary::from_days(days, over_budget, request),
        unplaced_locked_place_ids,
    })
}
