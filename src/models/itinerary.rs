use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::place::Place;
use crate::models::trip::PlanningRequest;

/// One scheduled stop within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitItem {
    pub place: Place,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Measured from the previous stop, or from the day's start
    /// location for the first stop of a day.
    pub distance_km_from_prev: f64,
    pub travel_minutes_from_prev: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub items: Vec<VisitItem>,
    pub total_travel_minutes: i64,
    pub total_entrance_fees: f64,
}

impl Day {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            items: Vec::new(),
            total_travel_minutes: 0,
            total_entrance_fees: 0.0,
        }
    }

    /// Recompute totals from the item list.
    pub fn finalize(mut self) -> Self {
        self.total_travel_minutes = self.items.iter().map(|i| i.travel_minutes_from_prev).sum();
        self.total_entrance_fees = self.items.iter().map(|i| i.place.entrance_fee).sum();
        self
    }

    /// Coordinates of the last stop, if the day has any.
    pub fn last_coordinates(&self) -> Option<crate::models::place::Coordinate> {
        self.items.last().map(|i| i.place.coordinates)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub days: Vec<Day>,
    pub total_days: usize,
    pub total_places: usize,
    pub total_travel_minutes: i64,
    pub total_fees: f64,
    /// Set when locked places pushed cumulative fees past the budget.
    pub over_budget: bool,
    pub request: PlanningRequest,
}

impl Itinerary {
    pub fn from_days(days: Vec<Day>, over_budget: bool, request: PlanningRequest) -> Self {
        let total_places = days.iter().map(|d| d.items.len()).sum();
        let total_travel_minutes = days.iter().map(|d| d.total_travel_minutes).sum();
        let total_fees = days.iter().map(|d| d.total_entrance_fees).sum();
        Self {
            total_days: days.len(),
            total_places,
            total_travel_minutes,
            total_fees,
            over_budget,
            days,
            request,
        }
    }
}

/// Planner output: the itinerary plus partial-success metadata.
/// Locked places that never fit the date range are listed here rather
/// than failing the whole plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTrip {
    pub itinerary: Itinerary,
    pub unplaced_locked_place_ids: Vec<String>,
}
