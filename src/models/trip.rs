use bson::oid::ObjectId;
use chrono::NaiveDate;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::error::PlanningError;
use crate::models::itinerary::PlannedTrip;
use crate::models::place::{GeoPoint, PlaceCategory};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub total: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    Standard,
    Packed,
}

impl Pace {
    /// Baseline stay duration per place for this pace, in minutes.
    pub fn base_stay_minutes(&self) -> i64 {
        match self {
            Pace::Relaxed => 120,
            Pace::Standard => 90,
            Pace::Packed => 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub pace: Pace,
    /// Empty means every category is acceptable.
    #[serde(default)]
    pub interests: Vec<PlaceCategory>,
    pub daily_start_hour: u32,
    pub daily_end_hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequest {
    pub trip_name: String,
    pub start_location: GeoPoint,
    pub start_date: NaiveDate,
    /// Inclusive; a one-day trip has start_date == end_date.
    pub end_date: NaiveDate,
    pub budget: Budget,
    pub preferences: Preferences,
    #[serde(default)]
    pub locked_place_ids: Vec<String>,
}

impl PlanningRequest {
    /// Number of days in the trip, inclusive of both endpoints.
    /// Non-positive when the range is inverted; `validate` rejects that.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        if self.day_count() < 1 {
            return Err(PlanningError::InputValidation(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        if self.preferences.daily_end_hour <= self.preferences.daily_start_hour {
            return Err(PlanningError::InputValidation(format!(
                "daily_end_hour ({}) must be after daily_start_hour ({})",
                self.preferences.daily_end_hour, self.preferences.daily_start_hour
            )));
        }
        if self.preferences.daily_end_hour > 24 {
            return Err(PlanningError::InputValidation(
                "daily_end_hour must be at most 24".to_string(),
            ));
        }
        if self.budget.total < 0.0 {
            return Err(PlanningError::InputValidation(
                "budget.total must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// A saved trip. Owned by the persistence layer; the planner only ever
/// produces the `PlannedTrip` value inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub planned: PlannedTrip,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

impl Trip {
    /// Replacement document for an update: new plan and name, fresh
    /// updated_at, original created_at and ownership kept.
    pub fn with_updated_plan(mut self, planned: PlannedTrip) -> Self {
        self.name = planned.itinerary.request.trip_name.clone();
        self.planned = planned;
        self.updated_at = Some(DateTime::now());
        self
    }
}
