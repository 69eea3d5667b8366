//! Trip itinerary planning engine and its HTTP boundary.
//!
//! The planner turns a date range, start location, budget, pace, and
//! interest categories into a day-by-day itinerary, estimating travel
//! between stops through a routing provider with a haversine fallback.

pub mod db;
pub mod models;
pub mod routes;
pub mod services;
