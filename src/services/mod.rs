pub mod budget_service;
pub mod day_scheduler;
pub mod distance_service;
pub mod planner_service;
