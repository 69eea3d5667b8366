pub mod error;
pub mod itinerary;
pub mod place;
pub mod trip;
