pub mod health;
pub mod place;
pub mod trip;
