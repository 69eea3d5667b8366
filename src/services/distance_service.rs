//! Distance/duration estimation with a routing-provider primary path
//! and a haversine fallback.
//!
//! The provider is an OSRM-style driving-route HTTP API. Every call is
//! bounded by a timeout; on error, timeout, or when no provider is
//! configured, estimation degrades to great-circle distance at an
//! assumed average driving speed. The fallback never fails and is
//! deterministic for fixed inputs, which is what the planner's tests
//! rely on.

use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;

use crate::models::place::Coordinate;

const EARTH_RADIUS_KM: f64 = 6371.0;
/// Assumed intra-city average driving speed for the fallback path.
pub const FALLBACK_SPEED_KMH: f64 = 30.0;
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// A point-to-point travel estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub distance_km: f64,
    pub travel_minutes: i64,
}

/// Strategy seam between the scheduler and whatever produces travel
/// estimates. Implementations must be pure with respect to their
/// inputs so a caching layer can wrap them without changing behavior.
pub trait DistanceEstimator: Send + Sync {
    fn estimate(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl std::future::Future<Output = Leg> + Send;
}

/// Great-circle distance between two points, in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

fn fallback_leg(from: Coordinate, to: Coordinate) -> Leg {
    let distance_km = haversine_km(from, to);
    let travel_minutes = (distance_km / FALLBACK_SPEED_KMH * 60.0).ceil() as i64;
    Leg {
        distance_km,
        travel_minutes,
    }
}

/// Fallback-only estimator. Also the stub of choice in tests since its
/// output depends on nothing but the coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineEstimator;

impl DistanceEstimator for HaversineEstimator {
    async fn estimate(&self, from: Coordinate, to: Coordinate) -> Leg {
        fallback_leg(from, to)
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<RouteLeg>,
}

#[derive(Debug, Deserialize)]
struct RouteLeg {
    distance: f64, // meters
    duration: f64, // seconds
}

/// Routing-provider-backed estimator. Created from environment
/// configuration; when `ROUTING_BASE_URL` is unset the service runs
/// fallback-only.
pub struct DistanceService {
    http_client: reqwest::Client,
    base_url: Option<String>,
}

impl DistanceService {
    pub fn from_env() -> Result<Self, reqwest::Error> {
        let base_url = std::env::var("ROUTING_BASE_URL").ok();
        let timeout_secs = std::env::var("ROUTING_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        if base_url.is_none() {
            warn!("ROUTING_BASE_URL not set; travel estimates use haversine fallback only");
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: Some(base_url),
        })
    }

    /// One point-to-point leg from the provider. The provider takes
    /// `lng,lat;lng,lat` waypoints and returns per-leg distance and
    /// duration; route geometry is not requested.
    async fn fetch_leg(
        &self,
        base_url: &str,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Leg, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=false",
            base_url, from.lng, from.lat, to.lng, to.lat
        );

        let response: RouteResponse = self.http_client.get(&url).send().await?.json().await?;

        if response.code != "Ok" {
            return Err(format!("routing provider returned code {}", response.code).into());
        }

        let leg = response
            .routes
            .first()
            .and_then(|r| r.legs.first())
            .ok_or("routing provider returned no legs")?;

        Ok(Leg {
            distance_km: leg.distance / 1000.0,
            travel_minutes: (leg.duration / 60.0).ceil() as i64,
        })
    }
}

impl DistanceEstimator for DistanceService {
    async fn estimate(&self, from: Coordinate, to: Coordinate) -> Leg {
        if let Some(base_url) = &self.base_url {
            match self.fetch_leg(base_url, from, to).await {
                Ok(leg) => return leg,
                Err(e) => {
                    // Provider trouble is recovered here, never surfaced
                    // to the planning request.
                    warn!(
                        "routing provider failed for ({:.4},{:.4})->({:.4},{:.4}): {}; using fallback",
                        from.lat, from.lng, to.lat, to.lng, e
                    );
                }
            }
        } else {
            debug!("no routing provider configured; using fallback estimate");
        }
        fallback_leg(from, to)
    }
}
