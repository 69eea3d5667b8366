use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bson::doc;
use futures::TryStreamExt;
use log::{error, info};
use mongodb::{bson::oid::ObjectId, Client};
use std::sync::Arc;

use crate::db::mongo::{DB_NAME, PLACES_COLLECTION, TRIPS_COLLECTION};
use crate::models::error::PlanningError;
use crate::models::itinerary::PlannedTrip;
use crate::models::place::Place;
use crate::models::trip::{PlanningRequest, Trip};
use crate::services::distance_service::DistanceService;
use crate::services::planner_service::{plan, PlannerConfig};

/// User identity is supplied by the upstream gateway; authentication
/// itself is out of scope here.
fn user_id_from(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/*
    POST /api/trips/plan
*/
pub async fn plan_trip(
    data: web::Data<Arc<Client>>,
    estimator: web::Data<DistanceService>,
    config: web::Data<PlannerConfig>,
    input: web::Json<PlanningRequest>,
) -> Result<HttpResponse, PlanningError> {
    let request = input.into_inner();
    // Fail fast on malformed requests before touching the catalog.
    request.validate()?;

    let client = data.into_inner();
    let collection: mongodb::Collection<Place> =
        client.database(DB_NAME).collection(PLACES_COLLECTION);
    let catalog: Vec<Place> = collection.find(doc! {}).await?.try_collect().await?;

    info!(
        "planning '{}': {} catalog places, {} day(s)",
        request.trip_name,
        catalog.len(),
        request.day_count()
    );

    let planned = plan(request, catalog, &config, estimator.as_ref()).await?;
    Ok(HttpResponse::Ok().json(planned))
}

/*
    POST /api/trips
*/
pub async fn save_trip(
    req: HttpRequest,
    data: web::Data<Arc<Client>>,
    input: web::Json<PlannedTrip>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Trip> =
        client.database(DB_NAME).collection(TRIPS_COLLECTION);

    let planned = input.into_inner();
    let now = mongodb::bson::DateTime::now();
    let trip = Trip {
        id: None,
        user_id: user_id_from(&req),
        name: planned.itinerary.request.trip_name.clone(),
        planned,
        created_at: Some(now),
        updated_at: Some(now),
    };

    match collection.insert_one(&trip).await {
        Ok(result) => {
            let mut saved = trip;
            saved.id = result.inserted_id.as_object_id();
            HttpResponse::Ok().json(saved)
        }
        Err(err) => {
            error!("Failed to insert trip: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to save trip.")
        }
    }
}

/*
    GET /api/trips/user
*/
pub async fn get_user_trips(req: HttpRequest, data: web::Data<Arc<Client>>) -> impl Responder {
    let Some(user_id) = user_id_from(&req) else {
        return HttpResponse::BadRequest().body("Missing X-User-Id header");
    };

    let client = data.into_inner();
    let collection: mongodb::Collection<Trip> =
        client.database(DB_NAME).collection(TRIPS_COLLECTION);

    let cursor = collection
        .find(doc! { "user_id": &user_id })
        .sort(doc! { "created_at": -1 })
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Trip>>().await {
            Ok(trips) => HttpResponse::Ok().json(trips),
            Err(err) => {
                error!("Failed to collect trips: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect trips.")
            }
        },
        Err(err) => {
            error!("Failed to find trips: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find trips.")
        }
    }
}

/*
    PUT /api/trips/{id}
*/
pub async fn update_trip(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    input: web::Json<PlannedTrip>,
) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };
    let Some(user_id) = user_id_from(&req) else {
        return HttpResponse::BadRequest().body("Missing X-User-Id header");
    };

    let client = data.into_inner();
    let collection: mongodb::Collection<Trip> =
        client.database(DB_NAME).collection(TRIPS_COLLECTION);

    let filter = doc! { "_id": id, "user_id": &user_id };

    // Replace on top of the stored document so created_at and
    // ownership survive the update.
    let existing = match collection.find_one(filter.clone()).await {
        Ok(Some(trip)) => trip,
        Ok(None) => return HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            error!("Failed to load trip for update: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to update trip.");
        }
    };

    let trip = existing.with_updated_plan(input.into_inner());
    match collection.replace_one(filter, &trip).await {
        Ok(result) if result.matched_count > 0 => HttpResponse::Ok().json(trip),
        Ok(_) => HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            error!("Failed to update trip: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update trip.")
        }
    }
}

/*
    DELETE /api/trips/{id}
*/
pub async fn delete_trip(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };
    let Some(user_id) = user_id_from(&req) else {
        return HttpResponse::BadRequest().body("Missing X-User-Id header");
    };

    let client = data.into_inner();
    let collection: mongodb::Collection<Trip> =
        client.database(DB_NAME).collection(TRIPS_COLLECTION);

    match collection
        .delete_one(doc! { "_id": id, "user_id": &user_id })
        .await
    {
        Ok(result) if result.deleted_count > 0 => HttpResponse::Ok().body("Trip deleted"),
        Ok(_) => HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            error!("Failed to delete trip: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete trip.")
        }
    }
}
