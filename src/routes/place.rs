use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use log::error;
use mongodb::{bson::doc, options::FindOptions, Client};
use std::sync::Arc;

use crate::db::mongo::{DB_NAME, PLACES_COLLECTION};
use crate::models::place::Place;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    limit: Option<u16>,
    city: Option<String>,
}

/*
    GET /api/place
*/
pub async fn get_places(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Place> =
        client.database(DB_NAME).collection(PLACES_COLLECTION);

    let mut options = FindOptions::default();
    if let Some(limit) = params.limit {
        options.limit = Some(limit.into());
    }
    let filter = match &params.city {
        Some(city) if !city.is_empty() => doc! { "city": city },
        _ => doc! {},
    };

    match collection.find(filter).with_options(options).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Place>>().await {
            Ok(places) => HttpResponse::Ok().json(places),
            Err(err) => {
                error!("Failed to collect places: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect places.")
            }
        },
        Err(err) => {
            error!("Failed to find places: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find places.")
        }
    }
}
