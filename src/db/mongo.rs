use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

pub const DB_NAME: &str = "Trips";
pub const TRIPS_COLLECTION: &str = "Saved";
pub const PLACES_COLLECTION: &str = "Places";

pub async fn create_mongo_client(uri: &str) -> Arc<Client> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // Verify the connection up front; a failed ping is logged but not
    // fatal since planning works without persistence.
    match client
        .database(DB_NAME)
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await
    {
        Ok(_) => info!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            error!("Connected to MongoDB but ping test failed: {}", e);
            error!("Planning endpoints may still work, but trip persistence will be impaired");
        }
    }

    Arc::new(client)
}
