use mongodb::{Client, Database};
use rocket::fairing::AdHoc;
use log::{info, error};

use crate::services::{DynKycSource, MongoKycSource};

/// Connects to MongoDB and installs it as the dashboard's data source.
pub fn init() -> AdHoc {
    AdHoc::on_ignite("MongoDB", |rocket| async {
        match connect().await {
            Ok(database) => {
                info!("✓ MongoDB connected successfully");
                let source: DynKycSource = Box::new(MongoKycSource::new(database));
                rocket.manage(source)
            }
            Err(e) => {
                error!("✗ Failed to connect to MongoDB: {}", e);
                rocket
            }
        }
    })
}

async fn connect() -> Result<Database, mongodb::error::Error> {
    let uri = crate::config::Config::mongodb_uri();
    let client = Client::with_uri_str(&uri).await?;

    // Test connection
    client
        .database("admin")
        .run_command(mongodb::bson::doc! {"ping": 1}, None)
        .await?;

    Ok(client.database(&crate::config::Config::mongodb_database()))
}
