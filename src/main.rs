//! GymDesk server: the admin dashboard API and the member app API on one
//! listener.

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use gymdesk_api::config::ApiConfig;
use gymdesk_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env().wrap_err("Invalid GymDesk configuration")?;
    let db_pool = create_pool(&config.database_url)
        .await
        .wrap_err("Could not connect to the gym database")?;

    // Idempotent; run `seed` once afterwards for the admin, gym and packages
    initialize_database(&db_pool).await?;

    gymdesk_api::start_server(config, db_pool).await
}
