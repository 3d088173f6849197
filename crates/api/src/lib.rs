//! # GymDesk API
//!
//! The API crate provides the web server for GymDesk: the back-office
//! dashboard API under `/api/admin` and the member app API under
//! `/api/user`.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Authentication guards and error mapping
//! - **Services**: Clients for external systems (image hosting)
//! - **Config**: Environment configuration
//!
//! Handlers reach persistence only through [`gymdesk_db::Repositories`], so
//! the same router runs over PostgreSQL in production and over the
//! in-memory store in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Clients for external services
pub mod services;

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use eyre::Result;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use gymdesk_core::date_range::local_date;
use gymdesk_db::{DbPool, Repositories};

use crate::middleware::auth::{require_admin, require_member};
use crate::services::image_store::{CloudinaryImageStore, DisabledImageStore, ImageStore};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Handles to every collection
    pub repos: Repositories,
    /// Where uploaded logos and photos go
    pub images: Arc<dyn ImageStore>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// Timezone defining the gym's calendar day
    pub timezone: Tz,
}

impl ApiState {
    pub fn new(repos: Repositories, config: &config::ApiConfig) -> Self {
        let images: Arc<dyn ImageStore> = match &config.cloudinary {
            Some(cloudinary) => Arc::new(CloudinaryImageStore::new(cloudinary.clone())),
            None => {
                tracing::warn!("Cloudinary credentials not set; image uploads are disabled");
                Arc::new(DisabledImageStore)
            }
        };

        Self {
            repos,
            images,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_hours: config.jwt_expiry_hours,
            timezone: config.timezone,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Today's date in the gym's timezone.
    pub fn today(&self) -> NaiveDate {
        local_date(self.now(), self.timezone)
    }
}

/// Builds the complete router with authentication guards and request
/// tracing. CORS and timeouts are added by [`start_server`].
pub fn build_router(state: Arc<ApiState>) -> Router {
    let admin = Router::new()
        .merge(routes::auth::admin_routes())
        .merge(routes::dashboard::routes())
        .merge(routes::enquiry::routes())
        .merge(routes::follow_up::routes())
        .merge(routes::employee::routes())
        .merge(routes::member::routes())
        .merge(routes::package::routes())
        .merge(routes::gym::routes())
        .merge(routes::workout::routes())
        .merge(routes::diet::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let user = routes::user::routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        require_member,
    ));

    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Login endpoints for both clients
        .merge(routes::auth::public_routes())
        // Back-office dashboard
        .merge(admin)
        // Member app
        .merge(user)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Setup still missing from the store: the gym record and active packages.
pub async fn missing_setup(state: &ApiState) -> Result<Vec<&'static str>> {
    let mut missing = Vec::new();
    if state.repos.gym.get_gym_details().await?.is_none() {
        missing.push("gym details");
    }
    if state.repos.packages.list_packages(false).await?.is_empty() {
        missing.push("membership packages");
    }
    Ok(missing)
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = gymdesk_api::config::ApiConfig::from_env()?;
/// let db_pool = gymdesk_db::create_pool(&config.database_url).await?;
/// gymdesk_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(Repositories::postgres(db_pool), &config));
    for missing in missing_setup(&state).await? {
        tracing::warn!("No {} configured yet; run the seed tool", missing);
    }
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse())
            .collect::<Result<Vec<axum::http::HeaderValue>, _>>()
            .map_err(|e| eyre::eyre!("Invalid API_CORS_ORIGINS entry: {}", e))?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(config.request_timeout),
            ))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
