//! Creates the first admin account, the gym record and a starter set of
//! packages. Safe to run repeatedly; existing records are left alone.

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use gymdesk_api::{handlers::gym::generate_gym_code, middleware::auth::hash_password};
use gymdesk_core::models::{auth::Admin, gym::GymDetails, package::Package};
use gymdesk_db::{Repositories, create_pool, schema::initialize_database};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

const DEFAULT_PACKAGES: &[(&str, u32, f64)] = &[
    ("Monthly", 1, 1500.0),
    ("Quarterly", 3, 4000.0),
    ("Yearly", 12, 14000.0),
];

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

async fn seed_admin(repos: &Repositories) -> Result<()> {
    let email = std::env::var("SEED_ADMIN_EMAIL").wrap_err("SEED_ADMIN_EMAIL must be set")?;
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").wrap_err("SEED_ADMIN_PASSWORD must be set")?;

    if repos.admins.find_admin_by_email(&email).await?.is_some() {
        info!("Admin {} already exists, skipping", email);
        return Ok(());
    }

    let admin = Admin {
        id: Uuid::new_v4(),
        name: env_or("SEED_ADMIN_NAME", "Admin"),
        email,
        created_at: Utc::now(),
    };
    let created = repos
        .admins
        .create_admin(&admin, &hash_password(&password)?)
        .await?;
    info!("Created admin {}", created.email);

    Ok(())
}

async fn seed_gym(repos: &Repositories) -> Result<()> {
    if let Some(gym) = repos.gym.get_gym_details().await? {
        info!("Gym details for {} already exist, skipping", gym.name);
        return Ok(());
    }

    let gym = GymDetails {
        id: Uuid::new_v4(),
        name: env_or("SEED_GYM_NAME", "My Gym"),
        mobile: None,
        email: None,
        address: None,
        logo_url: None,
        gym_code: generate_gym_code(),
        updated_at: Utc::now(),
    };
    repos.gym.save_gym_details(&gym).await?;
    info!("Created gym details for {}", gym.name);

    Ok(())
}

async fn seed_packages(repos: &Repositories) -> Result<()> {
    if !repos.packages.list_packages(true).await?.is_empty() {
        info!("Packages already exist, skipping");
        return Ok(());
    }

    for (name, months, price) in DEFAULT_PACKAGES {
        let package = Package {
            id: Uuid::new_v4(),
            name: name.to_string(),
            duration_months: *months,
            price: *price,
            description: None,
            is_active: true,
            created_at: Utc::now(),
        };
        repos.packages.create_package(&package).await?;
    }
    info!("Created {} default packages", DEFAULT_PACKAGES.len());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").wrap_err("DATABASE_URL must be set")?;
    let db_pool = create_pool(&database_url).await?;
    initialize_database(&db_pool).await?;

    let repos = Repositories::postgres(db_pool);
    seed_admin(&repos).await?;
    seed_gym(&repos).await?;
    seed_packages(&repos).await?;

    info!("Seeding complete");
    Ok(())
}
