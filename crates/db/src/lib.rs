pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;

use std::sync::Arc;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::memory::MemoryStore;
use crate::repositories::{
    PgStore, admin::AdminRepository, attendance::AttendanceRepository, diet::DietPlanRepository,
    employee::EmployeeRepository, enquiry::EnquiryRepository, follow_up::FollowUpRepository,
    gym::GymRepository, member::MemberRepository, package::PackageRepository,
    subscription::SubscriptionRepository, water::WaterRepository, workout::WorkoutRepository,
};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Every store that implements all repository traits.
pub trait Store:
    AdminRepository
    + EnquiryRepository
    + FollowUpRepository
    + EmployeeRepository
    + MemberRepository
    + PackageRepository
    + SubscriptionRepository
    + AttendanceRepository
    + GymRepository
    + WorkoutRepository
    + DietPlanRepository
    + WaterRepository
    + 'static
{
}

impl<T> Store for T where
    T: AdminRepository
        + EnquiryRepository
        + FollowUpRepository
        + EmployeeRepository
        + MemberRepository
        + PackageRepository
        + SubscriptionRepository
        + AttendanceRepository
        + GymRepository
        + WorkoutRepository
        + DietPlanRepository
        + WaterRepository
        + 'static
{
}

/// Handles to each collection. Fields can be swapped individually, which is
/// how tests inject a failing mock for one collection.
#[derive(Clone)]
pub struct Repositories {
    pub admins: Arc<dyn AdminRepository>,
    pub enquiries: Arc<dyn EnquiryRepository>,
    pub follow_ups: Arc<dyn FollowUpRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub packages: Arc<dyn PackageRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub gym: Arc<dyn GymRepository>,
    pub workouts: Arc<dyn WorkoutRepository>,
    pub diet_plans: Arc<dyn DietPlanRepository>,
    pub water: Arc<dyn WaterRepository>,
}

impl Repositories {
    pub fn from_store<S: Store>(store: Arc<S>) -> Self {
        Self {
            admins: store.clone(),
            enquiries: store.clone(),
            follow_ups: store.clone(),
            employees: store.clone(),
            members: store.clone(),
            packages: store.clone(),
            subscriptions: store.clone(),
            attendance: store.clone(),
            gym: store.clone(),
            workouts: store.clone(),
            diet_plans: store.clone(),
            water: store,
        }
    }

    pub fn postgres(pool: DbPool) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)))
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::default()))
    }
}
