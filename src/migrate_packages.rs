//! Links members and subscriptions that only carry a legacy package name
//! to the matching package record.
//!
//! Each record is updated on its own; a failure is logged and the run
//! continues.

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use gymdesk_core::maintenance::match_package;
use gymdesk_db::{Repositories, create_pool};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Default)]
struct Tally {
    matched: usize,
    unmatched: usize,
    failed: usize,
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
    let repos = Repositories::postgres(create_pool(&database_url).await?);

    let packages = repos.packages.list_packages(true).await?;
    info!("Loaded {} packages", packages.len());

    let mut members = Tally::default();
    for member in repos.members.list_members_without_package().await? {
        let Some(name) = member.package_name.as_deref() else {
            continue;
        };
        let Some(package) = match_package(name, &packages) else {
            warn!("No package matches '{}' (member {})", name, member.id);
            members.unmatched += 1;
            continue;
        };
        match repos.members.set_member_package(member.id, package.id).await {
            Ok(_) => {
                info!("Member {}: '{}' -> {}", member.id, name, package.name);
                members.matched += 1;
            }
            Err(e) => {
                error!("Failed to update member {}: {}", member.id, e);
                members.failed += 1;
            }
        }
    }

    let mut subscriptions = Tally::default();
    for subscription in repos.subscriptions.list_subscriptions_without_package().await? {
        let name = subscription.package_name.as_str();
        let Some(package) = match_package(name, &packages) else {
            warn!("No package matches '{}' (subscription {})", name, subscription.id);
            subscriptions.unmatched += 1;
            continue;
        };
        match repos
            .subscriptions
            .set_subscription_package(subscription.id, package.id)
            .await
        {
            Ok(_) => subscriptions.matched += 1,
            Err(e) => {
                error!("Failed to update subscription {}: {}", subscription.id, e);
                subscriptions.failed += 1;
            }
        }
    }

    info!(
        "Members: {} matched, {} unmatched, {} failed",
        members.matched, members.unmatched, members.failed
    );
    info!(
        "Subscriptions: {} matched, {} unmatched, {} failed",
        subscriptions.matched, subscriptions.unmatched, subscriptions.failed
    );

    Ok(())
}
