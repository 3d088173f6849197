//! Reports enquiries that share a mobile number. Exits with status 1 when
//! any duplicates are found so it can gate scripted imports.

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use gymdesk_core::maintenance::{DuplicateGroup, exact_duplicates, mobile_duplicates};
use gymdesk_db::{Repositories, create_pool};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

fn report(title: &str, groups: &[DuplicateGroup]) {
    if groups.is_empty() {
        info!("{}: none", title);
        return;
    }

    warn!("{}: {} groups", title, groups.len());
    for group in groups {
        let entries: Vec<String> = group
            .ids
            .iter()
            .zip(&group.names)
            .map(|(id, name)| format!("{} ({})", name, id))
            .collect();
        warn!("  {} -> {}", group.key, entries.join(", "));
    }
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

    let enquiries = repos.enquiries.all_enquiries().await?;
    info!("Checking {} enquiries", enquiries.len());

    let by_mobile = mobile_duplicates(&enquiries);
    let exact = exact_duplicates(&enquiries);
    report("Enquiries sharing a mobile number", &by_mobile);
    report("Exact name and mobile duplicates", &exact);

    if !by_mobile.is_empty() || !exact.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
