//! Seeds the default cash-flow catalog.
//!
//! Statuses, operation types and the categories/subcategories under them.
//! Entries that already exist (by name, ignoring case) are kept, so the
//! seeder can be run repeatedly.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use cashflow_core::catalog::{CatalogKind, CatalogService};
use cashflow_core::clock::{Clock, SystemClock};
use cashflow_core::validation::names_match;
use cashflow_db::CatalogRepository;
use cashflow_shared::AppConfig;
use cashflow_shared::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const STATUSES: [&str; 3] = ["Business", "Personal", "Tax"];

const OPERATION_TYPES: [&str; 2] = ["Top-up", "Write-off"];

/// Categories seeded under each operation type, with their subcategories.
const CATEGORIES: [(&str, &str, &[&str]); 2] = [
    ("Write-off", "Infrastructure", &["VPS", "Proxy"]),
    ("Write-off", "Marketing", &["Farpost", "Avito"]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let clock = SystemClock::from_timezone_name(&config.bookkeeping.timezone)
        .with_context(|| format!("Unknown timezone '{}'", config.bookkeeping.timezone))?;
    info!(timezone = %clock.timezone(), today = %clock.today(), "Bookkeeping clock ready");

    let db = cashflow_db::connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let catalog = CatalogService::new(Arc::new(CatalogRepository::new(db)));
    let created = seed(&catalog).await?;

    info!(created, "Seeding complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Seeds the default catalog, returning how many entries were created.
async fn seed(catalog: &CatalogService) -> anyhow::Result<usize> {
    let mut created = 0;

    for name in STATUSES {
        created += usize::from(ensure(catalog, CatalogKind::Status, name, None).await?.1);
    }

    for name in OPERATION_TYPES {
        created += usize::from(
            ensure(catalog, CatalogKind::OperationType, name, None)
                .await?
                .1,
        );
    }

    for (operation_type, category, subcategories) in CATEGORIES {
        let (operation_type_id, _) =
            ensure(catalog, CatalogKind::OperationType, operation_type, None).await?;
        let (category_id, is_new) =
            ensure(catalog, CatalogKind::Category, category, Some(operation_type_id)).await?;
        created += usize::from(is_new);

        for subcategory in subcategories {
            let (_, is_new) =
                ensure(catalog, CatalogKind::SubCategory, subcategory, Some(category_id)).await?;
            created += usize::from(is_new);
        }
    }

    Ok(created)
}

/// Returns the id of the entry named `name`, creating it when missing.
/// The flag is true when the entry was created.
async fn ensure(
    catalog: &CatalogService,
    kind: CatalogKind,
    name: &str,
    parent_id: Option<Uuid>,
) -> anyhow::Result<(Uuid, bool)> {
    let existing = catalog.list(kind, parent_id).await?;
    if let Some(entry) = existing.iter().find(|entry| names_match(&entry.name, name)) {
        info!(kind = %kind, name, "Already present, skipping");
        return Ok((entry.id, false));
    }

    let entry = catalog
        .create(kind, name, parent_id)
        .await
        .with_context(|| format!("Failed to seed {kind} '{name}'"))?;
    Ok((entry.id, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_core::store::InMemoryStore;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let catalog = CatalogService::new(Arc::new(InMemoryStore::new()));

        assert_eq!(seed(&catalog).await.unwrap(), 3 + 2 + 2 + 4);
        assert_eq!(seed(&catalog).await.unwrap(), 0);

        let statuses = catalog.choices(CatalogKind::Status, None).await.unwrap();
        let names: Vec<_> = statuses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Business", "Personal", "Tax"]);
    }

    #[tokio::test]
    async fn test_seed_nests_subcategories() {
        let catalog = CatalogService::new(Arc::new(InMemoryStore::new()));
        seed(&catalog).await.unwrap();

        let marketing = catalog
            .list(CatalogKind::Category, None)
            .await
            .unwrap()
            .into_iter()
            .find(|entry| entry.name == "Marketing")
            .unwrap();
        let subcategories = catalog
            .choices(CatalogKind::SubCategory, Some(marketing.id))
            .await
            .unwrap();
        let names: Vec<_> = subcategories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Avito", "Farpost"]);
    }
}
