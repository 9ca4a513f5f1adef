//! Seed donation records from a YAML fixture.
//!
//! The fixture is parsed and validated before any database connection is
//! opened. See `voluntarios_api::db::seed` for the file format.

use std::path::Path;

use tracing::{error, info};

use voluntarios_api::config::ApiConfig;
use voluntarios_api::db::{self, DonationFixtures};

/// Seed donations, items, and receipts from a YAML file.
///
/// # Arguments
///
/// * `path` - Path to the YAML fixture
/// * `clear_existing` - If true, truncate the donation tables first
///
/// # Errors
///
/// Returns an error if configuration is missing, the file cannot be read or
/// parsed, validation fails, or database operations fail.
pub async fn donations(path: &Path, clear_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    info!(path = %path.display(), "Loading donation fixtures from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let fixtures: DonationFixtures = serde_yaml::from_str(&content)?;

    info!(donations = fixtures.donations.len(), "Parsed fixtures");

    let errors = db::validate_fixtures(&fixtures);
    if !errors.is_empty() {
        error!("Fixture validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let config = ApiConfig::from_env()?;
    let pool = db::create_pool(&config.database).await?;
    info!("Connected to database");

    info!(clear_existing, "Starting seeding process");
    let result = db::seed_donations(&pool, &fixtures, clear_existing).await?;

    info!(
        donations = result.donations,
        items = result.items,
        receipts = result.receipts,
        "Seeding complete"
    );
    Ok(())
}
