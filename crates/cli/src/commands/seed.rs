//! Seed the product catalog.

use sheti_core::{Catalog, Language};
use sheti_server::db::ProductRepository;
use tracing::info;

use super::{CommandError, database_url};

/// Insert the built-in products with their Hindi and Marathi text.
///
/// Skips seeding when products already exist unless `force` is set; even
/// then, existing product ids are left untouched.
///
/// # Errors
///
/// Returns an error if the URL is missing or a database statement fails.
pub async fn catalog(force: bool) -> Result<(), CommandError> {
    let url = database_url()?;
    let pool = sheti_server::db::create_pool(&url).await?;
    let repo = ProductRepository::new(&pool);

    let existing = repo.count().await?;
    if existing > 0 && !force {
        info!(existing, "Products already present, nothing to seed (use --force)");
        return Ok(());
    }

    let seed = Catalog::seeded();
    let inserted = repo.seed(&seed).await?;

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");
    info!(
        "  Products skipped (already exist): {}",
        (seed.products(Language::En).len() as u64).saturating_sub(inserted)
    );
    Ok(())
}
