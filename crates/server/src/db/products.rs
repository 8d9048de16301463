//! Catalog storage.
//!
//! Price, image and supplier live in `products`; name and description live
//! in `product_translations`, one row per language.

use sqlx::{PgPool, Postgres, Transaction};

use sheti_core::{Catalog, Language, Money, Product, ProductDraft, ProductId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    language: String,
    name: String,
    description: String,
    price: Money,
    image: String,
    supplier_name: String,
}

/// Repository for the marketplace catalog.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the whole catalog, every language.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` for an unknown language code.
    pub async fn load_catalog(&self) -> Result<Catalog, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, t.language, t.name, t.description, p.price, p.image, p.supplier_name
            FROM products p
            JOIN product_translations t ON t.product_id = p.id
            ORDER BY p.id, t.language
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut catalog = Catalog::new();
        for row in rows {
            let lang = Language::from_code(&row.language).ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "unknown language '{}' for product {}",
                    row.language, row.id
                ))
            })?;
            catalog.push(
                lang,
                Product {
                    id: row.id,
                    name: row.name,
                    description: row.description,
                    price: row.price,
                    image: row.image,
                    supplier_name: row.supplier_name,
                },
            );
        }
        Ok(catalog)
    }

    /// Number of stored products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Store a product with the same text in every language.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is already taken.
    pub async fn insert(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        insert_product(&mut tx, product).await?;
        for lang in Language::ALL {
            upsert_translation(&mut tx, product.id, lang, &product.name, &product.description)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Overwrite a product's fields and its text in every language.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE products SET price = $2, image = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(draft.price)
        .bind(&draft.image)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        for lang in Language::ALL {
            upsert_translation(&mut tx, id, lang, &draft.name, &draft.description).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Delete a product and its translations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Insert every product of `catalog` that is not stored yet.
    ///
    /// Returns the number of products inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is inserted in that case.
    pub async fn seed(&self, catalog: &Catalog) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for product in catalog.products(Language::En) {
            let result = sqlx::query(
                r"
                INSERT INTO products (id, price, image, supplier_name)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO NOTHING
                ",
            )
            .bind(product.id)
            .bind(product.price)
            .bind(&product.image)
            .bind(&product.supplier_name)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                continue;
            }
            inserted += 1;

            for lang in Language::ALL {
                let localized = catalog.find(lang, product.id).unwrap_or(product);
                upsert_translation(
                    &mut tx,
                    product.id,
                    lang,
                    &localized.name,
                    &localized.description,
                )
                .await?;
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

async fn insert_product(
    tx: &mut Transaction<'_, Postgres>,
    product: &Product,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO products (id, price, image, supplier_name)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(product.id)
    .bind(product.price)
    .bind(&product.image)
    .bind(&product.supplier_name)
    .execute(&mut **tx)
    .await
    .map_err(|e| RepositoryError::from_insert(e, "product"))?;
    Ok(())
}

async fn upsert_translation(
    tx: &mut Transaction<'_, Postgres>,
    id: ProductId,
    lang: Language,
    name: &str,
    description: &str,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO product_translations (product_id, language, name, description)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (product_id, language)
        DO UPDATE SET name = EXCLUDED.name, description = EXCLUDED.description
        ",
    )
    .bind(id)
    .bind(lang.code())
    .bind(name)
    .bind(description)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
