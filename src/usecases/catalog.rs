//! Catalog Repository - Typed Product Access
//!
//! Every `list()` runs the load pipeline:
//! 1. migrate the legacy "products" slot
//! 2. read all products
//! 3. seed defaults if the collection is empty
//! 4. re-insert the required care product if it is missing
//!
//! Step 4 is a standing repair, not a one-time seed: it runs on every load
//! (unless disabled in config) so a deleted or cleared care product comes
//! back.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use super::migration::LegacyMigrator;
use crate::domain::product::{Product, REQUIRED_PRODUCT_ID};
use crate::domain::seed::{required_product, seed_products};
use crate::ports::store::{
    Collection, PersistentStore, StoreError, decode_documents, encode_document,
};

/// Product access over the `products` collection.
pub struct CatalogRepository {
    store: Arc<dyn PersistentStore>,
    migrator: Arc<LegacyMigrator>,
    ensure_required: bool,
}

impl CatalogRepository {
    pub fn new(store: Arc<dyn PersistentStore>, migrator: Arc<LegacyMigrator>) -> Self {
        Self {
            store,
            migrator,
            ensure_required: true,
        }
    }

    /// Turn the required-product repair on or off.
    #[must_use]
    pub fn with_required_product(mut self, enabled: bool) -> Self {
        self.ensure_required = enabled;
        self
    }

    /// All products, after migration, seeding and repair.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        self.migrator.migrate(Collection::Products).await;

        // Seed on the raw document count: an entry that fails to decode
        // still means the collection is not empty.
        let mut documents = self.store.get_all(Collection::Products).await?;
        if documents.is_empty() {
            self.seed().await?;
            documents = self.store.get_all(Collection::Products).await?;
        }
        let mut products: Vec<Product> = decode_documents(Collection::Products, documents);

        if self.ensure_required && !products.iter().any(|p| p.id == REQUIRED_PRODUCT_ID) {
            self.upsert(&required_product(Utc::now())).await?;
            info!(id = REQUIRED_PRODUCT_ID, "Restored required product");
            products = self.read_all().await?;
        }

        Ok(products)
    }

    /// Insert or replace a product by id.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn upsert(&self, product: &Product) -> Result<(), StoreError> {
        let document = encode_document(&product.id, product)?;
        self.store
            .put(Collection::Products, &product.id, document)
            .await
    }

    /// Delete a product. Unknown ids are a no-op.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(Collection::Products, id).await
    }

    /// Delete every product. The next `list()` reseeds.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.store.clear(Collection::Products).await
    }

    async fn read_all(&self) -> Result<Vec<Product>, StoreError> {
        let documents = self.store.get_all(Collection::Products).await?;
        Ok(decode_documents(Collection::Products, documents))
    }

    async fn seed(&self) -> Result<(), StoreError> {
        let seeds = seed_products(Utc::now());
        for product in &seeds {
            self.upsert(product).await?;
        }
        info!(count = seeds.len(), "Seeded empty catalog");
        Ok(())
    }
}
