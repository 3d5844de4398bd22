//! Order Repository - Typed Order Access
//!
//! Orders are written once and only ever deleted; there is no update
//! path beyond re-putting the same document. Listing migrates the legacy
//! "orders" slot first and returns newest first.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::migration::LegacyMigrator;
use crate::domain::order::Order;
use crate::ports::store::{
    Collection, PersistentStore, StoreError, decode_documents, encode_document,
};

/// Order access over the `orders` collection.
pub struct OrderRepository {
    store: Arc<dyn PersistentStore>,
    migrator: Arc<LegacyMigrator>,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn PersistentStore>, migrator: Arc<LegacyMigrator>) -> Self {
        Self { store, migrator }
    }

    /// All orders, newest `created_at` first.
    ///
    /// The sort is stable, so orders with equal timestamps keep the
    /// store's order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.migrator.migrate(Collection::Orders).await;

        let documents = self.store.get_all(Collection::Orders).await?;
        let mut orders: Vec<Order> = decode_documents(Collection::Orders, documents);
        sort_newest_first(&mut orders);

        debug!(count = orders.len(), "Loaded orders");
        Ok(orders)
    }

    #[instrument(skip(self, order), fields(id = %order.id))]
    pub async fn upsert(&self, order: &Order) -> Result<(), StoreError> {
        let document = encode_document(&order.id, order)?;
        self.store.put(Collection::Orders, &order.id, document).await
    }

    /// Delete an order. Unknown ids are a no-op.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(Collection::Orders, id).await
    }
}

/// Stable sort by creation time, newest first.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
