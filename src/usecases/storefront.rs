//! Storefront - Session Controller
//!
//! Owns everything one session needs: repositories, admin gate, view
//! state, order intake, and the currently loaded product set. The
//! renderer reads a `StorefrontView` snapshot and calls back into the
//! controller for every user action; there is no global state.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::admin::AdminSession;
use super::catalog::CatalogRepository;
use super::intake::{OrderIntake, OrderReceipt};
use super::orders::OrderRepository;
use super::view::ViewState;
use crate::domain::filter::CategoryFilter;
use crate::domain::order::{IntakeError, Order, OrderDraft};
use crate::domain::product::{Product, ProductDraft, ProductFormError, ProductId};
use crate::ports::flat_storage::FlatStorageError;
use crate::ports::prompt::Confirm;
use crate::ports::store::StoreError;

/// Question asked before deleting one product.
pub const DELETE_PRODUCT_QUESTION: &str = "هل أنت متأكد من حذف هذا المنتج؟";
/// Question asked before deleting every product.
pub const CLEAR_PRODUCTS_QUESTION: &str =
  "هل أنت متأكد من حذف جميع المنتجات؟ لا يمكن التراجع عن هذا الإجراء.";
/// Question asked before deleting one order.
pub const DELETE_ORDER_QUESTION: &str = "هل أنت متأكد من حذف هذا الطلب من السجل؟";

/// Failure of a storefront action. State is left unchanged.
#[derive(Debug, Error)]
pub enum StorefrontError {
  #[error(transparent)]
  Store(#[from] StoreError),
  #[error(transparent)]
  FlatStorage(#[from] FlatStorageError),
  #[error(transparent)]
  ProductForm(#[from] ProductFormError),
  #[error(transparent)]
  Intake(#[from] IntakeError),
  #[error("admin mode is required for this action")]
  AdminRequired,
  #[error("product `{0}` is not in the catalog")]
  UnknownProduct(ProductId),
}

/// Everything the renderer needs for one render cycle.
#[derive(Debug, Clone)]
pub struct StorefrontView {
  /// Products passing the active filter, in store order.
  pub products: Vec<Product>,
  /// Every distinct category in the loaded catalog, in first-seen order.
  pub categories: Vec<String>,
  pub filter: CategoryFilter,
  /// Order history, newest first. Empty unless in admin mode.
  pub orders: Vec<Order>,
  pub is_admin: bool,
  pub selected: Option<Product>,
  pub editing: Option<ProductId>,
}

impl StorefrontView {
  /// Whether the renderer should show the "no products" message.
  pub fn is_empty(&self) -> bool {
    self.products.is_empty()
  }
}

/// Session-scoped controller.
pub struct Storefront {
  catalog: CatalogRepository,
  orders: Arc<OrderRepository>,
  intake: OrderIntake,
  admin: AdminSession,
  view: ViewState,
  products: Vec<Product>,
  order_history: Vec<Order>,
  startup_product: Option<ProductId>,
}

impl Storefront {
  pub fn new(
    catalog: CatalogRepository,
    orders: Arc<OrderRepository>,
    intake: OrderIntake,
    admin: AdminSession,
  ) -> Self {
    Self {
      catalog,
      orders,
      intake,
      admin,
      view: ViewState::new(),
      products: Vec::new(),
      order_history: Vec::new(),
      startup_product: None,
    }
  }

  /// Pre-select `product_id` on the next `load()` (the `productId` link
  /// parameter). Consumed once.
  #[must_use]
  pub fn with_startup_product(mut self, product_id: Option<ProductId>) -> Self {
    self.startup_product = product_id;
    self
  }

  /// Load products (migrate, seed, repair) and, in admin mode, orders.
  ///
  /// On failure the previously loaded state is kept.
  #[instrument(skip(self))]
  pub async fn load(&mut self) -> Result<(), StorefrontError> {
    self.products = self.catalog.list().await.inspect_err(|e| {
      error!(error = %e, "Failed to load products");
    })?;

    if let Some(id) = self.startup_product.take() {
      self.view.select_product(&self.products, &id);
    } else if let Some(id) = self.view.selected().map(|p| p.id.clone()) {
      self.view.select_product(&self.products, &id);
    }

    self.refresh_orders().await?;

    info!(products = self.products.len(), "Storefront loaded");
    Ok(())
  }

  /// Render snapshot for the current state.
  pub fn snapshot(&self) -> StorefrontView {
    let mut categories: Vec<String> = Vec::new();
    for product in &self.products {
      if !categories.contains(&product.category) {
        categories.push(product.category.clone());
      }
    }

    StorefrontView {
      products: self.view.visible(&self.products),
      categories,
      filter: self.view.filter().clone(),
      orders: self.order_history.clone(),
      is_admin: self.admin.is_admin(),
      selected: self.view.selected().cloned(),
      editing: self.view.editing().map(str::to_string),
    }
  }

  /// All loaded products, unfiltered.
  pub fn products(&self) -> &[Product] {
    &self.products
  }

  pub const fn intake(&self) -> &OrderIntake {
    &self.intake
  }

  pub fn set_filter(&mut self, filter: impl Into<CategoryFilter>) {
    self.view.set_filter(filter);
  }

  /// Select a product for ordering. Unknown ids clear the selection.
  pub fn select_product(&mut self, id: &str) -> Option<&Product> {
    self.view.select_product(&self.products, id)
  }

  /// Open `id` in the admin edit form.
  pub fn begin_edit(&mut self, id: &str) -> Result<(), StorefrontError> {
    self.require_admin()?;
    if self.view.begin_edit(&self.products, id) {
      Ok(())
    } else {
      Err(StorefrontError::UnknownProduct(id.to_string()))
    }
  }

  pub fn end_edit(&mut self) {
    self.view.end_edit();
  }

  /// Save the admin product form: insert, or update the edit target.
  #[instrument(skip(self, draft))]
  pub async fn submit_product(&mut self, draft: ProductDraft) -> Result<Product, StorefrontError> {
    self.require_admin()?;
    let product = self.view.build_product(draft, &self.products, Utc::now())?;
    self.catalog.upsert(&product).await?;
    self.view.end_edit();
    info!(id = %product.id, "Product saved");
    self.reload_after_write().await;
    Ok(product)
  }

  /// Delete one product after confirmation. Returns whether it ran.
  #[instrument(skip(self, confirm))]
  pub async fn delete_product(
    &mut self,
    id: &str,
    confirm: &dyn Confirm,
  ) -> Result<bool, StorefrontError> {
    self.require_admin()?;
    if !confirm.confirm(DELETE_PRODUCT_QUESTION) {
      return Ok(false);
    }
    self.catalog.remove(id).await?;
    self.reload_after_write().await;
    Ok(true)
  }

  /// Delete every product after confirmation. The reload reseeds.
  #[instrument(skip(self, confirm))]
  pub async fn clear_products(&mut self, confirm: &dyn Confirm) -> Result<bool, StorefrontError> {
    self.require_admin()?;
    if !confirm.confirm(CLEAR_PRODUCTS_QUESTION) {
      return Ok(false);
    }
    self.catalog.clear_all().await?;
    self.reload_after_write().await;
    Ok(true)
  }

  /// Submit an order for the selected product.
  ///
  /// The selection is cleared afterwards, like a reset order form. Once
  /// the order is handed off the receipt is always returned, even if the
  /// history refresh fails.
  #[instrument(skip(self, draft))]
  pub async fn submit_order(&mut self, draft: OrderDraft) -> Result<OrderReceipt, StorefrontError> {
    let receipt = self
      .intake
      .submit(self.view.selected(), draft, Utc::now())
      .await?;
    self.view.clear_selection();
    self.refresh_orders_after_write().await;
    Ok(receipt)
  }

  /// Delete one order after confirmation. Returns whether it ran.
  #[instrument(skip(self, confirm))]
  pub async fn delete_order(
    &mut self,
    id: &str,
    confirm: &dyn Confirm,
  ) -> Result<bool, StorefrontError> {
    self.require_admin()?;
    if !confirm.confirm(DELETE_ORDER_QUESTION) {
      return Ok(false);
    }
    self.orders.remove(id).await?;
    self.refresh_orders_after_write().await;
    Ok(true)
  }

  /// Try the admin password. `Ok(false)` on mismatch.
  pub async fn login(&mut self, password: &str) -> Result<bool, StorefrontError> {
    if !self.admin.try_login(password)? {
      return Ok(false);
    }
    self.refresh_orders_after_write().await;
    Ok(true)
  }

  /// Leave admin mode after confirmation and drop admin-only state.
  pub fn logout(&mut self, confirm: &dyn Confirm) -> Result<bool, StorefrontError> {
    if !self.admin.logout(confirm)? {
      return Ok(false);
    }
    self.order_history.clear();
    self.view.end_edit();
    Ok(true)
  }

  async fn refresh_orders(&mut self) -> Result<(), StorefrontError> {
    if self.admin.is_admin() {
      self.order_history = self.orders.list().await?;
    } else {
      self.order_history.clear();
    }
    Ok(())
  }

  /// Reload once a write has gone through. The write's outcome stands
  /// either way; a failed reload keeps the previous view.
  async fn reload_after_write(&mut self) {
    if let Err(e) = self.load().await {
      warn!(error = %e, "Reload after write failed, keeping previous view");
    }
  }

  async fn refresh_orders_after_write(&mut self) {
    if let Err(e) = self.refresh_orders().await {
      warn!(error = %e, "Order history refresh failed, keeping previous view");
    }
  }

  fn require_admin(&self) -> Result<(), StorefrontError> {
    if self.admin.is_admin() {
      Ok(())
    } else {
      Err(StorefrontError::AdminRequired)
    }
  }
}

#[cfg(test)]
mod tests {
  use url::Url;

  use super::*;
  use crate::adapters::persistence::{MemoryFlatStorage, MemoryStore};
  use crate::domain::message::MessageTemplate;
  use crate::domain::product::REQUIRED_PRODUCT_ID;
  use crate::ports::messaging::LinkLauncher;
  use crate::ports::prompt::Answer;
  use crate::ports::store::Collection;
  use crate::usecases::migration::LegacyMigrator;

  const SECRET: &str = "hbh71hbh";

  struct Discard;

  impl LinkLauncher for Discard {
    fn launch(&self, _link: &Url) -> anyhow::Result<()> {
      Ok(())
    }
  }

  fn storefront(store: &Arc<MemoryStore>) -> Storefront {
    let flat = Arc::new(MemoryFlatStorage::new());
    let migrator = Arc::new(LegacyMigrator::new(
      Arc::clone(store) as _,
      Arc::clone(&flat) as _,
    ));
    let catalog = CatalogRepository::new(Arc::clone(store) as _, Arc::clone(&migrator));
    let orders = Arc::new(OrderRepository::new(Arc::clone(store) as _, migrator));
    let template = MessageTemplate::new("https://wa.me", "123", "sig").unwrap();
    let intake = OrderIntake::new(Arc::clone(&orders), template, Arc::new(Discard));
    let admin = AdminSession::new(flat, SECRET);
    Storefront::new(catalog, orders, intake, admin)
  }

  fn order_draft() -> OrderDraft {
    OrderDraft {
      name: "n".to_string(),
      phone: "p".to_string(),
      address: "a".to_string(),
      quantity: "1".to_string(),
      notes: String::new(),
    }
  }

  fn product_draft(title: &str) -> ProductDraft {
    ProductDraft {
      title: title.to_string(),
      category: "creams".to_string(),
      ..ProductDraft::default()
    }
  }

  #[tokio::test]
  async fn test_load_and_filter() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    shop.load().await.unwrap();

    let view = shop.snapshot();
    assert_eq!(view.products.len(), 4);
    assert_eq!(view.categories.len(), 4);
    assert!(!view.is_admin);
    assert!(view.orders.is_empty());

    shop.set_filter("الشعر");
    assert_eq!(shop.snapshot().products.len(), 1);

    shop.set_filter("nothing here");
    assert!(shop.snapshot().is_empty());
  }

  #[tokio::test]
  async fn test_startup_product_is_selected_once() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store).with_startup_product(Some(REQUIRED_PRODUCT_ID.to_string()));
    shop.load().await.unwrap();
    assert_eq!(
      shop.snapshot().selected.map(|p| p.id).as_deref(),
      Some(REQUIRED_PRODUCT_ID)
    );
  }

  #[tokio::test]
  async fn test_stale_startup_product_selects_nothing() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store).with_startup_product(Some("deleted".to_string()));
    shop.load().await.unwrap();
    assert!(shop.snapshot().selected.is_none());
  }

  #[tokio::test]
  async fn test_order_requires_selection() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    shop.load().await.unwrap();

    let err = shop.submit_order(order_draft()).await.unwrap_err();
    assert!(matches!(err, StorefrontError::Intake(IntakeError::NoProductSelected)));
    assert_eq!(store.count(Collection::Orders).await, 0);
  }

  #[tokio::test]
  async fn test_order_flow_and_admin_history() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    shop.load().await.unwrap();

    shop.select_product("2");
    let receipt = shop.submit_order(order_draft()).await.unwrap();
    assert!(receipt.persisted);
    assert!(shop.snapshot().selected.is_none());
    assert!(shop.snapshot().orders.is_empty(), "history hidden outside admin mode");

    assert!(shop.login(SECRET).await.unwrap());
    let view = shop.snapshot();
    assert!(view.is_admin);
    assert_eq!(view.orders.len(), 1);

    let id = view.orders[0].id.clone();
    assert!(!shop.delete_order(&id, &Answer(false)).await.unwrap());
    assert!(shop.delete_order(&id, &Answer(true)).await.unwrap());
    assert!(shop.snapshot().orders.is_empty());
  }

  #[tokio::test]
  async fn test_crud_requires_admin() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    shop.load().await.unwrap();

    let err = shop.submit_product(product_draft("x")).await.unwrap_err();
    assert!(matches!(err, StorefrontError::AdminRequired));
    assert!(matches!(
      shop.delete_product("1", &Answer(true)).await,
      Err(StorefrontError::AdminRequired)
    ));
  }

  #[tokio::test]
  async fn test_edit_flow_updates_in_place() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    shop.load().await.unwrap();
    shop.login(SECRET).await.unwrap();

    shop.begin_edit(REQUIRED_PRODUCT_ID).unwrap();
    let saved = shop.submit_product(product_draft("Renamed")).await.unwrap();

    assert_eq!(saved.id, REQUIRED_PRODUCT_ID);
    assert_eq!(saved.image_data_url, "assets/care_collection_set.png");
    assert_eq!(shop.snapshot().editing, None);
    assert_eq!(shop.products().len(), 4);
    assert!(shop.products().iter().any(|p| p.title == "Renamed"));
  }

  #[tokio::test]
  async fn test_insert_then_delete() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    shop.load().await.unwrap();
    shop.login(SECRET).await.unwrap();

    let saved = shop.submit_product(product_draft("Fresh")).await.unwrap();
    assert_eq!(shop.products().len(), 5);

    assert!(shop.delete_product(&saved.id, &Answer(true)).await.unwrap());
    assert_eq!(shop.products().len(), 4);
  }

  #[tokio::test]
  async fn test_clear_reseeds() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    shop.load().await.unwrap();
    shop.login(SECRET).await.unwrap();
    shop.submit_product(product_draft("Fresh")).await.unwrap();

    assert!(!shop.clear_products(&Answer(false)).await.unwrap());
    assert_eq!(shop.products().len(), 5);

    assert!(shop.clear_products(&Answer(true)).await.unwrap());
    assert_eq!(shop.products().len(), 4);
  }

  #[tokio::test]
  async fn test_logout_drops_admin_state() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    shop.load().await.unwrap();
    shop.login(SECRET).await.unwrap();
    shop.begin_edit("1").unwrap();

    assert!(!shop.logout(&Answer(false)).unwrap());
    assert!(shop.snapshot().is_admin);

    assert!(shop.logout(&Answer(true)).unwrap());
    let view = shop.snapshot();
    assert!(!view.is_admin);
    assert_eq!(view.editing, None);
  }

  #[tokio::test]
  async fn test_wrong_password() {
    let store = Arc::new(MemoryStore::new());
    let mut shop = storefront(&store);
    assert!(!shop.login("wrong").await.unwrap());
    assert!(!shop.snapshot().is_admin);
  }
}
