//! Order Intake - Validate, Record, Hand Off
//!
//! Submitting an order:
//! 1. rejects it before any write if no product is selected or a
//!    required field is blank
//! 2. records it in the order repository
//! 3. opens the messaging deep link
//!
//! Steps 2 and 3 are independent: a failed local save never blocks the
//! handoff, and a failed launch never un-records the order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use url::Url;

use super::orders::OrderRepository;
use crate::domain::message::MessageTemplate;
use crate::domain::order::{IntakeError, Order, OrderDraft};
use crate::domain::product::Product;
use crate::ports::messaging::LinkLauncher;

/// Result of an accepted order submission.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
  pub order: Order,
  /// The order reached local storage.
  pub persisted: bool,
  /// Deep link handed to the launcher.
  pub link: Url,
  /// The launcher reported success.
  pub launched: bool,
}

pub struct OrderIntake {
  orders: Arc<OrderRepository>,
  template: MessageTemplate,
  launcher: Arc<dyn LinkLauncher>,
}

impl OrderIntake {
  pub fn new(
    orders: Arc<OrderRepository>,
    template: MessageTemplate,
    launcher: Arc<dyn LinkLauncher>,
  ) -> Self {
    Self {
      orders,
      template,
      launcher,
    }
  }

  pub const fn template(&self) -> &MessageTemplate {
    &self.template
  }

  /// Submit an order for `selected`.
  #[instrument(skip_all)]
  pub async fn submit(
    &self,
    selected: Option<&Product>,
    draft: OrderDraft,
    now: DateTime<Utc>,
  ) -> Result<OrderReceipt, IntakeError> {
    let product = selected.ok_or(IntakeError::NoProductSelected)?;
    draft.validate()?;

    let order = draft.into_order(product, now);

    let persisted = match self.orders.upsert(&order).await {
      Ok(()) => true,
      Err(e) => {
        warn!(order_id = %order.id, error = %e, "Failed to save order, continuing to handoff");
        false
      }
    };

    let link = self.template.order_link(&order);
    let launched = match self.launcher.launch(&link) {
      Ok(()) => true,
      Err(e) => {
        warn!(order_id = %order.id, error = %e, "Failed to open messaging link");
        false
      }
    };

    info!(
      order_id = %order.id,
      product_id = %order.product_id,
      persisted,
      launched,
      "Order submitted"
    );

    Ok(OrderReceipt {
      order,
      persisted,
      link,
      launched,
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::adapters::persistence::{MemoryFlatStorage, MemoryStore};
  use crate::domain::message::{DEFAULT_LINK_BASE, DEFAULT_PHONE, DEFAULT_SIGNATURE};
  use crate::ports::store::Collection;
  use crate::usecases::migration::LegacyMigrator;

  #[derive(Default)]
  struct Recorder {
    links: Mutex<Vec<Url>>,
  }

  impl LinkLauncher for Recorder {
    fn launch(&self, link: &Url) -> anyhow::Result<()> {
      self.links.lock().unwrap().push(link.clone());
      Ok(())
    }
  }

  fn setup() -> (Arc<MemoryStore>, Arc<Recorder>, OrderIntake) {
    let store = Arc::new(MemoryStore::new());
    let migrator = Arc::new(LegacyMigrator::new(
      Arc::clone(&store) as _,
      Arc::new(MemoryFlatStorage::new()),
    ));
    let orders = Arc::new(OrderRepository::new(Arc::clone(&store) as _, migrator));
    let recorder = Arc::new(Recorder::default());
    let template = MessageTemplate::new(DEFAULT_LINK_BASE, DEFAULT_PHONE, DEFAULT_SIGNATURE).unwrap();
    let intake = OrderIntake::new(orders, template, Arc::clone(&recorder) as _);
    (store, recorder, intake)
  }

  fn draft() -> OrderDraft {
    OrderDraft {
      name: "Ali".to_string(),
      phone: "0750".to_string(),
      address: "Basra".to_string(),
      quantity: "2".to_string(),
      notes: String::new(),
    }
  }

  #[tokio::test]
  async fn test_no_selection_is_rejected_before_write() {
    let (store, recorder, intake) = setup();

    let err = intake.submit(None, draft(), Utc::now()).await.unwrap_err();

    assert_eq!(err, IntakeError::NoProductSelected);
    assert_eq!(store.count(Collection::Orders).await, 0);
    assert!(recorder.links.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_blank_field_is_rejected_before_write() {
    let (store, _, intake) = setup();
    let product = Product::new("p", "Serum", "hair", Utc::now());
    let mut d = draft();
    d.phone.clear();

    let err = intake.submit(Some(&product), d, Utc::now()).await.unwrap_err();

    assert_eq!(err, IntakeError::MissingField("phone"));
    assert_eq!(store.count(Collection::Orders).await, 0);
  }

  #[tokio::test]
  async fn test_accepted_order_is_saved_and_launched() {
    let (store, recorder, intake) = setup();
    let product = Product::new("p", "Serum", "hair", Utc::now());

    let receipt = intake.submit(Some(&product), draft(), Utc::now()).await.unwrap();

    assert!(receipt.persisted);
    assert!(receipt.launched);
    assert_eq!(receipt.order.product_title, "Serum");
    assert_eq!(store.count(Collection::Orders).await, 1);
    assert_eq!(recorder.links.lock().unwrap().as_slice(), [receipt.link]);
  }
}
