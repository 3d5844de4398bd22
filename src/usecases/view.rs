//! View State - Filter, Selection and Edit Target
//!
//! In-memory state for one session: the active category filter, the
//! product picked for ordering, and the product currently open in the
//! admin edit form. Nothing here is persisted.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::filter::{CategoryFilter, apply_filter};
use crate::domain::ids::timestamp_id;
use crate::domain::product::{Product, ProductDraft, ProductFormError, ProductId};

#[derive(Debug, Clone, Default)]
pub struct ViewState {
  filter: CategoryFilter,
  selected: Option<Product>,
  editing: Option<ProductId>,
}

impl ViewState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the active filter. `"all"` clears it.
  pub fn set_filter(&mut self, filter: impl Into<CategoryFilter>) {
    self.filter = filter.into();
    debug!(filter = %self.filter, "Filter changed");
  }

  pub const fn filter(&self) -> &CategoryFilter {
    &self.filter
  }

  /// `products` narrowed to the active filter.
  pub fn visible(&self, products: &[Product]) -> Vec<Product> {
    apply_filter(products, &self.filter)
  }

  /// Select the product with `id` from `products`.
  ///
  /// A stale id (deleted product, bad link) clears the selection.
  pub fn select_product(&mut self, products: &[Product], id: &str) -> Option<&Product> {
    self.selected = products.iter().find(|p| p.id == id).cloned();
    if self.selected.is_none() {
      debug!(id, "Selected product not found");
    }
    self.selected.as_ref()
  }

  pub fn clear_selection(&mut self) {
    self.selected = None;
  }

  pub const fn selected(&self) -> Option<&Product> {
    self.selected.as_ref()
  }

  /// Open `id` in the edit form. Returns `false` if it isn't loaded.
  pub fn begin_edit(&mut self, products: &[Product], id: &str) -> bool {
    if !products.iter().any(|p| p.id == id) {
      return false;
    }
    self.editing = Some(id.to_string());
    true
  }

  /// Close the edit form.
  pub fn end_edit(&mut self) {
    self.editing = None;
  }

  pub fn editing(&self) -> Option<&str> {
    self.editing.as_deref()
  }

  /// Build the product a form submission should save.
  ///
  /// With no edit target this is an insert with a fresh id. With an edit
  /// target the id is reused and, when the draft carries no new image,
  /// the previous image is kept.
  pub fn build_product(
    &self,
    draft: ProductDraft,
    current: &[Product],
    now: DateTime<Utc>,
  ) -> Result<Product, ProductFormError> {
    draft.validate()?;

    let (id, previous_image) = match &self.editing {
      Some(id) => (
        id.clone(),
        current
          .iter()
          .find(|p| p.id == *id)
          .map(|p| p.image_data_url.clone()),
      ),
      None => (timestamp_id(now), None),
    };

    let image = draft.image_data_url.or(previous_image).unwrap_or_default();

    Ok(
      Product::new(id, draft.title, draft.category, now)
        .with_description(draft.description)
        .with_image(image),
    )
  }
}
