//! Category filtering.

use std::fmt;

use super::product::Product;

/// Tag meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// The active category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive category match.
    Category(String),
}

impl CategoryFilter {
    /// Whether `product` passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => product.category == *category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(tag: &str) -> Self {
        if tag == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(tag.to_string())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Category(category) => f.write_str(category),
        }
    }
}

/// Products passing `filter`, in their original relative order.
pub fn apply_filter(products: &[Product], filter: &CategoryFilter) -> Vec<Product> {
    products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}
