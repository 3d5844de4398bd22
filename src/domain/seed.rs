//! Default catalog content.
//!
//! `seed_products` populates an empty catalog once. `required_product` is
//! re-inserted on every load if missing.

use chrono::{DateTime, Utc};

use super::product::{Product, REQUIRED_PRODUCT_ID};

/// The products written when the catalog is first observed empty.
pub fn seed_products(now: DateTime<Utc>) -> Vec<Product> {
    vec![
        Product::new("1", "كريم مرطب فاخر", "كريمات", now)
            .with_description("كريم مرطب عميق للبشرة الجافة والحساسة، بخلاصة العسل."),
        Product::new("2", "سيروم للشعر", "الشعر", now)
            .with_description("سيروم مغذي ومقوي لبصيلات الشعر."),
        Product::new("3", "غسول الوجه الرغوي", "غسول", now)
            .with_description("ينظف البشرة بعمق ويزيل الشوائب."),
    ]
}

/// The care collection that must always be in the catalog.
pub fn required_product(now: DateTime<Utc>) -> Product {
    Product::new(
        REQUIRED_PRODUCT_ID,
        "مجموعة العناية المتكاملة",
        "مجموعة العناية",
        now,
    )
    .with_description(
        "مجموعة متكاملة للعناية بالبشرة، تحتوي على غسول، سيروم، كريم ليلي ونهاري لترطيب ونضارة فائقة.",
    )
    .with_image("assets/care_collection_set.png")
}
