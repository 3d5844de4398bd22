//! Outbound messaging templates.
//!
//! Orders and product inquiries are handed off as a pre-filled chat deep
//! link (`<base>/<phone>?text=...`). The text layout is fixed; only the
//! recipient and the closing signature are configurable.

use url::Url;

use super::order::Order;
use super::product::Product;

/// Default deep-link base.
pub const DEFAULT_LINK_BASE: &str = "https://wa.me";
/// Default recipient phone, digits only.
pub const DEFAULT_PHONE: &str = "9647713390381";
/// Default closing line of an order message.
pub const DEFAULT_SIGNATURE: &str = "شركة روعة العسل Tech Tricks";

const NOTES_PLACEHOLDER: &str = "لا يوجد";
const SEPARATOR: &str = "—";
const INQUIRY_FOOTER: &str = "مرسل من موقع شركة روعة العسل";

/// Builds message text and deep links for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    recipient: Url,
    signature: String,
}

impl MessageTemplate {
    /// Template sending to `phone` via `base_url`.
    pub fn new(
        base_url: &str,
        phone: &str,
        signature: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        let recipient = Url::parse(&format!("{}/{phone}", base_url.trim_end_matches('/')))?;
        Ok(Self {
            recipient,
            signature: signature.into(),
        })
    }

    /// Text of a new-order message.
    pub fn order_text(&self, order: &Order) -> String {
        let notes = if order.notes.trim().is_empty() {
            NOTES_PLACEHOLDER
        } else {
            order.notes.as_str()
        };
        [
            "طلب حجز جديد ✅".to_string(),
            format!("👤 الاسم: {}", order.name),
            format!("📞 الهاتف: {}", order.phone),
            format!("📍 العنوان: {}", order.address),
            format!("📦 المنتج: {}", order.product_title),
            format!("🔢 العدد: {}", order.quantity),
            format!("🧴 التصنيف: {}", order.category),
            format!("📝 ملاحظات: {notes}"),
            SEPARATOR.to_string(),
            self.signature.clone(),
        ]
        .join("\n")
    }

    /// Text of a quick inquiry about a single product.
    pub fn inquiry_text(product: &Product) -> String {
        [
            "السلام عليكم 👋".to_string(),
            "أريد حجز المنتج التالي:".to_string(),
            format!("📦 المنتج: {}", product.title),
            format!("🧴 التصنيف: {}", product.category),
            SEPARATOR.to_string(),
            INQUIRY_FOOTER.to_string(),
        ]
        .join("\n")
    }

    /// Deep link carrying `text` as the pre-filled message.
    pub fn link(&self, text: &str) -> Url {
        let mut url = self.recipient.clone();
        url.query_pairs_mut().append_pair("text", text);
        url
    }

    pub fn order_link(&self, order: &Order) -> Url {
        self.link(&self.order_text(order))
    }

    pub fn inquiry_link(&self, product: &Product) -> Url {
        self.link(&Self::inquiry_text(product))
    }
}
