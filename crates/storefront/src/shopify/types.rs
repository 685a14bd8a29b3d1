//! Domain types for Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw GraphQL
//! response shapes in `storefront::queries`. Connections are flattened into
//! plain vectors; everything else is carried over verbatim.

use marquee_core::{
    CartId, CartLineId, CollectionId, Price, PriceError, ProductId, VariantId,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Parse into a decimal [`Price`] for arithmetic or display.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount or currency code cannot be parsed.
    pub fn to_price(&self) -> Result<Price, PriceError> {
        Price::parse(&self.amount, &self.currency_code)
    }

    /// Display string in the storefront's French formatting, falling back to
    /// the raw amount and code if the value cannot be parsed.
    #[must_use]
    pub fn display(&self) -> String {
        self.to_price().map_or_else(
            |_| format!("{} {}", self.amount, self.currency_code),
            |price| price.format_fr(),
        )
    }
}

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

// =============================================================================
// Image Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Shopify image ID.
    pub id: Option<String>,
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Format", "Size").
    pub name: String,
    /// Selected value (e.g., "LP", "Large").
    pub value: String,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (combination of option values).
    pub title: String,
    /// SKU code.
    pub sku: Option<String>,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Quantity available (if inventory tracking enabled).
    pub quantity_available: Option<i64>,
    /// Selected options for this variant.
    pub selected_options: Vec<SelectedOption>,
}

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
    /// Publication timestamp.
    pub published_at: Option<String>,
    /// Vendor name.
    pub vendor: String,
    /// Product type/category (e.g., "Vinyl", "CD", "Clothes").
    #[serde(rename = "product_type")]
    pub kind: String,
    /// Product tags.
    pub tags: Vec<String>,
    /// Product images (first 10).
    pub images: Vec<Image>,
    /// Product variants (first 10).
    pub variants: Vec<ProductVariant>,
    /// Price range across variants.
    pub price_range: PriceRange,
}

/// Condensed product listed inside a collection page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// First product image.
    pub image: Option<Image>,
    /// Price range across variants.
    pub price_range: PriceRange,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection ID.
    pub id: CollectionId,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Collection image.
    pub image: Option<Image>,
}

/// A collection together with one page of its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionWithProducts {
    /// The collection itself.
    #[serde(flatten)]
    pub collection: Collection,
    /// Products in this page.
    pub products: Vec<ProductSummary>,
    /// Pagination info for the products.
    pub page_info: PageInfo,
}

// =============================================================================
// Shop Types
// =============================================================================

/// Primary domain of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopDomain {
    /// Full URL (e.g., `https://shop.example.com`).
    pub url: String,
    /// Host name.
    pub host: String,
}

/// Shop-level information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// Shop name.
    pub name: String,
    /// Shop description.
    pub description: Option<String>,
    /// Primary domain.
    pub primary_domain: ShopDomain,
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Pagination information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor for the first item.
    pub start_cursor: Option<String>,
    /// Cursor for the last item.
    pub end_cursor: Option<String>,
}

/// Paginated list of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConnection {
    /// Products in this page.
    pub products: Vec<Product>,
    /// Pagination info.
    pub page_info: PageInfo,
}

/// Paginated list of collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConnection {
    /// Collections in this page.
    pub collections: Vec<Collection>,
    /// Pagination info.
    pub page_info: PageInfo,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Parent product of a cart line's merchandise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandiseProduct {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Product handle.
    pub handle: String,
    /// First product image.
    pub image: Option<Image>,
}

/// Merchandise snapshot embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// SKU.
    pub sku: Option<String>,
    /// Unit price.
    pub price: Money,
    /// Parent product.
    pub product: CartMerchandiseProduct,
}

/// Cost for a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineCost {
    /// Subtotal for the whole line (unit price times quantity).
    pub subtotal_amount: Money,
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line ID.
    pub id: CartLineId,
    /// Quantity.
    pub quantity: i64,
    /// Line cost.
    pub cost: CartLineCost,
    /// Product variant.
    pub merchandise: CartMerchandise,
}

/// Cart cost summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCost {
    /// Subtotal before tax/shipping.
    #[serde(rename = "subtotal_amount")]
    pub subtotal: Money,
    /// Total amount.
    #[serde(rename = "total_amount")]
    pub total: Money,
    /// Total tax amount (absent until taxes are estimated).
    #[serde(rename = "total_tax_amount")]
    pub total_tax: Option<Money>,
}

/// A shopping cart.
///
/// Always an exact copy of what the Storefront API last returned; nothing in
/// this crate edits a cart locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Checkout URL.
    pub checkout_url: String,
    /// Total item quantity.
    pub total_quantity: i64,
    /// Cart cost summary.
    pub cost: CartCost,
    /// Cart lines, in the order Shopify returns them.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// IDs of every line in the cart.
    #[must_use]
    pub fn line_ids(&self) -> Vec<CartLineId> {
        self.lines.iter().map(|line| line.id.clone()).collect()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Input for adding a line to cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: VariantId,
    /// Quantity to add.
    pub quantity: i64,
}

impl CartLineInput {
    /// Build a line input for a variant.
    #[must_use]
    pub const fn new(merchandise_id: VariantId, quantity: i64) -> Self {
        Self {
            merchandise_id,
            quantity,
        }
    }
}

/// Input for updating a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Cart line ID.
    pub id: CartLineId,
    /// New quantity (zero removes the line).
    pub quantity: i64,
}

/// User error from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUserError {
    /// Field path that caused the error.
    pub field: Option<Vec<String>>,
    /// Human-readable error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(amount: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: "EUR".to_string(),
        }
    }

    #[test]
    fn test_money_display() {
        assert_eq!(money("25.0").display(), "25,00\u{a0}€");
    }

    #[test]
    fn test_money_display_falls_back_on_unknown_currency() {
        let m = Money {
            amount: "5.00".to_string(),
            currency_code: "XTS".to_string(),
        };
        assert_eq!(m.display(), "5.00 XTS");
    }

    #[test]
    fn test_line_input_serializes_camel_case() {
        let input = CartLineInput::new(VariantId::from_numeric(1), 2);
        let json = serde_json::to_value(&input).unwrap_or_default();
        assert_eq!(json["merchandiseId"], "gid://shopify/ProductVariant/1");
        assert_eq!(json["quantity"], 2);
    }
}
