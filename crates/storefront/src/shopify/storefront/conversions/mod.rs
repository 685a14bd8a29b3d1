//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod collections;
pub mod products;

pub use cart::{convert_cart, convert_user_errors};
pub use collections::{convert_collection_connection, convert_collection_with_products};
pub use products::{convert_product, convert_product_connection, convert_shop};

use crate::shopify::types::{Image, Money, PageInfo, PriceRange};

use super::queries::{Connection, ImageNode, MoneyNode, PageInfoNode, PriceRangeNode};

// =============================================================================
// Shared conversions
// =============================================================================

fn convert_money(m: MoneyNode) -> Money {
    Money {
        amount: m.amount,
        currency_code: m.currency_code,
    }
}

fn convert_image(i: ImageNode) -> Image {
    Image {
        id: i.id,
        url: i.url,
        alt_text: i.alt_text,
        width: i.width,
        height: i.height,
    }
}

/// First image of an `images(first: N)` connection.
fn first_image(images: Connection<ImageNode>) -> Option<Image> {
    images.into_nodes().next().map(convert_image)
}

fn convert_price_range(p: PriceRangeNode) -> PriceRange {
    PriceRange {
        min_variant_price: convert_money(p.min_variant_price),
        max_variant_price: convert_money(p.max_variant_price),
    }
}

/// Page info of a connection, or an empty single page when it was not selected.
fn convert_page_info(p: Option<PageInfoNode>) -> PageInfo {
    p.map_or(
        PageInfo {
            has_next_page: false,
            has_previous_page: false,
            start_cursor: None,
            end_cursor: None,
        },
        |p| PageInfo {
            has_next_page: p.has_next_page,
            has_previous_page: p.has_previous_page,
            start_cursor: p.start_cursor,
            end_cursor: p.end_cursor,
        },
    )
}
