//! Product and shop conversion functions.

use marquee_core::{ProductId, VariantId};

use crate::shopify::types::{
    Product, ProductConnection, ProductVariant, SelectedOption, Shop, ShopDomain,
};

use super::super::queries::{Connection, ProductNode, ShopNode, VariantNode};
use super::{convert_image, convert_money, convert_page_info, convert_price_range};

pub fn convert_product(p: ProductNode) -> Product {
    Product {
        id: ProductId::new(p.id),
        handle: p.handle,
        title: p.title,
        description: p.description,
        created_at: p.created_at,
        updated_at: p.updated_at,
        published_at: p.published_at,
        vendor: p.vendor,
        kind: p.product_type,
        tags: p.tags,
        images: p.images.into_nodes().map(convert_image).collect(),
        variants: p.variants.into_nodes().map(convert_variant).collect(),
        price_range: convert_price_range(p.price_range),
    }
}

fn convert_variant(v: VariantNode) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(v.id),
        title: v.title,
        sku: v.sku,
        price: convert_money(v.price),
        compare_at_price: v.compare_at_price.map(convert_money),
        available_for_sale: v.available_for_sale,
        quantity_available: v.quantity_available,
        selected_options: v
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
    }
}

pub fn convert_product_connection(conn: Connection<ProductNode>) -> ProductConnection {
    let Connection { edges, page_info } = conn;
    ProductConnection {
        products: edges.into_iter().map(|e| convert_product(e.node)).collect(),
        page_info: convert_page_info(page_info),
    }
}

pub fn convert_shop(shop: ShopNode) -> Shop {
    Shop {
        name: shop.name,
        description: shop.description,
        primary_domain: ShopDomain {
            url: shop.primary_domain.url,
            host: shop.primary_domain.host,
        },
    }
}
