//! Collection type conversion functions.

use marquee_core::{CollectionId, ProductId};

use crate::shopify::types::{
    Collection, CollectionConnection, CollectionWithProducts, ProductSummary,
};

use super::super::queries::{
    CollectionNode, CollectionWithProductsNode, Connection, ProductSummaryNode,
};
use super::{convert_image, convert_page_info, convert_price_range, first_image};

fn convert_collection(c: CollectionNode) -> Collection {
    Collection {
        id: CollectionId::new(c.id),
        handle: c.handle,
        title: c.title,
        description: c.description,
        image: c.image.map(convert_image),
    }
}

fn convert_product_summary(p: ProductSummaryNode) -> ProductSummary {
    ProductSummary {
        id: ProductId::new(p.id),
        handle: p.handle,
        title: p.title,
        description: p.description,
        image: first_image(p.images),
        price_range: convert_price_range(p.price_range),
    }
}

pub fn convert_collection_connection(conn: Connection<CollectionNode>) -> CollectionConnection {
    let Connection { edges, page_info } = conn;
    CollectionConnection {
        collections: edges
            .into_iter()
            .map(|e| convert_collection(e.node))
            .collect(),
        page_info: convert_page_info(page_info),
    }
}

pub fn convert_collection_with_products(c: CollectionWithProductsNode) -> CollectionWithProducts {
    let Connection { edges, page_info } = c.products;
    CollectionWithProducts {
        collection: convert_collection(c.collection),
        products: edges
            .into_iter()
            .map(|e| convert_product_summary(e.node))
            .collect(),
        page_info: convert_page_info(page_info),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_collection_connection_keeps_page_info() {
        let conn: Connection<CollectionNode> = serde_json::from_value(serde_json::json!({
            "edges": [
                {"node": {
                    "id": "gid://shopify/Collection/1",
                    "title": "Jazz",
                    "handle": "jazz",
                    "description": "",
                    "image": null
                }}
            ],
            "pageInfo": {
                "hasNextPage": true,
                "hasPreviousPage": false,
                "startCursor": "a",
                "endCursor": "b"
            }
        }))
        .unwrap();

        let converted = convert_collection_connection(conn);
        assert_eq!(converted.collections.len(), 1);
        assert_eq!(converted.collections[0].handle, "jazz");
        assert!(converted.page_info.has_next_page);
        assert_eq!(converted.page_info.end_cursor.as_deref(), Some("b"));
    }

    #[test]
    fn test_convert_collection_connection_without_page_info() {
        let conn: Connection<CollectionNode> =
            serde_json::from_value(serde_json::json!({"edges": []})).unwrap();

        let converted = convert_collection_connection(conn);
        assert!(converted.collections.is_empty());
        assert!(!converted.page_info.has_next_page);
        assert!(converted.page_info.end_cursor.is_none());
    }
}
