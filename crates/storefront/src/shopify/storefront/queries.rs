//! GraphQL operation definitions for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`], with its
//! variables and response shape in a snake_case module of the same name.
//! Documents live in `graphql/storefront/queries/`; every operation in a file
//! shares that file's fragments, and Shopify picks the operation to run from
//! `operationName`.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::Deserialize;

macro_rules! operation {
    ($(#[$meta:meta])* $name:ident => $module:ident, $document:literal) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: include_str!(concat!(
                        env!("CARGO_MANIFEST_DIR"),
                        "/graphql/storefront/queries/",
                        $document
                    )),
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

// =============================================================================
// Shared response shapes
// =============================================================================

/// Relay-style connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: Option<PageInfoNode>,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoNode {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyNode {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeNode {
    pub min_variant_price: MoneyNode,
    pub max_variant_price: MoneyNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

// -----------------------------------------------------------------------------
// Cart
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub cost: CartCostNode,
    pub lines: Connection<CartLineNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostNode {
    pub subtotal_amount: MoneyNode,
    pub total_amount: MoneyNode,
    pub total_tax_amount: Option<MoneyNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineNode {
    pub id: String,
    pub quantity: i64,
    pub cost: CartLineCostNode,
    pub merchandise: MerchandiseNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostNode {
    pub subtotal_amount: MoneyNode,
}

/// `... on ProductVariant` selection of a line's merchandise.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseNode {
    pub id: String,
    pub title: String,
    pub sku: Option<String>,
    pub price: MoneyNode,
    pub product: MerchandiseProductNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseProductNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub images: Connection<ImageNode>,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<UserErrorNode>,
}

// -----------------------------------------------------------------------------
// Catalog
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub description: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub published_at: Option<String>,
    pub vendor: String,
    pub product_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub images: Connection<ImageNode>,
    pub variants: Connection<VariantNode>,
    pub price_range: PriceRangeNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub sku: Option<String>,
    pub price: MoneyNode,
    pub compare_at_price: Option<MoneyNode>,
    pub available_for_sale: bool,
    pub quantity_available: Option<i64>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOptionNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionNode {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub description: String,
    pub images: Connection<ImageNode>,
    pub price_range: PriceRangeNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub description: String,
    pub image: Option<ImageNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionWithProductsNode {
    #[serde(flatten)]
    pub collection: CollectionNode,
    pub products: Connection<ProductSummaryNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopNode {
    pub name: String,
    pub description: Option<String>,
    pub primary_domain: ShopDomainNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopDomainNode {
    pub url: String,
    pub host: String,
}

// =============================================================================
// Cart operations
// =============================================================================

operation!(
    /// `cartCreate` mutation.
    CreateCart => create_cart, "cart.graphql"
);

pub mod create_cart {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::CartLineInput as LineInput;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct CartInput {
        pub lines: Vec<LineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<super::CartPayload>,
    }
}

operation!(
    /// `cart(id:)` query.
    GetCart => get_cart, "cart.graphql"
);

pub mod get_cart {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<super::CartNode>,
    }
}

operation!(
    /// `cartLinesAdd` mutation.
    AddToCart => add_to_cart, "cart.graphql"
);

pub mod add_to_cart {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::CartLineInput;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<super::CartPayload>,
    }
}

operation!(
    /// `cartLinesUpdate` mutation.
    UpdateCartLines => update_cart_lines, "cart.graphql"
);

pub mod update_cart_lines {
    use serde::{Deserialize, Serialize};

    use crate::shopify::types::CartLineUpdateInput;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<super::CartPayload>,
    }
}

operation!(
    /// `cartLinesRemove` mutation.
    RemoveFromCart => remove_from_cart, "cart.graphql"
);

pub mod remove_from_cart {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub line_ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<super::CartPayload>,
    }
}

// =============================================================================
// Catalog operations
// =============================================================================

operation!(
    /// Paginated product listing.
    GetProducts => get_products, "products.graphql"
);

pub mod get_products {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: super::Connection<super::ProductNode>,
    }
}

operation!(
    /// Single product by handle.
    GetProductByHandle => get_product_by_handle, "products.graphql"
);

pub mod get_product_by_handle {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<super::ProductNode>,
    }
}

operation!(
    /// Paginated collection listing.
    GetCollections => get_collections, "collections.graphql"
);

pub mod get_collections {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: super::Connection<super::CollectionNode>,
    }
}

operation!(
    /// Single collection by handle, with one page of products.
    GetCollectionByHandle => get_collection_by_handle, "collections.graphql"
);

pub mod get_collection_by_handle {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<super::CollectionWithProductsNode>,
    }
}

operation!(
    /// Shop name, description and primary domain.
    GetShopInfo => get_shop_info, "shop.graphql"
);

pub mod get_shop_info {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: super::ShopNode,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::types::CartLineInput;
    use marquee_core::VariantId;

    #[test]
    fn test_build_query_names_operation() {
        let body = AddToCart::build_query(add_to_cart::Variables {
            cart_id: "gid://shopify/Cart/1".to_string(),
            lines: vec![CartLineInput::new(VariantId::from_numeric(2), 3)],
        });
        assert_eq!(body.operation_name, "AddToCart");
        assert!(body.query.contains("mutation AddToCart("));
        assert!(body.query.contains("fragment CartFields on Cart"));

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "AddToCart");
        assert_eq!(json["variables"]["cartId"], "gid://shopify/Cart/1");
        assert_eq!(
            json["variables"]["lines"][0]["merchandiseId"],
            "gid://shopify/ProductVariant/2"
        );
    }

    #[test]
    fn test_remove_variables_use_line_ids() {
        let body = RemoveFromCart::build_query(remove_from_cart::Variables {
            cart_id: "c".to_string(),
            line_ids: vec!["a".to_string(), "b".to_string()],
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["variables"]["lineIds"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_cart_payload_defaults_missing_user_errors() {
        let payload: CartPayload = serde_json::from_value(serde_json::json!({
            "cart": null
        }))
        .unwrap();
        assert!(payload.cart.is_none());
        assert!(payload.user_errors.is_empty());
    }
}
