//! Cart type conversion functions.

use marquee_core::{CartId, CartLineId, ProductId, VariantId};

use crate::shopify::types::{
    Cart, CartCost, CartLine, CartLineCost, CartMerchandise, CartMerchandiseProduct,
    CartUserError,
};

use super::super::queries::{CartLineNode, CartNode, MerchandiseNode, UserErrorNode};
use super::{convert_money, first_image};

/// Convert a cart exactly as returned, keeping line order.
pub fn convert_cart(cart: CartNode) -> Cart {
    Cart {
        id: CartId::new(cart.id),
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
        cost: CartCost {
            subtotal: convert_money(cart.cost.subtotal_amount),
            total: convert_money(cart.cost.total_amount),
            total_tax: cart.cost.total_tax_amount.map(convert_money),
        },
        lines: cart.lines.into_nodes().map(convert_cart_line).collect(),
    }
}

fn convert_cart_line(line: CartLineNode) -> CartLine {
    CartLine {
        id: CartLineId::new(line.id),
        quantity: line.quantity,
        cost: CartLineCost {
            subtotal_amount: convert_money(line.cost.subtotal_amount),
        },
        merchandise: convert_merchandise(line.merchandise),
    }
}

fn convert_merchandise(v: MerchandiseNode) -> CartMerchandise {
    CartMerchandise {
        id: VariantId::new(v.id),
        title: v.title,
        sku: v.sku,
        price: convert_money(v.price),
        product: CartMerchandiseProduct {
            id: ProductId::new(v.product.id),
            title: v.product.title,
            handle: v.product.handle,
            image: first_image(v.product.images),
        },
    }
}

pub fn convert_user_errors(errors: Vec<UserErrorNode>) -> Vec<CartUserError> {
    errors
        .into_iter()
        .map(|e| CartUserError {
            field: e.field,
            message: e.message,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart_json() -> serde_json::Value {
        serde_json::json!({
            "id": "gid://shopify/Cart/abc?key=1",
            "checkoutUrl": "https://shop.example/cart/c/abc",
            "totalQuantity": 3,
            "cost": {
                "subtotalAmount": {"amount": "60.0", "currencyCode": "EUR"},
                "totalAmount": {"amount": "60.0", "currencyCode": "EUR"},
                "totalTaxAmount": null
            },
            "lines": {"edges": [
                {"node": {
                    "id": "gid://shopify/CartLine/2",
                    "quantity": 1,
                    "cost": {"subtotalAmount": {"amount": "20.0", "currencyCode": "EUR"}},
                    "merchandise": {
                        "id": "gid://shopify/ProductVariant/9",
                        "title": "LP",
                        "sku": null,
                        "price": {"amount": "20.0", "currencyCode": "EUR"},
                        "product": {
                            "id": "gid://shopify/Product/7",
                            "title": "Blue Train",
                            "handle": "blue-train",
                            "images": {"edges": []}
                        }
                    }
                }},
                {"node": {
                    "id": "gid://shopify/CartLine/1",
                    "quantity": 2,
                    "cost": {"subtotalAmount": {"amount": "40.0", "currencyCode": "EUR"}},
                    "merchandise": {
                        "id": "gid://shopify/ProductVariant/8",
                        "title": "CD",
                        "sku": "BT-CD",
                        "price": {"amount": "20.0", "currencyCode": "EUR"},
                        "product": {
                            "id": "gid://shopify/Product/7",
                            "title": "Blue Train",
                            "handle": "blue-train",
                            "images": {"edges": [{"node": {
                                "id": "img1",
                                "url": "https://cdn.example/bt.jpg",
                                "altText": null,
                                "width": 600,
                                "height": 600
                            }}]}
                        }
                    }
                }}
            ]}
        })
    }

    #[test]
    fn test_convert_cart_keeps_line_order() {
        let node: CartNode = serde_json::from_value(cart_json()).unwrap();
        let cart = convert_cart(node);

        assert_eq!(cart.id.as_str(), "gid://shopify/Cart/abc?key=1");
        assert_eq!(cart.total_quantity, 3);
        assert!(cart.cost.total_tax.is_none());
        assert_eq!(
            cart.line_ids(),
            vec![
                CartLineId::new("gid://shopify/CartLine/2"),
                CartLineId::new("gid://shopify/CartLine/1"),
            ]
        );
        assert!(cart.lines[0].merchandise.product.image.is_none());
        assert_eq!(
            cart.lines[1].merchandise.product.image.as_ref().map(|i| i.url.as_str()),
            Some("https://cdn.example/bt.jpg")
        );
        assert_eq!(cart.lines[1].merchandise.sku.as_deref(), Some("BT-CD"));
    }
}
