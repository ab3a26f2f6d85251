//! Cart type conversion functions.

use crate::shopify::ShopifyError;
use crate::shopify::types::{Cart, CartCost, CartLine, CartMerchandise};

use super::super::queries::cart_fields::{CartFields, CartLineNode, CartPayload};
use super::super::queries::common::join_user_errors;
use super::products::{convert_image, convert_money};

pub fn convert_cart(cart: CartFields) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
        customer_id: cart.buyer_identity.customer.map(|c| c.id),
        cost: CartCost {
            subtotal: convert_money(cart.cost.subtotal_amount),
            total: convert_money(cart.cost.total_amount),
        },
        lines: cart
            .lines
            .into_nodes()
            .filter_map(|node| match node {
                CartLineNode::CartLine(line) => Some(*line),
                CartLineNode::Other => None,
            })
            .map(|line| CartLine {
                id: line.id,
                quantity: line.quantity,
                total: convert_money(line.cost.total_amount),
                merchandise: CartMerchandise {
                    id: line.merchandise.id,
                    title: line.merchandise.title,
                    product_title: line.merchandise.product.title,
                    product_handle: line.merchandise.product.handle,
                    price: convert_money(line.merchandise.price),
                    image: line.merchandise.image.map(convert_image),
                },
            })
            .collect(),
    }
}

/// Unwrap a cart mutation payload; `action` names the mutation in the error
/// raised when Shopify returns neither a cart nor user errors.
pub fn convert_cart_payload(
    payload: Option<CartPayload>,
    action: &str,
) -> Result<Cart, ShopifyError> {
    let Some(payload) = payload else {
        return Err(ShopifyError::message(format!("Failed to {action}")));
    };

    if !payload.user_errors.is_empty() {
        return Err(ShopifyError::UserError(join_user_errors(
            &payload.user_errors,
        )));
    }

    payload
        .cart
        .map(convert_cart)
        .ok_or_else(|| ShopifyError::message(format!("Failed to {action}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart_json() -> serde_json::Value {
        serde_json::json!({
            "id": "gid://shopify/Cart/c1-abc?key=k",
            "checkoutUrl": "https://pocket.example/cart/c/c1-abc",
            "totalQuantity": 2,
            "buyerIdentity": { "customer": null },
            "cost": {
                "subtotalAmount": { "amount": "90.0", "currencyCode": "USD" },
                "totalAmount": { "amount": "90.0", "currencyCode": "USD" }
            },
            "lines": { "edges": [
                { "node": {
                    "__typename": "CartLine",
                    "id": "gid://shopify/CartLine/l1",
                    "quantity": 2,
                    "cost": { "totalAmount": { "amount": "90.0", "currencyCode": "USD" } },
                    "merchandise": {
                        "id": "gid://shopify/ProductVariant/11",
                        "title": "M",
                        "price": { "amount": "45.0", "currencyCode": "USD" },
                        "image": null,
                        "product": { "title": "Linen Shirt", "handle": "linen-shirt" }
                    }
                } },
                { "node": { "__typename": "ComponentizableCartLine", "id": "gid://shopify/CartLine/l2" } }
            ] }
        })
    }

    #[test]
    fn test_convert_cart_skips_bundle_lines() {
        let fields: CartFields = serde_json::from_value(cart_json()).unwrap();
        let cart = convert_cart(fields);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.total_quantity, 2);
        assert!(cart.customer_id.is_none());
        assert_eq!(
            cart.lines.first().unwrap().merchandise.product_handle,
            "linen-shirt"
        );
    }

    #[test]
    fn test_payload_user_errors() {
        let payload: CartPayload = serde_json::from_value(serde_json::json!({
            "cart": null,
            "userErrors": [{ "field": ["lines"], "message": "Merchandise does not exist" }]
        }))
        .unwrap();
        let err = convert_cart_payload(Some(payload), "add to cart").unwrap_err();
        assert_eq!(err.to_string(), "User error: lines: Merchandise does not exist");
    }

    #[test]
    fn test_missing_payload() {
        let err = convert_cart_payload(None, "create cart").unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Failed to create cart");
    }
}
