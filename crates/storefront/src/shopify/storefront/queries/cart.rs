//! Cart queries and mutations.
//!
//! Every operation selects the same `CartFields` fragment so a single
//! conversion handles all responses.

macro_rules! cart_fragment {
    () => {
        r"
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  buyerIdentity {
    customer { id }
  }
  cost {
    subtotalAmount { amount currencyCode }
    totalAmount { amount currencyCode }
  }
  lines(first: 100) {
    edges {
      node {
        __typename
        id
        quantity
        cost {
          totalAmount { amount currencyCode }
        }
        merchandise {
          ... on ProductVariant {
            id
            title
            price { amount currencyCode }
            image { id url altText }
            product { title handle }
          }
        }
      }
    }
  }
}
"
    };
}

/// The `CartFields` selection shared by every cart operation.
pub mod cart_fields {
    use serde::Deserialize;

    use pocket_shop_core::{CartId, CartLineId, CustomerId, VariantId};

    use super::super::common::{Connection, ImageFields, MoneyV2, UserError};

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartFields {
        pub id: CartId,
        pub checkout_url: String,
        pub total_quantity: i64,
        pub buyer_identity: BuyerIdentity,
        pub cost: CartCost,
        pub lines: Connection<CartLineNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct BuyerIdentity {
        pub customer: Option<CustomerRef>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerRef {
        pub id: CustomerId,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartCost {
        pub subtotal_amount: MoneyV2,
        pub total_amount: MoneyV2,
    }

    /// `BaseCartLine` interface; componentized bundle lines are skipped.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(tag = "__typename")]
    pub enum CartLineNode {
        CartLine(Box<CartLineFields>),
        #[serde(other)]
        Other,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CartLineFields {
        pub id: CartLineId,
        pub quantity: i64,
        pub cost: CartLineCost,
        pub merchandise: Merchandise,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartLineCost {
        pub total_amount: MoneyV2,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Merchandise {
        pub id: VariantId,
        pub title: String,
        pub price: MoneyV2,
        pub image: Option<ImageFields>,
        pub product: MerchandiseProduct,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MerchandiseProduct {
        pub title: String,
        pub handle: String,
    }

    /// Payload shape shared by every cart mutation.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartPayload {
        pub cart: Option<CartFields>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}

pub mod create_cart {
    use serde::{Deserialize, Serialize};

    pub use super::cart_fields::CartPayload;
    use crate::shopify::types::CartLineInput;

    pub const OPERATION_NAME: &str = "CreateCart";
    pub const QUERY: &str = concat!(
        r"
mutation CreateCart($input: CartInput!) {
  cartCreate(input: $input) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartInput {
        pub lines: Vec<CartLineInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub buyer_identity: Option<BuyerIdentityInput>,
    }

    #[derive(Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BuyerIdentityInput {
        pub customer_access_token: String,
    }

    impl std::fmt::Debug for BuyerIdentityInput {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("BuyerIdentityInput { customer_access_token: [REDACTED] }")
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartPayload>,
    }
}

pub mod get_cart {
    use serde::{Deserialize, Serialize};

    use pocket_shop_core::CartId;

    pub use super::cart_fields::CartFields;

    pub const OPERATION_NAME: &str = "GetCart";
    pub const QUERY: &str = concat!(
        r"
query GetCart($cartId: ID!) {
  cart(id: $cartId) { ...CartFields }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartFields>,
    }
}

pub mod add_to_cart {
    use serde::{Deserialize, Serialize};

    use pocket_shop_core::CartId;

    pub use super::cart_fields::CartPayload;
    use crate::shopify::types::CartLineInput;

    pub const OPERATION_NAME: &str = "AddToCart";
    pub const QUERY: &str = concat!(
        r"
mutation AddToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartPayload>,
    }
}

pub mod update_cart_lines {
    use serde::{Deserialize, Serialize};

    use pocket_shop_core::CartId;

    pub use super::cart_fields::CartPayload;
    use crate::shopify::types::CartLineUpdateInput;

    pub const OPERATION_NAME: &str = "UpdateCartLines";
    pub const QUERY: &str = concat!(
        r"
mutation UpdateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartPayload>,
    }
}

pub mod remove_from_cart {
    use serde::{Deserialize, Serialize};

    use pocket_shop_core::{CartId, CartLineId};

    pub use super::cart_fields::CartPayload;

    pub const OPERATION_NAME: &str = "RemoveFromCart";
    pub const QUERY: &str = concat!(
        r"
mutation RemoveFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub line_ids: Vec<CartLineId>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartPayload>,
    }
}

pub mod update_cart_buyer_identity {
    use serde::{Deserialize, Serialize};

    use pocket_shop_core::CartId;

    pub use super::cart_fields::CartPayload;
    pub use super::create_cart::BuyerIdentityInput;

    pub const OPERATION_NAME: &str = "UpdateCartBuyerIdentity";
    pub const QUERY: &str = concat!(
        r"
mutation UpdateCartBuyerIdentity($cartId: ID!, $buyerIdentity: CartBuyerIdentityInput!) {
  cartBuyerIdentityUpdate(cartId: $cartId, buyerIdentity: $buyerIdentity) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
",
        cart_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub buyer_identity: BuyerIdentityInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_buyer_identity_update: Option<CartPayload>,
    }
}
