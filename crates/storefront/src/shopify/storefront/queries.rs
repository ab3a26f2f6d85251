//! GraphQL operation definitions for the Shopify Storefront API.
//!
//! Each operation lives in a snake_case module holding its `QUERY` document,
//! `OPERATION_NAME`, `Variables` and `ResponseData`, the same layout
//! `#[derive(GraphQLQuery)]` generates. A unit struct implementing
//! [`GraphQLQuery`] ties them together so `StorefrontClient::execute` stays
//! generic over operations.

use graphql_client::{GraphQLQuery, QueryBody};

pub mod cart;
pub mod catalog;
pub mod customer;

pub use cart::*;
pub use catalog::*;
pub use customer::*;

/// Declare the `GraphQLQuery` marker struct for an operation module.
macro_rules! storefront_operation {
    ($name:ident, $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// Products and shop
storefront_operation!(HighestPrice, highest_price);
storefront_operation!(SearchProducts, search_products);
storefront_operation!(ProductByHandle, product_by_handle);
storefront_operation!(ShopPolicies, shop_policies);

// Customer
storefront_operation!(CustomerAccessTokenCreate, customer_access_token_create);
storefront_operation!(CustomerAccessTokenRenew, customer_access_token_renew);
storefront_operation!(CustomerAccessTokenDelete, customer_access_token_delete);
storefront_operation!(GetCustomer, get_customer);

// Cart
storefront_operation!(CreateCart, create_cart);
storefront_operation!(GetCart, get_cart);
storefront_operation!(AddToCart, add_to_cart);
storefront_operation!(UpdateCartLines, update_cart_lines);
storefront_operation!(RemoveFromCart, remove_from_cart);
storefront_operation!(UpdateCartBuyerIdentity, update_cart_buyer_identity);

/// Fields shared by the response structs of several operations.
pub mod common {
    use rust_decimal::Decimal;
    use serde::Deserialize;

    use pocket_shop_core::{CurrencyCode, ImageId};

    /// `MoneyV2`.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyV2 {
        pub amount: Decimal,
        pub currency_code: CurrencyCode,
    }

    /// `Image`.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ImageFields {
        pub id: Option<ImageId>,
        pub url: String,
        pub alt_text: Option<String>,
    }

    /// A relay connection reduced to its nodes.
    #[derive(Debug, Clone, Deserialize)]
    pub struct Connection<T> {
        pub edges: Vec<Edge<T>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Edge<T> {
        pub node: T,
    }

    impl<T> Connection<T> {
        pub fn into_nodes(self) -> impl Iterator<Item = T> {
            self.edges.into_iter().map(|e| e.node)
        }
    }

    /// `UserError` / `CartUserError`.
    #[derive(Debug, Clone, Deserialize)]
    pub struct UserError {
        pub field: Option<Vec<String>>,
        pub message: String,
    }

    /// Join user error messages the way they are surfaced in `ShopifyError::UserError`.
    pub fn join_user_errors(errors: &[UserError]) -> String {
        errors
            .iter()
            .map(|e| match e.field.as_deref() {
                Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
                _ => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
