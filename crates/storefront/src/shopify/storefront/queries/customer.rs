//! Customer access token mutations and the customer query.

/// `CustomerAccessToken` as returned by create and renew.
pub mod token {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerAccessToken {
        pub access_token: String,
        pub expires_at: DateTime<Utc>,
    }

    /// `CustomerUserError`, which carries a `CustomerErrorCode`.
    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerUserError {
        pub code: Option<String>,
        pub field: Option<Vec<String>>,
        pub message: String,
    }
}

pub mod customer_access_token_create {
    use serde::{Deserialize, Serialize};

    use super::token::{CustomerAccessToken, CustomerUserError};

    pub const OPERATION_NAME: &str = "CustomerAccessTokenCreate";
    pub const QUERY: &str = r"
mutation CustomerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
  customerAccessTokenCreate(input: $input) {
    customerAccessToken { accessToken expiresAt }
    customerUserErrors { code field message }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CustomerAccessTokenCreateInput,
    }

    #[derive(Clone, Serialize)]
    pub struct CustomerAccessTokenCreateInput {
        pub email: String,
        pub password: String,
    }

    impl std::fmt::Debug for CustomerAccessTokenCreateInput {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CustomerAccessTokenCreateInput")
                .field("email", &self.email)
                .field("password", &"[REDACTED]")
                .finish()
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_access_token_create: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub customer_access_token: Option<CustomerAccessToken>,
        #[serde(default)]
        pub customer_user_errors: Vec<CustomerUserError>,
    }
}

pub mod customer_access_token_renew {
    use serde::{Deserialize, Serialize};

    use super::super::common::UserError;
    use super::token::CustomerAccessToken;

    pub const OPERATION_NAME: &str = "CustomerAccessTokenRenew";
    pub const QUERY: &str = r"
mutation CustomerAccessTokenRenew($customerAccessToken: String!) {
  customerAccessTokenRenew(customerAccessToken: $customerAccessToken) {
    customerAccessToken { accessToken expiresAt }
    userErrors { field message }
  }
}
";

    #[derive(Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub customer_access_token: String,
    }

    impl std::fmt::Debug for Variables {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("Variables { customer_access_token: [REDACTED] }")
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_access_token_renew: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub customer_access_token: Option<CustomerAccessToken>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}

pub mod customer_access_token_delete {
    use serde::{Deserialize, Serialize};

    use super::super::common::UserError;
    pub use super::customer_access_token_renew::Variables;

    pub const OPERATION_NAME: &str = "CustomerAccessTokenDelete";
    pub const QUERY: &str = r"
mutation CustomerAccessTokenDelete($customerAccessToken: String!) {
  customerAccessTokenDelete(customerAccessToken: $customerAccessToken) {
    deletedAccessToken
    userErrors { field message }
  }
}
";

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_access_token_delete: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub deleted_access_token: Option<String>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}

pub mod get_customer {
    use serde::Deserialize;

    use pocket_shop_core::{AddressId, CustomerId, Email};

    pub use super::customer_access_token_renew::Variables;

    pub const OPERATION_NAME: &str = "GetCustomer";
    pub const QUERY: &str = r"
query GetCustomer($customerAccessToken: String!) {
  customer(customerAccessToken: $customerAccessToken) {
    id
    email
    firstName
    lastName
    displayName
    phone
    defaultAddress {
      id
      address1
      address2
      city
      province
      zip
      country
      phone
    }
  }
}
";

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<CustomerFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerFields {
        pub id: CustomerId,
        pub email: Option<Email>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub display_name: String,
        pub phone: Option<String>,
        pub default_address: Option<AddressFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct AddressFields {
        pub id: AddressId,
        pub address1: Option<String>,
        pub address2: Option<String>,
        pub city: Option<String>,
        pub province: Option<String>,
        pub zip: Option<String>,
        pub country: Option<String>,
        pub phone: Option<String>,
    }
}
