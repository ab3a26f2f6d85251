//! Customer and access token conversion functions.

use crate::shopify::types::{
    AccessToken, CredentialRejection, Customer, MailingAddress, RejectionCode, TokenGrant,
    TokenGrantResult,
};

use super::super::queries::customer::token::CustomerAccessToken;
use super::super::queries::get_customer;

/// Normalize a token mutation payload.
///
/// A payload without `customerAccessToken` is a rejection whether or not
/// Shopify explained why; the first error code classifies it.
pub fn convert_token_payload<I>(token: Option<CustomerAccessToken>, errors: I) -> TokenGrantResult
where
    I: IntoIterator<Item = (Option<String>, String)>,
{
    if let Some(token) = token {
        return Ok(TokenGrant {
            access_token: AccessToken::new(token.access_token),
            expires_at: token.expires_at,
        });
    }

    let mut code = None;
    let mut messages = Vec::new();
    for (error_code, message) in errors {
        if code.is_none() {
            code = Some(RejectionCode::from_api(error_code.as_deref()));
        }
        messages.push(message);
    }

    Err(CredentialRejection {
        code: code.unwrap_or(RejectionCode::Unidentified),
        messages,
    })
}

pub fn convert_customer(customer: get_customer::CustomerFields) -> Customer {
    Customer {
        id: customer.id,
        email: customer.email,
        first_name: customer.first_name,
        last_name: customer.last_name,
        display_name: customer.display_name,
        phone: customer.phone,
        default_address: customer.default_address.map(|a| MailingAddress {
            id: a.id,
            address1: a.address1,
            address2: a.address2,
            city: a.city,
            province: a.province,
            zip: a.zip,
            country: a.country,
            phone: a.phone,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_token_payload_grant() {
        let token = CustomerAccessToken {
            access_token: "tok".to_string(),
            expires_at: Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap(),
        };
        let grant = convert_token_payload(Some(token), Vec::new()).unwrap();
        assert_eq!(grant.access_token.expose(), "tok");
    }

    #[test]
    fn test_token_payload_rejection_uses_first_code() {
        let rejection = convert_token_payload(
            None,
            vec![
                (
                    Some("UNIDENTIFIED_CUSTOMER".to_string()),
                    "Unidentified customer".to_string(),
                ),
                (Some("INVALID".to_string()), "Email is invalid".to_string()),
            ],
        )
        .unwrap_err();
        assert_eq!(rejection.code, RejectionCode::Unidentified);
        assert_eq!(rejection.messages.len(), 2);
    }

    #[test]
    fn test_token_payload_without_token_or_errors_is_rejected() {
        let rejection = convert_token_payload(None, Vec::new()).unwrap_err();
        assert_eq!(rejection.code, RejectionCode::Unidentified);
        assert!(rejection.messages.is_empty());
    }
}
