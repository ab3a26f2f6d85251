//! Newtype wrappers for Shopify global IDs.
//!
//! Shopify identifies every resource with an opaque global ID string such as
//! `gid://shopify/Product/8123456789`. Use the `define_gid!` macro to create
//! wrappers that prevent mixing IDs of different resource types.
//!
//! Cart IDs carry a key suffix (`gid://shopify/Cart/abc123?key=...`); the
//! suffix is kept verbatim since the API requires it back.

/// Prefix shared by all Shopify global IDs.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a global ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The input does not start with `gid://shopify/`.
    #[error("not a Shopify global id: {0}")]
    NotAGid(String),
    /// The resource type segment does not match the expected type.
    #[error("expected a {expected} id, got {actual}")]
    WrongResource {
        /// Resource name the wrapper accepts.
        expected: &'static str,
        /// Resource name found in the input.
        actual: String,
    },
    /// The id segment after the resource type is empty.
    #[error("global id has an empty resource id")]
    EmptyId,
}

/// Split a global ID into its resource type and id segment.
///
/// # Errors
///
/// Returns an error if the prefix is missing or either segment is empty.
pub fn split_gid(s: &str) -> Result<(&str, &str), GidError> {
    let rest = s
        .strip_prefix(GID_PREFIX)
        .ok_or_else(|| GidError::NotAGid(s.to_owned()))?;
    let (resource, id) = rest
        .split_once('/')
        .ok_or_else(|| GidError::NotAGid(s.to_owned()))?;
    if id.is_empty() {
        return Err(GidError::EmptyId);
    }
    Ok((resource, id))
}

/// Macro to define a type-safe global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` validating the `gid://shopify/<Resource>/` prefix
/// - `as_str()` and `Display`
///
/// Deserialization does not re-validate: values coming from the API are
/// trusted, values coming from users go through `parse()`.
///
/// # Example
///
/// ```rust
/// # use pocket_shop_core::define_gid;
/// define_gid!(CollectionId, "Collection");
///
/// assert!(CollectionId::parse("gid://shopify/Collection/42").is_ok());
/// assert!(CollectionId::parse("gid://shopify/Product/42").is_err());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource type name for this ID.
            pub const RESOURCE: &'static str = $resource;

            /// Parse and validate a global ID for this resource type.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not a global ID of this resource type.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::GidError> {
                let (resource, _) = $crate::split_gid(s)?;
                if resource != Self::RESOURCE {
                    return Err($crate::GidError::WrongResource {
                        expected: Self::RESOURCE,
                        actual: resource.to_owned(),
                    });
                }
                Ok(Self(s.to_owned()))
            }

            /// Wrap an ID returned by the API without validation.
            #[must_use]
            pub fn from_api(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the global ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::GidError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");
define_gid!(CustomerId, "Customer");
define_gid!(CartId, "Cart");
define_gid!(CartLineId, "CartLine");
define_gid!(ImageId, "ProductImage");
define_gid!(AddressId, "MailingAddress");
