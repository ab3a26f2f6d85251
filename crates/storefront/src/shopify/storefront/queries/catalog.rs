//! Product, search and shop queries.

macro_rules! product_summary_fragment {
    () => {
        r"
fragment ProductSummaryFields on Product {
  id
  title
  handle
  productType
  availableForSale
  priceRange {
    minVariantPrice { amount currencyCode }
    maxVariantPrice { amount currencyCode }
  }
  images(first: 1) {
    edges { node { id url altText } }
  }
  variants(first: 1) {
    edges {
      node {
        id
        quantityAvailable
        price { amount currencyCode }
        compareAtPrice { amount currencyCode }
      }
    }
  }
}
"
    };
}

pub mod highest_price {
    use serde::{Deserialize, Serialize};

    use pocket_shop_core::{CountryCode, Language};

    use super::super::common::{Connection, MoneyV2};

    pub const OPERATION_NAME: &str = "HighestPrice";
    pub const QUERY: &str = r"
query HighestPrice($country: CountryCode, $language: LanguageCode)
@inContext(country: $country, language: $language) {
  products(first: 1, sortKey: PRICE, reverse: true) {
    edges {
      node {
        priceRange {
          maxVariantPrice { amount currencyCode }
        }
      }
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub country: CountryCode,
        pub language: Language,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ProductNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNode {
        pub price_range: PriceRange,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PriceRange {
        pub max_variant_price: MoneyV2,
    }
}

pub mod search_products {
    use serde::{Deserialize, Serialize};

    use pocket_shop_core::{CountryCode, Language, ProductId, VariantId};

    use super::super::common::{Connection, ImageFields, MoneyV2};

    pub const OPERATION_NAME: &str = "SearchProducts";
    pub const QUERY: &str = concat!(
        r"
query SearchProducts(
  $query: String!
  $first: Int!
  $after: String
  $sortKey: SearchSortKeys
  $reverse: Boolean
  $productFilters: [ProductFilter!]
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  search(
    query: $query
    first: $first
    after: $after
    sortKey: $sortKey
    reverse: $reverse
    productFilters: $productFilters
    types: PRODUCT
  ) {
    pageInfo { hasNextPage endCursor }
    edges {
      cursor
      node {
        __typename
        ... on Product { ...ProductSummaryFields }
      }
    }
  }
}
",
        product_summary_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub query: String,
        pub first: i64,
        pub after: Option<String>,
        pub sort_key: Option<String>,
        pub reverse: Option<bool>,
        pub product_filters: Option<Vec<ProductFilter>>,
        pub country: CountryCode,
        pub language: Language,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ProductFilter {
        pub price: PriceRangeFilter,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct PriceRangeFilter {
        pub min: Option<f64>,
        pub max: Option<f64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub search: SearchConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SearchConnection {
        pub page_info: PageInfo,
        pub edges: Vec<SearchEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageInfo {
        pub has_next_page: bool,
        pub end_cursor: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SearchEdge {
        pub cursor: String,
        pub node: SearchNode,
    }

    /// `SearchResultItem` union; only products are requested.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(tag = "__typename")]
    pub enum SearchNode {
        Product(Box<ProductSummaryFields>),
        #[serde(other)]
        Other,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductSummaryFields {
        pub id: ProductId,
        pub title: String,
        pub handle: String,
        pub product_type: String,
        pub available_for_sale: bool,
        pub price_range: PriceRange,
        pub images: Connection<ImageFields>,
        pub variants: Connection<VariantFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PriceRange {
        pub min_variant_price: MoneyV2,
        pub max_variant_price: MoneyV2,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantFields {
        pub id: VariantId,
        pub quantity_available: Option<i64>,
        pub price: MoneyV2,
        pub compare_at_price: Option<MoneyV2>,
    }
}

pub mod product_by_handle {
    use serde::{Deserialize, Serialize};

    use pocket_shop_core::{CountryCode, Language, ProductId, VariantId};

    use super::super::common::{Connection, ImageFields, MoneyV2};
    pub use super::search_products::PriceRange;

    pub const OPERATION_NAME: &str = "ProductByHandle";
    pub const QUERY: &str = r"
query ProductByHandle($handle: String!, $country: CountryCode, $language: LanguageCode)
@inContext(country: $country, language: $language) {
  product(handle: $handle) {
    id
    title
    handle
    description
    productType
    vendor
    availableForSale
    priceRange {
      minVariantPrice { amount currencyCode }
      maxVariantPrice { amount currencyCode }
    }
    images(first: 10) {
      edges { node { id url altText } }
    }
    variants(first: 50) {
      edges {
        node {
          id
          title
          availableForSale
          quantityAvailable
          price { amount currencyCode }
          compareAtPrice { amount currencyCode }
          selectedOptions { name value }
        }
      }
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
        pub country: CountryCode,
        pub language: Language,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductFields {
        pub id: ProductId,
        pub title: String,
        pub handle: String,
        pub description: String,
        pub product_type: String,
        pub vendor: String,
        pub available_for_sale: bool,
        pub price_range: PriceRange,
        pub images: Connection<ImageFields>,
        pub variants: Connection<VariantFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantFields {
        pub id: VariantId,
        pub title: String,
        pub available_for_sale: bool,
        pub quantity_available: Option<i64>,
        pub price: MoneyV2,
        pub compare_at_price: Option<MoneyV2>,
        pub selected_options: Vec<SelectedOption>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SelectedOption {
        pub name: String,
        pub value: String,
    }
}

pub mod shop_policies {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "ShopPolicies";
    pub const QUERY: &str = r"
query ShopPolicies {
  shop {
    name
    termsOfService { url }
    privacyPolicy { url }
  }
}
";

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Shop {
        pub name: String,
        pub terms_of_service: Option<ShopPolicy>,
        pub privacy_policy: Option<ShopPolicy>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ShopPolicy {
        pub url: String,
    }
}
