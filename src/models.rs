use serde::{Deserialize, Serialize};

// === Listings ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Sale,
    Rent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub kind: ListingKind,
    pub furnished: bool,
    pub parking: bool,
    pub offer: bool,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: i64,
    pub discount_price: i64,
    pub image_urls: Vec<String>,
    pub user_ref: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub kind: ListingKind,
    pub furnished: bool,
    pub parking: bool,
    pub offer: bool,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: i64,
    pub discount_price: i64,
    pub image_urls: Vec<String>,
    pub user_ref: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ListingKind>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
    pub offer: Option<bool>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub regular_price: Option<i64>,
    pub discount_price: Option<i64>,
    pub image_urls: Option<Vec<String>>,
    pub user_ref: Option<String>,
}

impl UpdateListingRequest {
    /// Copies every provided field onto `listing`; absent fields stay
    /// unchanged. `id` and `createdAt` are not updatable.
    pub fn apply(&self, listing: &mut Listing) {
        if let Some(name) = &self.name {
            listing.name = name.clone();
        }
        if let Some(description) = &self.description {
            listing.description = description.clone();
        }
        if let Some(address) = &self.address {
            listing.address = address.clone();
        }
        if let Some(kind) = self.kind {
            listing.kind = kind;
        }
        if let Some(furnished) = self.furnished {
            listing.furnished = furnished;
        }
        if let Some(parking) = self.parking {
            listing.parking = parking;
        }
        if let Some(offer) = self.offer {
            listing.offer = offer;
        }
        if let Some(bedrooms) = self.bedrooms {
            listing.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            listing.bathrooms = bathrooms;
        }
        if let Some(regular_price) = self.regular_price {
            listing.regular_price = regular_price;
        }
        if let Some(discount_price) = self.discount_price {
            listing.discount_price = discount_price;
        }
        if let Some(image_urls) = &self.image_urls {
            listing.image_urls = image_urls.clone();
        }
        if let Some(user_ref) = &self.user_ref {
            listing.user_ref = user_ref.clone();
        }
    }
}

// === Search ===

const DEFAULT_LIMIT: usize = 9;

/// Raw search parameters as they arrive on the query string. Everything is
/// optional and everything is a string; `normalize` applies the fallback
/// rules.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub limit: Option<String>,
    pub start_index: Option<String>,
    pub furnished: Option<String>,
    pub parking: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub search_term: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// One dimension of the search filter: require the flag set, require it
/// unset, or accept either.
#[derive(Debug, Clone, Copy, Default)]
pub enum TriState {
    MatchTrue,
    MatchFalse,
    #[default]
    MatchEither,
}

impl TriState {
    pub fn accepts(self, value: bool) -> bool {
        match self {
            Self::MatchTrue => value,
            Self::MatchFalse => !value,
            Self::MatchEither => true,
        }
    }
}

/// Typed search filter. `name_contains` is matched case-insensitively and
/// must already be lowercased.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub name_contains: String,
    pub furnished: TriState,
    pub parking: TriState,
    pub kind: Option<ListingKind>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        listing.name.to_lowercase().contains(&self.name_contains)
            && self.furnished.accepts(listing.furnished)
            && self.parking.accepts(listing.parking)
            && self.kind.map_or(true, |kind| listing.kind == kind)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SortField {
    CreatedAt,
    RegularPrice,
}

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: usize,
    pub start_index: usize,
}

impl SearchParams {
    pub fn normalize(&self) -> ListingQuery {
        ListingQuery {
            filter: ListingFilter {
                name_contains: self
                    .search_term
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase(),
                furnished: bool_filter(self.furnished.as_deref()),
                parking: bool_filter(self.parking.as_deref()),
                kind: kind_filter(self.kind.as_deref()),
            },
            sort: sort_field(self.sort.as_deref()),
            order: sort_order(self.order.as_deref()),
            limit: parse_limit(self.limit.as_deref()),
            start_index: parse_start_index(self.start_index.as_deref()),
        }
    }
}

// A literal "false" matches both true and false, exactly like an absent
// parameter: searching with furnished=false returns furnished and
// unfurnished listings alike. Only "true" narrows the search.
fn bool_filter(raw: Option<&str>) -> TriState {
    match raw {
        Some("true") => TriState::MatchTrue,
        _ => TriState::MatchEither,
    }
}

fn kind_filter(raw: Option<&str>) -> Option<ListingKind> {
    match raw {
        Some("sale") => Some(ListingKind::Sale),
        Some("rent") => Some(ListingKind::Rent),
        // "all", absent, and anything unrecognized place no restriction.
        _ => None,
    }
}

fn sort_field(raw: Option<&str>) -> SortField {
    match raw {
        Some("regularPrice") => SortField::RegularPrice,
        _ => SortField::CreatedAt,
    }
}

fn sort_order(raw: Option<&str>) -> SortOrder {
    match raw {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    }
}

// A limit of 0 falls back to the default page size, the same as an absent
// or unparseable value.
fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_LIMIT)
}

fn parse_start_index(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

// === Users ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub favourites: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

// === Favourites ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteRequest {
    pub user_id: String,
    pub property_id: String,
}

/// Raw scope parameters on the annotated-favourites endpoint.
#[derive(Debug, Deserialize)]
pub struct FavouritesScope {
    pub sale: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl FavouritesScope {
    /// Any non-empty `sale` value selects the sale scope before `type` is
    /// consulted, even `sale=false`.
    pub fn kind_filter(&self) -> Option<ListingKind> {
        if self.sale.as_deref().is_some_and(|sale| !sale.is_empty()) {
            Some(ListingKind::Sale)
        } else if self.kind.as_deref() == Some("rent") {
            Some(ListingKind::Rent)
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub is_favourite: bool,
}

#[derive(Debug, Serialize)]
pub struct FavouriteUpdateResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct FavouritesResponse {
    pub success: bool,
    pub favourites: Vec<Listing>,
}

#[derive(Debug, Serialize)]
pub struct AllFavouritesResponse {
    pub success: bool,
    pub properties: Vec<FlaggedListing>,
}

// === Errors ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: message.into(),
        }
    }
}
