//! Display text for a listing.
//!
//! Every function here is total: a missing attribute renders as
//! [`NOT_AVAILABLE`] or a named default, never as an empty string.

mod placeholder;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ListingType, OwnerContact, Property, PropertyType};

pub use placeholder::{format_number, Placeholder, NOT_AVAILABLE};

pub const UNTITLED: &str = "Untitled Property";

/// Currency and rent period used when rendering prices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    pub currency_prefix: String,
    pub rent_period: String,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            currency_prefix: "Rs.".to_string(),
            rent_period: "month".to_string(),
        }
    }
}

pub fn title_text(property: &Property) -> String {
    property.name.or_placeholder(UNTITLED)
}

/// Address parts that are present, comma separated
pub fn location_text(property: &Property) -> String {
    let parts: Vec<&str> = [
        &property.address,
        &property.city,
        &property.state,
        &property.pincode,
    ]
    .into_iter()
    .filter_map(|part| part.as_deref())
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}

pub fn price_text(property: &Property) -> String {
    price_text_with(property, &PriceFormat::default())
}

/// `Rs. 20000` for sale, `Rs. 20000/month` for rent
pub fn price_text_with(property: &Property, format: &PriceFormat) -> String {
    let Some(price) = property.price else {
        return NOT_AVAILABLE.to_string();
    };

    let amount = format!("{} {}", format.currency_prefix, format_number(price));
    if property.is_rental() {
        format!("{}/{}", amount, format.rent_period)
    } else {
        amount
    }
}

/// Capitalised name for known types, the stored string otherwise
pub fn property_type_display(kind: Option<&PropertyType>) -> String {
    match kind {
        Some(PropertyType::Residential) => "Residential".to_string(),
        Some(PropertyType::Commercial) => "Commercial".to_string(),
        Some(PropertyType::Industrial) => "Industrial".to_string(),
        Some(PropertyType::Land) => "Land".to_string(),
        Some(PropertyType::Other(raw)) => raw.clone(),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn listing_type_display(kind: Option<&ListingType>) -> String {
    match kind {
        Some(ListingType::Sale) => "For Sale".to_string(),
        Some(ListingType::Rent) => "For Rent".to_string(),
        Some(ListingType::Other(raw)) => raw.clone(),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn area_text(area: Option<f64>) -> String {
    match area {
        Some(value) => format!("{} sq.ft", format_number(value)),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn amenities_text(amenities: &[String]) -> String {
    amenities.or_placeholder(NOT_AVAILABLE)
}

pub fn listed_on_text(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(ts) => format!("Listed on {}", ts.format("%-d %b %Y")),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `tel:` link with spacing stripped, when the owner shared a number
pub fn owner_phone_link(owner: &OwnerContact) -> Option<String> {
    let phone = owner.owner_phone.as_deref()?;
    let dialable: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    (!dialable.is_empty()).then(|| format!("tel:{}", dialable))
}

pub fn owner_email_link(owner: &OwnerContact) -> Option<String> {
    owner
        .owner_email
        .as_deref()
        .map(str::trim)
        .filter(|email| email.contains('@'))
        .map(|email| format!("mailto:{}", email))
}

/// Message body sent along with a shared link
pub fn share_message(property: &Property, url: &str, format: &PriceFormat) -> String {
    format!(
        "Check out this property: {}\nLocation: {}\nPrice: {}\nType: {} ({})\n\nView it here: {}",
        title_text(property),
        location_text(property),
        price_text_with(property, format),
        property_type_display(property.property_type.as_ref()),
        listing_type_display(property.listing_type.as_ref()),
        url
    )
}

/// Everything the detail screen renders for one listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDisplay {
    pub title: String,
    pub location: String,
    pub price: String,
    pub property_type: String,
    pub listing_type: String,
    pub area: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub furnishing: String,
    pub amenities: String,
    pub description: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub call_link: Option<String>,
    pub email_link: Option<String>,
    pub listed_on: String,
}

impl PropertyDisplay {
    pub fn new(property: &Property, format: &PriceFormat) -> Self {
        let owner = &property.owner;
        Self {
            title: title_text(property),
            location: location_text(property),
            price: price_text_with(property, format),
            property_type: property_type_display(property.property_type.as_ref()),
            listing_type: listing_type_display(property.listing_type.as_ref()),
            area: area_text(property.area),
            bedrooms: property.bedrooms.or_placeholder(NOT_AVAILABLE),
            bathrooms: property.bathrooms.or_placeholder(NOT_AVAILABLE),
            furnishing: property.furnishing.or_placeholder(NOT_AVAILABLE),
            amenities: amenities_text(&property.amenities),
            description: property.description.or_placeholder("No description provided."),
            owner_name: owner.owner_name.or_placeholder(NOT_AVAILABLE),
            owner_phone: owner.owner_phone.or_placeholder(NOT_AVAILABLE),
            owner_email: owner.owner_email.or_placeholder(NOT_AVAILABLE),
            call_link: owner_phone_link(owner),
            email_link: owner_email_link(owner),
            listed_on: listed_on_text(property.created_at),
        }
    }
}
