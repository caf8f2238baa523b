mod fields;
mod samples;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::error::Result;

pub use samples::sample_listings;

/// Whether the listing is offered for sale or for rent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ListingType {
    Sale,
    Rent,
    /// Anything the store holds that is not a known listing type
    Other(String),
}

impl From<String> for ListingType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sale" | "sell" => Self::Sale,
            "rent" => Self::Rent,
            _ => Self::Other(raw),
        }
    }
}

impl From<ListingType> for String {
    fn from(kind: ListingType) -> Self {
        match kind {
            ListingType::Sale => "sale".to_string(),
            ListingType::Rent => "rent".to_string(),
            ListingType::Other(raw) => raw,
        }
    }
}

/// Category of the property itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    Residential,
    Commercial,
    Industrial,
    Land,
    Other(String),
}

impl From<String> for PropertyType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "residential" => Self::Residential,
            "commercial" => Self::Commercial,
            "industrial" => Self::Industrial,
            "land" => Self::Land,
            _ => Self::Other(raw),
        }
    }
}

impl From<PropertyType> for String {
    fn from(kind: PropertyType) -> Self {
        match kind {
            PropertyType::Residential => "residential".to_string(),
            PropertyType::Commercial => "commercial".to_string(),
            PropertyType::Industrial => "industrial".to_string(),
            PropertyType::Land => "land".to_string(),
            PropertyType::Other(raw) => raw,
        }
    }
}

/// Owner contact details, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerContact {
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub owner_phone: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub owner_email: Option<String>,
}

/// Property listing as stored in the `properties` collection
///
/// Every attribute except the identifier is optional. Values the store
/// holds in the wrong shape (a price saved as text, a broken timestamp)
/// are read leniently and fall back to absent rather than failing the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Document identifier, assigned by the store and never changed
    #[serde(skip)]
    pub(crate) id: String,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_enum")]
    pub listing_type: Option<ListingType>,
    #[serde(default, deserialize_with = "fields::lenient_enum")]
    pub property_type: Option<PropertyType>,
    #[serde(default, deserialize_with = "fields::lenient_number")]
    pub price: Option<f64>,
    /// Built-up or plot area in square feet
    #[serde(default, deserialize_with = "fields::lenient_number")]
    pub area: Option<f64>,
    #[serde(default, deserialize_with = "fields::lenient_number")]
    pub bedrooms: Option<f64>,
    #[serde(default, deserialize_with = "fields::lenient_number")]
    pub bathrooms: Option<f64>,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub furnishing: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_list")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_text")]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_list")]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub owner: OwnerContact,
    #[serde(default, deserialize_with = "fields::lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Empty listing carrying only its identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            listing_type: None,
            property_type: None,
            price: None,
            area: None,
            bedrooms: None,
            bathrooms: None,
            furnishing: None,
            amenities: Vec::new(),
            description: None,
            address: None,
            city: None,
            state: None,
            pincode: None,
            images: Vec::new(),
            owner: OwnerContact::default(),
            created_at: None,
        }
    }

    /// Build a listing from the document body stored under `id`
    pub fn from_json(id: impl Into<String>, fields: Value) -> Result<Self> {
        let mut property: Property = serde_json::from_value(fields)?;
        property.id = id.into();
        Ok(property)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_rental(&self) -> bool {
        matches!(self.listing_type, Some(ListingType::Rent))
    }

    /// Images to show, or the given fallback set when the listing has none
    pub fn images_or(&self, fallback: &[String]) -> Vec<String> {
        let own: Vec<String> = self
            .images
            .iter()
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .collect();

        if own.is_empty() {
            fallback.to_vec()
        } else {
            own
        }
    }
}

/// A user's saved listing. Existence is the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: String,
    pub property_id: String,
}

impl Favorite {
    pub fn new(user_id: &str, property_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            property_id: property_id.to_string(),
        }
    }

    /// Deterministic document key, one per (user, property) pair.
    ///
    /// Each part is percent-encoded with `_` escaped as well, so the `_`
    /// joining them never appears inside a part.
    pub fn document_id(&self) -> String {
        format!(
            "{}_{}",
            escape_key_part(&self.user_id),
            escape_key_part(&self.property_id)
        )
    }
}

fn escape_key_part(part: &str) -> String {
    // byte_serialize escapes '%' itself, so "%5F" only ever stands for '_'
    form_urlencoded::byte_serialize(part.as_bytes())
        .collect::<String>()
        .replace('_', "%5F")
}
