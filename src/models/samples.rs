use chrono::{TimeZone, Utc};
use tracing::info;

use super::{ListingType, OwnerContact, Property, PropertyType};

/// Seed listings for the in-memory store, used by the demo binary and tests
pub fn sample_listings() -> Vec<Property> {
    info!("📋 Generating sample listings");

    vec![
        Property {
            name: Some("Sunny 2BHK near Baner Hills".to_string()),
            listing_type: Some(ListingType::Rent),
            property_type: Some(PropertyType::Residential),
            price: Some(20_000.0),
            area: Some(1_150.0),
            bedrooms: Some(2.0),
            bathrooms: Some(2.0),
            furnishing: Some("Semi-furnished".to_string()),
            amenities: vec!["Lift".to_string(), "Covered parking".to_string(), "Gym".to_string()],
            description: Some("East facing flat with a large balcony. Society has 24x7 security.".to_string()),
            address: Some("Flat 702, Sai Residency, Baner Road".to_string()),
            city: Some("Pune".to_string()),
            state: Some("Maharashtra".to_string()),
            pincode: Some("411045".to_string()),
            images: vec![
                "https://images.estatehub.example/baner-2bhk/living.jpg".to_string(),
                "https://images.estatehub.example/baner-2bhk/kitchen.jpg".to_string(),
                "https://images.estatehub.example/baner-2bhk/balcony.jpg".to_string(),
            ],
            owner: OwnerContact {
                owner_name: Some("Asha Kulkarni".to_string()),
                owner_phone: Some("+91 98220 11223".to_string()),
                owner_email: Some("asha.kulkarni@example.com".to_string()),
            },
            created_at: Utc.with_ymd_and_hms(2024, 3, 12, 9, 30, 0).single(),
            ..Property::new("baner-2bhk")
        },
        Property {
            name: Some("Corner shop on MG Road".to_string()),
            listing_type: Some(ListingType::Sale),
            property_type: Some(PropertyType::Commercial),
            price: Some(8_500_000.0),
            area: Some(420.0),
            amenities: vec!["Power backup".to_string()],
            address: Some("Shop 4, Orchid Arcade, MG Road".to_string()),
            city: Some("Bengaluru".to_string()),
            state: Some("Karnataka".to_string()),
            owner: OwnerContact {
                owner_name: Some("Ravi Shetty".to_string()),
                owner_phone: None,
                owner_email: Some("ravi.shetty@example.com".to_string()),
            },
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 14, 0, 0).single(),
            ..Property::new("mg-road-shop")
        },
        Property {
            name: Some("Agricultural plot, Nashik".to_string()),
            listing_type: Some(ListingType::Sale),
            property_type: Some(PropertyType::Land),
            price: Some(2_400_000.0),
            area: Some(21_780.0),
            city: Some("Nashik".to_string()),
            ..Property::new("nashik-plot")
        },
    ]
}
