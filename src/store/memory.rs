use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{sample_listings, Favorite, Property};
use crate::store::traits::{FavoritesStore, PropertyRepository};

/// Process-local store implementing both accessors.
///
/// While offline every call fails with `Error::Transient`, which is how
/// connectivity loss looks to the controller.
#[derive(Default)]
pub struct MemoryStore {
    properties: RwLock<HashMap<String, Property>>,
    favorites: RwLock<HashSet<Favorite>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the sample listings
    pub fn seeded() -> Self {
        Self::with_listings(sample_listings())
    }

    pub fn with_listings(listings: impl IntoIterator<Item = Property>) -> Self {
        let properties = listings
            .into_iter()
            .map(|property| (property.id().to_string(), property))
            .collect();

        Self {
            properties: RwLock::new(properties),
            ..Self::default()
        }
    }

    pub async fn insert(&self, property: Property) {
        self.properties
            .write()
            .await
            .insert(property.id().to_string(), property);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn favorite_count(&self) -> usize {
        self.favorites.read().await.len()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::Transient("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PropertyRepository for MemoryStore {
    async fn fetch_property(&self, id: &str) -> Result<Property> {
        self.check_online()?;
        debug!("Looking up property {} in memory", id);

        self.properties
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("properties", id))
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl FavoritesStore for MemoryStore {
    async fn is_favorited(&self, user_id: &str, property_id: &str) -> Result<bool> {
        self.check_online()?;
        let favorite = Favorite::new(user_id, property_id);
        Ok(self.favorites.read().await.contains(&favorite))
    }

    async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        self.check_online()?;
        self.favorites
            .write()
            .await
            .insert(Favorite::new(user_id, property_id));
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        self.check_online()?;
        self.favorites
            .write()
            .await
            .remove(&Favorite::new(user_id, property_id));
        Ok(())
    }
}
