use async_trait::async_trait;

use crate::error::Result;
use crate::models::Property;

/// Read access to the `properties` collection
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Fetch one listing, failing with `Error::NotFound` when absent
    async fn fetch_property(&self, id: &str) -> Result<Property>;

    /// Name of the backing store, for logs
    fn store_name(&self) -> &'static str;
}

/// The user-to-listing favorite relation.
///
/// `add_favorite` and `remove_favorite` are idempotent: adding twice leaves
/// one relation, removing a missing one succeeds.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn is_favorited(&self, user_id: &str, property_id: &str) -> Result<bool>;

    async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<()>;

    async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<()>;
}
