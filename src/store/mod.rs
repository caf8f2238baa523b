pub mod firestore;
pub mod memory;
pub mod traits;

pub use firestore::FirestoreClient;
pub use memory::MemoryStore;
pub use traits::{FavoritesStore, PropertyRepository};
