use std::sync::Arc;

use anyhow::Context;
use listing_view::store::{FavoritesStore, FirestoreClient, MemoryStore, PropertyRepository};
use listing_view::view::{
    Effect, Session, ShareChannel, User, ViewController, ViewParams, ViewState,
};
use listing_view::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Listing View");

    // usage: listing-view [query] [config.toml]
    let mut args = std::env::args().skip(1);
    let query = args
        .next()
        .unwrap_or_else(|| "id=baner-2bhk&img=1&shared=true".to_string());
    let config = match args.next() {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let config = Arc::new(config);

    let params = ViewParams::from_query(&query).context("Invalid page query")?;

    let (repository, favorites): (Arc<dyn PropertyRepository>, Arc<dyn FavoritesStore>) =
        match &config.firestore {
            Some(firestore) => {
                info!("Using Firestore project {}", firestore.project_id);
                let mut client = FirestoreClient::new(firestore)?;
                if let Ok(token) = std::env::var("FIRESTORE_ID_TOKEN") {
                    client = client.with_id_token(token);
                }
                let client = Arc::new(client);
                let repository: Arc<dyn PropertyRepository> = client.clone();
                let favorites: Arc<dyn FavoritesStore> = client;
                (repository, favorites)
            }
            None => {
                info!("No Firestore configured, using sample listings");
                let store = Arc::new(MemoryStore::seeded());
                let repository: Arc<dyn PropertyRepository> = store.clone();
                let favorites: Arc<dyn FavoritesStore> = store;
                (repository, favorites)
            }
        };

    let user = User {
        uid: "demo-user".to_string(),
        email: Some("demo@estatehub.example".to_string()),
        display_name: Some("Demo User".to_string()),
    };

    let mut view = ViewController::new(
        Session::signed_in(user),
        params,
        repository,
        favorites,
        Arc::clone(&config),
    );
    view.mount().await;

    match view.state() {
        ViewState::Loaded(listing) => {
            let display = &listing.display;
            println!("{} ({})", display.title, display.listing_type);
            println!("   {}", display.price);
            println!("   {} · {}", display.property_type, display.location);
            println!(
                "   {} · {} bed · {} bath · {}",
                display.area, display.bedrooms, display.bathrooms, display.furnishing
            );
            println!("   Amenities: {}", display.amenities);
            println!("   {}", display.description);
            println!(
                "   Owner: {} · {} · {}",
                display.owner_name, display.owner_phone, display.owner_email
            );
            println!("   {}", display.listed_on);
            println!(
                "   Image {}/{}: {}",
                listing.carousel().index() + 1,
                listing.carousel().count(),
                listing.current_image().unwrap_or("-")
            );
            println!();
        }
        other => warn!("View did not load: {:?}", other),
    }

    if matches!(view.state(), ViewState::NotFound) {
        view.acknowledge_not_found();
    }

    if view.listing().is_some() {
        view.toggle_favorite().await;
        info!("Favorited: {}", view.is_favorited());

        for channel in [ShareChannel::WhatsApp, ShareChannel::Email, ShareChannel::Clipboard] {
            view.share(channel)?;
        }
    }

    for notification in view.take_notifications() {
        println!("[{:?}] {}", notification.level, notification.message);
    }
    for effect in view.take_effects() {
        match effect {
            Effect::Redirect(route) => println!("-> redirect to {}", route.path(&config)),
            Effect::OpenUrl(url) => println!("-> open {}", url),
            Effect::CopyToClipboard(text) => println!("-> copy {}", text),
        }
    }

    Ok(())
}
