use std::mem;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{PriceFormat, PropertyDisplay};
use crate::models::Property;
use crate::store::{FavoritesStore, PropertyRepository};
use crate::view::carousel::Carousel;
use crate::view::contact::ContactForm;
use crate::view::lifetime::ViewLifetime;
use crate::view::outbox::{Effect, Notification, Route};
use crate::view::params::ViewParams;
use crate::view::session::{Session, User};
use crate::view::share::{self, ShareChannel};

/// Listing as shown once loaded
#[derive(Debug, Clone)]
pub struct LoadedListing {
    pub property: Property,
    pub display: PropertyDisplay,
    pub images: Vec<String>,
    carousel: Carousel,
}

impl LoadedListing {
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.carousel.index()).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub enum ViewState {
    Loading,
    Loaded(Box<LoadedListing>),
    NotFound,
    /// Load failed; holds the message shown to the user
    Error(String),
    /// Sent to the login page before anything loaded
    Redirected,
}

/// Drives the listing detail screen for one visit.
///
/// The controller owns every piece of transient view state. Store access
/// goes through the injected accessors and runs under the view's
/// [`ViewLifetime`], so results arriving after the view ended are dropped.
/// Side effects and toasts are queued for the host to drain with
/// [`take_effects`](Self::take_effects) and
/// [`take_notifications`](Self::take_notifications).
pub struct ViewController {
    session: Session,
    params: ViewParams,
    repository: Arc<dyn PropertyRepository>,
    favorites: Arc<dyn FavoritesStore>,
    config: Arc<Config>,
    price_format: PriceFormat,
    lifetime: ViewLifetime,
    state: ViewState,
    favorited: bool,
    contact_open: bool,
    share_open: bool,
    contact_form: ContactForm,
    shared_notice_shown: bool,
    left_not_found: bool,
    effects: Vec<Effect>,
    notifications: Vec<Notification>,
}

impl ViewController {
    pub fn new(
        session: Session,
        params: ViewParams,
        repository: Arc<dyn PropertyRepository>,
        favorites: Arc<dyn FavoritesStore>,
        config: Arc<Config>,
    ) -> Self {
        let price_format = config.price_format();
        Self {
            session,
            params,
            repository,
            favorites,
            config,
            price_format,
            lifetime: ViewLifetime::new(),
            state: ViewState::Loading,
            favorited: false,
            contact_open: false,
            share_open: false,
            contact_form: ContactForm::default(),
            shared_notice_shown: false,
            left_not_found: false,
            effects: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn listing(&self) -> Option<&LoadedListing> {
        match &self.state {
            ViewState::Loaded(listing) => Some(listing.as_ref()),
            _ => None,
        }
    }

    pub fn is_favorited(&self) -> bool {
        self.favorited
    }

    pub fn is_contact_open(&self) -> bool {
        self.contact_open
    }

    pub fn is_share_open(&self) -> bool {
        self.share_open
    }

    pub fn contact_form(&self) -> &ContactForm {
        &self.contact_form
    }

    /// Handle for ending the view from outside, e.g. on navigation away
    pub fn lifetime(&self) -> ViewLifetime {
        self.lifetime.clone()
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        mem::take(&mut self.effects)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        mem::take(&mut self.notifications)
    }

    /// First load. Anonymous visitors are sent to the login page.
    pub async fn mount(&mut self) {
        if !self.lifetime.is_active() {
            return;
        }

        let Some(user) = self.session.user().cloned() else {
            info!("No signed-in user, redirecting to login");
            self.state = ViewState::Redirected;
            self.effects.push(Effect::Redirect(Route::Login));
            return;
        };

        self.load(&user).await;
    }

    /// Retry after a failed or empty load
    pub async fn reload(&mut self) {
        if !self.lifetime.is_active() || self.left_not_found {
            return;
        }
        if !matches!(self.state, ViewState::Error(_) | ViewState::NotFound) {
            return;
        }
        if let Some(user) = self.session.user().cloned() {
            self.load(&user).await;
        }
    }

    async fn load(&mut self, user: &User) {
        self.state = ViewState::Loading;
        let id = self.params.id.clone();
        info!(
            "Loading property {} from {} store",
            id,
            self.repository.store_name()
        );

        let repository = Arc::clone(&self.repository);
        let fetch_id = id.clone();
        let Some(fetched) = self
            .lifetime
            .run(async move { repository.fetch_property(&fetch_id).await })
            .await
        else {
            debug!("View ended before property {} arrived, discarding", id);
            return;
        };

        let property = match fetched {
            Ok(property) => property,
            Err(err) if err.is_not_found() => {
                warn!("Property {} not found", id);
                self.notifications.push(Notification::error(err.user_message()));
                self.state = ViewState::NotFound;
                return;
            }
            Err(err) => {
                error!("Failed to load property {}: {}", id, err);
                self.notifications.push(Notification::error(err.user_message()));
                self.state = ViewState::Error(err.user_message());
                return;
            }
        };

        let favorites = Arc::clone(&self.favorites);
        let uid = user.uid.clone();
        let property_id = property.id().to_string();
        let Some(status) = self
            .lifetime
            .run(async move { favorites.is_favorited(&uid, &property_id).await })
            .await
        else {
            debug!("View ended before favorite status arrived, discarding");
            return;
        };

        self.favorited = match status {
            Ok(favorited) => favorited,
            Err(err) => {
                warn!("Could not read favorite status for {}: {}", id, err);
                self.notifications.push(Notification::error(err.user_message()));
                false
            }
        };

        let images = property.images_or(&self.config.sample_images);
        let carousel = Carousel::new(
            images.len(),
            self.params.image_index,
            self.config.transition(),
        );
        let display = PropertyDisplay::new(&property, &self.price_format);

        info!(
            "Loaded property {} with {} images, opening image {}",
            property.id(),
            images.len(),
            carousel.index()
        );

        self.state = ViewState::Loaded(Box::new(LoadedListing {
            property,
            display,
            images,
            carousel,
        }));

        if self.params.shared && !self.shared_notice_shown {
            self.shared_notice_shown = true;
            self.notifications
                .push(Notification::info("Someone shared this property with you"));
        }
    }

    /// Leave the not-found screen; redirects once
    pub fn acknowledge_not_found(&mut self) {
        if !matches!(self.state, ViewState::NotFound) || self.left_not_found {
            return;
        }
        self.left_not_found = true;
        self.effects.push(Effect::Redirect(Route::Listings));
    }

    fn carousel_mut(&mut self) -> Option<&mut Carousel> {
        if !self.lifetime.is_active() {
            return None;
        }
        match &mut self.state {
            ViewState::Loaded(listing) => Some(&mut listing.carousel),
            _ => None,
        }
    }

    pub fn next_image(&mut self) -> bool {
        let now = Instant::now();
        self.carousel_mut().is_some_and(|carousel| carousel.next(now))
    }

    pub fn previous_image(&mut self) -> bool {
        let now = Instant::now();
        self.carousel_mut()
            .is_some_and(|carousel| carousel.previous(now))
    }

    pub fn go_to_image(&mut self, index: usize) -> bool {
        let now = Instant::now();
        self.carousel_mut()
            .is_some_and(|carousel| carousel.go_to(index, now))
    }

    /// Flip the favorite flag now, undo it if the store write fails
    pub async fn toggle_favorite(&mut self) {
        if !self.lifetime.is_active() {
            return;
        }
        let Some(property_id) = self.listing().map(|l| l.property.id().to_string()) else {
            return;
        };
        let Some(user) = self.session.user().cloned() else {
            self.effects.push(Effect::Redirect(Route::Login));
            return;
        };

        let previous = self.favorited;
        let wanted = !previous;
        self.favorited = wanted;

        let favorites = Arc::clone(&self.favorites);
        let uid = user.uid.clone();
        let pid = property_id.clone();
        let Some(written) = self
            .lifetime
            .run(async move {
                if wanted {
                    favorites.add_favorite(&uid, &pid).await
                } else {
                    favorites.remove_favorite(&uid, &pid).await
                }
            })
            .await
        else {
            debug!("View ended during favorite write for {}", property_id);
            return;
        };

        match written {
            Ok(()) => {
                info!(
                    "{} favorite {} for user {}",
                    if wanted { "Added" } else { "Removed" },
                    property_id,
                    user.uid
                );
                self.notifications.push(Notification::success(if wanted {
                    "Added to favorites"
                } else {
                    "Removed from favorites"
                }));
            }
            Err(err) => {
                warn!("Favorite write for {} failed, reverting: {}", property_id, err);
                self.favorited = previous;
                self.notifications.push(Notification::error(err.user_message()));
            }
        }
    }

    pub fn open_share(&mut self) {
        if self.listing().is_some() {
            self.share_open = true;
        }
    }

    pub fn close_share(&mut self) {
        self.share_open = false;
    }

    /// Build the shareable link and hand it to `channel`
    pub fn share(&mut self, channel: ShareChannel) -> Result<()> {
        if !self.lifetime.is_active() {
            return Ok(());
        }
        let Some(listing) = self.listing() else {
            return Ok(());
        };

        let link = match share::share_link(&self.config, listing.property.id()) {
            Ok(link) => link,
            Err(err) => {
                error!("Cannot build share link: {}", err);
                self.notifications.push(Notification::error(err.user_message()));
                return Err(err);
            }
        };
        let effect = share::share_effect(channel, &listing.property, &link, &self.price_format);

        info!("Sharing property {} via {:?}", listing.property.id(), channel);
        self.effects.push(effect);
        if channel == ShareChannel::Clipboard {
            self.notifications
                .push(Notification::success("Link copied to clipboard"));
        }
        self.share_open = false;
        Ok(())
    }

    /// Open the contact modal, prefilled from the signed-in user
    pub fn open_contact(&mut self) {
        let Some(listing) = self.listing() else {
            return;
        };
        let title = listing.display.title.clone();

        if let Some(user) = self.session.user() {
            if self.contact_form.name.is_empty() {
                self.contact_form.name = user.display_name.clone().unwrap_or_default();
            }
            if self.contact_form.email.is_empty() {
                self.contact_form.email = user.email.clone().unwrap_or_default();
            }
        }
        if self.contact_form.message.is_empty() {
            self.contact_form.message = format!("Hi, I'm interested in {}.", title);
        }
        self.contact_open = true;
    }

    pub fn close_contact(&mut self) {
        self.contact_open = false;
    }

    pub fn update_contact_form(&mut self, update: impl FnOnce(&mut ContactForm)) {
        update(&mut self.contact_form);
    }

    /// Send the contact form. Delivery is not wired to a backend yet, so a
    /// valid form is logged and acknowledged.
    pub fn submit_contact(&mut self) -> Result<()> {
        if !self.contact_open {
            return Err(Error::Validation("Contact form is not open".to_string()));
        }
        let Some(property_id) = self.listing().map(|l| l.property.id().to_string()) else {
            return Err(Error::Validation("No property loaded".to_string()));
        };

        if let Err(err) = self.contact_form.validate() {
            self.notifications.push(Notification::error(err.user_message()));
            return Err(err);
        }

        info!(
            "Contact request for property {} from {} <{}>",
            property_id, self.contact_form.name, self.contact_form.email
        );
        self.notifications
            .push(Notification::success("Your message has been sent to the owner"));
        self.contact_form = ContactForm::default();
        self.contact_open = false;
        Ok(())
    }

    /// Open the owner's phone dialer, when a number is listed
    pub fn call_owner(&mut self) {
        if let Some(link) = self.listing().and_then(|l| l.display.call_link.clone()) {
            self.effects.push(Effect::OpenUrl(link));
        }
    }

    pub fn email_owner(&mut self) {
        if let Some(link) = self.listing().and_then(|l| l.display.email_link.clone()) {
            self.effects.push(Effect::OpenUrl(link));
        }
    }
}

impl Drop for ViewController {
    fn drop(&mut self) {
        self.lifetime.end();
    }
}
