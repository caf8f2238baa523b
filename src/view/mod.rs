pub mod carousel;
pub mod contact;
pub mod controller;
pub mod lifetime;
pub mod outbox;
pub mod params;
pub mod session;
pub mod share;

pub use carousel::Carousel;
pub use contact::ContactForm;
pub use controller::{LoadedListing, ViewController, ViewState};
pub use lifetime::ViewLifetime;
pub use outbox::{Effect, Notification, NotificationLevel, Route};
pub use params::ViewParams;
pub use session::{Session, User};
pub use share::ShareChannel;
