//! Property listing detail screen: display formatting, store accessors, and
//! the view controller that ties them together.

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod store;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
