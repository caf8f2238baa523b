use crate::config::Config;

/// Pages the view can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Listings,
}

impl Route {
    pub fn path<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Self::Login => &config.login_path,
            Self::Listings => &config.listings_path,
        }
    }
}

/// Side effects the host shell carries out for the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Redirect(Route),
    /// Deep link (message app, `mailto:`, `tel:`)
    OpenUrl(String),
    CopyToClipboard(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Toast shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}
