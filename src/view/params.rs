use url::form_urlencoded;

use crate::error::{Error, Result};

/// Query parameters of the detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    /// `id`, the listing to show
    pub id: String,
    /// `img`, the image to open first
    pub image_index: usize,
    /// `shared`, set when the visitor arrived through a shared link
    pub shared: bool,
}

impl ViewParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_index: 0,
            shared: false,
        }
    }

    /// Parse `id=..&img=..&shared=..`, with or without the leading `?`.
    ///
    /// A missing `id` is rejected. A negative or unreadable `img` means the
    /// first image.
    pub fn from_query(query: &str) -> Result<Self> {
        let query = query.trim_start_matches('?');
        let mut id = None;
        let mut image_index = 0;
        let mut shared = false;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "id" => id = Some(value.trim().to_string()),
                "img" => {
                    image_index = value
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .and_then(|index| usize::try_from(index).ok())
                        .unwrap_or(0)
                }
                "shared" => {
                    shared = matches!(
                        value.trim().to_ascii_lowercase().as_str(),
                        "true" | "1" | "yes"
                    )
                }
                _ => {}
            }
        }

        let id = id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Validation("Missing property id".to_string()))?;

        Ok(Self {
            id,
            image_index,
            shared,
        })
    }
}
