use thiserror::Error;

/// Failures surfaced by the store accessors and the view controller
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// No document matches the identifier
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// The store could not be reached or returned something unusable
    #[error("store unavailable: {0}")]
    Transient(String),

    /// User input rejected before reaching the store
    #[error("invalid input: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Text shown to the user when this error reaches the view
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "Property not found".to_string(),
            Self::Transient(_) => {
                "Something went wrong. Please check your connection and try again.".to_string()
            }
            Self::Validation(reason) => reason.clone(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transient(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Transient(format!("malformed document: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_is_generic() {
        let err = Error::not_found("properties", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "properties/abc not found");
        assert_eq!(err.user_message(), "Property not found");
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = Error::Validation("Please enter your name".into());
        assert_eq!(err.user_message(), "Please enter your name");
        assert!(!err.is_not_found());
    }
}
