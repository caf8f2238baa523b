use crate::error::{Error, Result};

/// Message to the listing owner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    /// Name, email, and message are required; phone is optional
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Please enter your name".to_string()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        if self.message.trim().is_empty() {
            return Err(Error::Validation("Please enter a message".to_string()));
        }
        Ok(())
    }
}
