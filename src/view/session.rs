/// Signed-in user as provided by the auth layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl User {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
        }
    }
}

/// Auth context handed to the controller when the view is created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    SignedIn(User),
}

impl Session {
    pub fn signed_in(user: User) -> Self {
        Self::SignedIn(user)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}
