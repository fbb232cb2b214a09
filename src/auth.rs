//! Mock session handling.
//!
//! This is a stub: any non-empty email/password pair is accepted and nothing
//! is stored or verified. It only exists so the dashboard can show a signed
//! in user.

use thiserror::Error;

use crate::notify::Notifier;

const DEFAULT_NAME: &str = "User";
const DEFAULT_AVATAR: &str =
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=50&h=50&fit=crop&crop=face";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

pub struct StubAuthenticator {
    notifier: Notifier,
    user: Option<User>,
}

impl StubAuthenticator {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            notifier,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// `name` is optional on login and defaults to "User".
    pub fn login(&mut self, email: &str, password: &str, name: Option<&str>) -> Result<&User, AuthError> {
        require("email", email)?;
        require("password", password)?;
        let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(DEFAULT_NAME);

        let user = self.user.insert(session(name, email));
        tracing::info!(email = %user.email, "Logged in (stub)");
        self.notifier
            .success("Login Successful", format!("Welcome back, {}!", user.name));
        Ok(user)
    }

    pub fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<&User, AuthError> {
        require("name", name)?;
        require("email", email)?;
        require("password", password)?;

        let user = self.user.insert(session(name.trim(), email));
        tracing::info!(email = %user.email, "Signed up (stub)");
        self.notifier.success(
            "Account Created",
            format!("Welcome to Panorama, {}!", user.name),
        );
        Ok(user)
    }

    pub fn logout(&mut self) {
        if self.user.take().is_some() {
            self.notifier
                .info("Logged Out", "You have been successfully logged out.");
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(())
    }
}

fn session(name: &str, email: &str) -> User {
    User {
        id: "1".to_string(),
        name: name.to_string(),
        email: email.trim().to_string(),
        avatar: DEFAULT_AVATAR.to_string(),
    }
}
