//! # cv-identity-simple
//!
//! Session-only implementation of `IdentityProvider`.
//! Users are minted on login from a display name and a role; nothing is
//! looked up or stored.

use chrono::Utc;
use cv_core::models::{User, UserId, UserRole};
use cv_core::traits::IdentityProvider;
use sha2::{Digest, Sha256};

/// Gravatar accepts SHA-256 digests of the normalized address.
const AVATAR_BASE_URL: &str = "https://www.gravatar.com/avatar";

pub struct SimpleIdentityProvider {
    /// Domain appended to the display name to form the email (e.g., "example.com")
    email_domain: String,
}

impl SimpleIdentityProvider {
    pub fn new(email_domain: &str) -> Self {
        Self {
            email_domain: email_domain.trim().trim_start_matches('@').to_string(),
        }
    }

    fn email_for(&self, name: &str) -> String {
        format!("{}@{}", name.trim(), self.email_domain)
    }
}

impl Default for SimpleIdentityProvider {
    fn default() -> Self {
        Self::new("example.com")
    }
}

/// Avatar reference derived from the email, so the same address always maps
/// to the same picture.
fn avatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let hash = hex::encode(hasher.finalize());
    format!("{AVATAR_BASE_URL}/{hash}?d=identicon")
}

impl IdentityProvider for SimpleIdentityProvider {
    fn issue_user(&self, name: &str, role: UserRole) -> User {
        let email = self.email_for(name);
        let user = User {
            id: UserId::generate(),
            name: name.trim().to_string(),
            avatar_url: Some(avatar_url(&email)),
            email,
            role,
            verified: role.is_verified(),
            badges: Vec::new(),
            joined_at: Utc::now(),
        };
        tracing::debug!(user_id = %user.id, ?role, "issued session user");
        user
    }
}
