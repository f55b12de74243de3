//! Accounts and bearer credentials.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use skillswap_shared::constants::DEFAULT_RESPONSE_TIME;
use skillswap_shared::credential::CredentialSigner;
use skillswap_shared::password::{hash_password, verify_against_dummy, verify_password};
use skillswap_shared::{Availability, UserId, Visibility};
use skillswap_store::{StoreError, User, UserStore};

use crate::error::{AuthError, MarketError, Result};
use crate::input::{Login, Registration};

const EMAIL_TAKEN: &str = "Email already exists";

/// What register and login hand back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    signer: Arc<CredentialSigner>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserStore>, signer: Arc<CredentialSigner>) -> Self {
        Self { users, signer }
    }

    pub fn register(&self, registration: Registration) -> Result<Session> {
        let registration = registration.normalized()?;

        if self.users.find_user_by_email(&registration.email)?.is_some() {
            return Err(MarketError::conflict(EMAIL_TAKEN));
        }

        let user = User {
            id: UserId::new(),
            profile_photo: avatar_marker(&registration.name),
            name: registration.name,
            email: registration.email,
            password_hash: hash_password(&registration.password)?,
            location: registration.location,
            bio: String::new(),
            skills_offered: Vec::new(),
            skills_wanted: Vec::new(),
            availability: Availability::default(),
            visibility: Visibility::default(),
            rating: 0.0,
            total_swaps: 0,
            response_time: DEFAULT_RESPONSE_TIME.to_string(),
            created_at: Utc::now(),
        };

        // A concurrent registration can still win between the lookup and
        // the insert; the store's unique email check reports it.
        self.users.insert_user(&user).map_err(|e| match e {
            StoreError::Conflict(_) => MarketError::conflict(EMAIL_TAKEN),
            other => other.into(),
        })?;

        info!(user = %user.id, "registered user");
        self.session_for(user)
    }

    pub fn login(&self, login: Login) -> Result<Session> {
        let login = login.normalized()?;

        let Some(user) = self.users.find_user_by_email(&login.email)? else {
            verify_against_dummy(&login.password);
            warn!("login for unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(&login.password, &user.password_hash)? {
            warn!(user = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        debug!(user = %user.id, "login");
        self.session_for(user)
    }

    /// Resolve a bearer credential to the user it was issued for.
    pub fn authenticate(&self, credential: Option<&str>) -> Result<User> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let claims = self.signer.verify(token).map_err(|e| {
            warn!(error = %e, "rejected credential");
            AuthError::InvalidToken(e)
        })?;

        self.users.get_user(claims.sub).map_err(|e| match e {
            StoreError::NotFound => MarketError::not_found("User not found"),
            other => other.into(),
        })
    }

    fn session_for(&self, user: User) -> Result<Session> {
        let token = self.signer.issue(user.id)?;
        Ok(Session { token, user })
    }
}

/// Upper-cased first character of the name.
pub(crate) fn avatar_marker(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
