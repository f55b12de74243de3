//! # skillswap-core
//!
//! Marketplace logic: accounts and bearer credentials, profile edits, the
//! discovery directory, the swap request lifecycle and the notification
//! feed. Everything here is written against the store traits of
//! `skillswap-store` and is synchronous; the server decides where to run it.

pub mod directory;
pub mod error;
pub mod feed;
pub mod identity;
pub mod input;
pub mod lifecycle;
pub mod profile;

#[cfg(test)]
mod fixtures;

use std::sync::Arc;

use skillswap_shared::credential::CredentialSigner;
use skillswap_store::{NotificationStore, RequestStore, UserStore};

pub use directory::DirectoryService;
pub use error::{AuthError, MarketError, Result};
pub use feed::NotificationFeed;
pub use identity::{IdentityService, Session};
pub use input::{
    DirectoryQuery, Login, NewSwapRequest, ProfilePatch, Registration, StatusUpdate,
};
pub use lifecycle::RequestEngine;
pub use profile::ProfileService;

/// All marketplace services wired to one store.
///
/// Cloning is cheap: every service only holds `Arc`s.
#[derive(Clone)]
pub struct Marketplace {
    pub identity: IdentityService,
    pub profiles: ProfileService,
    pub directory: DirectoryService,
    pub requests: RequestEngine,
    pub notifications: NotificationFeed,
}

impl Marketplace {
    pub fn new<S>(store: Arc<S>, signer: CredentialSigner, max_page_size: usize) -> Self
    where
        S: UserStore + RequestStore + NotificationStore + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let requests: Arc<dyn RequestStore> = store.clone();
        let notifications: Arc<dyn NotificationStore> = store;

        Self {
            identity: IdentityService::new(Arc::clone(&users), Arc::new(signer)),
            profiles: ProfileService::new(Arc::clone(&users)),
            directory: DirectoryService::new(Arc::clone(&users), max_page_size),
            requests: RequestEngine::new(users, requests),
            notifications: NotificationFeed::new(notifications),
        }
    }
}
