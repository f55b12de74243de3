use std::sync::Arc;

use chrono::{Duration, Utc};

use skillswap_shared::credential::CredentialSigner;
use skillswap_shared::{Availability, UserId, Visibility};
use skillswap_store::{MemoryStore, SqliteStore, User, UserStore};

use crate::Marketplace;

pub(crate) fn market() -> (Marketplace, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let signer = CredentialSigner::generate(Duration::hours(1));
    (Marketplace::new(Arc::clone(&store), signer, 100), store)
}

pub(crate) fn sqlite_market(store: SqliteStore) -> (Marketplace, Arc<SqliteStore>) {
    let store = Arc::new(store);
    let signer = CredentialSigner::generate(Duration::hours(1));
    (Marketplace::new(Arc::clone(&store), signer, 100), store)
}

/// A stored user with a placeholder hash. Skips argon2 so directory tests
/// can seed many users quickly.
pub(crate) fn seed_user(
    store: &MemoryStore,
    name: &str,
    skills: &[&str],
    location: &str,
    availability: Availability,
) -> User {
    seed_into(store, name, skills, location, availability)
}

pub(crate) fn seed_into(
    store: &dyn UserStore,
    name: &str,
    skills: &[&str],
    location: &str,
    availability: Availability,
) -> User {
    let user = User {
        id: UserId::new(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        password_hash: "$argon2id$placeholder".to_string(),
        location: location.to_string(),
        bio: String::new(),
        profile_photo: name[..1].to_uppercase(),
        skills_offered: skills.iter().map(|s| s.to_string()).collect(),
        skills_wanted: Vec::new(),
        availability,
        visibility: Visibility::Public,
        rating: 0.0,
        total_swaps: 0,
        response_time: "within a day".to_string(),
        created_at: Utc::now(),
    };
    store.insert_user(&user).unwrap();
    user
}
