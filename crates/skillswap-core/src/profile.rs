use std::sync::Arc;

use tracing::{debug, info};

use skillswap_shared::UserId;
use skillswap_store::{StoreError, User, UserStore};

use crate::error::{MarketError, Result};
use crate::input::{normalize_skills, ProfilePatch};

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserStore>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub fn profile(&self, user: UserId) -> Result<User> {
        debug!(%user, "profile read");
        self.users.get_user(user).map_err(user_not_found)
    }

    /// Overwrite the fields present in `patch`. Email, password, rating and
    /// swap count are not editable here.
    pub fn update_profile(&self, user: UserId, patch: ProfilePatch) -> Result<User> {
        let mut current = self.users.get_user(user).map_err(user_not_found)?;
        if patch.is_empty() {
            return Ok(current);
        }

        apply_patch(&mut current, patch)?;
        self.users.update_user(&current).map_err(user_not_found)?;

        info!(%user, "profile updated");
        Ok(current)
    }
}

fn apply_patch(user: &mut User, patch: ProfilePatch) -> Result<()> {
    if let Some(name) = patch.name {
        user.name = required_text(name, "Name")?;
    }
    if let Some(location) = patch.location {
        user.location = required_text(location, "Location")?;
    }
    if let Some(skills) = patch.skills_offered {
        user.skills_offered = normalize_skills(skills);
    }
    if let Some(skills) = patch.skills_wanted {
        user.skills_wanted = normalize_skills(skills);
    }
    if let Some(availability) = patch.availability {
        user.availability = availability;
    }
    if let Some(visibility) = patch.profile_visibility {
        user.visibility = visibility;
    }
    if let Some(bio) = patch.bio {
        user.bio = bio.trim().to_string();
    }
    Ok(())
}

fn required_text(value: String, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MarketError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

fn user_not_found(err: StoreError) -> MarketError {
    match err {
        StoreError::NotFound => MarketError::not_found("User not found"),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use skillswap_shared::{Availability, Visibility};

    use super::*;
    use crate::fixtures::{market, seed_user};

    #[test]
    fn test_partial_patch_leaves_other_fields() {
        let (market, store) = market();
        let ana = seed_user(&store, "Ana", &["Guitar"], "Lisbon", Availability::Weekends);

        let patch = ProfilePatch {
            skills_wanted: Some(vec![" Cooking ".into(), "cooking".into(), "".into()]),
            availability: Some(Availability::Evenings),
            ..Default::default()
        };
        let updated = market.profiles.update_profile(ana.id, patch).unwrap();

        assert_eq!(updated.skills_wanted, vec!["Cooking"]);
        assert_eq!(updated.availability, Availability::Evenings);
        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.skills_offered, vec!["Guitar"]);

        let stored = market.profiles.profile(ana.id).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn test_empty_bio_clears() {
        let (market, store) = market();
        let ana = seed_user(&store, "Ana", &[], "Lisbon", Availability::Weekends);

        let set = ProfilePatch {
            bio: Some("Luthier".into()),
            ..Default::default()
        };
        assert_eq!(market.profiles.update_profile(ana.id, set).unwrap().bio, "Luthier");

        let clear = ProfilePatch {
            bio: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(market.profiles.update_profile(ana.id, clear).unwrap().bio, "");
    }

    #[test]
    fn test_blank_name_is_rejected_and_nothing_changes() {
        let (market, store) = market();
        let ana = seed_user(&store, "Ana", &[], "Lisbon", Availability::Weekends);

        let patch = ProfilePatch {
            name: Some("   ".into()),
            profile_visibility: Some(Visibility::Private),
            ..Default::default()
        };
        assert!(matches!(
            market.profiles.update_profile(ana.id, patch),
            Err(MarketError::Validation(_))
        ));
        assert!(market.profiles.profile(ana.id).unwrap().is_public());
    }

    #[test]
    fn test_unknown_user() {
        let (market, _) = market();
        assert!(matches!(
            market.profiles.profile(UserId::new()),
            Err(MarketError::NotFound(_))
        ));
        assert!(matches!(
            market
                .profiles
                .update_profile(UserId::new(), ProfilePatch::default()),
            Err(MarketError::NotFound(_))
        ));
    }
}
