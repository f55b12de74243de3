//! Discovery listing of other members' public profiles.

use std::sync::Arc;

use tracing::debug;

use skillswap_shared::constants::DEFAULT_PAGE_SIZE;
use skillswap_shared::{Availability, UserId};
use skillswap_store::{User, UserStore};

use crate::error::Result;
use crate::input::DirectoryQuery;

#[derive(Clone)]
pub struct DirectoryService {
    users: Arc<dyn UserStore>,
    max_page_size: usize,
}

impl DirectoryService {
    pub fn new(users: Arc<dyn UserStore>, max_page_size: usize) -> Self {
        Self {
            users,
            max_page_size,
        }
    }

    /// One page of public profiles other than the requester's, in
    /// registration order. Pages are 1-based; a page past the end (or page
    /// 0, or a zero limit) is empty.
    pub fn list_users(&self, requester: UserId, query: &DirectoryQuery) -> Result<Vec<User>> {
        let availability = query.availability_filter()?;
        let search = query.search_term();
        let page = query.page.unwrap_or(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(self.max_page_size);

        if page == 0 || limit == 0 {
            return Ok(Vec::new());
        }
        let Some(offset) = (page - 1).checked_mul(limit) else {
            return Ok(Vec::new());
        };

        let users: Vec<User> = self
            .users
            .list_users()?
            .into_iter()
            .filter(|u| u.id != requester && u.is_public())
            .filter(|u| search.as_deref().map_or(true, |term| matches_search(u, term)))
            .filter(|u| availability.map_or(true, |a| u.availability == a))
            .skip(offset)
            .take(limit)
            .collect();

        debug!(
            %requester,
            page,
            limit,
            availability = availability_label(availability),
            returned = users.len(),
            "directory page"
        );
        Ok(users)
    }
}

/// `term` must already be lower-cased.
fn matches_search(user: &User, term: &str) -> bool {
    user.name.to_lowercase().contains(term)
        || user.location.to_lowercase().contains(term)
        || user
            .skills_offered
            .iter()
            .any(|s| s.to_lowercase().contains(term))
}

fn availability_label(a: Option<Availability>) -> &'static str {
    a.map_or("all", |a| a.as_str())
}

#[cfg(test)]
mod tests {
    use skillswap_shared::Visibility;
    use skillswap_store::UserStore;

    use super::*;
    use crate::error::MarketError;
    use crate::fixtures::{market, seed_user};

    fn query(page: Option<usize>, limit: Option<usize>) -> DirectoryQuery {
        DirectoryQuery {
            page,
            limit,
            ..Default::default()
        }
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn test_pagination_over_ten_users() {
        let (market, store) = market();
        let me = seed_user(&store, "Me", &[], "Lisbon", Availability::Weekends);
        for i in 0..10 {
            seed_user(&store, &format!("User {i}"), &[], "Lisbon", Availability::Weekends);
        }

        let page = |p| market.directory.list_users(me.id, &query(Some(p), Some(4))).unwrap();
        assert_eq!(names(&page(1)), ["User 0", "User 1", "User 2", "User 3"]);
        assert_eq!(names(&page(2)), ["User 4", "User 5", "User 6", "User 7"]);
        assert_eq!(names(&page(3)), ["User 8", "User 9"]);
        assert!(page(4).is_empty());
        assert!(page(0).is_empty());
        assert!(market
            .directory
            .list_users(me.id, &query(Some(1), Some(0)))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_defaults_and_clamp() {
        let (market, store) = market();
        let me = seed_user(&store, "Me", &[], "Lisbon", Availability::Weekends);
        for i in 0..6 {
            seed_user(&store, &format!("User {i}"), &[], "Lisbon", Availability::Weekends);
        }

        let first = market.directory.list_users(me.id, &query(None, None)).unwrap();
        assert_eq!(first.len(), DEFAULT_PAGE_SIZE);

        let small = DirectoryService::new(store.clone(), 2);
        assert_eq!(small.list_users(me.id, &query(None, Some(50))).unwrap().len(), 2);

        assert!(market
            .directory
            .list_users(me.id, &query(Some(usize::MAX), Some(4)))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_excludes_requester_and_private_profiles() {
        let (market, store) = market();
        let me = seed_user(&store, "Me", &[], "Lisbon", Availability::Weekends);
        let mut hidden = seed_user(&store, "Hidden", &[], "Lisbon", Availability::Weekends);
        hidden.visibility = Visibility::Private;
        store.update_user(&hidden).unwrap();
        seed_user(&store, "Shown", &[], "Lisbon", Availability::Weekends);

        let users = market.directory.list_users(me.id, &query(None, Some(100))).unwrap();
        assert_eq!(names(&users), ["Shown"]);
    }

    #[test]
    fn test_search_matches_name_offered_skill_or_location() {
        let (market, store) = market();
        let me = seed_user(&store, "Me", &[], "Lisbon", Availability::Weekends);
        seed_user(&store, "Guido", &[], "Rome", Availability::Weekends);
        seed_user(&store, "Bea", &["Jazz GUITAR"], "Porto", Availability::Weekends);
        seed_user(&store, "Carl", &["Cooking"], "Guitarville", Availability::Weekends);
        seed_user(&store, "Dora", &["Cooking"], "Faro", Availability::Weekends);

        let search = |term: &str| {
            let q = DirectoryQuery {
                search: Some(term.to_string()),
                limit: Some(100),
                ..Default::default()
            };
            market.directory.list_users(me.id, &q).unwrap()
        };

        assert_eq!(names(&search("guitar")), ["Bea", "Carl"]);
        assert_eq!(names(&search("GUI")), ["Guido", "Bea", "Carl"]);
        assert_eq!(search("   ").len(), 4);
        assert!(search("piano").is_empty());
    }

    #[test]
    fn test_availability_filter() {
        let (market, store) = market();
        let me = seed_user(&store, "Me", &[], "Lisbon", Availability::Weekends);
        seed_user(&store, "Ana", &[], "Lisbon", Availability::Evenings);
        seed_user(&store, "Ben", &[], "Lisbon", Availability::Weekends);

        let with = |a: &str| DirectoryQuery {
            availability: Some(a.to_string()),
            ..Default::default()
        };
        let evenings = market.directory.list_users(me.id, &with("evenings")).unwrap();
        assert_eq!(names(&evenings), ["Ana"]);
        assert_eq!(market.directory.list_users(me.id, &with("all")).unwrap().len(), 2);
        assert!(matches!(
            market.directory.list_users(me.id, &with("mornings")),
            Err(MarketError::Validation(_))
        ));
    }
}
