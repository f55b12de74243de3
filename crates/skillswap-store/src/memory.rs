//! In-memory backend.
//!
//! Each collection sits behind its own mutex. Request writes also append a
//! notification, so they hold the `requests` lock and then the
//! `notifications` lock, always in that order, and change nothing until both
//! are held. Nothing is persisted.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use skillswap_shared::{RequestId, RequestStatus, UserId};

use crate::error::{Result, StoreError};
use crate::models::{Notice, Notification, SwapRequest, User};
use crate::stores::{Decision, NotificationStore, RequestStore, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    requests: Mutex<Vec<SwapRequest>>,
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &'static str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| StoreError::LockPoisoned(name))
}

impl UserStore for MemoryStore {
    fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = lock(&self.users, "users")?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email already registered".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    fn get_user(&self, id: UserId) -> Result<User> {
        lock(&self.users, "users")?
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(lock(&self.users, "users")?
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut users = lock(&self.users, "users")?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(StoreError::NotFound)?;
        // email and password hash are not profile fields
        let (email, password_hash) = (slot.email.clone(), slot.password_hash.clone());
        *slot = User {
            email,
            password_hash,
            ..user.clone()
        };
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(lock(&self.users, "users")?.clone())
    }
}

impl RequestStore for MemoryStore {
    fn insert_request(&self, request: &SwapRequest, notice: &Notice) -> Result<()> {
        let mut requests = lock(&self.requests, "requests")?;
        let mut notifications = lock(&self.notifications, "notifications")?;
        requests.push(request.clone());
        notifications.push(notice.deliver(request.recipient_id(), request.created_at));
        Ok(())
    }

    fn list_requests_for(&self, user: UserId) -> Result<Vec<SwapRequest>> {
        Ok(lock(&self.requests, "requests")?
            .iter()
            .filter(|r| r.involves(user))
            .cloned()
            .collect())
    }

    fn decide_request(
        &self,
        id: RequestId,
        recipient: UserId,
        status: RequestStatus,
        at: DateTime<Utc>,
        notice: &Notice,
    ) -> Result<Decision> {
        let mut requests = lock(&self.requests, "requests")?;
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == id && r.recipient_id() == recipient)
        else {
            return Ok(Decision::NotFound);
        };

        if request.status.is_terminal() {
            return Ok(Decision::NotPending(request.clone()));
        }

        let mut notifications = lock(&self.notifications, "notifications")?;
        notifications.push(notice.deliver(request.sender_id(), at));
        request.status = status;
        request.updated_at = Some(at);
        Ok(Decision::Applied(request.clone()))
    }
}

impl NotificationStore for MemoryStore {
    fn list_notifications_for(&self, user: UserId) -> Result<Vec<Notification>> {
        Ok(lock(&self.notifications, "notifications")?
            .iter()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use skillswap_shared::{NotificationKind, Visibility};

    use super::*;
    use crate::fixtures::{sample_notice, sample_request, sample_user};

    fn decide(
        store: &MemoryStore,
        id: RequestId,
        by: UserId,
        status: RequestStatus,
    ) -> Result<Decision> {
        store.decide_request(id, by, status, Utc::now(), &sample_notice())
    }

    /// Leave the notifications mutex poisoned, as a writer that panicked
    /// mid-append would.
    fn poison_notifications(store: &MemoryStore) {
        let crashed = thread::scope(|s| {
            s.spawn(|| {
                let _feed = store.notifications.lock().unwrap();
                panic!("writer crashed");
            })
            .join()
        });
        assert!(crashed.is_err());
        assert!(store.notifications.is_poisoned());
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert_user(&sample_user("Ana")).unwrap();
        assert!(matches!(
            store.insert_user(&sample_user("Ana")),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn update_keeps_credentials() {
        let store = MemoryStore::new();
        let user = sample_user("Ana");
        store.insert_user(&user).unwrap();

        let mut edited = user.clone();
        edited.email = "changed@example.com".to_string();
        edited.password_hash = String::new();
        edited.visibility = Visibility::Private;
        store.update_user(&edited).unwrap();

        let loaded = store.get_user(user.id).unwrap();
        assert_eq!(loaded.email, user.email);
        assert_eq!(loaded.password_hash, user.password_hash);
        assert_eq!(loaded.visibility, Visibility::Private);
    }

    #[test]
    fn unknown_ids() {
        let store = MemoryStore::new();
        assert!(matches!(store.get_user(UserId::new()), Err(StoreError::NotFound)));
        assert!(matches!(
            store.update_user(&sample_user("Ghost")),
            Err(StoreError::NotFound)
        ));
        assert_eq!(
            decide(&store, RequestId::new(), UserId::new(), RequestStatus::Accepted).unwrap(),
            Decision::NotFound
        );
    }

    #[test]
    fn decide_only_from_pending() {
        let store = MemoryStore::new();
        let (ana, ben) = (sample_user("Ana"), sample_user("Ben"));
        let request = sample_request(&ben, &ana);
        store.insert_request(&request, &sample_notice()).unwrap();

        assert_eq!(
            decide(&store, request.id, ben.id, RequestStatus::Accepted).unwrap(),
            Decision::NotFound
        );
        assert!(matches!(
            decide(&store, request.id, ana.id, RequestStatus::Rejected).unwrap(),
            Decision::Applied(r) if r.status == RequestStatus::Rejected && r.updated_at.is_some()
        ));
        assert!(matches!(
            decide(&store, request.id, ana.id, RequestStatus::Accepted).unwrap(),
            Decision::NotPending(r) if r.status == RequestStatus::Rejected
        ));
        assert_eq!(store.list_notifications_for(ben.id).unwrap().len(), 1);
    }

    #[test]
    fn request_writes_fill_both_feeds() {
        let store = MemoryStore::new();
        let (ana, ben) = (sample_user("Ana"), sample_user("Ben"));
        let request = sample_request(&ben, &ana);
        store.insert_request(&request, &sample_notice()).unwrap();
        store
            .decide_request(
                request.id,
                ana.id,
                RequestStatus::Accepted,
                Utc::now(),
                &Notice::new(NotificationKind::RequestAccepted, "Your request to Ana was accepted"),
            )
            .unwrap();

        let to_ana = store.list_notifications_for(ana.id).unwrap();
        let to_ben = store.list_notifications_for(ben.id).unwrap();
        assert_eq!(to_ana.len(), 1);
        assert_eq!(to_ana[0].created_at, request.created_at);
        assert_eq!(to_ben.len(), 1);
        assert_eq!(to_ben[0].kind, NotificationKind::RequestAccepted);
        assert!(store.list_notifications_for(UserId::new()).unwrap().is_empty());
    }

    #[test]
    fn unwritable_feed_blocks_the_request_write() {
        let store = MemoryStore::new();
        let (ana, ben) = (sample_user("Ana"), sample_user("Ben"));
        let request = sample_request(&ben, &ana);
        store.insert_request(&request, &sample_notice()).unwrap();
        poison_notifications(&store);

        assert!(matches!(
            decide(&store, request.id, ana.id, RequestStatus::Accepted),
            Err(StoreError::LockPoisoned("notifications"))
        ));
        assert!(matches!(
            store.insert_request(&sample_request(&ana, &ben), &sample_notice()),
            Err(StoreError::LockPoisoned("notifications"))
        ));
        let listed = store.list_requests_for(ana.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, RequestStatus::Pending);

        // retry succeeds once the feed recovers
        store.notifications.clear_poison();
        assert!(matches!(
            decide(&store, request.id, ana.id, RequestStatus::Accepted).unwrap(),
            Decision::Applied(_)
        ));
        assert_eq!(store.list_notifications_for(ben.id).unwrap().len(), 1);
    }

    #[test]
    fn racing_decisions_apply_exactly_once() {
        let store = Arc::new(MemoryStore::new());
        let (ana, ben) = (sample_user("Ana"), sample_user("Ben"));
        let request = sample_request(&ben, &ana);
        store.insert_request(&request, &sample_notice()).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                let status = if i % 2 == 0 {
                    RequestStatus::Accepted
                } else {
                    RequestStatus::Rejected
                };
                let (id, recipient) = (request.id, ana.id);
                thread::spawn(move || decide(&store, id, recipient, status).unwrap())
            })
            .collect();

        let applied = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|d| matches!(d, Decision::Applied(_)))
            .count();
        assert_eq!(applied, 1);
        assert_eq!(store.list_notifications_for(ben.id).unwrap().len(), 1);
    }
}
