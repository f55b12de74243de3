//! Collection interfaces the marketplace logic is written against, plus the
//! SQLite-backed implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use skillswap_shared::{RequestId, RequestStatus, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Notice, Notification, SwapRequest, User};

/// Outcome of a recipient's attempt to decide a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The request was pending and now carries the new status.
    Applied(SwapRequest),
    /// The request exists and belongs to the recipient but was already
    /// decided. Carries the request as stored.
    NotPending(SwapRequest),
    /// No request with that id is addressed to the recipient.
    NotFound,
}

pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    fn insert_user(&self, user: &User) -> Result<()>;

    /// Fails with [`StoreError::NotFound`] for unknown ids.
    fn get_user(&self, id: UserId) -> Result<User>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Fails with [`StoreError::NotFound`] for unknown ids.
    fn update_user(&self, user: &User) -> Result<()>;

    /// Every user, in registration order.
    fn list_users(&self) -> Result<Vec<User>>;
}

/// Request writes carry the [`Notice`] they produce. A backend stores both or
/// neither, so a failed write can be retried without losing or duplicating
/// feed entries.
pub trait RequestStore: Send + Sync {
    /// Store a new request and deliver `notice` to its recipient.
    fn insert_request(&self, request: &SwapRequest, notice: &Notice) -> Result<()>;

    /// Requests where `user` is sender or recipient, in creation order.
    fn list_requests_for(&self, user: UserId) -> Result<Vec<SwapRequest>>;

    /// Atomic check-and-set of a pending request's status. On
    /// [`Decision::Applied`] `notice` has been delivered to the sender.
    fn decide_request(
        &self,
        id: RequestId,
        recipient: UserId,
        status: RequestStatus,
        at: DateTime<Utc>,
        notice: &Notice,
    ) -> Result<Decision>;
}

/// Read side of the per-user feeds. Entries are written by [`RequestStore`].
pub trait NotificationStore: Send + Sync {
    /// The user's feed, in creation order.
    fn list_notifications_for(&self, user: UserId) -> Result<Vec<Notification>>;
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// A [`Database`] shared between request handlers.
///
/// `rusqlite::Connection` is not `Sync`, so every call takes the mutex; SQLite
/// itself serializes writers anyway.
pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        Database::open_at(path).map(Self::new)
    }

    pub fn open_default() -> Result<Self> {
        Database::open_default().map(Self::new)
    }

    pub fn open_in_memory() -> Result<Self> {
        Database::open_in_memory().map(Self::new)
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| StoreError::LockPoisoned("sqlite connection"))
    }
}

impl UserStore for SqliteStore {
    fn insert_user(&self, user: &User) -> Result<()> {
        self.db()?.insert_user(user)
    }

    fn get_user(&self, id: UserId) -> Result<User> {
        self.db()?.get_user(id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.db()?.find_user_by_email(email)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        self.db()?.update_user(user)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.db()?.list_users()
    }
}

impl RequestStore for SqliteStore {
    fn insert_request(&self, request: &SwapRequest, notice: &Notice) -> Result<()> {
        self.db()?.insert_request(request, notice)
    }

    fn list_requests_for(&self, user: UserId) -> Result<Vec<SwapRequest>> {
        self.db()?.list_requests_for(user)
    }

    fn decide_request(
        &self,
        id: RequestId,
        recipient: UserId,
        status: RequestStatus,
        at: DateTime<Utc>,
        notice: &Notice,
    ) -> Result<Decision> {
        self.db()?.decide_request(id, recipient, status, at, notice)
    }
}

impl NotificationStore for SqliteStore {
    fn list_notifications_for(&self, user: UserId) -> Result<Vec<Notification>> {
        self.db()?.list_notifications_for(user)
    }
}
