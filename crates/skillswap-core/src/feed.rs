use std::sync::Arc;

use tracing::debug;

use skillswap_shared::UserId;
use skillswap_store::{Notification, NotificationStore};

use crate::error::Result;

/// Per-user append-only notification feed. Entries are written by the
/// request lifecycle together with the request change they describe.
#[derive(Clone)]
pub struct NotificationFeed {
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationFeed {
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    pub fn list_notifications(&self, user: UserId) -> Result<Vec<Notification>> {
        let feed = self.notifications.list_notifications_for(user)?;
        debug!(%user, count = feed.len(), "notification feed read");
        Ok(feed)
    }
}
