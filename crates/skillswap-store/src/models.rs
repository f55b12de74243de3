//! Domain model structs persisted by every backend.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! names so it can be handed straight to the presentation layer as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skillswap_shared::{
    Availability, NotificationId, NotificationKind, RequestId, RequestStatus, UserId, Visibility,
};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered marketplace member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Stored trimmed and lower-cased; unique across users.
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub location: String,
    pub bio: String,
    /// Avatar marker: a single upper-cased initial until a photo exists.
    pub profile_photo: String,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub availability: Availability,
    #[serde(rename = "profileVisibility")]
    pub visibility: Visibility,
    /// Reputation, 0.0 to 5.0.
    pub rating: f64,
    pub total_swaps: u32,
    pub response_time: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Snapshot embedded in swap requests.
    pub fn participant(&self) -> Participant {
        Participant {
            id: self.id,
            name: self.name.clone(),
            profile_photo: self.profile_photo.clone(),
            rating: self.rating,
        }
    }
}

// ---------------------------------------------------------------------------
// Swap request
// ---------------------------------------------------------------------------

/// The sender or recipient of a swap request as they looked when it was sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: UserId,
    pub name: String,
    pub profile_photo: String,
    pub rating: f64,
}

/// A proposal to trade `offered_skill` for `wanted_skill`.
///
/// Immutable after creation apart from `status` and `updated_at`, which the
/// recipient sets exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: RequestId,
    pub from_user: Participant,
    pub to_user: Participant,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SwapRequest {
    pub fn sender_id(&self) -> UserId {
        self.from_user.id
    }

    pub fn recipient_id(&self) -> UserId {
        self.to_user.id
    }

    pub fn involves(&self, user: UserId) -> bool {
        self.sender_id() == user || self.recipient_id() == user
    }
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// An entry in a user's append-only notification feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Feed entry written in the same store operation as a request change.
///
/// The store picks the owner (recipient on insert, sender on a decision)
/// and the timestamp from the request it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn deliver(&self, user: UserId, at: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: user,
            kind: self.kind,
            message: self.message.clone(),
            read: false,
            created_at: at,
        }
    }
}
