use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identity of a registered user.
    UserId
);
uuid_id!(
    /// Identity of a swap request.
    RequestId
);
uuid_id!(NotificationId);

/// Self-declared time window a user is reachable for exchanges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    Weekends,
    Weekdays,
    Evenings,
    Flexible,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekends => "weekends",
            Self::Weekdays => "weekdays",
            Self::Evenings => "evenings",
            Self::Flexible => "flexible",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekends" => Some(Self::Weekends),
            "weekdays" => Some(Self::Weekdays),
            "evenings" => Some(Self::Evenings),
            "flexible" => Some(Self::Flexible),
            _ => None,
        }
    }
}

/// Whether a profile shows up in directory listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Lifecycle state of a swap request.
///
/// `Pending` is the only non-terminal state; a request moves to `Accepted`
/// or `Rejected` exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event recorded in a user's notification feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RequestReceived,
    RequestAccepted,
    RequestRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestReceived => "request_received",
            Self::RequestAccepted => "request_accepted",
            Self::RequestRejected => "request_rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "request_received" => Some(Self::RequestReceived),
            "request_accepted" => Some(Self::RequestAccepted),
            "request_rejected" => Some(Self::RequestRejected),
            _ => None,
        }
    }

    /// The kind sent to a request's sender when it reaches `status`.
    pub fn for_decision(status: RequestStatus) -> Option<Self> {
        match status {
            RequestStatus::Accepted => Some(Self::RequestAccepted),
            RequestStatus::Rejected => Some(Self::RequestRejected),
            RequestStatus::Pending => None,
        }
    }
}
