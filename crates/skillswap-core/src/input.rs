//! Request bodies accepted by the marketplace operations.
//!
//! Each operation has its own explicit struct. Unknown fields are rejected at
//! deserialization; missing text fields deserialize as empty strings so the
//! operation can report them as a validation error with a useful message.

use serde::Deserialize;

use skillswap_shared::constants::{MAX_MESSAGE_LEN, MAX_SKILL_LEN};
use skillswap_shared::{Availability, RequestId, RequestStatus, UserId, Visibility};

use crate::error::{MarketError, Result};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Registration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub location: String,
}

impl Registration {
    /// Trim the text fields, lower-case the email and require all four.
    pub fn normalized(self) -> Result<Self> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
            location: self.location.trim().to_string(),
        };
        if normalized.name.is_empty()
            || normalized.email.is_empty()
            || normalized.password.is_empty()
            || normalized.location.is_empty()
        {
            return Err(MarketError::validation(ALL_FIELDS_REQUIRED));
        }
        Ok(normalized)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Login {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Login {
    pub fn normalized(self) -> Result<Self> {
        let email = normalize_email(&self.email);
        if email.is_empty() || self.password.is_empty() {
            return Err(MarketError::validation("Email and password are required"));
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

/// Optional-field patch for `PUT /users/profile`. Only fields present in the
/// body overwrite the stored profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
    pub availability: Option<Availability>,
    pub profile_visibility: Option<Visibility>,
    pub bio: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.skills_offered.is_none()
            && self.skills_wanted.is_none()
            && self.availability.is_none()
            && self.profile_visibility.is_none()
            && self.bio.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSwapRequest {
    #[serde(default)]
    pub to_user_id: String,
    #[serde(default)]
    pub offered_skill: String,
    #[serde(default)]
    pub wanted_skill: String,
    #[serde(default)]
    pub message: String,
}

/// A [`NewSwapRequest`] that passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSwapRequest {
    pub recipient: UserId,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub message: String,
}

impl NewSwapRequest {
    pub fn validate(self, sender: UserId) -> Result<ValidSwapRequest> {
        let to_user_id = self.to_user_id.trim();
        let offered_skill = self.offered_skill.trim();
        let wanted_skill = self.wanted_skill.trim();
        let message = self.message.trim();

        if to_user_id.is_empty()
            || offered_skill.is_empty()
            || wanted_skill.is_empty()
            || message.is_empty()
        {
            return Err(MarketError::validation(ALL_FIELDS_REQUIRED));
        }

        // an id that cannot name a user resolves to no user
        let recipient = UserId::parse(to_user_id)
            .map_err(|_| MarketError::not_found(crate::lifecycle::RECIPIENT_NOT_FOUND))?;
        if recipient == sender {
            return Err(MarketError::validation(
                "Cannot send a swap request to yourself",
            ));
        }

        if offered_skill.chars().count() > MAX_SKILL_LEN
            || wanted_skill.chars().count() > MAX_SKILL_LEN
        {
            return Err(MarketError::Validation(format!(
                "Skill names are limited to {MAX_SKILL_LEN} characters"
            )));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(MarketError::Validation(format!(
                "Message is limited to {MAX_MESSAGE_LEN} characters"
            )));
        }

        Ok(ValidSwapRequest {
            recipient,
            offered_skill: offered_skill.to_string(),
            wanted_skill: wanted_skill.to_string(),
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
}

impl StatusUpdate {
    /// Only the two terminal statuses can be requested.
    pub fn decision(&self) -> Result<RequestStatus> {
        match RequestStatus::parse(self.status.trim()) {
            Some(status) if status.is_terminal() => Ok(status),
            _ => Err(MarketError::validation("Invalid status")),
        }
    }
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub availability: Option<String>,
}

impl DirectoryQuery {
    /// `None` for no filter (absent, blank or `all`).
    pub fn availability_filter(&self) -> Result<Option<Availability>> {
        match self.availability.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
            Some(value) => Availability::parse(value)
                .map(Some)
                .ok_or_else(|| MarketError::Validation(format!("Unknown availability '{value}'"))),
        }
    }

    /// Lower-cased search term, `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Request ids arrive as path segments. A malformed id cannot name a request,
/// so it reports the same not-found error as an unknown one.
pub fn parse_request_id(raw: &str) -> Result<RequestId> {
    RequestId::parse(raw).map_err(|_| MarketError::not_found(crate::lifecycle::REQUEST_NOT_FOUND))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim entries, drop blanks and case-insensitive duplicates (first spelling
/// wins), keep order.
pub fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}
