use chrono::Utc;

use skillswap_shared::{
    Availability, NotificationKind, RequestId, RequestStatus, UserId, Visibility,
};

use crate::models::{Notice, SwapRequest, User};

pub(crate) fn sample_user(name: &str) -> User {
    User {
        id: UserId::new(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: "$argon2id$stub".to_string(),
        location: "Lisbon".to_string(),
        bio: String::new(),
        profile_photo: name[..1].to_uppercase(),
        skills_offered: vec!["Guitar".to_string()],
        skills_wanted: vec!["Cooking".to_string()],
        availability: Availability::Weekends,
        visibility: Visibility::Public,
        rating: 0.0,
        total_swaps: 0,
        response_time: "within a day".to_string(),
        created_at: Utc::now(),
    }
}

pub(crate) fn sample_request(from: &User, to: &User) -> SwapRequest {
    SwapRequest {
        id: RequestId::new(),
        from_user: from.participant(),
        to_user: to.participant(),
        offered_skill: "Cooking".to_string(),
        wanted_skill: "Guitar".to_string(),
        message: "Teach me?".to_string(),
        status: RequestStatus::Pending,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub(crate) fn sample_notice() -> Notice {
    Notice::new(NotificationKind::RequestReceived, "New skill swap request")
}
