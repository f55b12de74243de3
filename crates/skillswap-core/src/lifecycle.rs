//! Swap request lifecycle.
//!
//! A request is created `pending` and moves to `accepted` or `rejected`
//! exactly once, by its recipient. Creation notifies the recipient; a
//! decision notifies the sender. Each write and its notification are one
//! store operation ([`RequestStore::insert_request`],
//! [`RequestStore::decide_request`]), so a failed write leaves neither behind
//! and two racing decisions on one request produce one success and one
//! conflict.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use skillswap_shared::{NotificationKind, RequestId, RequestStatus, UserId};
use skillswap_store::{Decision, Notice, RequestStore, StoreError, SwapRequest, User, UserStore};

use crate::error::{MarketError, Result};
use crate::input::{NewSwapRequest, StatusUpdate};

pub(crate) const REQUEST_NOT_FOUND: &str = "Request not found or unauthorized";
pub(crate) const RECIPIENT_NOT_FOUND: &str = "Recipient user not found";

#[derive(Clone)]
pub struct RequestEngine {
    users: Arc<dyn UserStore>,
    requests: Arc<dyn RequestStore>,
}

impl RequestEngine {
    pub fn new(users: Arc<dyn UserStore>, requests: Arc<dyn RequestStore>) -> Self {
        Self { users, requests }
    }

    pub fn create_request(&self, sender: &User, input: NewSwapRequest) -> Result<SwapRequest> {
        let input = input.validate(sender.id)?;

        let recipient = self.users.get_user(input.recipient).map_err(|e| match e {
            StoreError::NotFound => MarketError::not_found(RECIPIENT_NOT_FOUND),
            other => other.into(),
        })?;

        let request = SwapRequest {
            id: RequestId::new(),
            from_user: sender.participant(),
            to_user: recipient.participant(),
            offered_skill: input.offered_skill,
            wanted_skill: input.wanted_skill,
            message: input.message,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        let notice = Notice::new(
            NotificationKind::RequestReceived,
            format!("New skill swap request from {}", sender.name),
        );
        self.requests.insert_request(&request, &notice).map_err(|e| {
            error!(from = %sender.id, to = %recipient.id, error = %e, "failed to store request");
            MarketError::from(e)
        })?;

        info!(
            request = %request.id,
            from = %sender.id,
            to = %recipient.id,
            "swap request created"
        );
        Ok(request)
    }

    /// Requests `user` sent or received, oldest first.
    pub fn list_requests(&self, user: UserId) -> Result<Vec<SwapRequest>> {
        let requests = self.requests.list_requests_for(user)?;
        debug!(%user, count = requests.len(), "requests listed");
        Ok(requests)
    }

    /// Accept or reject a pending request addressed to `actor`.
    pub fn transition_status(
        &self,
        id: RequestId,
        actor: &User,
        update: StatusUpdate,
    ) -> Result<SwapRequest> {
        let status = update.decision()?;

        // `decision()` only yields terminal statuses
        let kind = NotificationKind::for_decision(status).ok_or_else(|| {
            MarketError::Internal(format!("no notification kind for status {status}"))
        })?;
        let notice = Notice::new(kind, format!("Your request to {} was {status}", actor.name));

        let decision = self
            .requests
            .decide_request(id, actor.id, status, Utc::now(), &notice)
            .map_err(|e| {
                error!(request = %id, %status, error = %e, "failed to record decision");
                MarketError::from(e)
            })?;

        let request = match decision {
            Decision::Applied(request) => request,
            Decision::NotPending(current) => {
                warn!(request = %id, current = %current.status, "request already decided");
                return Err(MarketError::Conflict(format!(
                    "Request is already {}",
                    current.status
                )));
            }
            Decision::NotFound => return Err(MarketError::not_found(REQUEST_NOT_FOUND)),
        };

        info!(request = %id, %status, by = %actor.id, "swap request decided");
        Ok(request)
    }
}
