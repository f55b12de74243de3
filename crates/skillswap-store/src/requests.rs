//! CRUD operations for [`SwapRequest`] records.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use skillswap_shared::{RequestId, RequestStatus, UserId};

use crate::codec::{enum_at, optional_timestamp_at, timestamp_at, uuid_at};
use crate::database::Database;
use crate::error::Result;
use crate::models::{Notice, Participant, SwapRequest};
use crate::notifications::insert_notification;
use crate::stores::Decision;

const REQUEST_COLUMNS: &str = "id,
     sender_id, sender_name, sender_photo, sender_rating,
     recipient_id, recipient_name, recipient_photo, recipient_rating,
     offered_skill, wanted_skill, message, status, created_at, updated_at";

impl Database {
    /// Store a new request and the recipient's notice in one transaction.
    pub fn insert_request(&mut self, request: &SwapRequest, notice: &Notice) -> Result<()> {
        let tx = self.conn_mut().transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO swap_requests ({REQUEST_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ),
            params![
                request.id.to_string(),
                request.from_user.id.to_string(),
                request.from_user.name,
                request.from_user.profile_photo,
                request.from_user.rating,
                request.to_user.id.to_string(),
                request.to_user.name,
                request.to_user.profile_photo,
                request.to_user.rating,
                request.offered_skill,
                request.wanted_skill,
                request.message,
                request.status.as_str(),
                request.created_at.to_rfc3339(),
                request.updated_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        insert_notification(&tx, &notice.deliver(request.recipient_id(), request.created_at))?;
        tx.commit()?;
        Ok(())
    }

    /// Requests the user sent or received, in creation order.
    pub fn list_requests_for(&self, user: UserId) -> Result<Vec<SwapRequest>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {REQUEST_COLUMNS}
             FROM swap_requests
             WHERE sender_id = ?1 OR recipient_id = ?1
             ORDER BY rowid ASC"
        ))?;

        let rows = stmt.query_map(params![user.to_string()], row_to_request)?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row?);
        }
        Ok(requests)
    }

    /// Move a pending request addressed to `recipient` into `status` and
    /// notify its sender.
    ///
    /// Lookup, pending check, update and notice share one transaction and
    /// the update itself is conditional on `status = 'pending'`, so at most
    /// one caller ever observes [`Decision::Applied`] for a given request.
    /// If the notice cannot be written the request stays pending.
    pub fn decide_request(
        &mut self,
        id: RequestId,
        recipient: UserId,
        status: RequestStatus,
        at: DateTime<Utc>,
        notice: &Notice,
    ) -> Result<Decision> {
        let tx = self.conn_mut().transaction()?;

        let current = tx
            .query_row(
                &format!(
                    "SELECT {REQUEST_COLUMNS} FROM swap_requests
                     WHERE id = ?1 AND recipient_id = ?2"
                ),
                params![id.to_string(), recipient.to_string()],
                row_to_request,
            )
            .optional()?;

        let Some(mut request) = current else {
            return Ok(Decision::NotFound);
        };

        if request.status.is_terminal() {
            return Ok(Decision::NotPending(request));
        }

        let affected = tx.execute(
            "UPDATE swap_requests SET status = ?1, updated_at = ?2
             WHERE id = ?3 AND status = 'pending'",
            params![status.as_str(), at.to_rfc3339(), id.to_string()],
        )?;
        if affected == 0 {
            return Ok(Decision::NotPending(request));
        }

        insert_notification(&tx, &notice.deliver(request.sender_id(), at))?;
        tx.commit()?;

        request.status = status;
        request.updated_at = Some(at);
        Ok(Decision::Applied(request))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<SwapRequest> {
    Ok(SwapRequest {
        id: RequestId(uuid_at(row, 0)?),
        from_user: Participant {
            id: UserId(uuid_at(row, 1)?),
            name: row.get(2)?,
            profile_photo: row.get(3)?,
            rating: row.get(4)?,
        },
        to_user: Participant {
            id: UserId(uuid_at(row, 5)?),
            name: row.get(6)?,
            profile_photo: row.get(7)?,
            rating: row.get(8)?,
        },
        offered_skill: row.get(9)?,
        wanted_skill: row.get(10)?,
        message: row.get(11)?,
        status: enum_at(row, 12, RequestStatus::parse)?,
        created_at: timestamp_at(row, 13)?,
        updated_at: optional_timestamp_at(row, 14)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_notice, sample_request, sample_user};
    use crate::models::User;
    use crate::StoreError;

    fn seeded() -> (Database, User, User) {
        let db = Database::open_in_memory().unwrap();
        let ana = sample_user("Ana");
        let ben = sample_user("Ben");
        db.insert_user(&ana).unwrap();
        db.insert_user(&ben).unwrap();
        (db, ana, ben)
    }

    fn park_notifications(db: &Database) {
        db.conn()
            .execute_batch("ALTER TABLE notifications RENAME TO notifications_parked")
            .unwrap();
    }

    fn restore_notifications(db: &Database) {
        db.conn()
            .execute_batch("ALTER TABLE notifications_parked RENAME TO notifications")
            .unwrap();
    }

    #[test]
    fn insert_then_list_with_recipient_notice() {
        let (mut db, ana, ben) = seeded();
        let request = sample_request(&ben, &ana);
        db.insert_request(&request, &sample_notice()).unwrap();

        assert_eq!(db.list_requests_for(ana.id).unwrap(), vec![request.clone()]);

        let feed = db.list_notifications_for(ana.id).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].created_at, request.created_at);
        assert!(db.list_notifications_for(ben.id).unwrap().is_empty());
    }

    #[test]
    fn insert_is_undone_when_the_notice_fails() {
        let (mut db, ana, ben) = seeded();
        park_notifications(&db);

        let request = sample_request(&ben, &ana);
        assert!(matches!(
            db.insert_request(&request, &sample_notice()),
            Err(StoreError::Sqlite(_))
        ));

        restore_notifications(&db);
        assert!(db.list_requests_for(ana.id).unwrap().is_empty());
        assert!(db.list_notifications_for(ana.id).unwrap().is_empty());
    }

    #[test]
    fn listing_covers_both_directions_in_creation_order() {
        let (mut db, ana, ben) = seeded();
        let carl = sample_user("Carl");
        db.insert_user(&carl).unwrap();

        let first = sample_request(&ben, &ana);
        let second = sample_request(&ana, &carl);
        let unrelated = sample_request(&carl, &ben);
        for r in [&first, &second, &unrelated] {
            db.insert_request(r, &sample_notice()).unwrap();
        }

        let ids: Vec<RequestId> = db
            .list_requests_for(ana.id)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(db.list_requests_for(UserId::new()).unwrap().is_empty());
    }

    #[test]
    fn decide_applies_once() {
        let (mut db, ana, ben) = seeded();
        let request = sample_request(&ben, &ana);
        db.insert_request(&request, &sample_notice()).unwrap();

        let now = Utc::now();
        match db
            .decide_request(request.id, ana.id, RequestStatus::Accepted, now, &sample_notice())
            .unwrap()
        {
            Decision::Applied(updated) => {
                assert_eq!(updated.status, RequestStatus::Accepted);
                assert_eq!(updated.updated_at, Some(now));
            }
            other => panic!("expected Applied, got {other:?}"),
        }

        let again = db
            .decide_request(request.id, ana.id, RequestStatus::Rejected, Utc::now(), &sample_notice())
            .unwrap();
        assert!(matches!(again, Decision::NotPending(r) if r.status == RequestStatus::Accepted));

        let stored = &db.list_requests_for(ana.id).unwrap()[0];
        assert_eq!(stored.status, RequestStatus::Accepted);
        assert_eq!(stored.updated_at, Some(now));

        let feed = db.list_notifications_for(ben.id).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].created_at, now);
    }

    #[test]
    fn failed_notice_leaves_the_request_pending() {
        let (mut db, ana, ben) = seeded();
        let request = sample_request(&ben, &ana);
        db.insert_request(&request, &sample_notice()).unwrap();
        park_notifications(&db);

        assert!(db
            .decide_request(request.id, ana.id, RequestStatus::Accepted, Utc::now(), &sample_notice())
            .is_err());

        restore_notifications(&db);
        assert_eq!(db.list_requests_for(ana.id).unwrap()[0].status, RequestStatus::Pending);
        assert!(db.list_notifications_for(ben.id).unwrap().is_empty());

        // the decision can be retried once the feed is writable again
        assert!(matches!(
            db.decide_request(request.id, ana.id, RequestStatus::Accepted, Utc::now(), &sample_notice())
                .unwrap(),
            Decision::Applied(_)
        ));
        assert_eq!(db.list_notifications_for(ben.id).unwrap().len(), 1);
    }

    #[test]
    fn only_the_recipient_can_decide() {
        let (mut db, ana, ben) = seeded();
        let request = sample_request(&ben, &ana);
        db.insert_request(&request, &sample_notice()).unwrap();

        let by_sender = db
            .decide_request(request.id, ben.id, RequestStatus::Accepted, Utc::now(), &sample_notice())
            .unwrap();
        assert!(matches!(by_sender, Decision::NotFound));
        assert_eq!(db.list_requests_for(ana.id).unwrap()[0].status, RequestStatus::Pending);
        assert!(db.list_notifications_for(ben.id).unwrap().is_empty());
    }
}
