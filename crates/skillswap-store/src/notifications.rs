use rusqlite::{params, Connection};

use skillswap_shared::{NotificationId, NotificationKind, UserId};

use crate::codec::{enum_at, timestamp_at, uuid_at};
use crate::database::Database;
use crate::error::Result;
use crate::models::Notification;

/// Feeds are only written from inside a request transaction, so this takes
/// the transaction's connection rather than a [`Database`].
pub(crate) fn insert_notification(conn: &Connection, notification: &Notification) -> Result<()> {
    conn.execute(
        "INSERT INTO notifications (id, user_id, kind, message, read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            notification.id.to_string(),
            notification.user_id.to_string(),
            notification.kind.as_str(),
            notification.message,
            notification.read,
            notification.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

impl Database {
    pub fn list_notifications_for(&self, user: UserId) -> Result<Vec<Notification>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, kind, message, read, created_at
             FROM notifications
             WHERE user_id = ?1
             ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map(params![user.to_string()], row_to_notification)?;

        let mut notifications = Vec::new();
        for row in rows {
            notifications.push(row?);
        }
        Ok(notifications)
    }
}

fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: NotificationId(uuid_at(row, 0)?),
        user_id: UserId(uuid_at(row, 1)?),
        kind: enum_at(row, 2, NotificationKind::parse)?,
        message: row.get(3)?,
        read: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
    })
}
