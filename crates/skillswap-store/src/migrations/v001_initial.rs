//! v001 -- Initial schema creation.
//!
//! Creates the three collections: `users`, `swap_requests` and
//! `notifications`. Listing order everywhere is insertion order (`rowid`).

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id             TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    name           TEXT NOT NULL,
    email          TEXT NOT NULL UNIQUE,        -- normalized (trimmed, lower-case)
    password_hash  TEXT NOT NULL,               -- argon2 PHC string
    location       TEXT NOT NULL,
    bio            TEXT NOT NULL DEFAULT '',
    profile_photo  TEXT NOT NULL,
    skills_offered TEXT NOT NULL DEFAULT '[]',  -- JSON array
    skills_wanted  TEXT NOT NULL DEFAULT '[]',  -- JSON array
    availability   TEXT NOT NULL,
    visibility     TEXT NOT NULL,
    rating         REAL NOT NULL DEFAULT 0,
    total_swaps    INTEGER NOT NULL DEFAULT 0,
    response_time  TEXT NOT NULL,
    created_at     TEXT NOT NULL                -- RFC-3339
);

-- ----------------------------------------------------------------
-- Swap requests (participant columns are snapshots at creation)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS swap_requests (
    id               TEXT PRIMARY KEY NOT NULL,
    sender_id        TEXT NOT NULL,
    sender_name      TEXT NOT NULL,
    sender_photo     TEXT NOT NULL,
    sender_rating    REAL NOT NULL,
    recipient_id     TEXT NOT NULL,
    recipient_name   TEXT NOT NULL,
    recipient_photo  TEXT NOT NULL,
    recipient_rating REAL NOT NULL,
    offered_skill    TEXT NOT NULL,
    wanted_skill     TEXT NOT NULL,
    message          TEXT NOT NULL,
    status           TEXT NOT NULL DEFAULT 'pending',
    created_at       TEXT NOT NULL,
    updated_at       TEXT,

    FOREIGN KEY (sender_id) REFERENCES users(id),
    FOREIGN KEY (recipient_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_swap_requests_sender ON swap_requests(sender_id);
CREATE INDEX IF NOT EXISTS idx_swap_requests_recipient ON swap_requests(recipient_id);

-- ----------------------------------------------------------------
-- Notifications (append-only)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS notifications (
    id         TEXT PRIMARY KEY NOT NULL,
    user_id    TEXT NOT NULL,
    kind       TEXT NOT NULL,
    message    TEXT NOT NULL,
    read       INTEGER NOT NULL DEFAULT 0,    -- boolean 0/1
    created_at TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
