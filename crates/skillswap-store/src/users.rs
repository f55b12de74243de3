//! CRUD operations for [`User`] records.

use rusqlite::{ffi, params, OptionalExtension};

use skillswap_shared::{Availability, UserId, Visibility};

use crate::codec::{enum_at, json_list_at, not_found, timestamp_at, uuid_at};
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::User;

const USER_COLUMNS: &str = "id, name, email, password_hash, location, bio, profile_photo,
     skills_offered, skills_wanted, availability, visibility, rating, total_swaps,
     response_time, created_at";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new user. Fails with [`StoreError::Conflict`] when the email
    /// is already registered.
    pub fn insert_user(&self, user: &User) -> Result<()> {
        let result = self.conn().execute(
            &format!(
                "INSERT INTO users ({USER_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ),
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.location,
                user.bio,
                user.profile_photo,
                serde_json::to_string(&user.skills_offered)?,
                serde_json::to_string(&user.skills_wanted)?,
                user.availability.as_str(),
                user.visibility.as_str(),
                user.rating,
                user.total_swaps,
                user.response_time,
                user.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            // `email` is the only UNIQUE column
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StoreError::Conflict("email already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_user(&self, id: UserId) -> Result<User> {
        self.conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id.to_string()],
                row_to_user,
            )
            .map_err(not_found)
    }

    /// Look up a user by normalized email.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// All users in registration order.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid ASC"))?;

        let rows = stmt.query_map([], row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Overwrite the mutable profile columns of an existing user.
    pub fn update_user(&self, user: &User) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE users SET
                name = ?2, location = ?3, bio = ?4, profile_photo = ?5,
                skills_offered = ?6, skills_wanted = ?7, availability = ?8,
                visibility = ?9, rating = ?10, total_swaps = ?11, response_time = ?12
             WHERE id = ?1",
            params![
                user.id.to_string(),
                user.name,
                user.location,
                user.bio,
                user.profile_photo,
                serde_json::to_string(&user.skills_offered)?,
                serde_json::to_string(&user.skills_wanted)?,
                user.availability.as_str(),
                user.visibility.as_str(),
                user.rating,
                user.total_swaps,
                user.response_time,
            ],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(uuid_at(row, 0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        location: row.get(4)?,
        bio: row.get(5)?,
        profile_photo: row.get(6)?,
        skills_offered: json_list_at(row, 7)?,
        skills_wanted: json_list_at(row, 8)?,
        availability: enum_at(row, 9, Availability::parse)?,
        visibility: enum_at(row, 10, Visibility::parse)?,
        rating: row.get(11)?,
        total_swaps: row.get(12)?,
        response_time: row.get(13)?,
        created_at: timestamp_at(row, 14)?,
    })
}
