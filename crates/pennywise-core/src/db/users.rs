//! User accounts, credentials, and profiles

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::auth::{hash_password, verify_password};
use crate::error::{Error, Result};
use crate::models::{AdminUserUpdate, NewUser, ProfileUpdate, Role, User};
use crate::validation;

pub(crate) const DUPLICATE_EMAIL: &str = "This email is already registered. Please login instead.";
pub(crate) const INVALID_CREDENTIALS: &str = "Invalid email or password";

const USER_COLUMNS: &str =
    "id, name, email, role, phone_number, address, bio, photo_url, created_at";

impl Database {
    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role_str: String = row.get(3)?;
        let created_at_str: String = row.get(8)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role: role_str.parse().unwrap_or_default(),
            phone_number: row.get(4)?,
            address: row.get(5)?,
            bio: row.get(6)?,
            photo_url: row.get(7)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool> {
        let conn = self.conn()?;
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        Ok(matches!(existing, Some(id) if Some(id) != except_id))
    }

    /// Register a new user, hashing the password
    ///
    /// The role defaults to `user` when the input does not name one.
    pub fn register_user(&self, input: &NewUser) -> Result<User> {
        let input = input.normalized()?;

        if self.email_taken(&input.email, None)? {
            return Err(Error::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let role = input.role.unwrap_or_default();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)",
            params![input.name, input.email, password_hash, role.as_str()],
        )?;
        let id = conn.last_insert_rowid();
        info!("Registered user {} ({})", id, role);

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Look up a user by email and check the password
    ///
    /// Unknown email and wrong password produce the same error.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = validation::normalize_email(email);
        let conn = self.conn()?;

        let found: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE email = ?",
                params![email],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match found {
            Some((id, hash)) if verify_password(password, &hash) => self
                .get_user(id)?
                .ok_or_else(|| Error::Auth(INVALID_CREDENTIALS.to_string())),
            _ => Err(Error::Auth(INVALID_CREDENTIALS.to_string())),
        }
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![validation::normalize_email(email)],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users, newest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Apply a validated profile update
    pub fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<User> {
        update.validate()?;

        let email = update.email.as_deref().map(validation::normalize_email);
        if let Some(email) = &email {
            if self.email_taken(email, Some(id))? {
                return Err(Error::Conflict("Email is already in use".to_string()));
            }
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE users SET
                name = COALESCE(?1, name),
                email = COALESCE(?2, email),
                phone_number = COALESCE(?3, phone_number),
                address = COALESCE(?4, address),
                bio = COALESCE(?5, bio),
                photo_url = COALESCE(?6, photo_url)
            WHERE id = ?7
            "#,
            params![
                update.name.as_deref().map(str::trim),
                email,
                update.phone_number,
                update.address,
                update.bio,
                update.photo_url,
                id
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("User {}", id)));
        }

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Replace the password after checking the current one
    pub fn change_password(&self, id: i64, old_password: &str, new_password: &str) -> Result<()> {
        let conn = self.conn()?;
        let hash: Option<String> = conn
            .query_row(
                "SELECT password_hash FROM users WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        let hash = hash.ok_or_else(|| Error::NotFound(format!("User {}", id)))?;
        if !verify_password(old_password, &hash) {
            return Err(Error::InvalidData("Old password is incorrect".to_string()));
        }
        validation::check_password(new_password)?;

        conn.execute(
            "UPDATE users SET password_hash = ? WHERE id = ?",
            params![hash_password(new_password)?, id],
        )?;
        Ok(())
    }

    /// Admin edit of name, email, or role
    pub fn admin_update_user(&self, id: i64, update: &AdminUserUpdate) -> Result<User> {
        let email = update.email.as_deref().map(validation::normalize_email);
        if let Some(email) = &email {
            if !validation::is_valid_email(email) {
                return Err(Error::InvalidData(
                    "Please enter a valid email address".to_string(),
                ));
            }
            if self.email_taken(email, Some(id))? {
                return Err(Error::Conflict("Email is already in use".to_string()));
            }
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE users SET
                name = COALESCE(?1, name),
                email = COALESCE(?2, email),
                role = COALESCE(?3, role)
            WHERE id = ?4
            "#,
            params![
                update.name.as_deref().map(str::trim),
                email,
                update.role.map(|r| r.as_str()),
                id
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("User {}", id)));
        }

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    pub fn set_user_role(&self, id: i64, role: Role) -> Result<User> {
        self.admin_update_user(
            id,
            &AdminUserUpdate {
                role: Some(role),
                ..Default::default()
            },
        )
    }

    /// Delete a user and everything they own
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}
