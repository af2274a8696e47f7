use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use roster_core::Error;
use roster_core::store::{MessageProvider, UserProvider, UserSaver};
use roster_types::models::{Message, SenderType, User};

use crate::Database;

impl UserSaver for Database {
    fn save_user(&self, email: &str, password_hash: &[u8]) -> Result<i64, Error> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (email, password, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![email, password_hash, timestamp(Utc::now())],
            )
            .map_err(translate_insert_err)?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn block_user_by_id(&self, user_id: i64) -> Result<(), Error> {
        self.with_conn(|conn| {
            let affected = conn
                .execute("UPDATE users SET is_active = 0 WHERE id = ?1", [user_id])
                .map_err(internal)?;

            // Not-found detection is the affected-row count, no pre-read.
            if affected == 0 {
                return Err(Error::UserNotFound);
            }
            Ok(())
        })
    }
}

impl UserProvider for Database {
    fn provide_user(&self, email: &str) -> Result<User, Error> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "SELECT id, email, password, created_at, is_active FROM users \
                 WHERE email = ?1 LIMIT 1",
                rusqlite::params![email],
            )
        })
    }

    fn get_user_by_id(&self, user_id: i64) -> Result<User, Error> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "SELECT id, email, password, created_at, is_active FROM users \
                 WHERE id = ?1 LIMIT 1",
                rusqlite::params![user_id],
            )
        })
    }

    fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, Error> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, email, password, created_at, is_active FROM users \
                     ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
                )
                .map_err(internal)?;

            let rows = stmt
                .query_map(rusqlite::params![limit, offset], user_row)
                .map_err(internal)?
                .collect::<Result<Vec<UserRow>, _>>()
                .map_err(internal)?;

            rows.into_iter().map(UserRow::into_user).collect()
        })
    }
}

impl MessageProvider for Database {
    fn user_messages(&self, user_id: i64, limit: u32, offset: u32) -> Result<Vec<Message>, Error> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, message_text, sender_type, created_at \
                     FROM user_messages WHERE user_id = ?1 \
                     ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
                )
                .map_err(internal)?;

            let rows = stmt
                .query_map(rusqlite::params![user_id, limit, offset], message_row)
                .map_err(internal)?
                .collect::<Result<Vec<MessageRow>, _>>()
                .map_err(internal)?;

            rows.into_iter().map(MessageRow::into_message).collect()
        })
    }
}

impl Database {
    /// Message writes are for external producers (the seeding utility); the
    /// services themselves never insert messages.
    pub fn save_message(
        &self,
        user_id: i64,
        message_text: &str,
        sender_type: SenderType,
        created_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO user_messages (user_id, message_text, sender_type, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    user_id,
                    message_text,
                    sender_type.as_str(),
                    timestamp(created_at)
                ],
            )
            .map_err(internal)?;
            Ok(())
        })
    }
}

// -- Row mapping --

struct UserRow {
    id: i64,
    email: String,
    password: Vec<u8>,
    created_at: String,
    is_active: bool,
}

fn user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
        is_active: row.get(4)?,
    })
}

impl UserRow {
    fn into_user(self) -> Result<User, Error> {
        Ok(User {
            id: self.id,
            email: self.email,
            password_hash: self.password,
            created_at: parse_timestamp(&self.created_at)?,
            is_active: self.is_active,
        })
    }
}

struct MessageRow {
    id: i64,
    user_id: i64,
    message_text: String,
    sender_type: String,
    created_at: String,
}

fn message_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        message_text: row.get(2)?,
        sender_type: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl MessageRow {
    fn into_message(self) -> Result<Message, Error> {
        let sender_type = self
            .sender_type
            .parse::<SenderType>()
            .map_err(|e| Error::Internal(anyhow!("message {}: {}", self.id, e)))?;
        Ok(Message {
            id: self.id,
            user_id: self.user_id,
            message_text: self.message_text,
            sender_type,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn query_user(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<User, Error> {
    let row = conn
        .query_row(sql, params, user_row)
        .optional()
        .map_err(internal)?;

    match row {
        Some(row) => row.into_user(),
        None => Err(Error::UserNotFound),
    }
}

// -- Error translation --
// Engine-specific failures stop here; callers above this boundary only see
// the shared taxonomy.

fn translate_insert_err(err: rusqlite::Error) -> Error {
    if let rusqlite::Error::SqliteFailure(e, _) = &err {
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return Error::UserExists;
        }
    }
    internal(err)
}

fn internal(err: rusqlite::Error) -> Error {
    Error::Internal(err.into())
}

/// Fixed-width RFC 3339 so the stored text orders lexicographically the way
/// the instants order chronologically; the listing queries rely on this.
fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(anyhow!("corrupt created_at '{}': {}", raw, e)))
}
