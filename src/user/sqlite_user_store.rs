use crate::mood::MoodLabel;
use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_versioned_db, system_time_from_column_result, ForeignKey, ForeignKeyOnChange, SqlType,
    Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use crate::user::*;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::{
    path::Path,
    str::FromStr,
    sync::{Arc, Mutex},
};
use tracing::{debug, warn};

use super::auth::MoodwaveHasher;

/// V 0
const USER_TABLE_V_0: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("username", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("age", &SqlType::Integer),
        sqlite_column!("external_id", &SqlType::Text, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_user_email", "email")],
};
const AUTH_TOKEN_TABLE_V_0: Table = Table {
    name: "auth_token",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("value", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    indices: &[("idx_auth_token_value", "value")],
};
const USER_PASSWORD_CREDENTIALS_V_0: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            is_unique = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_tried", &SqlType::Integer),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    indices: &[],
};

/// V 1
const INTERACTION_TABLE_V_1: Table = Table {
    name: "interaction",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            non_null = true,
            is_unique = true
        ),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("input_text", &SqlType::Text, non_null = true),
        sqlite_column!("mood", &SqlType::Text, non_null = true),
        sqlite_column!("song_id", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_interaction_user", "user_id")],
};

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[
            USER_TABLE_V_0,
            AUTH_TOKEN_TABLE_V_0,
            USER_PASSWORD_CREDENTIALS_V_0,
        ],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[
            USER_TABLE_V_0,
            AUTH_TOKEN_TABLE_V_0,
            USER_PASSWORD_CREDENTIALS_V_0,
            INTERACTION_TABLE_V_1,
        ],
        migration: Some(|conn: &Connection| {
            INTERACTION_TABLE_V_1.create(conn)?;
            Ok(())
        }),
    },
];

const USER_COLUMNS: &str = "id, email, username, name, age, external_id, created";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        name: row.get(3)?,
        age: row.get(4)?,
        external_id: row.get(5)?,
        created: system_time_from_column_result(row.get(6)?),
    })
}

fn auth_token_from_row(row: &Row) -> rusqlite::Result<AuthToken> {
    Ok(AuthToken {
        user_id: row.get(0)?,
        value: AuthTokenValue(row.get(1)?),
        created: system_time_from_column_result(row.get(2)?),
        last_used: row
            .get::<usize, Option<i64>>(3)?
            .map(system_time_from_column_result),
    })
}

fn insert_user(conn: &Connection, new_user: &NewUser) -> Result<usize> {
    conn.execute(
        "INSERT INTO user (email, username, name, age, external_id) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_user.email,
            username_from_email(&new_user.email),
            new_user.name,
            new_user.age,
            new_user.external_id
        ],
    )
    .with_context(|| format!("Failed to create user {}", new_user.email))?;
    Ok(conn.last_insert_rowid() as usize)
}

#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn =
            open_versioned_db(db_path, VERSIONED_SCHEMAS).context("Failed to open user db")?;
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn query_user(&self, condition: &str, value: &dyn rusqlite::ToSql) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                &format!("SELECT {} FROM user WHERE {} = ?1", USER_COLUMNS, condition),
                params![value],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }
}

impl UserStore for SqliteUserStore {
    fn create_user(&self, new_user: &NewUser) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        insert_user(&conn, new_user)
    }

    fn create_user_with_password(&self, new_user: &NewUser, password: &str) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let user_id = insert_user(&tx, new_user)?;
        let credentials = UsernamePasswordCredentials::new_hashed(user_id, password)?;
        tx.execute(
            "INSERT INTO user_password_credentials (salt, hash, hasher, user_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string(),
                user_id
            ],
        )
        .with_context(|| format!("Failed to store credentials of user {}", user_id))?;
        tx.commit()?;
        Ok(user_id)
    }

    fn set_user_external_id(&self, user_id: usize, external_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE user SET external_id = ?1 WHERE id = ?2",
            params![external_id, user_id],
        )?;
        if updated == 0 {
            bail!("User with id {} not found.", user_id);
        }
        Ok(())
    }

    fn get_user(&self, user_id: usize) -> Result<Option<User>> {
        self.query_user("id", &user_id)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_user("email", &email)
    }

    fn get_user_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        self.query_user("external_id", &external_id)
    }

    fn users_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl UserAuthTokenStore for SqliteUserStore {
    fn get_user_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        let token = conn
            .query_row(
                "SELECT user_id, value, created, last_used FROM auth_token WHERE value = ?1",
                params![value.0],
                auth_token_from_row,
            )
            .optional()?;
        Ok(token)
    }

    fn delete_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let Some(token) = self.get_user_auth_token(token)? else {
            return Ok(None);
        };
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM auth_token WHERE value = ?1",
            params![token.value.0],
        )?;
        Ok(Some(token))
    }

    fn update_user_auth_token_last_used_timestamp(&self, token: &AuthTokenValue) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "UPDATE auth_token SET last_used = {} WHERE value = ?1",
                DEFAULT_TIMESTAMP
            ),
            params![token.0],
        )?;
        Ok(())
    }

    fn add_user_auth_token(&self, token: AuthToken) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO auth_token (value, user_id) VALUES (?1, ?2)",
            params![token.value.0, token.user_id],
        )?;
        Ok(())
    }

    fn get_all_user_auth_tokens(&self, user_id: usize) -> Result<Vec<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, value, created, last_used FROM auth_token WHERE user_id = ?1",
        )?;
        let tokens = stmt
            .query_map(params![user_id], auth_token_from_row)?
            .collect::<rusqlite::Result<Vec<AuthToken>>>()?;
        Ok(tokens)
    }
}

impl UserAuthCredentialsStore for SqliteUserStore {
    fn get_user_auth_credentials(&self, user_id: usize) -> Result<Option<UserAuthCredentials>> {
        if self.get_user(user_id)?.is_none() {
            return Ok(None);
        }
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT user_id, salt, hash, hasher, created, last_tried, last_used FROM user_password_credentials WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<usize, usize>(0)?,
                        row.get::<usize, String>(1)?,
                        row.get::<usize, String>(2)?,
                        row.get::<usize, String>(3)?,
                        row.get::<usize, i64>(4)?,
                        row.get::<usize, Option<i64>>(5)?,
                        row.get::<usize, Option<i64>>(6)?,
                    ))
                },
            )
            .optional()?;

        let username_password = match row {
            Some((user_id, salt, hash, hasher, created, last_tried, last_used)) => {
                let hasher = MoodwaveHasher::from_str(&hasher)
                    .with_context(|| format!("Invalid hasher for user {}", user_id))?;
                Some(UsernamePasswordCredentials {
                    user_id,
                    salt,
                    hash,
                    hasher,
                    created: system_time_from_column_result(created),
                    last_tried: last_tried.map(system_time_from_column_result),
                    last_used: last_used.map(system_time_from_column_result),
                })
            }
            None => None,
        };

        Ok(Some(UserAuthCredentials {
            user_id,
            username_password,
        }))
    }

    fn touch_user_password_credentials(&self, user_id: usize, succeeded: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let sql = if succeeded {
            format!(
                "UPDATE user_password_credentials SET last_tried = {0}, last_used = {0} WHERE user_id = ?1",
                DEFAULT_TIMESTAMP
            )
        } else {
            format!(
                "UPDATE user_password_credentials SET last_tried = {} WHERE user_id = ?1",
                DEFAULT_TIMESTAMP
            )
        };
        conn.execute(&sql, params![user_id])?;
        Ok(())
    }
}

impl InteractionLog for SqliteUserStore {
    fn append(
        &self,
        user_id: usize,
        input_text: &str,
        mood: MoodLabel,
        song_id: &str,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO interaction (user_id, input_text, mood, song_id) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, input_text, mood.as_str(), song_id],
        )
        .with_context(|| format!("Failed to log interaction of user {}", user_id))?;
        debug!("Logged interaction of user {} with song {}", user_id, song_id);
        Ok(())
    }

    fn recent(&self, user_id: usize, limit: usize) -> Result<Vec<InteractionRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, input_text, mood, song_id, created FROM interaction WHERE user_id = ?1 ORDER BY created DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![user_id, limit], |row| {
                Ok((
                    row.get::<usize, usize>(0)?,
                    row.get::<usize, usize>(1)?,
                    row.get::<usize, String>(2)?,
                    row.get::<usize, String>(3)?,
                    row.get::<usize, String>(4)?,
                    row.get::<usize, i64>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (id, user_id, input_text, mood, song_id, created) in rows {
            let mood = match MoodLabel::from_str(&mood) {
                Ok(mood) => mood,
                Err(err) => {
                    warn!("Skipping interaction {}: {}", id, err);
                    continue;
                }
            };
            records.push(InteractionRecord {
                id,
                user_id,
                input_text,
                mood,
                song_id,
                created: system_time_from_column_result(created),
            });
        }
        Ok(records)
    }
}
