//! SQLite persistence for accounts and to-do tasks.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde::Serialize;
use sitegen_core::accounts::Credentials;

use crate::error::Error;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    content TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_username ON tasks (username);
";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    Created,
    UsernameTaken,
}

/// Cloneable handle to the database. SQLite calls are serialized by the mutex.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the database file and make sure the tables exist.
    pub fn open(path: &Path) -> Result<Self, Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create database directory: {e}")))?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::Storage(format!("Failed to open database: {e}")))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Storage(format!("Failed to open database: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::Storage(format!("Failed to create tables: {e}")))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `op` against a clone of this handle on tokio's blocking pool.
    ///
    /// SQLite calls and password hashing block, so async callers go through here.
    pub async fn blocking<T, F>(&self, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T, Error> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| Error::Storage(format!("Database task failed: {e}")))?
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("Database connection lock poisoned".to_string()))
    }

    /// Create a user. Uniqueness is enforced by the table's UNIQUE constraint.
    pub fn signup(&self, credentials: &Credentials) -> Result<SignupOutcome, Error> {
        let hash = hash_password(&credentials.password)?;

        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![credentials.username, hash],
        );

        match inserted {
            Ok(_) => Ok(SignupOutcome::Created),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Ok(SignupOutcome::UsernameTaken)
            }
            Err(e) => Err(Error::Storage(format!("Failed to create user: {e}"))),
        }
    }

    /// Returns `true` when the username exists and the password matches.
    pub fn login(&self, credentials: &Credentials) -> Result<bool, Error> {
        let stored: Option<String> = self
            .lock()?
            .query_row(
                "SELECT password FROM users WHERE username = ?1",
                params![credentials.username],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| Error::Storage(format!("Failed to query users: {e}")))?;

        Ok(stored.is_some_and(|hash| verify_password(&credentials.password, &hash)))
    }

    pub fn list_tasks(&self, username: &str) -> Result<Vec<Task>, Error> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, content FROM tasks WHERE username = ?1 ORDER BY id")
            .map_err(|e| Error::Storage(format!("Failed to prepare query: {e}")))?;

        let tasks = stmt
            .query_map(params![username], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    content: row.get(1)?,
                })
            })
            .map_err(|e| Error::Storage(format!("Failed to query tasks: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::Storage(format!("Failed to read task: {e}")))?;

        Ok(tasks)
    }

    /// Insert a task and return its id.
    pub fn add_task(&self, username: &str, content: &str) -> Result<i64, Error> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO tasks (username, content) VALUES (?1, ?2)",
            params![username, content],
        )
        .map_err(|e| Error::Storage(format!("Failed to store task: {e}")))?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns `true` when a row was removed.
    pub fn delete_task(&self, id: i64) -> Result<bool, Error> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(|e| Error::Storage(format!("Failed to delete task: {e}")))?;
        Ok(removed > 0)
    }
}

fn hash_password(password: &str) -> Result<String, Error> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| Error::Storage(format!("Failed to encode salt: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Storage(format!("Failed to hash password: {e}")))
}

fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
