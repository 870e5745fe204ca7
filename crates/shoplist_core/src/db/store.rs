//! Process-wide storage handle shared by request workers.
//!
//! # Invariants
//! - Migrations run once, when the store is opened.
//! - A file store gives every session its own connection. Concurrent
//!   sessions are arbitrated by SQLite locking under the busy timeout.
//! - An in-memory database exists only inside its one connection, so its
//!   sessions share that connection behind a lock.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Long-lived storage handle, usually shared as `Arc<Store>`.
pub struct Store {
    backing: Backing,
}

enum Backing {
    File(PathBuf),
    Memory(Mutex<Connection>),
}

/// Connection access owned by one worker.
///
/// Sessions are opened once per worker and reused for every request that
/// worker serves.
pub struct Session<'store> {
    conn: SessionConn<'store>,
}

enum SessionConn<'store> {
    Owned(Connection),
    Shared(&'store Mutex<Connection>),
}

impl Store {
    /// Opens (and migrates) the database file at `path`.
    ///
    /// The bootstrap connection is closed again; sessions open their own.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        drop(open_db(path)?);
        Ok(Self {
            backing: Backing::File(path.to_path_buf()),
        })
    }

    /// Opens a private, migrated in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            backing: Backing::Memory(Mutex::new(open_db_in_memory()?)),
        })
    }

    /// Opens a session for one worker.
    ///
    /// # Errors
    /// - Returns `DbError::Sqlite` when a file connection cannot be opened.
    pub fn session(&self) -> DbResult<Session<'_>> {
        let conn = match &self.backing {
            Backing::File(path) => SessionConn::Owned(open_db(path)?),
            Backing::Memory(shared) => SessionConn::Shared(shared),
        };
        Ok(Session { conn })
    }
}

impl Session<'_> {
    /// Lends the session's connection to `work`.
    ///
    /// # Errors
    /// - Returns `DbError::LockPoisoned` (converted into `E`) when a shared
    ///   in-memory connection was held by a panicking worker.
    /// - Propagates whatever `work` returns.
    pub fn with_connection<T, E>(
        &self,
        work: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DbError>,
    {
        match &self.conn {
            SessionConn::Owned(conn) => work(conn),
            SessionConn::Shared(shared) => {
                let guard = shared.lock().map_err(|_| DbError::LockPoisoned)?;
                work(&guard)
            }
        }
    }
}
