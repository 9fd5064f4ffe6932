//! Bounded SQLite connection pool.
//!
//! Replaces the connection-per-request pattern with a fixed set of
//! connections opened once at startup. `get` blocks until a connection is
//! free; the checkout guard returns its connection to the pool on drop.
//! WAL journal mode allows concurrent readers alongside a single writer,
//! and the busy timeout makes contending writers queue instead of failing.

use crate::error::{StoreError, StoreResult};
use crate::schema;
use rusqlite::Connection;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

struct PoolInner {
    free: Mutex<VecDeque<Connection>>,
    available: Condvar,
    capacity: usize,
}

/// A bounded pool of SQLite connections sharing one database file.
#[derive(Clone)]
pub struct Pool {
    inner: Arc<PoolInner>,
}

impl Pool {
    /// Opens `size` connections to the database at `path`, creating the
    /// file and schema if needed. A `size` of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be initialized.
    pub fn open(path: impl AsRef<Path>, size: usize) -> StoreResult<Self> {
        let path = path.as_ref();
        let capacity = size.max(1);

        let mut free = VecDeque::with_capacity(capacity);
        for i in 0..capacity {
            let conn = Connection::open(path)?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            // journal_mode returns the resulting mode as a row
            let _: String =
                conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            if i == 0 {
                schema::init(&conn)?;
            }
            free.push_back(conn);
        }

        tracing::debug!(path = %path.display(), capacity, "opened connection pool");

        Ok(Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(free),
                available: Condvar::new(),
                capacity,
            }),
        })
    }

    /// Checks a connection out of the pool, blocking until one is free.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool lock is poisoned.
    pub fn get(&self) -> StoreResult<PooledConnection> {
        let mut free = self
            .inner
            .free
            .lock()
            .map_err(|_| StoreError::Pool("pool lock poisoned".to_string()))?;
        loop {
            if let Some(conn) = free.pop_front() {
                return Ok(PooledConnection {
                    conn: Some(conn),
                    inner: Arc::clone(&self.inner),
                });
            }
            free = self
                .inner
                .available
                .wait(free)
                .map_err(|_| StoreError::Pool("pool lock poisoned".to_string()))?;
        }
    }

    /// Returns the number of connections the pool was opened with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }
}

/// A connection checked out of a [`Pool`]. Dereferences to
/// [`rusqlite::Connection`] and returns itself to the pool on drop.
pub struct PooledConnection {
    conn: Option<Connection>,
    inner: Arc<PoolInner>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection taken")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("connection taken")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            // A poisoned lock drops the connection instead of returning it
            if let Ok(mut free) = self.inner.free.lock() {
                free.push_back(conn);
                self.inner.available.notify_one();
            }
        }
    }
}
