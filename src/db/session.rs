use std::ops::{Deref, DerefMut};

use log::warn;

use super::error::DbError;
use super::query::StatementOutcome;

/// A single database session able to run statements inside one transaction.
///
/// Nothing is committed until `commit` is called; `release` closes the
/// underlying connection and must be safe to call more than once.
pub trait Session: Send {
    fn execute(&mut self, sql: &str) -> Result<StatementOutcome, DbError>;
    fn commit(&mut self) -> Result<(), DbError>;
    fn rollback(&mut self) -> Result<(), DbError>;
    fn release(&mut self) -> Result<(), DbError>;
}

/// Hands out fresh sessions. Every call returns an independent connection.
pub trait SessionProvider: Send + Sync {
    fn acquire(&self) -> Result<Box<dyn Session>, DbError>;
}

/// Owns an acquired session and releases it when dropped, whatever the exit path.
pub struct SessionGuard {
    session: Box<dyn Session>,
}

impl SessionGuard {
    pub fn acquire(provider: &dyn SessionProvider) -> Result<Self, DbError> {
        let session = provider.acquire()?;
        Ok(Self { session })
    }
}

impl Deref for SessionGuard {
    type Target = dyn Session;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Err(err) = self.session.release() {
            warn!("Failed to release database session: {err}");
        }
    }
}
