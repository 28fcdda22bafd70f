use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{json, Map};

use super::error::DbError;
use super::query::StatementOutcome;
use super::session::{Session, SessionProvider};

#[derive(Default)]
struct MemoryState {
    committed: Vec<String>,
    acquired: usize,
    released: usize,
    rollbacks: usize,
    fail_markers: Vec<String>,
    fail_commit: bool,
    unavailable: bool,
}

/// Session provider that buffers statements per session and exposes them in
/// `committed()` only after a successful commit.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(&self) -> MemoryProvider {
        MemoryProvider { db: self.clone() }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Any statement containing `marker` fails when executed.
    pub fn fail_on(&self, marker: &str) {
        self.lock().fail_markers.push(marker.to_string());
    }

    pub fn fail_commit(&self, enabled: bool) {
        self.lock().fail_commit = enabled;
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn committed(&self) -> Vec<String> {
        self.lock().committed.clone()
    }

    pub fn acquired(&self) -> usize {
        self.lock().acquired
    }

    pub fn released(&self) -> usize {
        self.lock().released
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }
}

pub struct MemoryProvider {
    db: MemoryDatabase,
}

impl SessionProvider for MemoryProvider {
    fn acquire(&self) -> Result<Box<dyn Session>, DbError> {
        let mut state = self.db.lock();
        if state.unavailable {
            return Err(DbError::NotConfigured);
        }
        state.acquired += 1;
        Ok(Box::new(MemorySession {
            db: self.db.clone(),
            pending: Vec::new(),
            released: false,
        }))
    }
}

struct MemorySession {
    db: MemoryDatabase,
    pending: Vec<String>,
    released: bool,
}

impl Session for MemorySession {
    fn execute(&mut self, sql: &str) -> Result<StatementOutcome, DbError> {
        let state = self.db.lock();
        if let Some(marker) = state.fail_markers.iter().find(|m| sql.contains(m.as_str())) {
            return Err(DbError::Driver(format!(
                "ORA-00942: table or view does not exist ({marker})"
            )));
        }

        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            let mut row = Map::new();
            row.insert("COMMITTED".to_string(), json!(state.committed.len()));
            return Ok(StatementOutcome {
                rows_affected: None,
                rows: Some(vec![row]),
            });
        }
        drop(state);

        self.pending.push(sql.to_string());
        Ok(StatementOutcome {
            rows_affected: Some(1),
            rows: None,
        })
    }

    fn commit(&mut self) -> Result<(), DbError> {
        let mut state = self.db.lock();
        if state.fail_commit {
            return Err(DbError::Driver(
                "ORA-02091: transaction rolled back".to_string(),
            ));
        }
        state.committed.append(&mut self.pending);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DbError> {
        self.pending.clear();
        self.db.lock().rollbacks += 1;
        Ok(())
    }

    fn release(&mut self) -> Result<(), DbError> {
        if !self.released {
            self.released = true;
            self.pending.clear();
            self.db.lock().released += 1;
        }
        Ok(())
    }
}
