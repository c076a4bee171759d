use crate::error::VersoError;
use crate::model::VerseRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OperationStatus::Completed | OperationStatus::Cancelled | OperationStatus::Failed
        )
    }

    fn as_u8(self) -> u8 {
        match self {
            OperationStatus::Idle => 0,
            OperationStatus::Running => 1,
            OperationStatus::Completed => 2,
            OperationStatus::Cancelled => 3,
            OperationStatus::Failed => 4,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => OperationStatus::Running,
            2 => OperationStatus::Completed,
            3 => OperationStatus::Cancelled,
            4 => OperationStatus::Failed,
            _ => OperationStatus::Idle,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperationStatus::Idle => "idle",
            OperationStatus::Running => "running",
            OperationStatus::Completed => "completed",
            OperationStatus::Cancelled => "cancelled",
            OperationStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// How a search ended.
#[derive(Debug)]
pub enum SearchOutcome {
    Completed(Vec<VerseRecord>),
    Cancelled,
    Failed(VersoError),
}

impl SearchOutcome {
    pub fn status(&self) -> OperationStatus {
        match self {
            SearchOutcome::Completed(_) => OperationStatus::Completed,
            SearchOutcome::Cancelled => OperationStatus::Cancelled,
            SearchOutcome::Failed(_) => OperationStatus::Failed,
        }
    }

    /// Matches of a completed search. A cancelled search yields an empty list.
    pub fn into_result(self) -> crate::error::Result<Vec<VerseRecord>> {
        match self {
            SearchOutcome::Completed(records) => Ok(records),
            SearchOutcome::Cancelled => Ok(Vec::new()),
            SearchOutcome::Failed(e) => Err(e),
        }
    }
}

/// State one search shares between its worker and every handle to it.
#[derive(Debug)]
pub(crate) struct OperationState {
    status: AtomicU8,
    cancel_requested: AtomicBool,
}

impl OperationState {
    pub(crate) fn running() -> Self {
        Self {
            status: AtomicU8::new(OperationStatus::Running.as_u8()),
            cancel_requested: AtomicBool::new(false),
        }
    }

    pub(crate) fn status(&self) -> OperationStatus {
        OperationStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    pub(crate) fn finish(&self, status: OperationStatus) {
        self.status.store(status.as_u8(), Ordering::SeqCst);
    }

    /// No-op once the search has ended, and safe to call any number of times.
    pub(crate) fn request_cancel(&self) {
        if self.status() == OperationStatus::Running {
            self.cancel_requested.store(true, Ordering::SeqCst);
        }
    }

    pub(crate) fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }
}

/// A running or finished search.
///
/// Dropping the handle does not stop the worker; call [`SearchHandle::cancel`] first if the
/// result is no longer wanted.
#[derive(Debug)]
pub struct SearchHandle {
    state: Arc<OperationState>,
    worker: Option<JoinHandle<SearchOutcome>>,
}

impl SearchHandle {
    pub(crate) fn new(state: Arc<OperationState>, worker: JoinHandle<SearchOutcome>) -> Self {
        Self {
            state,
            worker: Some(worker),
        }
    }

    pub fn status(&self) -> OperationStatus {
        self.state.status()
    }

    pub fn cancel(&self) {
        self.state.request_cancel();
    }

    /// A cloneable handle that can cancel this search from another thread.
    pub fn canceller(&self) -> SearchCanceller {
        SearchCanceller {
            state: Arc::clone(&self.state),
        }
    }

    /// Blocks until the worker ends and returns how the search ended.
    pub fn wait(mut self) -> SearchOutcome {
        let Some(worker) = self.worker.take() else {
            return SearchOutcome::Failed(VersoError::Store("search already collected".into()));
        };
        match worker.join() {
            Ok(outcome) => outcome,
            Err(_) => {
                self.state.finish(OperationStatus::Failed);
                tracing::error!("search worker panicked");
                SearchOutcome::Failed(VersoError::Store("search worker panicked".into()))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchCanceller {
    state: Arc<OperationState>,
}

impl SearchCanceller {
    pub fn cancel(&self) {
        self.state.request_cancel();
    }

    pub fn status(&self) -> OperationStatus {
        self.state.status()
    }
}

/// One lock per module code, shared by every engine that scans the same store.
#[derive(Debug, Default)]
pub struct ScanLocks {
    modules: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ScanLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock_for(&self, module: &str) -> Arc<Mutex<()>> {
        let mut modules = self.modules.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(modules.entry(module.to_string()).or_default())
    }
}
