//! Background execution of scans and cleans.
//!
//! At most one task runs at a time. A task reports progress through a channel
//! and finishes with exactly one completion event carrying its results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::cleaner::{CleanReport, Cleaner, SelectionSet};
use crate::error::{Result, TurboError};
use crate::scanner::{ScanReport, Scanner};

/// Update sent by a background task.
#[derive(Debug, Clone)]
pub enum TaskEvent {
    /// Step finished. `fraction` never decreases within a task.
    Progress { fraction: f64, status: String },
    /// Scan finished. Always the last event of a scan.
    ScanFinished(ScanReport),
    /// Clean finished. Always the last event of a clean.
    CleanFinished(CleanReport),
}

impl TaskEvent {
    pub fn is_finished(&self) -> bool {
        !matches!(self, TaskEvent::Progress { .. })
    }
}

/// Runs one background task at a time.
#[derive(Debug, Clone, Default)]
pub struct Worker {
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when the task thread ends, even on panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a task is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start a scan in the background.
    pub fn start_scan(&self, scanner: Scanner) -> Result<Receiver<TaskEvent>> {
        self.spawn("scan", move |tx| {
            let mut sink = progress_sender(tx.clone());
            TaskEvent::ScanFinished(scanner.scan(&mut sink))
        })
    }

    /// Start cleaning the selected entries in the background.
    ///
    /// The caller is responsible for having confirmed the deletion.
    pub fn start_clean(&self, cleaner: Cleaner, selection: SelectionSet) -> Result<Receiver<TaskEvent>> {
        self.spawn("clean", move |tx| {
            let mut sink = progress_sender(tx.clone());
            TaskEvent::CleanFinished(cleaner.run(selection.entries(), &mut sink))
        })
    }

    /// Run `task` on a new thread. The event it returns is sent last, after
    /// the worker has been marked idle again.
    fn spawn<F>(&self, kind: &'static str, task: F) -> Result<Receiver<TaskEvent>>
    where
        F: FnOnce(&Sender<TaskEvent>) -> TaskEvent + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(TurboError::TaskInFlight(kind));
        }

        let (tx, rx) = mpsc::channel();
        let guard = BusyGuard(Arc::clone(&self.busy));

        let spawned = thread::Builder::new()
            .name(format!("turboclean-{}", kind))
            .spawn(move || {
                tracing::debug!(kind, "Background task started");
                let finished = task(&tx);
                drop(guard);
                let _ = tx.send(finished);
            });

        match spawned {
            Ok(_) => Ok(rx),
            Err(err) => {
                // The closure, and with it the guard, was dropped by the failed spawn
                Err(TurboError::Other(format!("Cannot start {}: {}", kind, err)))
            }
        }
    }
}

fn progress_sender(tx: Sender<TaskEvent>) -> impl FnMut(f64, &str) {
    move |fraction: f64, status: &str| {
        let _ = tx.send(TaskEvent::Progress {
            fraction,
            status: status.to_string(),
        });
    }
}

/// Block until the task behind `rx` finishes, passing progress to `on_progress`.
///
/// Returns the completion event, or `None` if the task ended without one.
pub fn wait_for(rx: Receiver<TaskEvent>, mut on_progress: impl FnMut(f64, &str)) -> Option<TaskEvent> {
    for event in rx {
        match event {
            TaskEvent::Progress { fraction, status } => on_progress(fraction, &status),
            finished => return Some(finished),
        }
    }
    None
}
