// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::Connection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::notify::NotificationSink;
use super::sweep::{self, SweepReport};
use super::EngineError;

/// Run one sweep unless another is already in flight. The guard makes the
/// sweep non-reentrant: a tick or a manual trigger landing mid-sweep is
/// skipped, never stacked.
pub fn try_run_sweep(
    conn: &Connection,
    sink: &NotificationSink,
    running: &AtomicBool,
    today: chrono::NaiveDate,
) -> Option<Result<SweepReport, EngineError>> {
    if running.swap(true, Ordering::SeqCst) {
        return None;
    }
    let result = sweep::run_sweep(conn, sink, today);
    running.store(false, Ordering::SeqCst);
    Some(result)
}

/// Owns the reminder ticker: a background thread that fires a sweep at a
/// fixed cadence. Injected where needed, never ambient; tests bypass it and
/// call `run_sweep` directly.
pub struct SweepScheduler {
    stop_tx: mpsc::Sender<()>,
    running: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

impl SweepScheduler {
    pub fn start(conn: Connection, sink: NotificationSink, interval: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(false));
        let guard = running.clone();
        let (stop_tx, stop_rx) = mpsc::channel();

        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    let today = Utc::now().date_naive();
                    match try_run_sweep(&conn, &sink, &guard, today) {
                        Some(Ok(report)) => tracing::info!(
                            scanned = report.scanned,
                            sent = report.reminders_sent,
                            suppressed = report.suppressed,
                            failures = report.failures,
                            "reminder sweep finished"
                        ),
                        Some(Err(e)) => tracing::error!(error = %e, "reminder sweep failed"),
                        None => tracing::debug!("previous sweep still running, tick skipped"),
                    }
                }
            }
        });

        Self {
            stop_tx,
            running,
            handle,
        }
    }

    /// Shared run guard, for manual triggers in the same process.
    pub fn run_guard(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Signal the ticker and wait for it to wind down. An in-flight sweep
    /// finishes first; no further ticks fire.
    pub fn shutdown(self) {
        let _ = self.stop_tx.send(());
        let _ = self.handle.join();
    }
}
