//! Status Cycle Driver
//!
//! Runs the persist and notify steps on a timer, off the producers' threads.
//! File I/O goes through `spawn_blocking`; the notification is awaited on the
//! driver task. Each step is independent: a failed write never prevents the
//! notification and vice versa.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use playerstat_core::{ApplicationState, CycleOutcome, StatusReporter, StatusTransport};

use crate::error::Result;

/// Outcome of one full status cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub status_file: CycleOutcome,
    pub notification: CycleOutcome,
}

/// Write the status file, then notify the status
pub async fn run_cycle(
    reporter: &Arc<StatusReporter>,
    transport: &dyn StatusTransport,
) -> Result<CycleReport> {
    let status_file = persist(reporter).await?;
    let notification = reporter.notify_status(transport).await;

    Ok(CycleReport {
        status_file,
        notification,
    })
}

async fn persist(reporter: &Arc<StatusReporter>) -> Result<CycleOutcome> {
    let reporter = Arc::clone(reporter);
    Ok(tokio::task::spawn_blocking(move || reporter.update_status_file()).await?)
}

/// Run status cycles every `period` until `shutdown` resolves.
///
/// On shutdown the application state is set to `Stopped` and the status file
/// is written one last time. Returns the number of completed cycles.
pub async fn run_until<F>(
    reporter: Arc<StatusReporter>,
    transport: &dyn StatusTransport,
    period: Duration,
    shutdown: F,
) -> Result<u64>
where
    F: Future<Output = ()>,
{
    info!(
        period_secs = period.as_secs_f64(),
        path = %reporter.status_path().display(),
        "Status cycle starting"
    );

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut cycles = 0u64;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,

            _ = ticker.tick() => {
                let report = run_cycle(&reporter, transport).await?;
                cycles += 1;
                if report.status_file == CycleOutcome::Failed || report.notification == CycleOutcome::Failed {
                    warn!(cycle = cycles, ?report, "Status cycle completed with failures");
                } else {
                    debug!(cycle = cycles, ?report, "Status cycle completed");
                }
            }
        }
    }

    reporter.state().set_application_state(ApplicationState::Stopped);
    let final_write = persist(&reporter).await?;
    info!(cycles, ?final_write, "Status cycle stopped");
    Ok(cycles)
}
