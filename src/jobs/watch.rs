/**
 * Job Watch
 *
 * A polling task bound to the lifetime of its `JobWatch` handle. The task
 * queries the job's status on a fixed interval and, on the first terminal
 * status, fetches the results once and exits.
 *
 * Each tick awaits its status request before the next tick is taken, so at
 * most one request per job is in flight. A failed poll is logged and retried
 * on the next tick. Cancelling or dropping the handle stops the task,
 * abandoning any in-flight request.
 */

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::jobs::client::JobClient;
use crate::jobs::error::JobError;
use crate::shared::{JobId, JobResults, StatusReport};

/// `tokio::time::interval` panics on a zero period
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running job poller
pub struct JobWatch {
    job_id: JobId,
    status: watch::Receiver<Option<StatusReport>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<Result<JobResults, JobError>>>,
}

impl JobWatch {
    pub(crate) fn spawn(client: JobClient, job_id: JobId, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_until_terminal(
            client,
            job_id.clone(),
            interval,
            tx,
            cancel.clone(),
        ));

        Self {
            job_id,
            status: rx,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Most recent status observed, if any poll has succeeded yet
    pub fn latest(&self) -> Option<StatusReport> {
        *self.status.borrow()
    }

    /// Receiver notified on every successful poll
    pub fn subscribe(&self) -> watch::Receiver<Option<StatusReport>> {
        self.status.clone()
    }

    /// Stop polling
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the job's results
    ///
    /// # Errors
    ///
    /// * `Cancelled` - the watch was cancelled before the job finished
    pub async fn results(mut self) -> Result<JobResults, JobError> {
        let handle = self.handle.take().ok_or(JobError::Cancelled)?;
        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(job_id = %self.job_id, error = %e, "Job watch task panicked");
                Err(JobError::Cancelled)
            }
        }
    }
}

impl Drop for JobWatch {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_until_terminal(
    client: JobClient,
    job_id: JobId,
    interval: Duration,
    tx: watch::Sender<Option<StatusReport>>,
    cancel: CancellationToken,
) -> Result<JobResults, JobError> {
    let interval = interval.max(MIN_INTERVAL);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::debug!(job_id = %job_id, interval_ms = interval.as_millis() as u64, "Job watch started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let polled = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            polled = client.poll_status(&job_id) => polled,
        };

        let report = match polled {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Status poll failed, retrying on next tick");
                continue;
            }
        };
        tx.send_replace(Some(report));

        if !report.status.is_terminal() {
            continue;
        }

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            fetched = client.fetch_results(&job_id) => fetched,
        };

        match fetched {
            Ok(results) => {
                tracing::info!(job_id = %job_id, status = %results.status, "Job finished");
                return Ok(results);
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Fetching results failed, retrying on next tick");
            }
        }
    }

    tracing::debug!(job_id = %job_id, "Job watch cancelled");
    Err(JobError::Cancelled)
}
