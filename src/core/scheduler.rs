use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use super::errors::{ProbeError, VhostError};
use super::models::{DiscoveryReport, ProbeOutcome};
use super::prober::CandidateProber;
use crate::ui::events::UiEvent;

/// Probe every candidate on a pool of at most `workers` concurrent probes.
///
/// Tasks are spawned in wordlist order and the semaphore hands out permits
/// FIFO, so probes start in that order; results are collected as they
/// finish. The first unexpected probe failure aborts everything still
/// pending and is returned.
pub async fn discover<P>(
    prober: Arc<P>,
    candidates: Vec<String>,
    workers: usize,
    ui_sender: &mpsc::UnboundedSender<UiEvent>,
) -> Result<DiscoveryReport, VhostError>
where
    P: CandidateProber + 'static,
{
    let total = candidates.len();
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let processed = AtomicUsize::new(0);
    let mut report = DiscoveryReport {
        discoveries: Vec::new(),
        processed: 0,
        total,
    };

    tracing::info!("Probing {} candidates with {} workers", total, workers);
    let _ = ui_sender.send(UiEvent::DiscoveryStarted { total });

    let mut tasks = JoinSet::new();
    for candidate in candidates {
        let prober = Arc::clone(&prober);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => prober.probe(&candidate).await,
                Err(e) => Err(ProbeError::Unexpected(format!("worker pool closed: {}", e))),
            };
            (candidate, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (candidate, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                tasks.abort_all();
                return Err(VhostError::ProbeUnexpected {
                    candidate: "<unknown>".to_string(),
                    reason: format!("worker task failed: {}", e),
                });
            }
        };

        let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = ui_sender.send(UiEvent::Progress { processed: done, total });

        match result {
            Ok(Some(outcome)) => record(&mut report, outcome, ui_sender),
            Ok(None) => {}
            Err(e) => {
                tasks.abort_all();
                tracing::error!("Aborting discovery: probe for {} failed: {}", candidate, e);
                return Err(VhostError::ProbeUnexpected {
                    candidate,
                    reason: e.to_string(),
                });
            }
        }
    }

    report.processed = processed.load(Ordering::SeqCst);
    Ok(report)
}

fn record(report: &mut DiscoveryReport, outcome: ProbeOutcome, ui_sender: &mpsc::UnboundedSender<UiEvent>) {
    tracing::info!("Discovered {} ({})", outcome.url, outcome.status_code);
    let _ = ui_sender.send(UiEvent::Discovered(outcome.clone()));
    report.discoveries.push(outcome);
}
