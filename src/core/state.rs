use super::models::{Baseline, DiscoveryReport, Target};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    BaselineEstablished,
    Discovering,
    Done,
    Aborted,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Aborted)
    }
}

/// Lifecycle events fed into `RunState::on_event`.
#[derive(Debug)]
pub enum RunEvent {
    BaselineEstablished(Baseline),
    DiscoveryStarted { total: usize },
    DiscoveryFinished(DiscoveryReport),
    Aborted(String),
}

#[derive(Debug)]
pub struct RunState {
    pub target: Target,
    pub phase: RunPhase,
    pub baseline: Option<Baseline>,
    pub total: usize,
    pub report: Option<DiscoveryReport>,
    pub abort_reason: Option<String>,
}

impl RunState {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            phase: RunPhase::Init,
            baseline: None,
            total: 0,
            report: None,
            abort_reason: None,
        }
    }

    /// Applies an event. Returns false, leaving the state untouched, when the
    /// event is not valid in the current phase.
    pub fn on_event(&mut self, ev: RunEvent) -> bool {
        match (self.phase, ev) {
            (RunPhase::Init, RunEvent::BaselineEstablished(baseline)) => {
                tracing::info!(
                    "Baseline established: {} words, {} chars",
                    baseline.word_count,
                    baseline.char_count
                );
                self.baseline = Some(baseline);
                self.phase = RunPhase::BaselineEstablished;
            }
            (RunPhase::BaselineEstablished, RunEvent::DiscoveryStarted { total }) => {
                tracing::info!("Discovery started over {} candidates", total);
                self.total = total;
                self.phase = RunPhase::Discovering;
            }
            (RunPhase::Discovering, RunEvent::DiscoveryFinished(report)) => {
                tracing::info!(
                    "Discovery finished: {}/{} processed, {} discovered",
                    report.processed,
                    report.total,
                    report.len()
                );
                self.report = Some(report);
                self.phase = RunPhase::Done;
            }
            (phase, RunEvent::Aborted(reason)) if !phase.is_terminal() => {
                tracing::warn!("Run aborted during {:?}: {}", phase, reason);
                self.abort_reason = Some(reason);
                self.phase = RunPhase::Aborted;
            }
            (phase, ev) => {
                tracing::error!("Ignoring {:?} in phase {:?}", ev, phase);
                return false;
            }
        }
        true
    }
}
