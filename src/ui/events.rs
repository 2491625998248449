use crate::core::models::{Baseline, ProbeOutcome};

/// Events for the single UI owner. Producers never block on the terminal.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Free-form status line
    Status { message: String },

    BaselineEstablished { url: String, baseline: Baseline },

    /// Initialize progress tracking
    DiscoveryStarted { total: usize },

    /// One probe finished, whatever its outcome
    Progress { processed: usize, total: usize },

    Discovered(ProbeOutcome),

    /// UI lifecycle
    Shutdown,
}
