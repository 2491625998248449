use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::events::UiEvent;

const BAR_TEMPLATE: &str = "{prefix:.blue} [{bar:50.blue}] {percent:>3}% ({pos}/{len}) {msg}";

/// Sole owner of the terminal while a run is in progress.
pub struct ProgressManager {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl ProgressManager {
    pub fn new(hidden: bool) -> Self {
        Self { bar: None, hidden }
    }

    /// Drain events until `Shutdown` or until every sender is gone.
    pub fn spawn(hidden: bool, mut rx: mpsc::UnboundedReceiver<UiEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut manager = ProgressManager::new(hidden);
            while let Some(event) = rx.recv().await {
                if !manager.handle(event) {
                    break;
                }
            }
            manager.finish();
        })
    }

    /// Returns false once the UI should stop.
    pub fn handle(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Status { message } => self.println(message.yellow().to_string()),
            UiEvent::BaselineEstablished { url, baseline } => self.println(format!(
                "{} {} ({} words, {} chars)",
                "[+] Baseline established:".green(),
                url,
                baseline.word_count,
                baseline.char_count
            )),
            UiEvent::DiscoveryStarted { total } => self.start(total),
            UiEvent::Progress { processed, .. } => {
                if let Some(bar) = &self.bar {
                    bar.set_position(processed as u64);
                }
            }
            UiEvent::Discovered(outcome) => self.println(format!(
                "Discovered: {} status code: {}",
                outcome.url.green(),
                outcome.status_code
            )),
            UiEvent::Shutdown => return false,
        }
        true
    }

    fn start(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("-> "));
        }
        bar.set_prefix("Progress:");
        self.bar = Some(bar);
    }

    fn println(&self, line: String) {
        match &self.bar {
            Some(bar) if !bar.is_hidden() => bar.println(line),
            _ => println!("{}", line),
        }
    }

    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(|bar| bar.position())
    }

    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}
