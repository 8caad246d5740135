//! Progress reporting for collaboration sessions and provider cascades

use colored::Colorize;
use draftloop_application::{CascadeProgress, CollaborationProgress};
use draftloop_domain::{
    AttemptStatus, CascadeResult, CollaborationPhase, CollaborationResult, Draft, ProviderSpec,
    ReviewVerdict, VerdictSource,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner per step
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Replace the current spinner with a new one.
    fn start(&self, prefix: &str, message: String) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(previous) = guard.take() {
            previous.finish_and_clear();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix.to_string());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        *guard = Some(pb);
    }

    fn set_message(&self, message: String) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(message);
        }
    }

    /// Print a line above the spinner.
    fn println(&self, line: String) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.println(line);
            return;
        }
        eprintln!("{}", line);
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }

    fn phase_display_name(phase: &CollaborationPhase) -> String {
        match phase {
            CollaborationPhase::Drafting => "Author is writing the first draft".to_string(),
            CollaborationPhase::Reviewing { round } => format!("Critic is reviewing (round {})", round),
            CollaborationPhase::Revising { round } => format!("Author is revising (round {})", round),
            CollaborationPhase::Accepting { round } => format!("Draft accepted in round {}", round),
            CollaborationPhase::Terminal(reason) => reason.to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CollaborationProgress for ProgressReporter {
    fn on_phase(&self, phase: &CollaborationPhase) {
        if phase.is_terminal() {
            self.clear();
            return;
        }
        self.start("Draft", Self::phase_display_name(phase));
    }

    fn on_draft(&self, round: usize, draft: &Draft) {
        self.println(format!(
            "  {} round {}: \"{}\" ({} words)",
            "v".green(),
            round,
            draft.title,
            draft.word_count
        ));
    }

    fn on_verdict(&self, round: usize, verdict: &ReviewVerdict, source: VerdictSource) {
        let mark = if verdict.is_accepting() {
            "v".green()
        } else {
            "~".yellow()
        };
        let note = if source == VerdictSource::Default {
            " (unparsable review, assuming revision)".dimmed().to_string()
        } else {
            String::new()
        };
        self.println(format!(
            "  {} round {}: score {}/10{}",
            mark, round, verdict.score, note
        ));
    }

    fn on_warning(&self, round: usize, message: &str) {
        self.println(format!("  {} round {}: {}", "!".yellow(), round, message));
    }

    fn on_finished(&self, _result: &CollaborationResult) {
        self.clear();
    }
}

impl CascadeProgress for ProgressReporter {
    fn on_attempt_start(&self, provider: &ProviderSpec, try_number: u32, max_tries: u32) {
        self.start(
            "Media",
            format!("{} (try {}/{})", provider.id, try_number, max_tries),
        );
    }

    fn on_attempt_failed(&self, provider: &ProviderSpec, status: AttemptStatus, detail: &str) {
        self.println(format!(
            "  {} {}: {} - {}",
            "x".red(),
            provider.id,
            status,
            detail
        ));
    }

    fn on_backoff(&self, provider: &ProviderSpec, delay: Duration) {
        self.set_message(format!(
            "{} waiting {}s before retrying",
            provider.id,
            delay.as_secs()
        ));
    }

    fn on_skip(&self, provider: &ProviderSpec, reason: &str) {
        self.println(format!("  {} {} skipped: {}", "-".dimmed(), provider.id, reason));
    }

    fn on_finished(&self, _result: &CascadeResult) {
        self.clear();
    }
}

/// Simple text-based progress (no spinners), written to stderr
pub struct SimpleProgress;

impl CollaborationProgress for SimpleProgress {
    fn on_phase(&self, phase: &CollaborationPhase) {
        if !phase.is_terminal() {
            eprintln!(
                "{} {}",
                "->".cyan(),
                ProgressReporter::phase_display_name(phase).bold()
            );
        }
    }

    fn on_warning(&self, round: usize, message: &str) {
        eprintln!("  {} round {}: {}", "!".yellow(), round, message);
    }
}

impl CascadeProgress for SimpleProgress {
    fn on_attempt_start(&self, provider: &ProviderSpec, try_number: u32, max_tries: u32) {
        eprintln!(
            "{} {} (try {}/{})",
            "->".cyan(),
            provider.id.bold(),
            try_number,
            max_tries
        );
    }

    fn on_attempt_failed(&self, provider: &ProviderSpec, status: AttemptStatus, detail: &str) {
        eprintln!("  {} {}: {} - {}", "x".red(), provider.id, status, detail);
    }

    fn on_skip(&self, provider: &ProviderSpec, reason: &str) {
        eprintln!("  {} {} skipped: {}", "-".dimmed(), provider.id, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftloop_domain::TerminationReason;

    #[test]
    fn test_phase_names() {
        assert_eq!(
            ProgressReporter::phase_display_name(&CollaborationPhase::Reviewing { round: 2 }),
            "Critic is reviewing (round 2)"
        );
        assert_eq!(
            ProgressReporter::phase_display_name(&CollaborationPhase::Terminal(
                TerminationReason::MaxRounds
            )),
            "Round limit reached"
        );
    }

    #[test]
    fn test_spinner_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.on_phase(&CollaborationPhase::Drafting);
        assert!(reporter.bar.lock().unwrap().is_some());
        reporter.on_phase(&CollaborationPhase::Reviewing { round: 1 });
        assert!(reporter.bar.lock().unwrap().is_some());
        reporter.on_phase(&CollaborationPhase::Terminal(TerminationReason::Accepted));
        assert!(reporter.bar.lock().unwrap().is_none());

        let spec = ProviderSpec::image("flux", 0);
        reporter.on_attempt_start(&spec, 1, 3);
        reporter.on_backoff(&spec, Duration::from_secs(30));
        assert!(reporter.bar.lock().unwrap().is_some());
        reporter.clear();
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
