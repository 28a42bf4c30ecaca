use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use maze_pipeline::{Reporter, Step};
use std::sync::Mutex;
use std::time::Duration;

/// Renders pipeline progress as one spinner per step, replaced by a
/// ✓/✗ line on stdout once the step ends.
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    fn finish_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn step_started(&self, step: Step) {
        self.finish_spinner();

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("{}...", step.running_message()));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn step_succeeded(&self, step: Step, detail: Option<&str>) {
        self.finish_spinner();
        match detail {
            Some(detail) => println!(
                "{} {} ({})",
                "✓".green(),
                step.success_message(),
                detail.dimmed()
            ),
            None => println!("{} {}", "✓".green(), step.success_message()),
        }
    }

    fn step_failed(&self, step: Step, reason: &str) {
        self.finish_spinner();
        println!(
            "{} {}: {}",
            "✗".red(),
            step.failure_message().red(),
            reason
        );
    }

    fn detail(&self, text: &str) {
        for line in text.lines() {
            println!("    {}", line);
        }
    }
}
