//! Progress reporting seam

use crate::step::Step;

/// Receives progress from a [`PipelineRunner`](crate::PipelineRunner)
///
/// The console implementation renders spinners; tests record the calls.
pub trait Reporter: Send + Sync {
    fn step_started(&self, step: Step);

    /// `detail` is a short suffix such as a file count or artifact path
    fn step_succeeded(&self, step: Step, detail: Option<&str>);

    fn step_failed(&self, step: Step, reason: &str);

    /// Free-form output belonging to the current step, one or more lines
    fn detail(&self, text: &str);
}
