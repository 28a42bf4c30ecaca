//! maze plan pipeline
//!
//! Sequences the remote steps of `maze plan`: authenticate, collect and
//! upload the terraform files, format, validate, scan for compliance, plan,
//! estimate cost, fetch the canvas image, and clean up. Each step has a fixed
//! gating policy deciding whether a failure stops the run.
//!
//! ```text
//! ResolveProvider -> Authenticate -> CollectFiles -> Upload -> Format
//!   -> Validate -> Compliance -> Plan -> CostEstimate -> ImageFetch
//!   -> DeleteRemoteFiles -> Completed
//! ```

pub mod context;
pub mod error;
pub mod provider;
pub mod reporter;
pub mod runner;
pub mod step;

pub use context::{COMPLIANCE_FILE, IMAGE_FILE, PipelineContext, PlanRequest};
pub use error::{PipelineError, Result};
pub use provider::Provider;
pub use reporter::Reporter;
pub use runner::{PipelineRunner, RunOutcome, RunSummary, canvas_url, cost_lines};
pub use step::{Gate, Step};
