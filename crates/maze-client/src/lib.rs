//! maze multicloud API client
//!
//! One HTTP round trip per remote pipeline step. Every call yields a
//! [`StepOutcome`] instead of an error: transport failures and unexpected
//! status codes are data the pipeline inspects, not exceptions.
//!
//! # Example
//!
//! ```ignore
//! use maze_client::{MazeClient, StepClient};
//!
//! let client = MazeClient::new("https://maze-multicloud.com");
//! let outcome = client.authenticate(&token).await;
//! if !outcome.succeeded() {
//!     eprintln!("{}", outcome.failure_reason());
//! }
//! ```

pub mod client;
pub mod outcome;
pub mod types;

pub use client::{FILE_FIELD, MazeClient, PATH_FIELD, StepClient, upload_form};
pub use outcome::{OutcomeKind, RemoteStep, StepOutcome};
pub use types::{
    ComplianceReport, ComplianceResults, ComplianceSummary, CostReport, CostResource,
    HOURS_PER_DAY, HOURS_PER_MONTH, PlanPayload, ValidatePayload, round_to,
};
