//! Terraform file collection for maze-cli
//!
//! Walks a project directory and picks up the infrastructure-as-code files
//! the remote service understands. Wire framing belongs to `maze-client`.

pub mod bundle;
pub mod collector;
pub mod error;

pub use bundle::{BundleEntry, FileBundle};
pub use collector::{FileCollector, OUTPUT_DIR_NAME, RECOGNIZED_EXTENSIONS};
pub use error::{BundleError, BundleResult};
