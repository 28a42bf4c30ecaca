//! Run inputs and run-scoped state

use crate::provider::Provider;
use maze_bundle::OUTPUT_DIR_NAME;
use std::fs;
use std::path::{Path, PathBuf};

pub const COMPLIANCE_FILE: &str = "maze_compliance_results.json";
pub const IMAGE_FILE: &str = "maze_canvas_image.png";

/// Everything `maze plan` was asked to do
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub directory: PathBuf,
    pub project_name: String,
    pub description: String,
    pub provider: Provider,
    pub generate_image: bool,
    pub profile_name: String,
    pub server_url: String,
}

/// State threaded through the steps of one run
///
/// Created after the profile is resolved. Upload fills `bundle_handle` and
/// Plan fills `project_id`; nothing else mutates it. Artifacts are written
/// under `output_dir`, which is only created by the first write, so an
/// aborted run before Compliance leaves the project directory untouched.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub directory: PathBuf,
    pub provider: Provider,
    pub auth_token: String,
    /// Set once the upload succeeds
    pub bundle_handle: Option<String>,
    /// Set once the plan succeeds
    pub project_id: Option<String>,
    pub output_dir: PathBuf,
}

impl PipelineContext {
    pub fn new(directory: impl Into<PathBuf>, provider: Provider, auth_token: impl Into<String>) -> Self {
        let directory = directory.into();
        let output_dir = directory.join(OUTPUT_DIR_NAME);
        Self {
            directory,
            provider,
            auth_token: auth_token.into(),
            bundle_handle: None,
            project_id: None,
            output_dir,
        }
    }

    /// Handle for the handle-addressed steps; empty when the upload failed
    pub fn handle(&self) -> &str {
        self.bundle_handle.as_deref().unwrap_or_default()
    }

    /// Write `bytes` to `name` inside the output directory, creating the
    /// directory on first use. Existing files are overwritten.
    pub fn write_artifact(&self, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(name);
        fs::write(&path, bytes)?;
        tracing::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
