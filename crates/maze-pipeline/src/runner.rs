//! Sequential execution of the plan steps

use crate::context::{COMPLIANCE_FILE, IMAGE_FILE, PipelineContext, PlanRequest};
use crate::error::Result;
use crate::reporter::Reporter;
use crate::step::Step;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use maze_bundle::{FileBundle, FileCollector};
use maze_client::{ComplianceReport, ComplianceSummary, CostReport, PlanPayload, StepClient};
use maze_config::ProfileStore;
use std::path::PathBuf;

/// Terminal state of a run
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunSummary),
    Aborted { step: Step, reason: String },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// What a completed run produced
#[derive(Debug, Default)]
pub struct RunSummary {
    pub project_id: String,
    pub canvas_url: String,
    pub compliance: Option<ComplianceSummary>,
    pub cost: Option<CostReport>,
    pub image_path: Option<PathBuf>,
    /// Non-gating steps that failed, in execution order
    pub failed_steps: Vec<Step>,
}

/// Canvas page of a project on the maze server
pub fn canvas_url(server_url: &str, project_id: &str) -> String {
    format!(
        "{}/projects/{}/canvas",
        server_url.trim_end_matches('/'),
        project_id
    )
}

/// Drives the steps after provider resolution, in fixed order
///
/// Every step receives the [`PipelineContext`] explicitly; the runner itself
/// holds only borrowed collaborators, so one runner can serve several runs.
/// Steps execute strictly one after another and each remote call is awaited
/// before the next starts.
///
/// | Step | On failure |
/// |---|---|
/// | Authenticate | abort |
/// | CollectFiles | `Err(PipelineError::Bundle)` |
/// | Upload, Format, Validate, Compliance | report and continue |
/// | Plan | cleanup, then abort |
/// | CostEstimate, ImageFetch, DeleteRemoteFiles | report and continue |
pub struct PipelineRunner<'a, C: StepClient + ?Sized, R: Reporter + ?Sized> {
    client: &'a C,
    reporter: &'a R,
    profiles: &'a ProfileStore,
}

impl<'a, C: StepClient + ?Sized, R: Reporter + ?Sized> PipelineRunner<'a, C, R> {
    pub fn new(client: &'a C, reporter: &'a R, profiles: &'a ProfileStore) -> Self {
        Self {
            client,
            reporter,
            profiles,
        }
    }

    /// Run the pipeline for `request`.
    ///
    /// Gating failures end in [`RunOutcome::Aborted`]. `Err` is reserved for
    /// a missing or unreadable profile and for file collection errors.
    pub async fn run(&self, request: &PlanRequest) -> Result<RunOutcome> {
        let token = self.profiles.get_token(&request.profile_name)?;
        let mut ctx = PipelineContext::new(&request.directory, request.provider, token);
        let mut summary = RunSummary::default();

        tracing::info!(
            "Starting plan for {} in {}",
            request.project_name,
            request.directory.display()
        );

        if let Err(reason) = self.authenticate(&ctx).await {
            return Ok(RunOutcome::Aborted {
                step: Step::Authenticate,
                reason,
            });
        }

        let bundle = self.collect_files(&ctx)?;

        if !self.upload(&mut ctx, &bundle).await {
            summary.failed_steps.push(Step::Upload);
        }
        if !self.format(&ctx).await {
            summary.failed_steps.push(Step::Format);
        }
        if !self.validate(&ctx).await {
            summary.failed_steps.push(Step::Validate);
        }
        let compliance = self.compliance(&ctx).await;
        if compliance.is_err() {
            summary.failed_steps.push(Step::Compliance);
        }
        summary.compliance = compliance.ok().flatten();

        let project_id = match self.plan(&mut ctx, request).await {
            Ok(id) => id,
            Err(reason) => {
                self.cleanup(&ctx).await;
                return Ok(RunOutcome::Aborted {
                    step: Step::Plan,
                    reason,
                });
            }
        };

        let cost = self.cost(&ctx, &project_id).await;
        if cost.is_none() {
            summary.failed_steps.push(Step::CostEstimate);
        }
        summary.cost = cost;

        if request.generate_image {
            let image = self.image(&ctx, &project_id).await;
            if image.is_none() {
                summary.failed_steps.push(Step::ImageFetch);
            }
            summary.image_path = image;
        }

        if !self.cleanup(&ctx).await {
            summary.failed_steps.push(Step::DeleteRemoteFiles);
        }

        summary.canvas_url = canvas_url(&request.server_url, &project_id);
        summary.project_id = project_id;
        tracing::info!("Plan completed: {}", summary.canvas_url);
        Ok(RunOutcome::Completed(summary))
    }

    async fn authenticate(&self, ctx: &PipelineContext) -> std::result::Result<(), String> {
        let step = Step::Authenticate;
        self.reporter.step_started(step);

        let outcome = self.client.authenticate(&ctx.auth_token).await;
        if outcome.succeeded() {
            self.reporter.step_succeeded(step, None);
            Ok(())
        } else {
            let reason = outcome.failure_reason();
            self.reporter.step_failed(step, &reason);
            Err(reason)
        }
    }

    fn collect_files(&self, ctx: &PipelineContext) -> Result<FileBundle> {
        let step = Step::CollectFiles;
        self.reporter.step_started(step);

        match FileCollector::collect(&ctx.directory) {
            Ok(bundle) => {
                if bundle.is_empty() {
                    tracing::warn!("No terraform files found in {}", ctx.directory.display());
                }
                let detail = format!("{} file(s)", bundle.len());
                self.reporter.step_succeeded(step, Some(&detail));
                Ok(bundle)
            }
            Err(e) => {
                self.reporter.step_failed(step, &e.to_string());
                Err(e.into())
            }
        }
    }

    async fn upload(&self, ctx: &mut PipelineContext, bundle: &FileBundle) -> bool {
        let step = Step::Upload;
        self.reporter.step_started(step);

        let outcome = self.client.upload(&ctx.auth_token, bundle).await;
        let handle = outcome.identifier();
        if outcome.succeeded() && !handle.is_empty() {
            tracing::debug!("Upload handle: {}", handle);
            ctx.bundle_handle = Some(handle);
            self.reporter.step_succeeded(step, None);
            true
        } else if outcome.succeeded() {
            self.reporter.step_failed(step, "empty upload handle");
            false
        } else {
            self.reporter.step_failed(step, &outcome.failure_reason());
            false
        }
    }

    async fn format(&self, ctx: &PipelineContext) -> bool {
        let step = Step::Format;
        self.reporter.step_started(step);

        let outcome = self.client.format(&ctx.auth_token, ctx.handle()).await;
        if outcome.succeeded() {
            self.reporter.step_succeeded(step, None);
        } else {
            self.reporter.step_failed(step, &outcome.failure_reason());
        }
        outcome.succeeded()
    }

    async fn validate(&self, ctx: &PipelineContext) -> bool {
        let step = Step::Validate;
        self.reporter.step_started(step);

        let outcome = self
            .client
            .validate(&ctx.auth_token, ctx.handle(), ctx.provider.normalized())
            .await;
        if outcome.succeeded() {
            self.reporter.step_succeeded(step, None);
        } else {
            self.reporter.step_failed(step, &outcome.failure_reason());
        }

        let report = outcome.body_text();
        if !report.trim().is_empty() {
            self.reporter.detail(report.trim_end());
        }
        outcome.succeeded()
    }

    /// `Err` when no body could be saved; `Ok(None)` when the body was saved
    /// but is not a compliance report.
    async fn compliance(
        &self,
        ctx: &PipelineContext,
    ) -> std::result::Result<Option<ComplianceSummary>, ()> {
        let step = Step::Compliance;
        self.reporter.step_started(step);

        let outcome = self.client.compliance(&ctx.auth_token, ctx.handle()).await;
        if !outcome.succeeded() {
            self.reporter.step_failed(step, &outcome.failure_reason());
            return Err(());
        }

        let path = match ctx.write_artifact(COMPLIANCE_FILE, &outcome.body) {
            Ok(path) => path,
            Err(e) => {
                let reason = format!("could not write {}: {}", COMPLIANCE_FILE, e);
                self.reporter.step_failed(step, &reason);
                return Err(());
            }
        };
        self.reporter
            .step_succeeded(step, Some(&path.display().to_string()));

        match serde_json::from_slice::<ComplianceReport>(&outcome.body) {
            Ok(report) => {
                self.reporter.detail(&report.summary.to_string());
                Ok(Some(report.summary))
            }
            Err(e) => {
                tracing::debug!("Compliance body is not a report: {}", e);
                Ok(None)
            }
        }
    }

    async fn plan(
        &self,
        ctx: &mut PipelineContext,
        request: &PlanRequest,
    ) -> std::result::Result<String, String> {
        let step = Step::Plan;
        self.reporter.step_started(step);

        let payload = PlanPayload {
            name: request.project_name.clone(),
            description: request.description.clone(),
            provider: ctx.provider.normalized().to_string(),
        };
        let outcome = self
            .client
            .plan(&ctx.auth_token, ctx.handle(), &payload)
            .await;

        let project_id = outcome.identifier();
        let failure = if !outcome.succeeded() {
            Some(outcome.failure_reason())
        } else if project_id.is_empty() {
            Some("no project id returned".to_string())
        } else {
            None
        };

        match failure {
            Some(reason) => {
                self.reporter.step_failed(step, &reason);
                Err(reason)
            }
            None => {
                ctx.project_id = Some(project_id.clone());
                self.reporter.step_succeeded(step, None);
                Ok(project_id)
            }
        }
    }

    async fn cost(&self, ctx: &PipelineContext, project_id: &str) -> Option<CostReport> {
        let step = Step::CostEstimate;
        self.reporter.step_started(step);

        let outcome = self.client.cost(&ctx.auth_token, project_id).await;
        if !outcome.succeeded() {
            tracing::debug!("Cost request failed: {}", outcome.failure_reason());
            self.reporter.step_failed(step, "cost service unavailable");
            return None;
        }

        let report: CostReport = match serde_json::from_slice(&outcome.body) {
            Ok(report) => report,
            Err(e) => {
                self.reporter
                    .step_failed(step, &format!("invalid cost report: {}", e));
                return None;
            }
        };

        self.reporter.step_succeeded(step, None);
        self.reporter.detail(&cost_lines(&report).join("\n"));
        Some(report)
    }

    async fn image(&self, ctx: &PipelineContext, project_id: &str) -> Option<PathBuf> {
        let step = Step::ImageFetch;
        self.reporter.step_started(step);

        let outcome = self.client.canvas_image(&ctx.auth_token, project_id).await;
        if !outcome.succeeded() {
            self.reporter.step_failed(step, &outcome.failure_reason());
            return None;
        }

        let bytes = match decode_image(&outcome.identifier()) {
            Ok(bytes) => bytes,
            Err(reason) => {
                self.reporter.step_failed(step, &reason);
                return None;
            }
        };

        match ctx.write_artifact(IMAGE_FILE, &bytes) {
            Ok(path) => {
                self.reporter
                    .step_succeeded(step, Some(&path.display().to_string()));
                Some(path)
            }
            Err(e) => {
                self.reporter
                    .step_failed(step, &format!("could not write {}: {}", IMAGE_FILE, e));
                None
            }
        }
    }

    /// Returns false only when a cleanup call was made and failed
    async fn cleanup(&self, ctx: &PipelineContext) -> bool {
        let Some(handle) = ctx.bundle_handle.as_deref() else {
            tracing::debug!("Nothing uploaded, skipping remote cleanup");
            return true;
        };

        let step = Step::DeleteRemoteFiles;
        self.reporter.step_started(step);

        let outcome = self.client.delete_files(&ctx.auth_token, handle).await;
        if outcome.succeeded() {
            self.reporter.step_succeeded(step, None);
        } else {
            self.reporter.step_failed(step, &outcome.failure_reason());
        }
        outcome.succeeded()
    }
}

/// Daily and monthly totals followed by one line per resource
pub fn cost_lines(report: &CostReport) -> Vec<String> {
    let mut lines = vec![
        format!("Daily cost: ${:.2}", report.daily_cost()),
        format!("Monthly cost: ${:.2}", report.monthly_cost()),
    ];
    lines.extend(report.resources.iter().map(|r| {
        format!("{}: {} {}/hour", r.resource, r.hourly_cost, r.currency)
    }));
    lines
}

fn decode_image(payload: &str) -> std::result::Result<Vec<u8>, String> {
    // tolerate a data URL wrapper around the base64 text
    let data = payload
        .split_once(";base64,")
        .map(|(_, data)| data)
        .unwrap_or(payload);
    if data.is_empty() {
        return Err("empty image payload".to_string());
    }
    STANDARD
        .decode(data)
        .map_err(|e| format!("invalid image payload: {}", e))
}
