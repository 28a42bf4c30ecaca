//! Pipeline steps and their gating policy

/// What a step's failure means for the rest of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Re-prompt until the step succeeds
    Prompt,
    /// Stop the run
    Abort,
    /// Report and carry on
    Continue,
}

/// One stage of `maze plan`, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    ResolveProvider,
    Authenticate,
    CollectFiles,
    Upload,
    Format,
    Validate,
    Compliance,
    Plan,
    CostEstimate,
    ImageFetch,
    DeleteRemoteFiles,
}

impl Step {
    pub const ORDER: [Step; 11] = [
        Step::ResolveProvider,
        Step::Authenticate,
        Step::CollectFiles,
        Step::Upload,
        Step::Format,
        Step::Validate,
        Step::Compliance,
        Step::Plan,
        Step::CostEstimate,
        Step::ImageFetch,
        Step::DeleteRemoteFiles,
    ];

    pub fn gate(&self) -> Gate {
        match self {
            Step::ResolveProvider => Gate::Prompt,
            Step::Authenticate | Step::CollectFiles | Step::Plan => Gate::Abort,
            _ => Gate::Continue,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::ResolveProvider => "resolve-provider",
            Step::Authenticate => "authenticate",
            Step::CollectFiles => "collect-files",
            Step::Upload => "upload",
            Step::Format => "format",
            Step::Validate => "validate",
            Step::Compliance => "compliance",
            Step::Plan => "plan",
            Step::CostEstimate => "cost-estimate",
            Step::ImageFetch => "image-fetch",
            Step::DeleteRemoteFiles => "delete-remote-files",
        }
    }

    /// Shown while the step runs
    pub fn running_message(&self) -> &'static str {
        match self {
            Step::ResolveProvider => "Selecting cloud provider",
            Step::Authenticate => "Authenticating",
            Step::CollectFiles => "Collecting terraform files",
            Step::Upload => "Uploading files",
            Step::Format => "Formatting files",
            Step::Validate => "Validating files",
            Step::Compliance => "Running compliance checks",
            Step::Plan => "Plan in progress",
            Step::CostEstimate => "Calculating cloud cost",
            Step::ImageFetch => "Generating canvas image",
            Step::DeleteRemoteFiles => "Removing uploaded files",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Step::ResolveProvider => "Cloud provider selected",
            Step::Authenticate => "Authenticated",
            Step::CollectFiles => "Files collected",
            Step::Upload => "Files uploaded",
            Step::Format => "Files formatted",
            Step::Validate => "Validation finished",
            Step::Compliance => "Compliance checks finished",
            Step::Plan => "Plan finished",
            Step::CostEstimate => "Cost calculated",
            Step::ImageFetch => "Canvas image generated",
            Step::DeleteRemoteFiles => "Uploaded files removed",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Step::ResolveProvider => "No cloud provider selected",
            Step::Authenticate => "Authentication failed",
            Step::CollectFiles => "File collection failed",
            Step::Upload => "Upload failed",
            Step::Format => "Formatting failed",
            Step::Validate => "Validation failed",
            Step::Compliance => "Compliance checks failed",
            Step::Plan => "Plan failed",
            Step::CostEstimate => "Cost calculation failed",
            Step::ImageFetch => "Canvas image generation failed",
            Step::DeleteRemoteFiles => "Removing uploaded files failed",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gating_policy() {
        let aborting: Vec<Step> = Step::ORDER
            .into_iter()
            .filter(|s| s.gate() == Gate::Abort)
            .collect();
        assert_eq!(
            aborting,
            vec![Step::Authenticate, Step::CollectFiles, Step::Plan]
        );
        assert_eq!(Step::ResolveProvider.gate(), Gate::Prompt);
        assert_eq!(Step::Upload.gate(), Gate::Continue);
        assert_eq!(Step::DeleteRemoteFiles.gate(), Gate::Continue);
    }

    #[test]
    fn test_order() {
        assert_eq!(Step::ORDER.first(), Some(&Step::ResolveProvider));
        assert_eq!(Step::ORDER.last(), Some(&Step::DeleteRemoteFiles));
    }
}
