//! Request and response payloads shared across steps

use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: f64 = 24.0;
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Body of the validate request
#[derive(Debug, Clone, Serialize)]
pub struct ValidatePayload {
    pub provider: String,
}

/// Body of the plan request
#[derive(Debug, Clone, Serialize)]
pub struct PlanPayload {
    pub name: String,
    pub description: String,
    pub provider: String,
}

/// Compliance scan report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    #[serde(default)]
    pub check_type: String,
    #[serde(default)]
    pub results: ComplianceResults,
    #[serde(default)]
    pub summary: ComplianceSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResults {
    #[serde(default)]
    pub failed_checks: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceSummary {
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub parsing_errors: u64,
    pub resource_count: u64,
    pub checkov_version: String,
}

impl std::fmt::Display for ComplianceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped across {} resource(s)",
            self.passed, self.failed, self.skipped, self.resource_count
        )
    }
}

/// Cost estimate for a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReport {
    /// Hourly cost of the whole project
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub resources: Vec<CostResource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostResource {
    pub hourly_cost: f64,
    pub description: String,
    pub currency: String,
    pub resource: String,
}

impl CostReport {
    pub fn daily_cost(&self) -> f64 {
        round_to(self.total_cost * HOURS_PER_DAY, 2)
    }

    pub fn monthly_cost(&self) -> f64 {
        round_to(self.total_cost * HOURS_PER_MONTH, 2)
    }
}

/// Round half away from zero at `places` decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let ratio = 10f64.powi(places as i32);
    (value * ratio).round() / ratio
}
