//! Remote steps and their outcomes

use std::borrow::Cow;

/// A remote operation backed by exactly one HTTP call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteStep {
    Authenticate,
    Upload,
    Format,
    Validate,
    Compliance,
    Plan,
    Cost,
    CanvasImage,
    DeleteFiles,
}

impl RemoteStep {
    pub fn method(&self) -> reqwest::Method {
        match self {
            RemoteStep::Upload | RemoteStep::Plan => reqwest::Method::POST,
            _ => reqwest::Method::GET,
        }
    }

    /// Route relative to the server URL. `key` is the upload path handle or
    /// the project id, depending on the step; it is ignored where unused.
    /// Each `/`-separated segment of the key is percent-encoded.
    pub fn route(&self, key: &str) -> String {
        let key = encode_key(key);
        match self {
            RemoteStep::Authenticate => "/api/user/".to_string(),
            RemoteStep::Upload => "/api/cli/submitFiles/".to_string(),
            RemoteStep::Format => format!("/api/cli/tfformat/{}", key),
            RemoteStep::Validate => format!("/api/cli/tfvalidate/{}", key),
            RemoteStep::Compliance => format!("/api/cli/compliance/{}", key),
            RemoteStep::Plan => format!("/api/cli/tfplan/{}", key),
            RemoteStep::Cost => format!("/api/cost/{}", key),
            RemoteStep::CanvasImage => format!("/api/cli/canvasimage/{}", key),
            RemoteStep::DeleteFiles => format!("/api/cli/deletefiles/{}", key),
        }
    }

    /// Whether `status` counts as success for this step
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            RemoteStep::Authenticate | RemoteStep::Cost | RemoteStep::DeleteFiles => status == 200,
            RemoteStep::Upload | RemoteStep::Format | RemoteStep::Validate | RemoteStep::Plan => {
                status == 200 || status == 201
            }
            // body is consumed whatever the status
            RemoteStep::Compliance | RemoteStep::CanvasImage => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RemoteStep::Authenticate => "authenticate",
            RemoteStep::Upload => "upload",
            RemoteStep::Format => "format",
            RemoteStep::Validate => "validate",
            RemoteStep::Compliance => "compliance",
            RemoteStep::Plan => "plan",
            RemoteStep::Cost => "cost",
            RemoteStep::CanvasImage => "canvas-image",
            RemoteStep::DeleteFiles => "delete-files",
        }
    }
}

fn encode_key(key: &str) -> String {
    key.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

impl std::fmt::Display for RemoteStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a remote call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    UnexpectedStatus(u16),
    TransportError(String),
}

/// Result of one remote step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: RemoteStep,
    pub kind: OutcomeKind,
    /// HTTP status, when a response arrived
    pub status: Option<u16>,
    /// Response body, captured whether or not the step succeeded
    pub body: Vec<u8>,
}

impl StepOutcome {
    /// Classify a received response
    pub fn from_response(step: RemoteStep, status: u16, body: Vec<u8>) -> Self {
        let kind = if step.accepts(status) {
            OutcomeKind::Success
        } else {
            OutcomeKind::UnexpectedStatus(status)
        };
        Self {
            step,
            kind,
            status: Some(status),
            body,
        }
    }

    pub fn transport_error(step: RemoteStep, message: impl Into<String>) -> Self {
        Self {
            step,
            kind: OutcomeKind::TransportError(message.into()),
            status: None,
            body: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// The body read as an identifier: trimmed, with one pair of enclosing
    /// double quotes removed.
    pub fn identifier(&self) -> String {
        let text = self.body_text();
        let trimmed = text.trim();
        trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(trimmed)
            .to_string()
    }

    /// Human readable reason for a failed outcome
    pub fn failure_reason(&self) -> String {
        match &self.kind {
            OutcomeKind::Success => String::new(),
            OutcomeKind::UnexpectedStatus(code) => format!("unexpected status {}", code),
            OutcomeKind::TransportError(message) => format!("transport error: {}", message),
        }
    }
}
