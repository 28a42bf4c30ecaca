//! maze API HTTP client

use crate::outcome::{RemoteStep, StepOutcome};
use crate::types::{PlanPayload, ValidatePayload};
use async_trait::async_trait;
use maze_bundle::FileBundle;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};

/// Form field carrying each file's content
pub const FILE_FIELD: &str = "file";

/// Form field carrying each file's path relative to the collected directory
pub const PATH_FIELD: &str = "originalPath";

/// Upload form: per file, a `file` part followed by its `originalPath` field
pub fn upload_form(bundle: &FileBundle) -> Form {
    bundle.entries().iter().fold(Form::new(), |form, entry| {
        let part = Part::bytes(entry.content.clone()).file_name(entry.file_name.clone());
        form.part(FILE_FIELD, part)
            .text(PATH_FIELD, entry.relative_path.clone())
    })
}

/// Remote operations the plan pipeline drives, one per step
///
/// `token` is sent verbatim in the `Authorization` header. `handle` is the
/// upload path handle returned by [`StepClient::upload`]; `project_id` is the
/// body returned by [`StepClient::plan`].
#[async_trait]
pub trait StepClient: Send + Sync {
    /// Check that the token is accepted
    async fn authenticate(&self, token: &str) -> StepOutcome;

    /// Send the collected files; the body is the path handle
    async fn upload(&self, token: &str, bundle: &FileBundle) -> StepOutcome;

    async fn format(&self, token: &str, handle: &str) -> StepOutcome;

    /// Body is a human readable validation report
    async fn validate(&self, token: &str, handle: &str, provider: &str) -> StepOutcome;

    /// Body is a JSON compliance report
    async fn compliance(&self, token: &str, handle: &str) -> StepOutcome;

    /// Create the project; the body is the project id
    async fn plan(&self, token: &str, handle: &str, payload: &PlanPayload) -> StepOutcome;

    /// Body is a JSON cost report
    async fn cost(&self, token: &str, project_id: &str) -> StepOutcome;

    /// Body is a base64-encoded PNG of the project canvas
    async fn canvas_image(&self, token: &str, project_id: &str) -> StepOutcome;

    async fn delete_files(&self, token: &str, handle: &str) -> StepOutcome;
}

/// [`StepClient`] talking to a maze server over HTTP
///
/// Routes are resolved against `base_url` with any trailing `/` removed.
/// A failed send becomes [`OutcomeKind::TransportError`](crate::OutcomeKind);
/// once a status line arrives the outcome always carries the status, even if
/// the body then fails to read.
pub struct MazeClient {
    client: reqwest::Client,
    base_url: String,
}

impl MazeClient {
    /// Create a client for the server at `base_url`.
    ///
    /// No timeout is configured; calls wait for the transport to answer.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `step` for the given handle or project id
    pub fn url(&self, step: RemoteStep, key: &str) -> String {
        format!("{}{}", self.base_url, step.route(key))
    }

    fn request(&self, step: RemoteStep, token: &str, key: &str) -> reqwest::RequestBuilder {
        self.client
            .request(step.method(), self.url(step, key))
            .header(AUTHORIZATION, token)
    }

    async fn execute(&self, step: RemoteStep, request: reqwest::RequestBuilder) -> StepOutcome {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} request failed: {}", step, e);
                return StepOutcome::transport_error(step, e.to_string());
            }
        };

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                // the status still classifies the step
                tracing::warn!("{} response body unreadable (status {}): {}", step, status, e);
                Vec::new()
            }
        };

        tracing::debug!("{} -> {} ({} bytes)", step, status, body.len());
        StepOutcome::from_response(step, status, body)
    }
}

#[async_trait]
impl StepClient for MazeClient {
    async fn authenticate(&self, token: &str) -> StepOutcome {
        let step = RemoteStep::Authenticate;
        self.execute(step, self.request(step, token, "")).await
    }

    async fn upload(&self, token: &str, bundle: &FileBundle) -> StepOutcome {
        let step = RemoteStep::Upload;
        tracing::info!(
            "Uploading {} file(s) ({} bytes)",
            bundle.len(),
            bundle.content_size()
        );
        let form = upload_form(bundle);
        tracing::debug!("Multipart boundary: {}", form.boundary());
        let request = self.request(step, token, "").multipart(form);
        self.execute(step, request).await
    }

    async fn format(&self, token: &str, handle: &str) -> StepOutcome {
        let step = RemoteStep::Format;
        self.execute(step, self.request(step, token, handle)).await
    }

    async fn validate(&self, token: &str, handle: &str, provider: &str) -> StepOutcome {
        let step = RemoteStep::Validate;
        let payload = ValidatePayload {
            provider: provider.to_string(),
        };
        let request = self.request(step, token, handle).json(&payload);
        self.execute(step, request).await
    }

    async fn compliance(&self, token: &str, handle: &str) -> StepOutcome {
        let step = RemoteStep::Compliance;
        self.execute(step, self.request(step, token, handle)).await
    }

    async fn plan(&self, token: &str, handle: &str, payload: &PlanPayload) -> StepOutcome {
        let step = RemoteStep::Plan;
        let request = self.request(step, token, handle).json(payload);
        self.execute(step, request).await
    }

    async fn cost(&self, token: &str, project_id: &str) -> StepOutcome {
        let step = RemoteStep::Cost;
        self.execute(step, self.request(step, token, project_id))
            .await
    }

    async fn canvas_image(&self, token: &str, project_id: &str) -> StepOutcome {
        let step = RemoteStep::CanvasImage;
        self.execute(step, self.request(step, token, project_id))
            .await
    }

    async fn delete_files(&self, token: &str, handle: &str) -> StepOutcome {
        let step = RemoteStep::DeleteFiles;
        self.execute(step, self.request(step, token, handle)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::OutcomeKind;
    use maze_bundle::BundleEntry;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one connection, answer with `response`, and hand back the raw request
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = MazeClient::new("https://maze.example.com/");
        assert_eq!(client.base_url(), "https://maze.example.com");
        assert_eq!(
            client.url(RemoteStep::Cost, "p-1"),
            "https://maze.example.com/api/cost/p-1"
        );
    }

    #[tokio::test]
    async fn test_authenticate_sends_token() {
        let (url, server) = serve_once(http_response("200 OK", "{}")).await;
        let client = MazeClient::new(url);

        let outcome = client.authenticate("secret-token").await;
        let request = server.await.unwrap();

        assert!(outcome.succeeded());
        assert!(request.starts_with("GET /api/user/ HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: secret-token"));
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let (url, server) = serve_once(http_response("401 Unauthorized", "bad token")).await;
        let client = MazeClient::new(url);

        let outcome = client.authenticate("nope").await;
        server.await.unwrap();

        assert_eq!(outcome.kind, OutcomeKind::UnexpectedStatus(401));
        assert_eq!(outcome.body_text(), "bad token");
    }

    fn tf_entry(file_name: &str, relative_path: &str, content: &str) -> BundleEntry {
        BundleEntry {
            file_name: file_name.to_string(),
            relative_path: relative_path.to_string(),
            content: content.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_upload_sends_multipart() {
        let (url, server) = serve_once(http_response("201 Created", "uploads/abc")).await;
        let client = MazeClient::new(url);

        let mut bundle = FileBundle::new();
        bundle.push(tf_entry("main.tf", "modules/net/main.tf", "resource \"null_resource\" \"x\" {}"));
        bundle.push(tf_entry("prod.tfvars", "prod.tfvars", "region = \"eu\""));

        let outcome = client.upload("tok", &bundle).await;
        let request = server.await.unwrap();

        assert!(outcome.succeeded());
        assert_eq!(outcome.identifier(), "uploads/abc");
        assert!(request.starts_with("POST /api/cli/submitFiles/ HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: multipart/form-data; boundary="));

        // each file part is followed by its path field
        let file = request
            .find("name=\"file\"; filename=\"main.tf\"")
            .unwrap();
        let path = request.find("modules/net/main.tf").unwrap();
        let second = request
            .find("name=\"file\"; filename=\"prod.tfvars\"")
            .unwrap();
        assert!(file < path && path < second);
        assert_eq!(request.matches("name=\"originalPath\"").count(), 2);
        assert!(request.contains("region = \"eu\""));
    }

    #[test]
    fn test_upload_form_boundary_is_stable() {
        let mut bundle = FileBundle::new();
        bundle.push(tf_entry("a.tf", "a.tf", "a"));

        let form = upload_form(&bundle);
        let boundary = form.boundary().to_string();
        assert!(!boundary.is_empty());
        assert_eq!(form.boundary(), boundary);
        assert_ne!(upload_form(&bundle).boundary(), boundary);
    }

    #[tokio::test]
    async fn test_upload_file_name_cannot_add_headers() {
        let (url, server) = serve_once(http_response("200 OK", "uploads/x")).await;
        let client = MazeClient::new(url);

        let mut bundle = FileBundle::new();
        bundle.push(tf_entry(
            "x\r\nX-Injected: 1\r\n\r\nfake.tf",
            "x\r\nX-Injected: 1\r\n\r\nfake.tf",
            "body",
        ));

        let outcome = client.upload("tok", &bundle).await;
        let request = server.await.unwrap();

        assert!(outcome.succeeded());
        let headers_end = request.find("body").unwrap();
        assert!(!request[..headers_end].contains("\r\nX-Injected: 1\r\n"));
    }

    #[tokio::test]
    async fn test_plan_sends_json() {
        let (url, server) = serve_once(http_response("200 OK", "proj-7")).await;
        let client = MazeClient::new(url);

        let payload = PlanPayload {
            name: "demo".to_string(),
            description: "Created with maze-cli".to_string(),
            provider: "aws".to_string(),
        };
        let outcome = client.plan("tok", "uploads/abc", &payload).await;
        let request = server.await.unwrap();

        assert!(outcome.succeeded());
        assert_eq!(outcome.identifier(), "proj-7");
        assert!(request.starts_with("POST /api/cli/tfplan/uploads/abc HTTP/1.1"));
        assert!(request.contains("\"provider\":\"aws\""));
    }

    #[tokio::test]
    async fn test_compliance_body_kept_on_error_status() {
        let (url, server) = serve_once(http_response("500 Internal Server Error", "{\"checkType\":\"x\"}")).await;
        let client = MazeClient::new(url);

        let outcome = client.compliance("tok", "h").await;
        server.await.unwrap();

        assert!(outcome.succeeded());
        assert_eq!(outcome.status, Some(500));
        assert_eq!(outcome.body_text(), "{\"checkType\":\"x\"}");
    }

    #[tokio::test]
    async fn test_truncated_body_keeps_status() {
        // the advertised length is never delivered
        let response =
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort"
                .to_string();
        let (url, server) = serve_once(response).await;
        let client = MazeClient::new(url);

        let outcome = client.authenticate("tok").await;
        server.await.unwrap();

        assert_eq!(outcome.kind, OutcomeKind::UnexpectedStatus(401));
        assert_eq!(outcome.status, Some(401));
        assert!(outcome.body.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = MazeClient::new(format!("http://{}", addr));
        let outcome = client.delete_files("tok", "h").await;

        assert!(matches!(outcome.kind, OutcomeKind::TransportError(_)));
        assert!(outcome.body.is_empty());
    }
}
