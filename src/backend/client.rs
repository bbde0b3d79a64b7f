use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::blocking::{Client, Response, multipart};
use serde_json::Value;

use crate::chat::{GraphKind, parse_backend_json, unnest_json};

use super::types::{
    Commentary, CommentaryRequest, ConversationHistory, MainUserResponse, ProcessOutcome,
    StatusResponse, UploadOutcome,
};

/// Blocking client for the analysis backend. Every call is a single
/// request without retries.
#[derive(Clone, Debug)]
pub struct BackendClient {
    base: Url,
    http: Client,
}

impl BackendClient {
    pub fn new(base: Url) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base: with_trailing_slash(base),
            http,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid endpoint path {path}"))
    }

    fn get_text(&self, path: &str) -> Result<String> {
        let url = self.endpoint(path)?;
        log::debug!("GET {url}");

        let response = self
            .http
            .get(url.clone())
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("backend rejected GET {url}"))?;

        response
            .text()
            .with_context(|| format!("failed to read body from {url}"))
    }

    pub fn main_user(&self) -> Result<Option<String>> {
        let raw = self.get_text("/api/getmainuser")?;
        let parsed = parse_backend_json(&raw).context("invalid main user response")?;
        let response = serde_json::from_value::<MainUserResponse>(parsed)
            .context("main user response has an unexpected shape")?;

        Ok(response.username.filter(|name| !name.trim().is_empty()))
    }

    /// Raw `username -> record` document for the given view.
    pub fn graph_payload(&self, kind: GraphKind) -> Result<String> {
        self.get_text(kind.endpoint())
            .with_context(|| format!("failed to fetch {}", kind.label().to_lowercase()))
    }

    pub fn conversation_history(&self) -> Result<ConversationHistory> {
        let raw = self.get_text("/getconversationhistory")?;
        let parsed = parse_backend_json(&raw).context("invalid conversation history")?;
        let mut history = serde_json::from_value::<ConversationHistory>(parsed)
            .context("conversation history has an unexpected shape")?;
        history.stats = unnest_json(history.stats).context("conversation stats are not JSON")?;
        Ok(history)
    }

    /// Sends an export file as multipart field `file`. Rejections reported by
    /// the backend are an outcome, transport failures are errors.
    pub fn upload(&self, path: &Path) -> Result<UploadOutcome> {
        let url = self.endpoint("/upload")?;
        let form = multipart::Form::new()
            .file("file", path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        log::info!("uploading {} to {url}", path.display());
        let response = self
            .http
            .post(url.clone())
            .multipart(form)
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let (success, body) = status_body(response)?;
        if success {
            let task_id = body.task_id.and_then(|value| match value {
                Value::Null => None,
                Value::String(text) => Some(text),
                other => Some(other.to_string()),
            });
            Ok(UploadOutcome::Accepted { task_id })
        } else {
            Ok(UploadOutcome::Rejected(
                body.error
                    .unwrap_or_else(|| "File upload failed.".to_owned()),
            ))
        }
    }

    pub fn process_username(&self, username: &str) -> Result<ProcessOutcome> {
        let url = self.endpoint("/processUsername")?;
        log::info!("submitting username {username}");

        let response = self
            .http
            .post(url.clone())
            .json(&serde_json::json!({ "username": username }))
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let (success, body) = status_body(response)?;
        match body.error {
            Some(error) => Ok(ProcessOutcome::Rejected(error)),
            None if success => Ok(ProcessOutcome::Processed),
            None => Ok(ProcessOutcome::Rejected(
                "Failed to process username.".to_owned(),
            )),
        }
    }

    pub fn generate_commentary(&self, request: &CommentaryRequest) -> Result<Commentary> {
        let url = self.endpoint("/generateCommentary")?;
        let response = self
            .http
            .post(url.clone())
            .json(request)
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("backend rejected commentary for {}", request.name))?;

        let raw = response
            .text()
            .with_context(|| format!("failed to read body from {url}"))?;
        let parsed = parse_backend_json(&raw).context("invalid commentary response")?;
        serde_json::from_value(parsed).context("commentary response has an unexpected shape")
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Status plus the `{taskId, error}` body. A body that is empty or not a
/// JSON object is read as an empty one, so it only loses the task id or the
/// error text.
fn status_body(response: Response) -> Result<(bool, StatusResponse)> {
    let success = response.status().is_success();
    let status = response.status();
    let raw = response
        .text()
        .with_context(|| format!("failed to read {status} response body"))?;

    if raw.trim().is_empty() {
        return Ok((success, StatusResponse::default()));
    }

    let body = parse_backend_json(&raw)
        .ok()
        .and_then(|value| serde_json::from_value::<StatusResponse>(value).ok());

    match body {
        Some(body) => Ok((success, body)),
        None => {
            log::warn!("backend answered {status} with a non-JSON body");
            Ok((success, StatusResponse::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use serde_json::json;

    use super::*;

    /// Answers exactly one request and hands back what the client sent.
    fn serve_once(status: &str, body: &str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut head = String::new();
            let mut content_length = 0usize;
            let mut chunked = false;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                    chunked = true;
                }
                head.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }

            let mut body = Vec::new();
            if chunked {
                loop {
                    let mut size_line = String::new();
                    reader.read_line(&mut size_line).unwrap();
                    let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
                    let mut chunk = vec![0u8; size + 2];
                    reader.read_exact(&mut chunk).unwrap();
                    if size == 0 {
                        break;
                    }
                    body.extend_from_slice(&chunk[..size]);
                }
            } else {
                body.resize(content_length, 0);
                reader.read_exact(&mut body).unwrap();
            }

            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            head + &String::from_utf8_lossy(&body)
        });

        let url = Url::parse(&format!("http://{address}")).unwrap();
        (url, handle)
    }

    #[test]
    fn main_user_is_read_from_backend() {
        let (url, server) = serve_once("200 OK", r#"{"username": "alice"}"#);
        let client = BackendClient::new(url).unwrap();

        assert_eq!(client.main_user().unwrap().as_deref(), Some("alice"));
        assert!(server.join().unwrap().starts_with("GET /api/getmainuser "));
    }

    #[test]
    fn graph_payload_uses_the_view_endpoint() {
        let (url, server) = serve_once("200 OK", r#"{"bob": {}}"#);
        let client = BackendClient::new(url).unwrap();

        assert_eq!(
            client.graph_payload(GraphKind::Local).unwrap(),
            r#"{"bob": {}}"#
        );
        assert!(server.join().unwrap().starts_with("GET /api/local_graph "));
    }

    #[test]
    fn server_errors_surface_as_errors() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#);
        let client = BackendClient::new(url).unwrap();

        assert!(client.graph_payload(GraphKind::Global).is_err());
        server.join().unwrap();
    }

    #[test]
    fn conversation_history_unnests_stats() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"stats": "{\"Dryness Score\": 2.5}", "favorite_topic": "games"}"#,
        );
        let client = BackendClient::new(url).unwrap();

        let history = client.conversation_history().unwrap();
        assert_eq!(history.stats, json!({"Dryness Score": 2.5}));
        assert_eq!(history.favorite_topic.as_deref(), Some("games"));
        server.join().unwrap();
    }

    #[test]
    fn upload_sends_multipart_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        std::fs::write(&path, r#"{"messages": []}"#).unwrap();

        let (url, server) = serve_once("200 OK", r#"{"taskId": 42}"#);
        let client = BackendClient::new(url).unwrap();

        assert_eq!(
            client.upload(&path).unwrap(),
            UploadOutcome::Accepted {
                task_id: Some("42".to_owned())
            }
        );

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /upload "));
        assert!(request.contains("name=\"file\""));
        assert!(request.contains("filename=\"chat.json\""));
        assert!(request.contains(r#"{"messages": []}"#));
    }

    #[test]
    fn upload_rejection_carries_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        std::fs::write(&path, "{}").unwrap();

        let (url, server) = serve_once("400 Bad Request", r#"{"error": "No file part"}"#);
        let client = BackendClient::new(url).unwrap();

        assert_eq!(
            client.upload(&path).unwrap(),
            UploadOutcome::Rejected("No file part".to_owned())
        );
        server.join().unwrap();
    }

    #[test]
    fn process_username_posts_json() {
        let (url, server) = serve_once("200 OK", r#"{"status": "ok"}"#);
        let client = BackendClient::new(url).unwrap();

        assert_eq!(
            client.process_username("alice").unwrap(),
            ProcessOutcome::Processed
        );
        let request = server.join().unwrap();
        assert!(request.starts_with("POST /processUsername "));
        assert!(request.contains(r#""username":"alice""#));
    }

    #[test]
    fn plain_text_success_still_processes_the_username() {
        let (url, server) = serve_once("200 OK", "OK");
        let client = BackendClient::new(url).unwrap();

        assert_eq!(
            client.process_username("alice").unwrap(),
            ProcessOutcome::Processed
        );
        server.join().unwrap();
    }

    #[test]
    fn process_username_error_body_is_a_rejection() {
        let (url, server) = serve_once("200 OK", r#"{"error": "unknown user"}"#);
        let client = BackendClient::new(url).unwrap();

        assert_eq!(
            client.process_username("mallory").unwrap(),
            ProcessOutcome::Rejected("unknown user".to_owned())
        );
        server.join().unwrap();
    }

    #[test]
    fn commentary_round_trip() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"commentary": "You never sleep!", "description": "Most active hour"}"#,
        );
        let client = BackendClient::new(url).unwrap();

        let commentary = client
            .generate_commentary(&CommentaryRequest {
                name: "alice".to_owned(),
                metric: "3 AM".to_owned(),
                description: "Most active hour".to_owned(),
            })
            .unwrap();

        assert_eq!(commentary.commentary, "You never sleep!");
        let request = server.join().unwrap();
        assert!(request.starts_with("POST /generateCommentary "));
        assert!(request.contains(r#""metric":"3 AM""#));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = BackendClient::new(Url::parse("http://localhost:5000/backend").unwrap())
            .unwrap();
        assert_eq!(
            client.endpoint("/api/global_graph").unwrap().as_str(),
            "http://localhost:5000/backend/api/global_graph"
        );
    }
}
