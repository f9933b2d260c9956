use crate::document::{
    AuthToken, ComparisonResult, ComparisonSelection, Document, FileId, ShareReceipt,
    ShareRequest, UploadReceipt, UploadRequest,
};
use crate::library::download_url;
use crate::session::Session;
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Human readable message sent by the server, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// The document-management REST API
pub trait DocumentApi: Send + Sync {
    fn login(&self, email: &str, password: &str) -> Result<AuthToken, ApiError>;

    /// Root documents owned by the session's user
    fn list_files(&self, session: &Session) -> Result<Vec<Document>, ApiError>;

    /// Root documents other users shared with the session's user
    fn list_shared(&self, session: &Session) -> Result<Vec<Document>, ApiError>;

    /// One document including its `versions`
    fn get_document(&self, session: &Session, file_id: FileId) -> Result<Document, ApiError>;

    fn compare(
        &self,
        session: &Session,
        selection: ComparisonSelection,
    ) -> Result<ComparisonResult, ApiError>;

    fn upload(&self, session: &Session, request: &UploadRequest)
    -> Result<UploadReceipt, ApiError>;

    fn share(&self, session: &Session, request: &ShareRequest) -> Result<ShareReceipt, ApiError>;

    /// Raw bytes of a version; the latest one when `revision` is `None`
    fn download(
        &self,
        session: &Session,
        virtual_path: &str,
        revision: Option<u32>,
    ) -> Result<Vec<u8>, ApiError>;
}

/// [`DocumentApi`] over HTTP with a blocking `reqwest` client.
/// Calls block; run them off the UI thread.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.header(AUTHORIZATION, session.authorization())
    }

    fn get_json<T: DeserializeOwned>(&self, session: &Session, path: &str) -> Result<T, ApiError> {
        let response = self.authorized(self.client.get(self.url(path)), session).send()?;
        read_json(response)
    }
}

/// Turn non-2xx responses into [`ApiError::Status`], keeping the server's `detail`.
fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = check_status(response)?.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// The `detail` field of an error body: a string, or the first string of a list.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => items.iter().find_map(|item| item.as_str().map(str::to_string)),
        _ => None,
    }
}

impl DocumentApi for HttpApi {
    fn login(&self, email: &str, password: &str) -> Result<AuthToken, ApiError> {
        let response = self
            .client
            .post(self.url("token/"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()?;
        read_json(response)
    }

    fn list_files(&self, session: &Session) -> Result<Vec<Document>, ApiError> {
        self.get_json(session, "file_versions/")
    }

    fn list_shared(&self, session: &Session) -> Result<Vec<Document>, ApiError> {
        self.get_json(session, "file_versions/shared-with-me/")
    }

    fn get_document(&self, session: &Session, file_id: FileId) -> Result<Document, ApiError> {
        self.get_json(session, &format!("file_versions/{file_id}/"))
    }

    fn compare(
        &self,
        session: &Session,
        selection: ComparisonSelection,
    ) -> Result<ComparisonResult, ApiError> {
        self.get_json(
            session,
            &format!(
                "compare/?left_id={}&right_id={}",
                selection.left, selection.right
            ),
        )
    }

    fn upload(
        &self,
        session: &Session,
        request: &UploadRequest,
    ) -> Result<UploadReceipt, ApiError> {
        let mut form = multipart::Form::new()
            .text("name", request.name.clone())
            .text("virtual_path", request.virtual_path.clone())
            .file("file", &request.path)?;
        if let Some(notes) = request.notes.as_ref().filter(|n| !n.trim().is_empty()) {
            form = form.text("notes", notes.clone());
        }

        let response = self
            .authorized(self.client.post(self.url("upload/")), session)
            .multipart(form)
            .send()?;
        read_json(response)
    }

    fn share(&self, session: &Session, request: &ShareRequest) -> Result<ShareReceipt, ApiError> {
        let response = self
            .authorized(self.client.post(self.url("share/")), session)
            .json(request)
            .send()?;
        read_json(response)
    }

    fn download(
        &self,
        session: &Session,
        virtual_path: &str,
        revision: Option<u32>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = download_url(&self.base_url, virtual_path, session.token(), revision);
        let response = check_status(self.client.get(url).send()?)?;
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve a single canned response and hand back the raw request head.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());
        let reply = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            let head_end = loop {
                if let Some(pos) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                let n = stream.read(&mut buf).unwrap();
                assert!(n > 0, "connection closed before the request head ended");
                received.extend_from_slice(&buf[..n]);
            };
            let head = String::from_utf8_lossy(&received[..head_end]).to_string();

            // drain the body so closing the socket does not reset the connection
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while received.len() < head_end + content_length {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }

            stream.write_all(reply.as_bytes()).unwrap();
            head
        });
        (base_url, handle)
    }

    fn api(base_url: &str) -> HttpApi {
        HttpApi::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_extract_detail_string_and_list() {
        assert_eq!(
            extract_detail(r#"{"detail": "File not found"}"#).as_deref(),
            Some("File not found")
        );
        assert_eq!(
            extract_detail(r#"{"detail": ["Identical file already uploaded"]}"#).as_deref(),
            Some("Identical file already uploaded")
        );
        assert_eq!(extract_detail(r#"{"virtual_path": ["nope"]}"#), None);
        assert_eq!(extract_detail("You don't have permission"), None);
    }

    #[test]
    fn test_url_joining() {
        let api = api("http://127.0.0.1:8001/api/");
        assert_eq!(api.base_url(), "http://127.0.0.1:8001/api");
        assert_eq!(api.url("/compare/"), "http://127.0.0.1:8001/api/compare/");
        assert_eq!(api.url("file_versions/3/"), "http://127.0.0.1:8001/api/file_versions/3/");
    }

    #[test]
    fn test_status_error_display() {
        let error = ApiError::Status {
            status: 404,
            detail: Some("File not found".to_string()),
        };
        assert_eq!(error.to_string(), "Server returned HTTP 404: File not found");
        assert_eq!(error.detail(), Some("File not found"));
    }

    #[test]
    fn test_get_document_sends_token() {
        let body = r#"{"id": 1, "file_name": "document.txt", "virtual_path": "/documents/document.txt",
                       "mime_type": "text/plain", "versions": [{"id": 1, "version_number": 1, "virtual_path": "/documents/document.txt"}]}"#;
        let (base_url, server) = serve_once("200 OK", body);

        let session = Session::new("test-token", "me@example.com");
        let doc = api(&base_url).get_document(&session, 1).unwrap();
        assert_eq!(doc.file_name, "document.txt");

        let head = server.join().unwrap();
        assert!(head.starts_with("GET /api/file_versions/1/ HTTP/1.1"));
        assert!(head.to_ascii_lowercase().contains("authorization: token test-token"));
    }

    #[test]
    fn test_compare_server_error_maps_to_status() {
        let (base_url, server) = serve_once("500 Internal Server Error", r#"{"detail": "boom"}"#);

        let session = Session::new("t", "me@example.com");
        let selection = ComparisonSelection { left: 2, right: 3 };
        let error = api(&base_url).compare(&session, selection).unwrap_err();
        assert!(matches!(error, ApiError::Status { status: 500, .. }));
        assert_eq!(error.detail(), Some("boom"));

        let head = server.join().unwrap();
        assert!(head.starts_with("GET /api/compare/?left_id=2&right_id=3 HTTP/1.1"));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let (base_url, server) = serve_once("200 OK", r#"{"left_file": {"id": 1}}"#);

        let session = Session::new("t", "me@example.com");
        let error = api(&base_url)
            .compare(&session, ComparisonSelection { left: 1, right: 1 })
            .unwrap_err();
        assert!(matches!(error, ApiError::Decode(_)));
        server.join().unwrap();
    }

    #[test]
    fn test_login_sends_no_authorization() {
        let (base_url, server) = serve_once("200 OK", r#"{"token": "abc", "user_id": 1, "email": "me@example.com"}"#);

        let auth = api(&base_url).login("me@example.com", "secret").unwrap();
        assert_eq!(auth.token, "abc");

        let head = server.join().unwrap();
        assert!(head.starts_with("POST /api/token/ HTTP/1.1"));
        assert!(!head.to_ascii_lowercase().contains("authorization:"));
    }
}
