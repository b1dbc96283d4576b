//! JSON transport for the access backend with a consistent timeout and error
//! policy. Every request carries the session's bearer token when one is held;
//! 401/419 answers clear it, 5xx answers are also pushed to the notifier.

use super::errors::Error;
use crate::{
    notify::{Notice, Notifier, Severity},
    session::Session,
    APP_USER_AGENT,
};
use reqwest::{Client, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use tracing::{debug, instrument, warn};
use url::Url;

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;
/// Status some SSO gateways use for an expired session.
const STATUS_TOKEN_EXPIRED: u16 = 419;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    /// # Errors
    /// Returns `Error::Config` if the base URL is not an absolute http(s) URL or
    /// the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        session: Session,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, Error> {
        let parsed = Url::parse(config.base_url.trim())
            .map_err(|err| Error::Config(format!("Invalid API base URL: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Unsupported API URL scheme: {}",
                parsed.scheme()
            )));
        }

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| Error::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim().to_string(),
            session,
            notifier,
        })
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    /// Fetches and decodes a JSON document.
    ///
    /// # Errors
    /// Returns the mapped transport, status, or decode failure.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path);
        let mut request = self.http.get(&url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(map_request_error)?;
        debug!(status = %response.status(), "response received");

        self.handle_json_response(response).await
    }

    async fn handle_json_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, Error> {
        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|err| Error::Parse(format!("Failed to decode response: {err}")));
        }

        Err(self.status_error(status, &body))
    }

    fn status_error(&self, status: StatusCode, body: &str) -> Error {
        let code = status.as_u16();
        let message = error_message(body);

        if status == StatusCode::UNAUTHORIZED || code == STATUS_TOKEN_EXPIRED {
            warn!(status = code, "session rejected, clearing access token");
            self.session.clear();
            return Error::TokenExpired { status: code };
        }

        if status.is_server_error() {
            self.notifier
                .notify(Notice::new(Severity::Error, "Error del servidor", &message));
            return Error::ServerFault {
                status: code,
                message,
            };
        }

        if status == StatusCode::FORBIDDEN {
            warn!("request forbidden");
        }

        Error::Http {
            status: code,
            message,
        }
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn map_request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout("Request timed out. Please try again.".to_string())
    } else {
        Error::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Prefers the envelope's `message`; falls back to the trimmed, truncated body.
fn error_message(body: &str) -> String {
    let from_envelope = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        });

    sanitize_body(from_envelope.as_deref().unwrap_or(body))
}

fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Error inesperado".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ChannelNotifier;
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(
        uri: &str,
        session: Session,
    ) -> (ApiClient, tokio::sync::mpsc::UnboundedReceiver<Notice>) {
        let (notifier, rx) = ChannelNotifier::channel();
        let client = ApiClient::new(&ClientConfig::new(format!("{uri}/")), session, Arc::new(notifier))
            .expect("client builds");
        (client, rx)
    }

    #[test]
    fn build_url_joins_with_single_slash() {
        assert_eq!(
            build_url_with_base("http://host:3998/", "api/permisos/navegacion"),
            "http://host:3998/api/permisos/navegacion"
        );
        assert_eq!(
            build_url_with_base("http://host:3998", "/api/permisos/1/2"),
            "http://host:3998/api/permisos/1/2"
        );
        assert_eq!(build_url_with_base("  ", "/api"), "/api");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = ApiClient::new(
            &ClientConfig::new("ftp://example.com/"),
            Session::default(),
            Arc::new(crate::notify::TracingNotifier),
        );
        assert!(matches!(result, Err(Error::Config(_))));

        let result = ApiClient::new(
            &ClientConfig::new("not a url"),
            Session::default(),
            Arc::new(crate::notify::TracingNotifier),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn error_message_prefers_envelope() {
        assert_eq!(
            error_message(r#"{"success":false,"message":"Sin acceso"}"#),
            "Sin acceso"
        );
        assert_eq!(error_message("  plain failure  "), "plain failure");
        assert_eq!(error_message(""), "Error inesperado");
        assert_eq!(error_message(&"x".repeat(500)).len(), MAX_ERROR_CHARS);
    }

    #[tokio::test]
    async fn sends_bearer_token() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ping"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::new(Some(SecretString::from("abc".to_string())));
        let (client, _rx) = client_for(&server.uri(), session);
        let body: Value = client.get_json("api/ping").await?;
        assert_eq!(body["ok"], true);
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_and_expired_clear_the_session() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        for status in [401_u16, 419] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/ping"))
                .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                    "error": "TOKEN_EXPIRED"
                })))
                .mount(&server)
                .await;

            let session = Session::new(Some(SecretString::from("abc".to_string())));
            let (client, _rx) = client_for(&server.uri(), session.clone());
            let result = client.get_json::<Value>("api/ping").await;

            assert_eq!(result, Err(Error::TokenExpired { status }));
            assert!(!session.has_token());
        }
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_are_notified() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ping"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "message": "Error interno del servidor"
            })))
            .mount(&server)
            .await;

        let (client, mut rx) = client_for(&server.uri(), Session::default());
        let result = client.get_json::<Value>("api/ping").await;

        assert_eq!(
            result,
            Err(Error::ServerFault {
                status: 500,
                message: "Error interno del servidor".to_string()
            })
        );
        let notice = rx.try_recv()?;
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.detail, "Error interno del servidor");
        Ok(())
    }

    #[tokio::test]
    async fn client_errors_map_to_http() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ping"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let (client, mut rx) = client_for(&server.uri(), Session::default());
        let result = client.get_json::<Value>("api/ping").await;
        assert_eq!(
            result,
            Err(Error::Http {
                status: 404,
                message: "not here".to_string()
            })
        );
        assert!(rx.try_recv().is_err());
        Ok(())
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let (client, _rx) = client_for(&server.uri(), Session::default());
        let result = client.get_json::<Value>("api/ping").await;
        assert!(matches!(result, Err(Error::Parse(_))));
        Ok(())
    }
}
