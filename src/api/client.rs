//! reqwest-based client for the dashboard REST API.
//!
//! Every request carries the session's access token as a bearer header.
//! The Authorization value is wrapped in [`RedactedHeader`] and marked
//! sensitive so it never shows up in debug output or logs.
//!
//! A 401 response triggers one token refresh followed by a single replay of
//! the original request. When the refresh itself fails the session is
//! cleared and [`FolioError::SessionExpired`] is returned.

use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{TaskBackend, api_error};
use crate::config::Config;
use crate::error::{FolioError, Result};
use crate::session::{Session, SessionHandle};
use crate::types::{NewWorkItem, RecordId, User, WorkItem};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bearer header value that redacts itself when formatted
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn bearer(token: &str) -> Self {
        Self {
            value: format!("Bearer {token}"),
        }
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value)
            .map_err(|_| FolioError::Other("access token is not a valid header value".into()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    user: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// REST client bound to one backend and one session
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: SessionHandle,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn from_config(config: &Config, session: SessionHandle) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Absolute URL for a sequence of path segments under the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FolioError::Config(format!("api_url '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Exchange credentials for a session and store it
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let url = self.endpoint(&["auth", "login"])?;
        tracing::info!(email, "logging in");

        let response = self
            .client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let body: LoginResponse = check(response).await?.json().await?;

        let user = body.user.clone();
        self.session
            .set(Session::new(body.access_token, body.refresh_token, body.user))?;
        Ok(user)
    }

    /// Trade the refresh token for a new access token
    async fn refresh(&self) -> Result<()> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(FolioError::NotAuthenticated)?;
        let url = self.endpoint(&["auth", "refresh"])?;

        let response = self
            .client
            .post(url)
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await?;
        let body: RefreshResponse = check(response).await?.json().await?;

        self.session
            .update_tokens(body.access_token, body.refresh_token)?;
        tracing::debug!("access token refreshed");
        Ok(())
    }

    async fn dispatch(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Response> {
        let mut request = self.client.request(method, url);
        if let Some(token) = self.session.access_token() {
            let auth = RedactedHeader::bearer(&token);
            request = request.header(header::AUTHORIZATION, auth.as_header_value()?);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Send an authenticated request, refreshing the session once on 401
    async fn request(&self, method: Method, segments: &[&str], body: Option<Value>) -> Result<Response> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "request");

        let response = self
            .dispatch(method.clone(), url.clone(), body.as_ref())
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check(response).await;
        }

        if !self.session.is_authenticated() {
            return Err(FolioError::NotAuthenticated);
        }

        tracing::debug!(%url, "unauthorized, refreshing session");
        if let Err(e) = self.refresh().await {
            tracing::warn!("session refresh failed: {e}");
            self.session.clear()?;
            return Err(FolioError::SessionExpired);
        }

        let response = self.dispatch(method, url, body.as_ref()).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.clear()?;
            return Err(FolioError::SessionExpired);
        }
        check(response).await
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<T> {
        let response = self.request(method, segments, body).await?;
        Ok(response.json().await?)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

/// Pass successful responses through; turn the rest into `FolioError::Api`
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = api_error(status, &body);
    tracing::debug!("request failed: {err}");
    Err(err)
}

impl TaskBackend for ApiClient {
    async fn list_tasks(&self) -> Result<Vec<WorkItem>> {
        self.request_json(Method::GET, &["tasks"], None).await
    }

    async fn get_task(&self, id: &RecordId) -> Result<WorkItem> {
        let id = id.to_string();
        match self.request_json(Method::GET, &["tasks", id.as_str()], None).await {
            Err(FolioError::Api { status: 404, .. }) => Err(FolioError::TaskNotFound(id)),
            other => other,
        }
    }

    async fn create_task(&self, item: &NewWorkItem) -> Result<WorkItem> {
        let body = serde_json::to_value(item)?;
        self.request_json(Method::POST, &["tasks"], Some(body)).await
    }

    async fn update_task(&self, item: &WorkItem) -> Result<WorkItem> {
        let id = item.id.to_string();
        let body = serde_json::to_value(item)?;
        self.request_json(Method::PUT, &["tasks", id.as_str()], Some(body))
            .await
    }

    async fn delete_task(&self, id: &RecordId) -> Result<()> {
        let id = id.to_string();
        self.request(Method::DELETE, &["tasks", id.as_str()], None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> ApiClient {
        let config = Config {
            api_url: api_url.to_string(),
            ..Config::default()
        };
        ApiClient::from_config(&config, SessionHandle::in_memory(None)).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("http://localhost:8080/api");
        assert_eq!(
            api.endpoint(&["tasks", "42"]).unwrap().as_str(),
            "http://localhost:8080/api/tasks/42"
        );
        assert_eq!(
            api.endpoint(&["auth", "refresh"]).unwrap().as_str(),
            "http://localhost:8080/api/auth/refresh"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let api = client("https://admin.example.com/");
        assert_eq!(
            api.endpoint(&["tasks", "a/b"]).unwrap().as_str(),
            "https://admin.example.com/tasks/a%2Fb"
        );
    }

    #[test]
    fn test_redacted_header() {
        let header = RedactedHeader::bearer("super-secret");
        assert_eq!(header.to_string(), "[REDACTED]");
        assert!(!format!("{header:?}").contains("super-secret"));

        let value = header.as_header_value().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer super-secret");
    }

    #[test]
    fn test_debug_omits_tokens() {
        let api = client("http://localhost:8080/api");
        let out = format!("{api:?}");
        assert!(out.contains("localhost:8080"));
    }
}
