//! REST client for the cluster API.
//!
//! The [`Client`] owns the HTTP transport, the session state established
//! by [`Client::login`], the record query engine, and the mutation
//! primitives. Every mutating call returns a [`TaskHandle`] without
//! waiting; durability is the caller's explicit, separate step via
//! [`TaskHandle::wait`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HeaderValue};
use reqwest::{Method, Response};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, trace};

use crate::auth::Credentials;
use crate::error::{ApiError, AuthError, DecodeError, Error, QueryError, TransportError};
use crate::record::Record;
use crate::task::TaskHandle;
use crate::types::ClusterUrl;

/// Default per-request timeout applied when a call passes no override.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default sleep between task status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Login request body.
#[derive(Debug, serde::Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(rename = "useOIDC")]
    use_oidc: bool,
}

/// Login response body.
#[derive(Debug, serde::Deserialize)]
struct LoginResponse {
    #[serde(rename = "sessionID")]
    session_id: String,
}

/// Task-shaped response returned by every mutating call.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct TaskResponse {
    #[serde(rename = "taskTag", default)]
    pub(crate) task_tag: Option<String>,
    #[serde(rename = "createdUUID", default)]
    pub(crate) created_uuid: Option<String>,
}

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    url: ClusterUrl,
    timeout: Duration,
    poll_interval: Duration,
    accept_invalid_certs: bool,
}

impl ClientBuilder {
    /// Set the default per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sleep between task status polls.
    pub fn task_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Accept self-signed TLS certificates.
    ///
    /// Clusters commonly run with self-signed certificates; this is off
    /// by default and must be enabled deliberately.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the underlying HTTP client cannot
    /// be constructed.
    pub fn build(self) -> Result<Client, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hycore/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| TransportError::Http {
                message: e.to_string(),
            })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                url: self.url,
                timeout: self.timeout,
                poll_interval: self.poll_interval,
                session: RwLock::new(None),
            }),
        })
    }
}

/// REST client for a cluster API.
///
/// Cheap to clone (internal `Arc`) and safe to share across tasks; the
/// session cookie is written by [`Client::login`] and read by every
/// subsequent request. The client never refreshes a session: staleness
/// surfaces as a request failure, and recovery is the caller's call.
///
/// # Example
///
/// ```no_run
/// use hycore::{Client, ClusterUrl, Credentials, endpoints};
///
/// # async fn example() -> Result<(), hycore::Error> {
/// let url = ClusterUrl::new("https://cluster.lab.local")?;
/// let client = Client::builder(url).build()?;
/// client.login(&Credentials::new("admin", "password")).await?;
///
/// for vm in client.list_records(endpoints::VIR_DOMAIN, None, None).await? {
///     println!("{}", vm.uuid()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    url: ClusterUrl,
    timeout: Duration,
    poll_interval: Duration,
    // Set by login, read by every request. Never refreshed.
    session: RwLock<Option<HeaderValue>>,
}

impl Client {
    /// Start building a client for the given cluster URL.
    pub fn builder(url: ClusterUrl) -> ClientBuilder {
        ClientBuilder {
            url,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            accept_invalid_certs: false,
        }
    }

    /// Returns the cluster URL this client is configured for.
    pub fn url(&self) -> &ClusterUrl {
        &self.inner.url
    }

    /// Returns the sleep between task status polls.
    pub fn task_poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }

    /// Authenticate with the cluster and store the session cookie.
    ///
    /// Authentication failure is never retried automatically; a failed
    /// login leaves any previously stored session untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on HTTP 401 and
    /// [`AuthError::LoginFailed`] on any other non-success status.
    #[instrument(skip(self, credentials), fields(cluster = %self.inner.url, username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), Error> {
        info!("Logging in");

        let body = LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
            use_oidc: credentials.use_oidc(),
        };
        let body = serde_json::to_value(&body).map_err(DecodeError::Json)?;

        let response = self
            .send(Method::POST, crate::endpoints::LOGIN, Some(&body), None, false)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(if status.as_u16() == 401 {
                AuthError::InvalidCredentials.into()
            } else {
                AuthError::LoginFailed {
                    status: status.as_u16(),
                    body,
                }
                .into()
            });
        }

        let login: LoginResponse = decode_body(response, "login response object").await?;
        let cookie = HeaderValue::from_str(&format!("sessionID={}", login.session_id)).map_err(
            |e| AuthError::SessionToken {
                reason: e.to_string(),
            },
        )?;

        *self.inner.session.write().await = Some(cookie);
        debug!("Session established");
        Ok(())
    }

    /// Whether a session has been established.
    pub async fn is_logged_in(&self) -> bool {
        self.inner.session.read().await.is_some()
    }

    // ------------------------------------------------------------------
    // Record query engine
    // ------------------------------------------------------------------

    /// List records at a collection path, filtered client-side.
    ///
    /// The filter uses the superset-match rule from
    /// [`superset_match`](crate::record::superset_match); `None` keeps
    /// every record. Order is as returned by the API.
    #[instrument(skip(self, filter), fields(cluster = %self.inner.url))]
    pub async fn list_records(
        &self,
        path: &str,
        filter: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<Vec<Record>, Error> {
        debug!(path, "Listing records");

        let response = self.send(Method::GET, path, None, timeout, true).await?;
        let response = expect_success(response).await?;
        let records = decode_record_array(response).await?;

        let records: Vec<Record> = records
            .into_iter()
            .filter(|r| r.matches(filter))
            .collect();
        trace!(count = records.len(), "Records after filtering");
        Ok(records)
    }

    /// Fetch at most one record at a collection path.
    ///
    /// # Errors
    ///
    /// More than one match is always [`QueryError::Ambiguous`]; zero
    /// matches is [`QueryError::NotFound`] iff `must_exist`, otherwise
    /// `Ok(None)` so callers can decide existence before acting.
    #[instrument(skip(self, filter), fields(cluster = %self.inner.url))]
    pub async fn get_record(
        &self,
        path: &str,
        filter: Option<&Value>,
        must_exist: bool,
        timeout: Option<Duration>,
    ) -> Result<Option<Record>, Error> {
        let mut records = self.list_records(path, filter, timeout).await?;
        match records.len() {
            0 if must_exist => Err(QueryError::NotFound {
                path: path.to_string(),
            }
            .into()),
            0 => Ok(None),
            1 => Ok(Some(records.remove(0))),
            n => Err(QueryError::Ambiguous {
                path: path.to_string(),
                matches: n,
            }
            .into()),
        }
    }

    // ------------------------------------------------------------------
    // Mutation facade
    // ------------------------------------------------------------------

    /// POST a payload to create a record.
    ///
    /// Returns the task handle WITHOUT waiting; call
    /// [`TaskHandle::wait`] for durability, then re-fetch the record by
    /// [`TaskHandle::created_uuid`] for ground truth. The mutation
    /// response itself is never trusted as the post-mutation record shape.
    #[instrument(skip(self, payload), fields(cluster = %self.inner.url))]
    pub async fn create_record(
        &self,
        path: &str,
        payload: &Value,
        timeout: Option<Duration>,
    ) -> Result<TaskHandle, Error> {
        debug!(path, "Creating record");
        let response = self
            .send(Method::POST, path, Some(payload), timeout, true)
            .await?;
        let response = expect_success(response).await?;
        decode_task(response).await
    }

    /// PATCH a payload onto an existing record.
    #[instrument(skip(self, payload), fields(cluster = %self.inner.url))]
    pub async fn update_record(
        &self,
        path: &str,
        payload: &Value,
        timeout: Option<Duration>,
    ) -> Result<TaskHandle, Error> {
        debug!(path, "Updating record");
        let response = self
            .send(Method::PATCH, path, Some(payload), timeout, true)
            .await?;
        let response = expect_success(response).await?;
        decode_task(response).await
    }

    /// DELETE a record.
    #[instrument(skip(self), fields(cluster = %self.inner.url))]
    pub async fn delete_record(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<TaskHandle, Error> {
        debug!(path, "Deleting record");
        let response = self.send(Method::DELETE, path, None, timeout, true).await?;
        let response = expect_success(response).await?;
        decode_task(response).await
    }

    /// PUT a raw byte payload, for ISO and virtual disk uploads.
    ///
    /// Same task-handle contract as the JSON mutations; the body is sent
    /// as `application/octet-stream` with an explicit `Content-Length`.
    #[instrument(skip(self, data), fields(cluster = %self.inner.url, size = data.len()))]
    pub async fn put_binary_record(
        &self,
        path: &str,
        data: Vec<u8>,
        timeout: Option<Duration>,
    ) -> Result<TaskHandle, Error> {
        debug!(path, "Uploading binary record");

        let url = self.inner.url.endpoint(path);
        let mut request = self
            .inner
            .http
            .put(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"))
            .header(CONTENT_LENGTH, data.len())
            .timeout(timeout.unwrap_or(self.inner.timeout));
        if let Some(cookie) = self.inner.session.read().await.clone() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.body(data).send().await?;
        let response = expect_success(response).await?;
        decode_task(response).await
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Issue one HTTP request against a collection path.
    ///
    /// Defaults (`Accept`/`Content-Type` JSON) are set first and the
    /// session cookie is attached after, so session state can override.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        timeout: Option<Duration>,
        with_session: bool,
    ) -> Result<Response, Error> {
        let url = self.inner.url.endpoint(path);
        trace!(%method, %url, "Sending request");

        let mut request = self
            .inner
            .http
            .request(method, &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .timeout(timeout.unwrap_or(self.inner.timeout));

        if with_session {
            if let Some(cookie) = self.inner.session.read().await.clone() {
                request = request.header(COOKIE, cookie);
            }
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        trace!(status = %response.status(), "Response received");
        Ok(response)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.inner.url)
            .field("timeout", &self.inner.timeout)
            .field("session", &"[REDACTED]")
            .finish()
    }
}

/// Convert a non-2xx response into a typed API error.
async fn expect_success(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::new(status.as_u16(), body).into())
    }
}

/// Decode a response body into a typed value, failing with a fatal
/// decode error on invalid JSON or a shape mismatch.
async fn decode_body<T: serde::de::DeserializeOwned>(
    response: Response,
    expected: &'static str,
) -> Result<T, Error> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|_| {
        DecodeError::Shape {
            expected,
            found: truncate(&text),
        }
        .into()
    })
}

/// Decode a response body as an array of record objects.
async fn decode_record_array(response: Response) -> Result<Vec<Record>, Error> {
    let text = response.text().await?;
    let value: Value = serde_json::from_str(&text).map_err(DecodeError::Json)?;
    let Value::Array(items) = value else {
        return Err(DecodeError::Shape {
            expected: "an array of records",
            found: truncate(&text),
        }
        .into());
    };
    items
        .into_iter()
        .map(|item| {
            Record::new(item).map_err(|_| {
                DecodeError::Shape {
                    expected: "an array of record objects",
                    found: truncate(&text),
                }
                .into()
            })
        })
        .collect()
}

/// Decode a mutation response into a task handle.
///
/// An empty body means the API performed the mutation synchronously;
/// that yields an inert handle, so waiting on it is a no-op.
async fn decode_task(response: Response) -> Result<TaskHandle, Error> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(TaskHandle::inert());
    }
    let task: TaskResponse = serde_json::from_str(&text).map_err(|_| DecodeError::Shape {
        expected: "a task response object",
        found: truncate(&text),
    })?;
    Ok(TaskHandle::new(task.task_tag, task.created_uuid))
}

fn truncate(text: &str) -> String {
    const MAX: usize = 200;
    if text.len() <= MAX {
        text.to_string()
    } else {
        let mut end = MAX;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
