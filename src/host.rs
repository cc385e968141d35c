//! Host-provided execution context.
//!
//! The reporting client never reads process or request state directly. It
//! asks a [`HostContext`] whether the current execution is a request, what
//! the environment looks like and which error ended the execution.
//! [`ProcessHost`] covers plain processes; request-serving hosts describe
//! each request with a [`RequestInfo`] inside a [`HostSnapshot`].

use crate::severity::Severity;
use crate::types::MetaData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header consulted before the peer address when resolving the client IP.
pub const FORWARDED_FOR: &str = "X-Forwarded-For";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Source of execution state consumed by the notifier.
pub trait HostContext: Send {
    /// The request being served, or `None` outside request-like executions.
    fn request(&self) -> Option<&RequestInfo>;

    /// Environment variables exposed to reports.
    fn environment(&self) -> MetaData {
        MetaData::new()
    }

    /// The last error recorded by the host, inspected at shutdown.
    fn last_error(&self) -> Option<LastError> {
        None
    }

    /// Stores the error that is about to end the execution.
    ///
    /// Hosts that track errors on their own keep this no-op.
    fn record_last_error(&mut self, error: LastError) {
        let _ = error;
    }

    /// The host's own reporting mask.
    fn reporting_mask(&self) -> Severity {
        Severity::ALL
    }

    /// Directory used as the default project root on registration.
    fn document_root(&self) -> Option<String> {
        None
    }

    /// Returns `true` when the current execution serves a request.
    #[inline]
    fn is_request(&self) -> bool {
        self.request().is_some()
    }
}

/// The error that ended an execution, as recorded by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl LastError {
    /// An error without a known location.
    pub fn new<S: Into<String>>(severity: Severity, message: S) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            line: None,
        }
    }

    /// Sets the location the error was raised at.
    #[must_use]
    pub fn at<S: Into<String>>(mut self, file: S, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

/// One incoming request, as seen by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    /// Request target: path plus optional query string.
    pub uri: String,
    pub host: String,
    pub https: bool,
    pub headers: Vec<(String, String)>,
    /// Decoded form fields of a POST body.
    pub form: MetaData,
    pub content_type: Option<String>,
    /// Raw request body, consulted for JSON payloads.
    pub body: Option<String>,
    pub remote_addr: Option<String>,
    pub session: MetaData,
    pub cookies: MetaData,
}

impl RequestInfo {
    /// A request for `uri`, with no headers or body.
    pub fn new<M: Into<String>, U: Into<String>>(method: M, uri: U) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Sets the `Host` and whether the request came over TLS.
    #[must_use]
    pub fn with_host<S: Into<String>>(mut self, host: S, https: bool) -> Self {
        self.host = host.into();
        self.https = https;
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the peer address.
    #[must_use]
    pub fn with_remote_addr<S: Into<String>>(mut self, addr: S) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Sets the decoded form fields.
    #[must_use]
    pub fn with_form(mut self, form: MetaData) -> Self {
        self.form = form;
        self
    }

    /// Sets the raw body and its content type.
    #[must_use]
    pub fn with_body<C: Into<String>, B: Into<String>>(mut self, content_type: C, body: B) -> Self {
        self.content_type = Some(content_type.into());
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: MetaData) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn with_cookies(mut self, cookies: MetaData) -> Self {
        self.cookies = cookies;
        self
    }

    /// Looks a header up by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Client address, preferring the forwarded-for header over the peer.
    pub fn client_ip(&self) -> Option<&str> {
        self.header(FORWARDED_FOR).or(self.remote_addr.as_deref())
    }

    /// Path part of the request target, without the query string.
    pub fn path(&self) -> &str {
        self.uri
            .split_once('?')
            .map_or(self.uri.as_str(), |(path, _)| path)
    }

    /// Full URL of the request.
    pub fn url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{}://{}{}", scheme, self.host, self.uri)
    }

    /// Default event context: `"<METHOD> <path>"`.
    pub fn context_label(&self) -> String {
        format!("{} {}", self.method, self.path())
    }

    /// Request parameters: form fields, or the decoded JSON body.
    pub fn params(&self) -> Option<Value> {
        if !self.form.is_empty() {
            return Some(Value::Object(self.form.clone()));
        }

        let is_json = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.get(..JSON_CONTENT_TYPE.len()))
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(JSON_CONTENT_TYPE));
        if !is_json {
            return None;
        }

        self.body
            .as_deref()
            .map(|body| serde_json::from_str(body).unwrap_or(Value::Null))
    }

    /// Builds the `request`, `session` and `cookies` tabs.
    ///
    /// Session and cookie tabs are only present when non-empty.
    pub fn to_metadata(&self) -> MetaData {
        let mut request = MetaData::new();
        request.insert("url".into(), Value::String(self.url()));
        request.insert("httpMethod".into(), Value::String(self.method.clone()));
        if let Some(params) = self.params() {
            request.insert("params".into(), params);
        }
        request.insert(
            "ip".into(),
            self.client_ip()
                .map_or(Value::Null, |ip| Value::String(ip.to_string())),
        );
        if let Some(agent) = self.header("User-Agent") {
            request.insert("userAgent".into(), Value::String(agent.to_string()));
        }
        if !self.headers.is_empty() {
            let headers = self
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect();
            request.insert("headers".into(), Value::Object(headers));
        }

        let mut tabs = MetaData::new();
        tabs.insert("request".into(), Value::Object(request));
        if !self.session.is_empty() {
            tabs.insert("session".into(), Value::Object(self.session.clone()));
        }
        if !self.cookies.is_empty() {
            tabs.insert("cookies".into(), Value::Object(self.cookies.clone()));
        }
        tabs
    }
}

/// Host for plain processes: no request, environment from `std::env`.
#[derive(Debug, Clone, Default)]
pub struct ProcessHost {
    last_error: Option<LastError>,
    reporting_mask: Option<Severity>,
}

impl ProcessHost {
    /// A host with no recorded error and the full reporting mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the process's own reporting mask.
    pub fn set_reporting_mask(&mut self, mask: Severity) {
        self.reporting_mask = Some(mask);
    }
}

impl HostContext for ProcessHost {
    fn request(&self) -> Option<&RequestInfo> {
        None
    }

    fn environment(&self) -> MetaData {
        std::env::vars()
            .map(|(key, value)| (key, Value::String(value)))
            .collect()
    }

    fn last_error(&self) -> Option<LastError> {
        self.last_error.clone()
    }

    fn record_last_error(&mut self, error: LastError) {
        self.last_error = Some(error);
    }

    fn reporting_mask(&self) -> Severity {
        self.reporting_mask.unwrap_or(Severity::ALL)
    }
}

/// A fixed description of the host, for request handlers and embedders.
#[derive(Debug, Clone, Default)]
pub struct HostSnapshot {
    pub request: Option<RequestInfo>,
    pub environment: MetaData,
    pub last_error: Option<LastError>,
    pub reporting_mask: Option<Severity>,
    pub document_root: Option<String>,
}

impl HostSnapshot {
    /// A host serving `request`.
    pub fn for_request(request: RequestInfo) -> Self {
        Self {
            request: Some(request),
            ..Default::default()
        }
    }

    /// A host outside any request.
    pub fn script() -> Self {
        Self::default()
    }

    /// Sets the environment exposed to reports.
    #[must_use]
    pub fn with_environment(mut self, environment: MetaData) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the error inspected at shutdown.
    #[must_use]
    pub fn with_last_error(mut self, error: LastError) -> Self {
        self.last_error = Some(error);
        self
    }

    #[must_use]
    pub fn with_reporting_mask(mut self, mask: Severity) -> Self {
        self.reporting_mask = Some(mask);
        self
    }

    /// Sets the directory used as the default project root.
    #[must_use]
    pub fn with_document_root<S: Into<String>>(mut self, root: S) -> Self {
        self.document_root = Some(root.into());
        self
    }
}

impl HostContext for HostSnapshot {
    fn request(&self) -> Option<&RequestInfo> {
        self.request.as_ref()
    }

    fn environment(&self) -> MetaData {
        self.environment.clone()
    }

    fn last_error(&self) -> Option<LastError> {
        self.last_error.clone()
    }

    fn record_last_error(&mut self, error: LastError) {
        self.last_error = Some(error);
    }

    fn reporting_mask(&self) -> Severity {
        self.reporting_mask.unwrap_or(Severity::ALL)
    }

    fn document_root(&self) -> Option<String> {
        self.document_root.clone()
    }
}
