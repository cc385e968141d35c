//! Notifier configuration.
//!
//! [`Config`] carries every knob of the reporting client. Defaults match a
//! production deployment that filters the usual credential keys:
//!
//! | Setting | Default |
//! |---|---|
//! | release stage | `"production"` |
//! | notify release stages | `{"production"}` |
//! | SSL | off |
//! | filters | `password`, `PHPSESSID`, `Cookie` |
//! | metadata mode | [`MetaDataMode::FirstCall`] |
//!
//! # Examples
//!
//! ```
//! use error_relay::{Config, Severity};
//!
//! let config = Config::default()
//!     .with_release_stage("staging")
//!     .with_notify_release_stages(["staging", "production"])
//!     .with_endpoint("errors.example.com/notify")
//!     .with_ssl(true)
//!     .with_project_root("/srv/app")
//!     .with_error_reporting_level(Severity::ALL & !Severity::NOTICE);
//!
//! assert_eq!(config.endpoint_url(), "https://errors.example.com/notify");
//! assert!(config.should_notify_release_stage());
//! ```

use crate::severity::Severity;
use crate::stacktrace::ProjectRoot;
use core::fmt;
use serde_json::Value;
use std::collections::BTreeSet;

/// Default metadata filter terms.
pub const DEFAULT_FILTERS: &[&str] = &["password", "PHPSESSID", "Cookie"];
/// Default release stage.
pub const DEFAULT_RELEASE_STAGE: &str = "production";

/// User-supplied metadata generator.
///
/// Returns a tree of extra tabs, or `None`. Anything but a JSON object is
/// treated as "no metadata"; a panic inside the callback is contained.
pub type MetaDataCallback = Box<dyn Fn() -> Option<Value> + Send + Sync>;

/// How the assembled metadata tree is cached within one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetaDataMode {
    /// Assemble once on the first report; metadata passed with later
    /// reports is ignored.
    #[default]
    FirstCall,
    /// Assemble once, then merge each later report's passed metadata into
    /// the cached tree.
    Accumulate,
}

/// Settings shared by every report a notifier sends.
pub struct Config {
    pub(crate) api_key: Option<String>,
    pub(crate) release_stage: String,
    pub(crate) notify_release_stages: BTreeSet<String>,
    pub(crate) use_ssl: bool,
    pub(crate) project_root: Option<ProjectRoot>,
    pub(crate) filters: Vec<String>,
    pub(crate) endpoint: String,
    pub(crate) user_id: Option<String>,
    pub(crate) context: Option<String>,
    pub(crate) meta_data_fn: Option<MetaDataCallback>,
    pub(crate) error_reporting_level: Option<Severity>,
    pub(crate) ignore_reporting_level: bool,
    pub(crate) meta_data_mode: MetaDataMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            release_stage: DEFAULT_RELEASE_STAGE.into(),
            notify_release_stages: BTreeSet::from([DEFAULT_RELEASE_STAGE.to_string()]),
            use_ssl: false,
            project_root: None,
            filters: DEFAULT_FILTERS.iter().map(|f| f.to_string()).collect(),
            endpoint: String::new(),
            user_id: None,
            context: None,
            meta_data_fn: None,
            error_reporting_level: None,
            ignore_reporting_level: false,
            meta_data_mode: MetaDataMode::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("release_stage", &self.release_stage)
            .field("notify_release_stages", &self.notify_release_stages)
            .field("use_ssl", &self.use_ssl)
            .field("project_root", &self.project_root)
            .field("filters", &self.filters)
            .field("endpoint", &self.endpoint)
            .field("user_id", &self.user_id)
            .field("context", &self.context)
            .field("meta_data_fn", &self.meta_data_fn.is_some())
            .field("error_reporting_level", &self.error_reporting_level)
            .field("ignore_reporting_level", &self.ignore_reporting_level)
            .field("meta_data_mode", &self.meta_data_mode)
            .finish()
    }
}

impl Config {
    /// Sets the project API key.
    #[must_use]
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.set_api_key(api_key);
        self
    }

    /// Sets the release stage reported with every event.
    #[must_use]
    pub fn with_release_stage<S: Into<String>>(mut self, stage: S) -> Self {
        self.set_release_stage(stage);
        self
    }

    /// Sets the allowlist of stages that may notify.
    #[must_use]
    pub fn with_notify_release_stages<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_notify_release_stages(stages);
        self
    }

    /// Selects `https://` for the collector endpoint.
    #[must_use]
    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.set_use_ssl(use_ssl);
        self
    }

    /// Sets the project root; an empty path clears it.
    #[must_use]
    pub fn with_project_root<S: Into<String>>(mut self, root: S) -> Self {
        self.set_project_root(root);
        self
    }

    /// Replaces the metadata filter terms.
    #[must_use]
    pub fn with_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_filters(filters);
        self
    }

    /// Sets the collector endpoint, without scheme.
    #[must_use]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.set_endpoint(endpoint);
        self
    }

    /// Overrides the request-derived user id.
    #[must_use]
    pub fn with_user_id<S: Into<String>>(mut self, user_id: S) -> Self {
        self.set_user_id(user_id);
        self
    }

    /// Overrides the request-derived event context.
    #[must_use]
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.set_context(context);
        self
    }

    /// Registers a callback contributing extra metadata.
    #[must_use]
    pub fn with_meta_data_fn<F>(mut self, callback: F) -> Self
    where
        F: Fn() -> Option<Value> + Send + Sync + 'static,
    {
        self.set_meta_data_fn(callback);
        self
    }

    /// Overrides the host's reporting mask.
    #[must_use]
    pub fn with_error_reporting_level(mut self, level: Severity) -> Self {
        self.set_error_reporting_level(level);
        self
    }

    /// Reports every severity regardless of the mask.
    #[must_use]
    pub fn with_ignore_reporting_level(mut self, ignore: bool) -> Self {
        self.set_ignore_reporting_level(ignore);
        self
    }

    /// Selects how the metadata tree is cached.
    #[must_use]
    pub fn with_meta_data_mode(mut self, mode: MetaDataMode) -> Self {
        self.meta_data_mode = mode;
        self
    }

    /// Sets the project API key.
    pub fn set_api_key<S: Into<String>>(&mut self, api_key: S) {
        self.api_key = Some(api_key.into());
    }

    /// Sets the release stage reported with every event.
    pub fn set_release_stage<S: Into<String>>(&mut self, stage: S) {
        self.release_stage = stage.into();
    }

    /// Replaces the allowlist of stages that may notify.
    ///
    /// An empty allowlist lets every stage notify.
    pub fn set_notify_release_stages<I, S>(&mut self, stages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notify_release_stages = stages.into_iter().map(Into::into).collect();
    }

    /// Selects `https://` for the collector endpoint.
    pub fn set_use_ssl(&mut self, use_ssl: bool) {
        self.use_ssl = use_ssl;
    }

    /// Sets the project root; an empty path clears it.
    pub fn set_project_root<S: Into<String>>(&mut self, root: S) {
        let root = root.into();
        self.project_root = if root.is_empty() {
            None
        } else {
            Some(ProjectRoot::new(root))
        };
    }

    /// Removes the project root; no frame is in-project afterwards.
    pub fn clear_project_root(&mut self) {
        self.project_root = None;
    }

    /// Replaces the metadata filter terms.
    pub fn set_filters<I, S>(&mut self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = filters.into_iter().map(Into::into).collect();
    }

    /// Sets the collector address without scheme, e.g. `errors.example.com/notify`.
    pub fn set_endpoint<S: Into<String>>(&mut self, endpoint: S) {
        self.endpoint = endpoint.into();
    }

    /// Overrides the request-derived user id.
    pub fn set_user_id<S: Into<String>>(&mut self, user_id: S) {
        self.user_id = Some(user_id.into());
    }

    /// Overrides the request-derived event context.
    pub fn set_context<S: Into<String>>(&mut self, context: S) {
        self.context = Some(context.into());
    }

    /// Registers a callback contributing extra metadata.
    pub fn set_meta_data_fn<F>(&mut self, callback: F)
    where
        F: Fn() -> Option<Value> + Send + Sync + 'static,
    {
        self.meta_data_fn = Some(Box::new(callback));
    }

    /// Overrides the host's reporting mask.
    pub fn set_error_reporting_level(&mut self, level: Severity) {
        self.error_reporting_level = Some(level);
    }

    /// Reports every severity regardless of the mask.
    pub fn set_ignore_reporting_level(&mut self, ignore: bool) {
        self.ignore_reporting_level = ignore;
    }

    /// Selects how the metadata tree is cached.
    pub fn set_meta_data_mode(&mut self, mode: MetaDataMode) {
        self.meta_data_mode = mode;
    }

    /// The registered API key.
    #[inline]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The current release stage.
    #[inline]
    pub fn release_stage(&self) -> &str {
        &self.release_stage
    }

    /// Stages allowed to notify; empty means all.
    #[inline]
    pub fn notify_release_stages(&self) -> &BTreeSet<String> {
        &self.notify_release_stages
    }

    #[inline]
    pub fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    /// The configured project root.
    #[inline]
    pub fn project_root(&self) -> Option<&ProjectRoot> {
        self.project_root.as_ref()
    }

    /// Metadata filter terms.
    #[inline]
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Collector endpoint without scheme.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[inline]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Configured reporting mask, if it overrides the host.
    #[inline]
    pub fn error_reporting_level(&self) -> Option<Severity> {
        self.error_reporting_level
    }

    #[inline]
    pub fn ignore_reporting_level(&self) -> bool {
        self.ignore_reporting_level
    }

    #[inline]
    pub fn meta_data_mode(&self) -> MetaDataMode {
        self.meta_data_mode
    }

    /// Collector URL: `https://` when SSL is on, `http://` otherwise.
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }

    /// Returns `true` when the current release stage may notify.
    #[inline]
    pub fn should_notify_release_stage(&self) -> bool {
        self.notify_release_stages.is_empty()
            || self.notify_release_stages.contains(&self.release_stage)
    }
}
