//! Metadata assembly.
//!
//! A report's metadata is built from up to four sources, merged in order:
//! request tabs from the host, environment variables under `environment`,
//! the user's metadata callback and the metadata passed with the report.
//! The merged tree is run through [`apply_filters`] before it is cached.

use crate::config::{Config, MetaDataCallback, MetaDataMode};
use crate::error::RelayError;
use crate::filter::apply_filters;
use crate::host::HostContext;
use crate::panic::panic_message;
use crate::types::{deep_merge, into_tree, MetaData};
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Assembles and filters a metadata tree.
pub fn assemble(config: &Config, host: &dyn HostContext, passed: Option<MetaData>) -> MetaData {
    let mut tree = MetaData::new();

    if let Some(request) = host.request() {
        deep_merge(&mut tree, request.to_metadata());
    }

    let environment = host.environment();
    if !environment.is_empty() {
        tree.insert("environment".into(), Value::Object(environment));
    }

    if let Some(callback) = config.meta_data_fn.as_ref() {
        match invoke_callback(callback) {
            Ok(Some(custom)) => deep_merge(&mut tree, custom),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "ignoring custom metadata"),
        }
    }

    if let Some(passed) = passed.filter(|p| !p.is_empty()) {
        deep_merge(&mut tree, passed);
    }

    apply_filters(tree, &config.filters)
}

/// Runs the user callback, containing panics and malformed results.
fn invoke_callback(callback: &MetaDataCallback) -> Result<Option<MetaData>, RelayError> {
    let value = catch_unwind(AssertUnwindSafe(|| callback()))
        .map_err(|payload| RelayError::Callback(panic_message(&*payload)))?;

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => into_tree(value)
            .map(Some)
            .ok_or_else(|| RelayError::Callback("callback did not return an object".into())),
    }
}

/// The per-execution metadata cache.
#[derive(Debug, Clone, Default)]
pub struct MetaDataCache {
    tree: Option<MetaData>,
}

impl MetaDataCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached tree, assembling it on first use.
    ///
    /// In [`MetaDataMode::Accumulate`] later `passed` metadata is filtered
    /// and merged into the cached tree; in [`MetaDataMode::FirstCall`] it is
    /// dropped.
    pub fn resolve(
        &mut self,
        config: &Config,
        host: &dyn HostContext,
        passed: Option<MetaData>,
    ) -> &MetaData {
        match self.tree {
            None => {
                self.tree = Some(assemble(config, host, passed));
            }
            Some(ref mut tree) => {
                if let (MetaDataMode::Accumulate, Some(passed)) = (config.meta_data_mode, passed) {
                    deep_merge(tree, apply_filters(passed, &config.filters));
                }
            }
        }
        self.tree.get_or_insert_with(MetaData::new)
    }

    /// Discards the cached tree so the next report assembles a fresh one.
    #[inline]
    pub fn clear(&mut self) {
        self.tree = None;
    }

    /// The cached tree, if a report has assembled one.
    #[inline]
    pub fn get(&self) -> Option<&MetaData> {
        self.tree.as_ref()
    }
}
