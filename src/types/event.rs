use crate::types::Stacktrace;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// The error itself: its class, message and normalized stacktrace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub error_class: String,
    pub message: String,
    pub stacktrace: Stacktrace,
}

impl ErrorReport {
    /// Creates a report from its class, message and stacktrace.
    #[inline]
    pub fn new<C, M>(error_class: C, message: M, stacktrace: Stacktrace) -> Self
    where
        C: Into<String>,
        M: Into<String>,
    {
        Self {
            error_class: error_class.into(),
            message: message.into(),
            stacktrace,
        }
    }
}

/// One reportable occurrence: an [`ErrorReport`] plus who, where and when.
///
/// On the wire the report is carried as a one-element `exceptions` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub user_id: Option<String>,
    pub release_stage: String,
    pub context: Option<String>,
    #[serde(rename = "exceptions", serialize_with = "single_item_list")]
    pub(crate) report: ErrorReport,
}

impl Event {
    /// Creates an event without user or context attribution.
    #[inline]
    pub fn new<S: Into<String>>(release_stage: S, report: ErrorReport) -> Self {
        Self {
            user_id: None,
            release_stage: release_stage.into(),
            context: None,
            report,
        }
    }

    /// Sets the reporting user, usually the client IP.
    #[must_use]
    #[inline]
    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets what was happening, e.g. `"GET /orders"`.
    #[must_use]
    #[inline]
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// The error carried by this event.
    #[inline]
    pub fn report(&self) -> &ErrorReport {
        &self.report
    }
}

fn single_item_list<S>(report: &ErrorReport, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(1))?;
    seq.serialize_element(report)?;
    seq.end()
}
