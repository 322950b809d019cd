//! The crash-reporting capability a boundary is handed.
//!
//! Boundaries never talk to a reporting SDK directly; they call through the
//! [`Reporter`] trait so the browser build can bind Sentry while tests and
//! SDK-less builds substitute something else.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RenderError, ReportError};

/// Contextual metadata attached to a captured error.
pub type Extras = BTreeMap<String, serde_json::Value>;

/// Reporter shared through a UI tree.
pub type SharedReporter = Arc<dyn Reporter + Send + Sync>;

/// Opaque token correlating a captured error with user feedback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EventId(String);

impl EventId {
    pub fn new(raw: impl Into<String>) -> Result<Self, ReportError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ReportError::EmptyEventId);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventId {
    type Error = ReportError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arguments for the feedback dialog. Serializes as `{"eventId": "..."}`,
/// omitting the key when no identifier is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDialogOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
}

impl ReportDialogOptions {
    pub fn to_json(&self) -> String {
        // A struct of optional strings always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

pub trait Reporter {
    /// Send `error` with `extras` to the reporting service.
    ///
    /// Best effort: callers treat an `Err` as "no identifier" and move on.
    fn capture_exception(
        &self,
        error: &RenderError,
        extras: &Extras,
    ) -> Result<EventId, ReportError>;

    /// Open the service's user-feedback dialog.
    fn show_report_dialog(&self, options: &ReportDialogOptions);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn capture_exception(
        &self,
        error: &RenderError,
        extras: &Extras,
    ) -> Result<EventId, ReportError> {
        (**self).capture_exception(error, extras)
    }

    fn show_report_dialog(&self, options: &ReportDialogOptions) {
        (**self).show_report_dialog(options)
    }
}

/// Reporter used when no reporting service is configured.
///
/// Captures go to the `tracing` log, and each gets a freshly minted
/// Sentry-shaped identifier (32 lowercase hex chars) so the feedback path
/// still has something to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn capture_exception(
        &self,
        error: &RenderError,
        extras: &Extras,
    ) -> Result<EventId, ReportError> {
        let event_id = EventId::new(Uuid::new_v4().simple().to_string())?;
        let extras = serde_json::to_string(extras).unwrap_or_default();
        tracing::error!(
            event_id = %event_id,
            component = error.component().unwrap_or("<unknown>"),
            extras = %extras,
            "render failure: {error}"
        );
        Ok(event_id)
    }

    fn show_report_dialog(&self, options: &ReportDialogOptions) {
        match &options.event_id {
            Some(id) => tracing::info!(event_id = %id, "feedback requested"),
            None => tracing::info!("feedback requested without an event id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_rejects_blank() {
        assert_eq!(EventId::new(""), Err(ReportError::EmptyEventId));
        assert_eq!(EventId::new("   "), Err(ReportError::EmptyEventId));
        assert_eq!(EventId::new("abc123").unwrap().as_str(), "abc123");
    }

    #[test]
    fn event_id_deserialization_keeps_non_empty_invariant() {
        assert!(serde_json::from_str::<EventId>(r#""""#).is_err());
        assert!(serde_json::from_str::<EventId>(r#"" ""#).is_err());

        let id: EventId = serde_json::from_str(r#""evt-1""#).unwrap();
        assert_eq!(id.as_str(), "evt-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""evt-1""#);
    }

    #[test]
    fn dialog_options_use_camel_case_and_omit_missing_id() {
        let none = ReportDialogOptions::default();
        assert_eq!(none.to_json(), "{}");

        let some = ReportDialogOptions {
            event_id: Some(EventId::new("evt-1").unwrap()),
        };
        assert_eq!(some.to_json(), r#"{"eventId":"evt-1"}"#);
    }

    #[test]
    fn log_reporter_mints_sentry_shaped_ids() {
        let a = LogReporter
            .capture_exception(&RenderError::new("x"), &Extras::new())
            .unwrap();
        let b = LogReporter
            .capture_exception(&RenderError::new("x"), &Extras::new())
            .unwrap();

        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn shared_reporter_forwards_through_arc() {
        let shared: SharedReporter = Arc::new(LogReporter);
        assert!(shared
            .capture_exception(&RenderError::new("x"), &Extras::new())
            .is_ok());
        shared.show_report_dialog(&ReportDialogOptions::default());
    }
}
