use thiserror::Error;

/// A failure raised while rendering a descendant of an error boundary.
///
/// This is the only error kind a boundary catches. It never propagates past
/// the boundary that caught it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    message: String,
    component: Option<String>,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            component: None,
        }
    }

    /// Tag the error with the name of the component that failed.
    pub fn in_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }
}

/// The reporting collaborator could not produce an event identifier.
///
/// Boundaries log these and carry on; they are never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("crash reporter unavailable: {0}")]
    Unavailable(String),
    #[error("crash reporter returned an empty event id")]
    EmptyEventId,
    #[error("crash reporter rejected the event: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid reporter config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reporting is enabled but no dsn is configured")]
    MissingDsn,
    #[error("invalid dsn {dsn:?}: {reason}")]
    InvalidDsn { dsn: String, reason: String },
    #[error("sample_rate must be within 0.0..=1.0 (got {0})")]
    SampleRate(f32),
}
