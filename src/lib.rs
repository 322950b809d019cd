//! Front-end shell core: an error boundary that reports descendant render
//! failures to a crash-reporting service and swaps in a feedback fallback.
//!
//! Everything here is host-agnostic so it can be unit-tested natively; the
//! Leptos app in `crates/theraq_web` drives these types from the browser.

pub mod boundary;
pub mod config;
pub mod error;
pub mod fallback;
pub mod reporter;
pub mod root_view;
pub mod shell;

pub use boundary::{
    BoundaryPhase, BoundaryState, Component, ErrorBoundary, FailureContext, PendingReport,
    Rendered, ReportTicket, ResolveOutcome,
};
pub use config::{Dsn, ReporterConfig};
pub use error::{ConfigError, RenderError, ReportError};
pub use fallback::FallbackView;
pub use reporter::{EventId, Extras, LogReporter, ReportDialogOptions, Reporter, SharedReporter};
pub use root_view::RootView;
pub use shell::AppShell;
