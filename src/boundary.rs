//! Error boundary state machine.
//!
//! A boundary starts `Healthy` and renders its children untouched. The first
//! descendant render failure moves it to `Failed`, which is terminal for that
//! mount: the fallback is shown from then on and the children are never
//! rendered again until the boundary is remounted.
//!
//! Reporting is split from the transition. [`ErrorBoundary::on_child_failure`]
//! flips the state synchronously and hands back a [`PendingReport`]; the host
//! sends it whenever it likes and feeds the result to
//! [`ErrorBoundary::resolve_report`]. Results for a mount that is gone are
//! dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{RenderError, ReportError};
use crate::fallback::FallbackView;
use crate::reporter::{EventId, Extras, Reporter};

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(1);

fn next_mount() -> u64 {
    NEXT_MOUNT.fetch_add(1, Ordering::Relaxed)
}

/// Extras key for the framework-provided component stack.
pub const EXTRA_COMPONENT_STACK: &str = "componentStack";
/// Extras key for the failing component's name.
pub const EXTRA_COMPONENT: &str = "component";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryState {
    pub has_error: bool,
    /// Only meaningful while `has_error` is set.
    pub event_id: Option<EventId>,
}

impl BoundaryState {
    pub fn phase(&self) -> BoundaryPhase {
        if self.has_error {
            BoundaryPhase::Failed
        } else {
            BoundaryPhase::Healthy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPhase {
    #[default]
    Healthy,
    Failed,
}

impl BoundaryPhase {
    pub fn label(self) -> &'static str {
        match self {
            BoundaryPhase::Healthy => "healthy",
            BoundaryPhase::Failed => "failed",
        }
    }
}

/// What the host knows about a failure besides the error itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureContext {
    pub component_stack: Option<String>,
    pub extras: Extras,
}

impl FailureContext {
    pub fn with_component_stack(mut self, stack: impl Into<String>) -> Self {
        self.component_stack = Some(stack.into());
        self
    }

    pub fn with_extra(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Flatten into the extras sent with the report.
    pub fn into_extras(self, error: &RenderError) -> Extras {
        let mut extras = self.extras;
        if let Some(stack) = self.component_stack {
            extras.insert(EXTRA_COMPONENT_STACK.to_string(), stack.into());
        }
        if let Some(component) = error.component() {
            extras
                .entry(EXTRA_COMPONENT.to_string())
                .or_insert_with(|| component.into());
        }
        extras
    }
}

/// Ties an in-flight report to the mount that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTicket {
    mount: u64,
}

/// The deferred half of a failure transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReport {
    ticket: ReportTicket,
    error: RenderError,
    extras: Extras,
}

impl PendingReport {
    pub fn ticket(&self) -> ReportTicket {
        self.ticket
    }

    pub fn error(&self) -> &RenderError {
        &self.error
    }

    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    pub fn send<R: Reporter + ?Sized>(
        self,
        reporter: &R,
    ) -> (ReportTicket, Result<EventId, ReportError>) {
        let outcome = reporter.capture_exception(&self.error, &self.extras);
        (self.ticket, outcome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The identifier is now part of the boundary state.
    Stored,
    /// The report failed; the fallback stays without an identifier.
    ReportFailed,
    /// The ticket belongs to an unmounted or replaced mount.
    Ignored,
}

/// Output of a boundary render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<C> {
    Children(C),
    Fallback(FallbackView),
}

impl<C> Rendered<C> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Rendered::Fallback(_))
    }

    pub fn fallback(&self) -> Option<&FallbackView> {
        match self {
            Rendered::Children(_) => None,
            Rendered::Fallback(f) => Some(f),
        }
    }
}

/// Something a boundary can render on the host.
pub trait Component {
    type Output;

    fn render(&self) -> Result<Self::Output, RenderError>;

    /// Short type name, without path or generic arguments.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

#[derive(Debug)]
pub struct ErrorBoundary {
    mount: u64,
    mounted: bool,
    state: BoundaryState,
}

impl Default for ErrorBoundary {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorBoundary {
    /// Mount a fresh boundary in the `Healthy` state.
    pub fn new() -> Self {
        Self {
            mount: next_mount(),
            mounted: true,
            state: BoundaryState::default(),
        }
    }

    /// State the next render should see once `error` has been raised.
    pub fn derive_state_from_error(_error: &RenderError) -> BoundaryState {
        BoundaryState {
            has_error: true,
            event_id: None,
        }
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn phase(&self) -> BoundaryPhase {
        self.state.phase()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// `Healthy -> Failed`.
    ///
    /// Returns the report to send for the first failure of a mount. Later
    /// failures, and failures after unmount, change nothing and return `None`.
    pub fn on_child_failure(
        &mut self,
        error: RenderError,
        context: FailureContext,
    ) -> Option<PendingReport> {
        if !self.mounted {
            tracing::debug!(%error, "render failure after unmount dropped");
            return None;
        }
        if self.state.has_error {
            tracing::debug!(%error, "boundary already failed; not reporting again");
            return None;
        }

        self.state = Self::derive_state_from_error(&error);
        tracing::info!(
            mount = self.mount,
            component = error.component().unwrap_or("<unknown>"),
            "render failure caught: {error}"
        );

        let extras = context.into_extras(&error);
        Some(PendingReport {
            ticket: ReportTicket { mount: self.mount },
            error,
            extras,
        })
    }

    /// Record the result of a report sent for `ticket`.
    pub fn resolve_report(
        &mut self,
        ticket: ReportTicket,
        outcome: Result<EventId, ReportError>,
    ) -> ResolveOutcome {
        if !self.mounted || ticket.mount != self.mount {
            tracing::debug!(
                ticket = ticket.mount,
                mount = self.mount,
                "late crash report result ignored"
            );
            return ResolveOutcome::Ignored;
        }

        match outcome {
            Ok(event_id) => {
                tracing::debug!(%event_id, "crash report stored");
                self.state.event_id = Some(event_id);
                ResolveOutcome::Stored
            }
            Err(e) => {
                tracing::warn!(error = %e, "crash report failed; fallback has no event id");
                ResolveOutcome::ReportFailed
            }
        }
    }

    /// Transition, send and resolve in one go.
    ///
    /// Returns `None` when the failure did not produce a report.
    pub fn catch<R: Reporter + ?Sized>(
        &mut self,
        reporter: &R,
        error: RenderError,
        context: FailureContext,
    ) -> Option<ResolveOutcome> {
        let pending = self.on_child_failure(error, context)?;
        let (ticket, outcome) = pending.send(reporter);
        Some(self.resolve_report(ticket, outcome))
    }

    pub fn fallback(&self) -> FallbackView {
        FallbackView::new(self.state.event_id.clone())
    }

    /// Render already-produced children through the boundary.
    pub fn render<C>(&self, children: C) -> Rendered<C> {
        if self.state.has_error {
            Rendered::Fallback(self.fallback())
        } else {
            Rendered::Children(children)
        }
    }

    /// Render `child`, converting a failure into the fallback.
    ///
    /// A failed boundary does not call `child.render()` at all.
    pub fn render_child<C: Component + ?Sized>(
        &mut self,
        child: &C,
    ) -> (Rendered<C::Output>, Option<PendingReport>) {
        if self.state.has_error {
            return (Rendered::Fallback(self.fallback()), None);
        }

        match child.render() {
            Ok(output) => (Rendered::Children(output), None),
            Err(error) => {
                let context = FailureContext::default().with_component_stack(child.name());
                let pending = self.on_child_failure(error, context);
                (Rendered::Fallback(self.fallback()), pending)
            }
        }
    }

    /// Drop error data and stop accepting report results.
    pub fn unmount(&mut self) {
        tracing::debug!(
            mount = self.mount,
            phase = self.phase().label(),
            "boundary unmounted"
        );
        self.mounted = false;
        self.state = BoundaryState::default();
    }

    /// Start over as a brand new mount.
    pub fn remount(&mut self) {
        *self = Self::new();
    }
}
