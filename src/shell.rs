use crate::boundary::{Component, ErrorBoundary, Rendered};
use crate::reporter::Reporter;
use crate::root_view::RootView;

/// The app: one root component wrapped once in an error boundary.
#[derive(Debug)]
pub struct AppShell<C = RootView> {
    boundary: ErrorBoundary,
    root: C,
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}

impl AppShell {
    pub fn new() -> Self {
        Self::with_root(RootView)
    }
}

impl<C: Component> AppShell<C> {
    pub fn with_root(root: C) -> Self {
        Self {
            boundary: ErrorBoundary::new(),
            root,
        }
    }

    pub fn boundary(&self) -> &ErrorBoundary {
        &self.boundary
    }

    /// Render the root through the boundary, reporting a failure straight away.
    pub fn render<R: Reporter + ?Sized>(&mut self, reporter: &R) -> Rendered<C::Output> {
        let (rendered, pending) = self.boundary.render_child(&self.root);
        let Some(pending) = pending else {
            return rendered;
        };

        let (ticket, outcome) = pending.send(reporter);
        self.boundary.resolve_report(ticket, outcome);
        // Re-render so the fallback carries the identifier.
        self.boundary.render_child(&self.root).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RenderError, ReportError};
    use crate::reporter::{EventId, Extras, LogReporter, ReportDialogOptions};
    use std::cell::{Cell, RefCell};

    struct FixedIdReporter {
        id: &'static str,
        captures: Cell<u32>,
        dialogs: RefCell<Vec<ReportDialogOptions>>,
    }

    impl FixedIdReporter {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                captures: Cell::new(0),
                dialogs: RefCell::new(Vec::new()),
            }
        }
    }

    impl Reporter for FixedIdReporter {
        fn capture_exception(
            &self,
            _error: &RenderError,
            _extras: &Extras,
        ) -> Result<EventId, ReportError> {
            self.captures.set(self.captures.get() + 1);
            EventId::new(self.id)
        }

        fn show_report_dialog(&self, options: &ReportDialogOptions) {
            self.dialogs.borrow_mut().push(options.clone());
        }
    }

    struct Broken;

    impl Component for Broken {
        type Output = &'static str;

        fn render(&self) -> Result<&'static str, RenderError> {
            Err(RenderError::new("x"))
        }
    }

    #[test]
    fn shell_renders_greeting_without_fallback() {
        let mut shell = AppShell::new();
        for _ in 0..2 {
            assert_eq!(shell.render(&LogReporter), Rendered::Children("Hello"));
        }
        assert!(!shell.boundary().state().has_error);
    }

    #[test]
    fn failing_root_reports_once_and_fallback_carries_event_id() {
        let reporter = FixedIdReporter::new("evt-1");
        let mut shell = AppShell::with_root(Broken);

        let rendered = shell.render(&reporter);
        let fallback = rendered.fallback().expect("fallback after failure");
        assert_eq!(fallback.event_id_or_default(), "evt-1");
        assert_eq!(
            shell.boundary().state().event_id,
            Some(EventId::new("evt-1").unwrap())
        );

        fallback.activate(&reporter);
        assert_eq!(
            reporter.dialogs.borrow()[0].event_id,
            Some(EventId::new("evt-1").unwrap())
        );

        // Later renders stay on the fallback without reporting again.
        assert!(shell.render(&reporter).is_fallback());
        assert_eq!(reporter.captures.get(), 1);
    }
}
