use crate::reporter::{EventId, ReportDialogOptions, Reporter};

/// What a failed boundary shows instead of its children.
///
/// Stateless: it only carries the event identifier known at render time,
/// which may be missing if the report has not resolved (or failed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackView {
    event_id: Option<EventId>,
}

impl FallbackView {
    pub const HEADING: &'static str = "Check if there is an error on your Sentry app";
    pub const BUTTON_LABEL: &'static str = "Report feedback";

    pub fn new(event_id: Option<EventId>) -> Self {
        Self { event_id }
    }

    pub fn event_id(&self) -> Option<&EventId> {
        self.event_id.as_ref()
    }

    /// The identifier as displayed, `""` when absent.
    pub fn event_id_or_default(&self) -> &str {
        self.event_id.as_ref().map_or("", EventId::as_str)
    }

    pub fn dialog_options(&self) -> ReportDialogOptions {
        ReportDialogOptions {
            event_id: self.event_id.clone(),
        }
    }

    /// The feedback control was activated.
    pub fn activate<R: Reporter + ?Sized>(&self, reporter: &R) {
        reporter.show_report_dialog(&self.dialog_options());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RenderError, ReportError};
    use crate::reporter::Extras;
    use std::sync::Mutex;

    #[derive(Default)]
    struct DialogSpy {
        opened: Mutex<Vec<Option<String>>>,
    }

    impl Reporter for DialogSpy {
        fn capture_exception(
            &self,
            _error: &RenderError,
            _extras: &Extras,
        ) -> Result<EventId, ReportError> {
            Err(ReportError::Unavailable("spy".into()))
        }

        fn show_report_dialog(&self, options: &ReportDialogOptions) {
            self.opened
                .lock()
                .unwrap()
                .push(options.event_id.as_ref().map(|id| id.to_string()));
        }
    }

    #[test]
    fn default_fallback_has_empty_id() {
        let view = FallbackView::default();
        assert_eq!(view.event_id(), None);
        assert_eq!(view.event_id_or_default(), "");
        assert_eq!(view.dialog_options().to_json(), "{}");
    }

    #[test]
    fn activation_passes_current_id() {
        let spy = DialogSpy::default();

        FallbackView::default().activate(&spy);
        FallbackView::new(Some(EventId::new("abc123").unwrap())).activate(&spy);

        let opened = spy.opened.lock().unwrap();
        assert_eq!(*opened, vec![None, Some("abc123".to_string())]);
    }

    #[test]
    fn copy_matches_the_feedback_ui() {
        assert!(FallbackView::HEADING.contains("Sentry"));
        assert_eq!(FallbackView::BUTTON_LABEL, "Report feedback");
    }
}
