use std::sync::Arc;

use leptos::prelude::*;
use theraq::{
    BoundaryState, ErrorBoundary as BoundaryMachine, EventId, FailureContext, FallbackView,
    LogReporter, RenderError, SharedReporter,
};

/// Wraps `children` in Leptos' error boundary and drives the shared
/// boundary state machine from it.
///
/// Once a child fails the boundary stays on the fallback for the rest of
/// this mount, even if the underlying errors clear.
#[component]
pub(super) fn SentryBoundary(children: ChildrenFn) -> impl IntoView {
    let reporter = use_context::<SharedReporter>().unwrap_or_else(|| Arc::new(LogReporter));

    let machine = StoredValue::new(BoundaryMachine::new());
    let state = RwSignal::new(BoundaryState::default());
    let failed = Memo::new(move |_| state.with(|s| s.has_error));
    let event_id = Signal::derive(move || state.with(|s| s.event_id.clone()));

    on_cleanup(move || {
        let _ = machine.try_update_value(|m| m.unmount());
    });

    move || {
        if failed.get() {
            return view! { <FallbackUi event_id=event_id reporter=reporter.clone() /> }
                .into_any();
        }

        let children = children.clone();
        let reporter = reporter.clone();
        view! {
            <ErrorBoundary fallback=move |errors| {
                let first = errors.get_untracked().into_iter().next();
                if let Some((id, err)) = first {
                    let error = RenderError::new(err.to_string());
                    let context = FailureContext::default()
                        .with_extra("errorId", format!("{id:?}"));
                    catch_failure(machine, state, reporter.clone(), error, context);
                }
                view! { <FallbackUi event_id=event_id reporter=reporter.clone() /> }
            }>
                {children()}
            </ErrorBoundary>
        }
        .into_any()
    }
}

/// Run the failure transition, then report off the render path.
fn catch_failure(
    machine: StoredValue<BoundaryMachine>,
    state: RwSignal<BoundaryState>,
    reporter: SharedReporter,
    error: RenderError,
    context: FailureContext,
) {
    let pending = machine
        .try_update_value(|m| m.on_child_failure(error, context))
        .flatten();
    let Some(pending) = pending else {
        return;
    };
    tracing::debug!(
        error = %pending.error(),
        extras = pending.extras().len(),
        "sending crash report"
    );

    wasm_bindgen_futures::spawn_local(async move {
        if let Some(snapshot) = machine.try_with_value(|m| m.state().clone()) {
            let _ = state.try_set(snapshot);
        }

        let (ticket, outcome) = pending.send(&*reporter);
        let resolved = machine.try_update_value(|m| {
            m.resolve_report(ticket, outcome);
            m.state().clone()
        });
        // Disposed after unmount; the late result goes nowhere.
        if let Some(snapshot) = resolved {
            let _ = state.try_set(snapshot);
        }
    });
}

#[component]
fn FallbackUi(event_id: Signal<Option<EventId>>, reporter: SharedReporter) -> impl IntoView {
    let data_event_id = move || {
        event_id.with(|id| FallbackView::new(id.clone()).event_id_or_default().to_string())
    };

    view! {
        <h3>{FallbackView::HEADING}</h3>
        <button
            type="button"
            data-event-id=data_event_id
            on:click=move |_| FallbackView::new(event_id.get_untracked()).activate(&*reporter)
        >
            {FallbackView::BUTTON_LABEL}
        </button>
    }
}
