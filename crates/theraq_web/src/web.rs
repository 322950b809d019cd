use leptos::prelude::*;
use theraq::SharedReporter;

mod boundary;
mod config;
mod console;
mod sentry;

use boundary::SentryBoundary;

/// `<script type="application/json">` element holding the reporter config.
const CONFIG_ELEMENT_ID: &str = "theraq-config";

pub fn start() {
    let loaded = config::read_config();
    let cfg = match &loaded {
        Ok(Some(cfg)) => cfg.clone(),
        _ => Default::default(),
    };

    console::init(cfg.debug);
    match loaded {
        Ok(Some(_)) => tracing::debug!(environment = %cfg.environment, "reporter config loaded"),
        Ok(None) => tracing::debug!("no reporter config on page; using defaults"),
        Err(e) => tracing::warn!(error = %e, "ignoring reporter config"),
    }

    let reporter: SharedReporter = sentry::install_reporter(&cfg);
    mount_to_body(move || {
        provide_context(reporter);
        view! { <App /> }
    });
}

#[component]
fn App() -> impl IntoView {
    view! {
        <SentryBoundary>
            <RootView />
        </SentryBoundary>
    }
}

#[component]
fn RootView() -> impl IntoView {
    view! { <h1>{theraq::RootView::GREETING}</h1> }
}
