//! Bindings to the Sentry browser SDK loaded on the page as the `Sentry` global.

use std::sync::Arc;

use serde::Serialize;
use theraq::{
    EventId, Extras, LogReporter, RenderError, ReportDialogOptions, ReportError, Reporter,
    ReporterConfig, SharedReporter,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Sentry, js_name = init, catch)]
    fn sentry_init(options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = Sentry, js_name = captureException, catch)]
    fn sentry_capture_exception(exception: &JsValue, hint: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = Sentry, js_name = showReportDialog, catch)]
    fn sentry_show_report_dialog(options: &JsValue) -> Result<(), JsValue>;
}

#[derive(Serialize)]
struct CaptureHint<'a> {
    extra: &'a Extras,
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

fn to_js(json: &str) -> Result<JsValue, ReportError> {
    js_sys::JSON::parse(json).map_err(|e| ReportError::Rejected(describe(&e)))
}

fn sdk_loaded() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("Sentry")).unwrap_or(false)
}

/// [`Reporter`] backed by the page's Sentry SDK.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct BrowserReporter;

impl Reporter for BrowserReporter {
    fn capture_exception(
        &self,
        error: &RenderError,
        extras: &Extras,
    ) -> Result<EventId, ReportError> {
        let exception = js_sys::Error::new(error.message());
        if let Some(component) = error.component() {
            exception.set_name(&format!("RenderError({component})"));
        }

        let hint = serde_json::to_string(&CaptureHint { extra: extras })
            .map_err(|e| ReportError::Rejected(e.to_string()))?;
        let hint = to_js(&hint)?;

        let id = sentry_capture_exception(&exception, &hint)
            .map_err(|e| ReportError::Unavailable(describe(&e)))?;
        EventId::new(id.as_string().unwrap_or_default())
    }

    fn show_report_dialog(&self, options: &ReportDialogOptions) {
        let shown = to_js(&options.to_json()).and_then(|opts| {
            sentry_show_report_dialog(&opts).map_err(|e| ReportError::Unavailable(describe(&e)))
        });
        if let Err(e) = shown {
            tracing::warn!(error = %e, "could not open the feedback dialog");
        }
    }
}

/// Initialize the SDK and pick the reporter the app will use.
pub(super) fn install_reporter(cfg: &ReporterConfig) -> SharedReporter {
    if !cfg.is_active() {
        tracing::info!("crash reporting inactive; captures are logged only");
        return Arc::new(LogReporter);
    }
    if !sdk_loaded() {
        tracing::warn!("Sentry SDK not loaded on the page; captures are logged only");
        return Arc::new(LogReporter);
    }

    let init = cfg
        .init_options()
        .map_err(|e| e.to_string())
        .and_then(|opts| serde_json::to_string(&opts).map_err(|e| e.to_string()))
        .and_then(|json| to_js(&json).map_err(|e| e.to_string()))
        .and_then(|opts| sentry_init(&opts).map_err(|e| describe(&e)));

    match init {
        Ok(()) => {
            tracing::info!(environment = %cfg.environment, "Sentry initialized");
            Arc::new(BrowserReporter)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sentry init failed; captures are logged only");
            Arc::new(LogReporter)
        }
    }
}
