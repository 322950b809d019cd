//! `tracing` output for the browser console.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsValue;

struct ConsoleLayer {
    max_level: Level,
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // More verbose levels compare greater.
        if *meta.level() > self.max_level {
            return;
        }

        let mut line = ConsoleLine::default();
        event.record(&mut line);
        let text = JsValue::from_str(&format!(
            "{} {}: {}{}",
            meta.level(),
            meta.target(),
            line.message,
            line.fields
        ));

        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&text),
            Level::WARN => web_sys::console::warn_1(&text),
            Level::INFO => web_sys::console::info_1(&text),
            _ => web_sys::console::debug_1(&text),
        }
    }
}

#[derive(Default)]
struct ConsoleLine {
    message: String,
    fields: String,
}

impl Visit for ConsoleLine {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

pub(super) fn init(debug: bool) {
    let max_level = if debug { Level::DEBUG } else { Level::INFO };
    // Only fails if something already installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer { max_level })
        .try_init();
}
