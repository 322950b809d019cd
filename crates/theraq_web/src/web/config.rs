use theraq::{ConfigError, ReporterConfig};

fn config_text() -> Option<String> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(super::CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content())
        .filter(|raw| !raw.trim().is_empty())
}

/// Reporter config embedded in the page, if there is one.
pub(super) fn read_config() -> Result<Option<ReporterConfig>, ConfigError> {
    match config_text() {
        Some(raw) => ReporterConfig::from_json(&raw).map(Some),
        None => Ok(None),
    }
}
