use wheelspin::settings::SpinSettings;

use super::{LOCALSTORAGE_ENTRIES_KEY, LOCALSTORAGE_SETTINGS_KEY};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn local_storage_get_string(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

fn local_storage_set_string(key: &str, value: &str) {
    if let Some(s) = local_storage() {
        let _ = s.set_item(key, value);
    }
}

/// Saved settings, or `None` when absent or unusable (reported to the console).
pub(super) fn load_settings() -> Option<SpinSettings> {
    let raw = local_storage_get_string(LOCALSTORAGE_SETTINGS_KEY)?;
    match SpinSettings::from_json(&raw) {
        Ok(s) => Some(s),
        Err(e) => {
            web_sys::console::warn_1(&format!("wheelspin: ignoring saved settings: {e}").into());
            None
        }
    }
}

pub(super) fn save_settings(settings: &SpinSettings) {
    match settings.to_json() {
        Ok(raw) => local_storage_set_string(LOCALSTORAGE_SETTINGS_KEY, &raw),
        Err(e) => {
            web_sys::console::error_1(&format!("wheelspin: settings not saved: {e}").into())
        }
    }
}

pub(super) fn load_entries_text() -> Option<String> {
    local_storage_get_string(LOCALSTORAGE_ENTRIES_KEY)
}

pub(super) fn save_entries_text(text: &str) {
    local_storage_set_string(LOCALSTORAGE_ENTRIES_KEY, text);
}
