//! Blocking native dialogs.
//!
//! Outside a browser window every prompt is treated as cancelled.

use log::warn;

/// `window.prompt`; `None` when cancelled.
pub fn prompt(message: &str, default: &str) -> Option<String> {
	web_sys::window()?
		.prompt_with_message_and_default(message, default)
		.ok()
		.flatten()
}

/// `window.confirm`; `false` when dismissed.
pub fn confirm(message: &str) -> bool {
	web_sys::window()
		.and_then(|w| w.confirm_with_message(message).ok())
		.unwrap_or(false)
}

/// `window.alert`.
pub fn alert(message: &str) {
	match web_sys::window() {
		Some(w) => {
			let _ = w.alert_with_message(message);
		}
		None => warn!("{message}"),
	}
}

/// Opens `url` in a new tab.
pub fn open_in_new_tab(url: &str) {
	if let Some(w) = web_sys::window() {
		if w.open_with_url_and_target(url, "_blank").is_err() {
			warn!("could not open {url}");
		}
	}
}

/// Millisecond wall-clock time, for generated ids.
pub fn now_millis() -> u64 {
	js_sys::Date::now() as u64
}

/// Logs a failed operation and tells the user about it.
pub fn report(action: &str, err: impl std::fmt::Display) {
	log::error!("{action}: {err}");
	alert(&format!("{action}: {err}"));
}
