//! Story data injected into the host page before the app starts.

use log::{debug, warn};
use wasm_bindgen::JsValue;

use crate::story::Story;

/// The `window.storyData` document, if the page preloaded the story `story_id`.
pub fn preloaded_story(story_id: &str) -> Option<Story> {
	let window: JsValue = web_sys::window()?.into();
	let injected_id = js_sys::Reflect::get(&window, &JsValue::from_str("storyId"))
		.ok()?
		.as_string()?;
	if injected_id != story_id {
		return None;
	}
	let data = js_sys::Reflect::get(&window, &JsValue::from_str("storyData")).ok()?;
	if data.is_undefined() || data.is_null() {
		return None;
	}
	let json = js_sys::JSON::stringify(&data).ok()?.as_string()?;
	match serde_json::from_str(&json) {
		Ok(story) => {
			debug!("using preloaded story {story_id}");
			Some(story)
		}
		Err(err) => {
			warn!("ignoring malformed preloaded story {story_id}: {err}");
			None
		}
	}
}
