//! Runtime settings read from `<meta>` tags of the host page.

use std::str::FromStr;

use log::{Level, warn};

const META_API_BASE: &str = "storymap:api-base";
const META_LOG_LEVEL: &str = "storymap:log-level";
const META_EXPORT_FORMATS: &str = "storymap:export-formats";

/// Client configuration, shared through Leptos context.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	/// Prefix for every backend request. Empty means same origin.
	pub api_base: String,
	/// Console log level.
	pub log_level: Level,
	/// Format tokens offered in the export menu.
	pub export_formats: Vec<String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			log_level: Level::Debug,
			export_formats: ["json", "markdown", "html"].map(String::from).to_vec(),
		}
	}
}

impl Config {
	/// Defaults overridden by any `storymap:*` meta tags in the document.
	pub fn load() -> Self {
		let mut config = Self::default();
		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return config;
		};
		for key in [META_API_BASE, META_LOG_LEVEL, META_EXPORT_FORMATS] {
			let content = document
				.query_selector(&format!("meta[name=\"{key}\"]"))
				.ok()
				.flatten()
				.and_then(|el| el.get_attribute("content"));
			if let Some(value) = content {
				config.apply(key, &value);
			}
		}
		config
	}

	fn apply(&mut self, key: &str, value: &str) {
		match key {
			META_API_BASE => self.api_base = value.trim().trim_end_matches('/').to_owned(),
			META_LOG_LEVEL => match Level::from_str(value.trim()) {
				Ok(level) => self.log_level = level,
				Err(_) => warn!("ignoring unknown log level {value:?}"),
			},
			META_EXPORT_FORMATS => {
				let formats: Vec<String> = value
					.split(',')
					.map(str::trim)
					.filter(|f| !f.is_empty())
					.map(String::from)
					.collect();
				if !formats.is_empty() {
					self.export_formats = formats;
				}
			}
			_ => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn meta_values_override_defaults() {
		let mut config = Config::default();
		config.apply(META_API_BASE, " https://stories.example/ ");
		config.apply(META_LOG_LEVEL, "warn");
		config.apply(META_EXPORT_FORMATS, "json, twee ,");
		assert_eq!(config.api_base, "https://stories.example");
		assert_eq!(config.log_level, Level::Warn);
		assert_eq!(config.export_formats, vec!["json", "twee"]);
	}

	#[test]
	fn bad_values_keep_defaults() {
		let mut config = Config::default();
		config.apply(META_LOG_LEVEL, "loud");
		config.apply(META_EXPORT_FORMATS, " , ");
		assert_eq!(config, Config::default());
	}
}
