//! Leptos client-side story map editor: app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod bootstrap;
mod components;
mod config;
mod dialogs;
mod editor;
mod error;
mod pages;
mod reader;
mod story;

// Top-Level pages
use crate::api::ApiClient;
use crate::config::Config;
use crate::pages::editor::EditorPage;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::reader::ReaderPage;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	// The logger has to exist before the config is read so that bad meta
	// values can be reported; the configured level is applied afterwards.
	let _ = console_log::init_with_level(Level::Trace);
	console_error_panic_hook::set_once();
	let level = Config::load().log_level;
	log::set_max_level(level.to_level_filter());
	info!("Logging initialized at {level}");
}

/// An app router for the story list, editor and reader pages
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = Config::load();
	provide_context(ApiClient::new(config.api_base.clone()));
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Story Maps" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/editor/:id") view=EditorPage />
				<Route path=path!("/view/:id") view=ReaderPage />
			</Routes>
		</Router>
	}
}
