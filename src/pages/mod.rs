use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use log::error;

use crate::api::ApiClient;
use crate::bootstrap;
use crate::story::Story;

pub mod editor;
pub mod home;
pub mod not_found;
pub mod reader;

/// Loading state of the story named by the `:id` route parameter.
pub type StoryLoad = Option<Result<(String, Story), String>>;

/// Loads the story for the current route: the page's preloaded copy when it
/// matches, otherwise from the backend.
pub fn use_route_story() -> RwSignal<StoryLoad> {
	let params = use_params_map();
	let api = expect_context::<ApiClient>();
	let loaded: RwSignal<StoryLoad> = RwSignal::new(None);

	Effect::new(move |_| {
		let Some(story_id) = params.read().get("id") else {
			loaded.set(Some(Err("no story id in the address".into())));
			return;
		};
		if let Some(story) = bootstrap::preloaded_story(&story_id) {
			loaded.set(Some(Ok((story_id, story))));
			return;
		}
		loaded.set(None);
		let api = api.clone();
		spawn_local(async move {
			let result = match api.fetch_story(&story_id).await {
				Ok(story) => Ok((story_id, story)),
				Err(err) => {
					error!("loading story {story_id} failed: {err}");
					Err(err.to_string())
				}
			};
			loaded.set(Some(result));
		});
	});

	loaded
}
