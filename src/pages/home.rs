use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::error;

use crate::api::ApiClient;
use crate::components::story_card::StoryCard;
use crate::dialogs;
use crate::editor::{DEFAULT_STORY_TITLE, story_title};
use crate::story::Story;

/// Stories ordered newest first.
fn newest_first(stories: BTreeMap<String, Story>) -> Vec<(String, Story)> {
	let mut list: Vec<_> = stories.into_iter().collect();
	list.sort_by(|(_, a), (_, b)| b.created.cmp(&a.created));
	list
}

/// Story list page
#[component]
pub fn Home() -> impl IntoView {
	let api = expect_context::<ApiClient>();
	let navigate = use_navigate();
	let stories: RwSignal<Option<Vec<(String, Story)>>> = RwSignal::new(None);
	let load_error = RwSignal::new(None::<String>);

	let reload = {
		let api = api.clone();
		move || {
			let api = api.clone();
			spawn_local(async move {
				match api.list_stories().await {
					Ok(found) => {
						stories.set(Some(newest_first(found)));
						load_error.set(None);
					}
					Err(err) => {
						error!("loading stories failed: {err}");
						load_error.set(Some(err.to_string()));
					}
				}
			});
		}
	};
	reload();

	let create = {
		let api = api.clone();
		move |_| {
			let Some(title) = story_title(dialogs::prompt("Enter your story title:", DEFAULT_STORY_TITLE))
			else {
				return;
			};
			let (api, navigate) = (api.clone(), navigate.clone());
			spawn_local(async move {
				match api.create_story(&title).await {
					Ok(id) => navigate(&format!("/editor/{id}"), Default::default()),
					Err(err) => dialogs::report("Creating the story failed", err),
				}
			});
		}
	};

	let on_delete = Callback::new(move |story_id: String| {
		if !dialogs::confirm("Are you sure you want to delete this story?") {
			return;
		}
		let (api, reload) = (api.clone(), reload.clone());
		spawn_local(async move {
			match api.delete_story(&story_id).await {
				Ok(()) => reload(),
				Err(err) => dialogs::report("Deleting the story failed", err),
			}
		});
	});

	view! {
		<div class="home">
			<header class="page-header">
				<h1>"Story Maps"</h1>
				<button id="createStoryBtn" class="btn btn-primary" on:click=create>
					"New Story"
				</button>
			</header>
			{move || {
				load_error.get().map(|err| view! { <p class="error">"Could not load stories: " {err}</p> })
			}}
			<div id="storiesGrid" class="stories-grid">
				{move || match stories.get() {
					None => view! { <p class="loading">"Loading stories..."</p> }.into_any(),
					Some(list) if list.is_empty() => {
						view! { <p class="empty">"No stories yet. Create one to get started."</p> }
							.into_any()
					}
					Some(list) => {
						list.into_iter()
							.map(|(story_id, story)| view! { <StoryCard story_id story on_delete /> })
							.collect_view()
							.into_any()
					}
				}}
			</div>
		</div>
	}
}
